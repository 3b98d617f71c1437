//! Shared name resolution for the netlist writers.
//!
//! Original names are preferred when present and unique; everything else
//! gets a generated `<prefix><n><suffix>` name. Output-side nodes are
//! folded onto the names of their drivers the way BLIF and ISCAS-89
//! expect: a primary output takes over its source's name, a DFF input
//! takes the name of whatever drives it. Nodes outside every data cone
//! (clock and set/reset trees) are flagged so the writers can skip them.

use crate::name_mgr::NameMgr;
use bnet_core::{Network, NodeId};
use std::collections::HashSet;

pub(crate) struct NameResolver {
    names: Vec<String>,
    data: Vec<bool>,
}

impl NameResolver {
    pub(crate) fn new(net: &Network, prefix: &str, suffix: &str) -> Self {
        let mut resolver = Self {
            names: vec![String::new(); net.node_num()],
            data: vec![false; net.node_num()],
        };
        resolver.init(net, prefix, suffix);
        resolver
    }

    /// Returns the resolved name of a node.
    pub(crate) fn node_name(&self, id: NodeId) -> &str {
        &self.names[id.as_raw() as usize - 1]
    }

    /// Returns `true` when the node feeds a data output (as opposed to
    /// only clock/clear/preset trees).
    pub(crate) fn is_data(&self, id: NodeId) -> bool {
        self.data[id.as_raw() as usize - 1]
    }

    fn init(&mut self, net: &Network, prefix: &str, suffix: &str) {
        let mut mgr = NameMgr::new(prefix, suffix);
        let mut taken = HashSet::new();

        // Port names first: they are the externally visible contract.
        for port in net.ports() {
            if port.name().is_empty() {
                continue;
            }
            if port.bit_width() == 1 {
                self.reg(port.bit(0), port.name().to_string(), &mut taken, &mut mgr);
            } else {
                for (b, &bit) in port.bits().iter().enumerate() {
                    self.reg(bit, format!("{}[{b}]", port.name()), &mut taken, &mut mgr);
                }
            }
        }

        // DFF names attach to their data outputs.
        for dff in net.dffs() {
            if !dff.is_cell() && !dff.name().is_empty() {
                self.reg(dff.data_out(), dff.name().to_string(), &mut taken, &mut mgr);
            }
        }

        // Then every node's own name, most externally visible first.
        for &id in net.primary_input_ids() {
            self.reg(id, net.node(id).name().to_string(), &mut taken, &mut mgr);
        }
        for dff in net.dffs() {
            if !dff.is_cell() {
                let id = dff.data_out();
                self.reg(id, net.node(id).name().to_string(), &mut taken, &mut mgr);
            }
        }
        for &id in net.primary_output_ids() {
            self.reg(id, net.node(id).name().to_string(), &mut taken, &mut mgr);
        }
        for dff in net.dffs() {
            if !dff.is_cell() {
                let id = dff.data_in();
                self.reg(id, net.node(id).name().to_string(), &mut taken, &mut mgr);
            }
        }
        for &id in net.logic_ids() {
            self.reg(id, net.node(id).name().to_string(), &mut taken, &mut mgr);
        }

        // Generated names for everything still blank.
        for slot in self.names.iter_mut() {
            if slot.is_empty() {
                *slot = mgr.new_name();
            }
        }

        // A primary output folds its name onto its source, unless the
        // source is an input with a name of its own.
        for &id in net.primary_output_ids() {
            if let Some(src) = net.node(id).output_src() {
                if !src.is_null() && !net.node(src).is_input() {
                    self.names[src.as_raw() as usize - 1] =
                        self.names[id.as_raw() as usize - 1].clone();
                }
            }
        }

        // A DFF input reports the name of its driver.
        for dff in net.dffs() {
            if dff.is_cell() {
                continue;
            }
            let id = dff.data_in();
            if let Some(src) = net.node(id).output_src() {
                if !src.is_null() {
                    self.names[id.as_raw() as usize - 1] =
                        self.names[src.as_raw() as usize - 1].clone();
                }
            }
        }

        // Data-cone marking: everything feeding a port output or a DFF
        // data input counts; clock and set/reset trees do not.
        for &id in net.output_ids() {
            let node = net.node(id);
            if node.is_port_output() || node.is_data_in() {
                if let Some(src) = node.output_src() {
                    if !src.is_null() {
                        self.mark_tfi(net, src);
                    }
                }
            }
        }
        // Nodes driving nothing count as data too; they are merely
        // dangling, not part of a clock tree.
        for node in net.nodes() {
            if !node.is_output() && node.fanout_num() == 0 {
                self.mark_tfi(net, node.id());
            }
        }
    }

    fn reg(&mut self, id: NodeId, name: String, taken: &mut HashSet<String>, mgr: &mut NameMgr) {
        let slot = id.as_raw() as usize - 1;
        if !self.names[slot].is_empty() || name.is_empty() || taken.contains(&name) {
            return;
        }
        mgr.add(&name);
        taken.insert(name.clone());
        self.names[slot] = name;
    }

    fn mark_tfi(&mut self, net: &Network, id: NodeId) {
        if self.data[id.as_raw() as usize - 1] {
            return;
        }
        self.data[id.as_raw() as usize - 1] = true;
        for &fanin in net.node(id).fanin_ids() {
            self.mark_tfi(net, fanin);
        }
    }
}
