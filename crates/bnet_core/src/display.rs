//! Human-readable network dump.

use crate::dff::DffKind;
use crate::ids::NodeId;
use crate::network::Network;
use crate::node::{LogicKind, NodeKind};
use std::fmt;

fn id_of(id: NodeId) -> String {
    if id.is_null() {
        "-".to_string()
    } else {
        format!("%{}", id.as_raw())
    }
}

impl fmt::Display for Network {
    /// Writes the whole structure in an informal, line-oriented form:
    /// ports with their bits, DFFs with their terminals, logic nodes in
    /// topological order, and the output wiring.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "network: {}", self.name())?;
        for port in self.ports() {
            write!(f, "port#{} {}:", port.id().as_raw(), port.name())?;
            for &bit in port.bits() {
                let dir = if self.node(bit).is_input() { "i" } else { "o" };
                write!(f, " {}{}", id_of(bit), dir)?;
            }
            writeln!(f)?;
        }
        for dff in self.dffs() {
            write!(f, "dff#{} {}:", dff.id().as_raw(), dff.name())?;
            match dff.kind() {
                DffKind::Dff { .. } | DffKind::Latch { .. } => {
                    let flavour = if dff.is_dff() { "dff" } else { "latch" };
                    write!(
                        f,
                        " {flavour} in={} out={} clk={}",
                        id_of(dff.data_in()),
                        id_of(dff.data_out()),
                        id_of(dff.clock())
                    )?;
                    if let Some(clear) = dff.clear() {
                        write!(f, " clr={}", id_of(clear))?;
                    }
                    if let Some(preset) = dff.preset() {
                        write!(f, " pre={}", id_of(preset))?;
                    }
                    writeln!(f)?;
                }
                DffKind::Cell {
                    cell,
                    inputs,
                    outputs,
                } => {
                    write!(f, " cell#{}", cell.as_raw())?;
                    for id in inputs {
                        write!(f, " in={}", id_of(*id))?;
                    }
                    for id in outputs {
                        write!(f, " out={}", id_of(*id))?;
                    }
                    writeln!(f)?;
                }
            }
        }
        for &id in self.logic_ids() {
            let node = self.node(id);
            write!(f, "{} {}: ", id_of(id), node.name())?;
            let NodeKind::Logic { fanins, kind } = node.kind() else {
                unreachable!("logic list holds only logic nodes");
            };
            match kind {
                LogicKind::Prim(prim) => write!(f, "{prim}")?,
                LogicKind::Expr(eid) => write!(f, "expr {}", self.expr(*eid))?,
                LogicKind::TvFunc(fid) => write!(f, "tv {:?}", self.func(*fid))?,
                LogicKind::Bdd(bdd) => {
                    write!(f, "bdd {}", self.bdd_mgr().to_truth(*bdd, fanins.len()))?
                }
                LogicKind::Cell(cell) => write!(f, "cell#{}", cell.as_raw())?,
            }
            write!(f, " (")?;
            let mut comma = "";
            for &fanin in fanins {
                write!(f, "{comma}{}", id_of(fanin))?;
                comma = ", ";
            }
            writeln!(f, ")")?;
        }
        for &id in self.output_ids() {
            let node = self.node(id);
            writeln!(
                f,
                "{} {} <- {}",
                id_of(id),
                node.name(),
                id_of(node.output_src().unwrap_or(NodeId::NULL))
            )?;
        }
        Ok(())
    }
}
