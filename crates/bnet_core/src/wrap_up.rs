//! Network validation, fanout rebuild, and topological ordering.
//!
//! `wrap_up` re-establishes every structural invariant after a batch of
//! mutations: it validates all ID references (collecting the complete
//! diagnostic list before failing), rebuilds every fanout list from
//! scratch, topologically sorts the logic nodes with a seeded Kahn
//! traversal, and snapshots the output sources. The resulting `logic`
//! order is a pure function of the creation order, so two identical
//! mutation sequences produce identical orderings.

use crate::dff::DffKind;
use crate::ids::NodeId;
use crate::network::Network;
use crate::node::{InputKind, NodeKind, OutputKind};
use bnet_common::{BnetError, Result};
use std::collections::VecDeque;

impl Network {
    /// Validates and re-orders the network; a no-op when already sane.
    ///
    /// On any invariant violation the network is left untouched and the
    /// full diagnostic list is returned.
    pub(crate) fn wrap_up(&mut self) -> Result<()> {
        if self.sane {
            return Ok(());
        }

        let diagnostics = self.validate();
        if !diagnostics.is_empty() {
            return Err(BnetError::Invariant { diagnostics });
        }

        self.rebuild_fanouts();
        self.sort_logic()?;
        self.snapshot_output_srcs();
        self.sane = true;
        Ok(())
    }

    /// Checks every port bit, DFF terminal, and fanin reference,
    /// collecting all problems. Unset (`NULL`) output sources are
    /// tolerated; unset logic fanins are not.
    fn validate(&self) -> Vec<String> {
        let mut diagnostics = Vec::new();

        for port in &self.ports {
            for (i, &id) in port.bits.iter().enumerate() {
                let label = format!("Port#{}({}).bit[{i}]", port.id.as_raw(), port.name);
                if id.is_null() {
                    diagnostics.push(format!("{label} is not set"));
                } else if !self.check_node_id(id) {
                    diagnostics.push(format!("{label} is not valid"));
                } else if self.node(id).port_bit() != Some((port.id, i)) {
                    diagnostics.push(format!("{label} does not refer to a bit of this port"));
                }
            }
        }

        for dff in &self.dffs {
            let label = format!("DFF#{}({})", dff.id.as_raw(), dff.name);
            match &dff.kind {
                DffKind::Dff {
                    data_in,
                    data_out,
                    clock,
                    clear,
                    preset,
                    ..
                }
                | DffKind::Latch {
                    data_in,
                    data_out,
                    enable: clock,
                    clear,
                    preset,
                    ..
                } => {
                    self.check_terminal(&mut diagnostics, &label, "data_in", *data_in, |k| {
                        matches!(k, NodeKind::Output { kind: OutputKind::DataIn { dff: d }, .. } if *d == dff.id)
                    });
                    self.check_terminal(&mut diagnostics, &label, "data_out", *data_out, |k| {
                        matches!(k, NodeKind::Input { kind: InputKind::DataOut { dff: d }, .. } if *d == dff.id)
                    });
                    self.check_terminal(&mut diagnostics, &label, "clock", *clock, |k| {
                        matches!(k, NodeKind::Output { kind: OutputKind::Clock { dff: d }, .. } if *d == dff.id)
                    });
                    if let Some(clear) = *clear {
                        self.check_terminal(&mut diagnostics, &label, "clear", clear, |k| {
                            matches!(k, NodeKind::Output { kind: OutputKind::Clear { dff: d }, .. } if *d == dff.id)
                        });
                    }
                    if let Some(preset) = *preset {
                        self.check_terminal(&mut diagnostics, &label, "preset", preset, |k| {
                            matches!(k, NodeKind::Output { kind: OutputKind::Preset { dff: d }, .. } if *d == dff.id)
                        });
                    }
                }
                DffKind::Cell {
                    inputs, outputs, ..
                } => {
                    for (i, &id) in inputs.iter().enumerate() {
                        self.check_terminal(&mut diagnostics, &label, &format!("input{i}"), id, |k| {
                            matches!(k, NodeKind::Output { kind: OutputKind::CellInput { dff: d, pin }, .. } if *d == dff.id && *pin == i)
                        });
                    }
                    for (i, &id) in outputs.iter().enumerate() {
                        self.check_terminal(&mut diagnostics, &label, &format!("output{i}"), id, |k| {
                            matches!(k, NodeKind::Input { kind: InputKind::CellOutput { dff: d, pin }, .. } if *d == dff.id && *pin == i)
                        });
                    }
                }
            }
        }

        for node in &self.nodes {
            match &node.kind {
                NodeKind::Logic { fanins, .. } => {
                    for (i, &id) in fanins.iter().enumerate() {
                        let label =
                            format!("NODE#{}({}).fanin[{i}]", node.id.as_raw(), node.name);
                        if id.is_null() {
                            diagnostics.push(format!("{label} is not set"));
                        } else if !self.check_node_id(id) {
                            diagnostics.push(format!("{label} is not valid"));
                        }
                    }
                }
                NodeKind::Output { src, .. } => {
                    if !src.is_null() && !self.check_node_id(*src) {
                        diagnostics.push(format!(
                            "NODE#{}({}).fanin[0] is not valid",
                            node.id.as_raw(),
                            node.name
                        ));
                    }
                }
                NodeKind::Input { .. } => {}
            }
        }

        diagnostics
    }

    fn check_terminal(
        &self,
        diagnostics: &mut Vec<String>,
        owner: &str,
        terminal: &str,
        id: NodeId,
        matches_kind: impl Fn(&NodeKind) -> bool,
    ) {
        if id.is_null() {
            diagnostics.push(format!("{owner}.{terminal} is not set"));
        } else if !self.check_node_id(id) {
            diagnostics.push(format!("{owner}.{terminal} is not valid"));
        } else if !matches_kind(&self.node(id).kind) {
            diagnostics.push(format!(
                "{owner}.{terminal} does not refer to its own terminal node"
            ));
        }
    }

    /// Clears and rebuilds every fanout list from the fanin edges.
    fn rebuild_fanouts(&mut self) {
        for node in &mut self.nodes {
            node.fanouts.clear();
        }
        for idx in 0..self.nodes.len() {
            let id = self.nodes[idx].id;
            let srcs: Vec<NodeId> = match &self.nodes[idx].kind {
                NodeKind::Output { src, .. } if !src.is_null() => vec![*src],
                NodeKind::Logic { fanins, .. } => fanins.clone(),
                _ => Vec::new(),
            };
            for src in srcs {
                self.node_mut(src).fanouts.push(id);
            }
        }
    }

    /// Kahn's algorithm seeded with the input-side nodes, then the
    /// zero-fanin logic nodes, all in creation order.
    fn sort_logic(&mut self) -> Result<()> {
        let n = self.nodes.len();
        let mut marked = vec![false; n];
        let mut queue = VecDeque::new();

        let mark = |marked: &mut Vec<bool>, id: NodeId| marked[id.as_raw() as usize - 1] = true;

        for node in &self.nodes {
            if node.is_input() {
                mark(&mut marked, node.id);
                queue.push_back(node.id);
            }
        }
        for node in &self.nodes {
            if node.is_logic() && node.fanin_num() == 0 {
                mark(&mut marked, node.id);
                queue.push_back(node.id);
            }
        }

        let mut order = Vec::with_capacity(self.logic.len());
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            if node.is_logic() {
                order.push(id);
            }
            for fo in node.fanouts.clone() {
                if marked[fo.as_raw() as usize - 1] {
                    continue;
                }
                let ready = match &self.node(fo).kind {
                    NodeKind::Logic { fanins, .. } => fanins
                        .iter()
                        .all(|f| marked[f.as_raw() as usize - 1]),
                    NodeKind::Output { .. } => true,
                    NodeKind::Input { .. } => true,
                };
                if ready {
                    mark(&mut marked, fo);
                    queue.push_back(fo);
                }
            }
        }

        if order.len() != self.logic.len() {
            let stuck: Vec<String> = self
                .logic
                .iter()
                .filter(|id| !order.contains(id))
                .map(|id| {
                    format!(
                        "NODE#{}({}) is on a combinational cycle",
                        id.as_raw(),
                        self.node(*id).name
                    )
                })
                .collect();
            return Err(BnetError::Invariant { diagnostics: stuck });
        }
        self.logic = order;
        Ok(())
    }

    fn snapshot_output_srcs(&mut self) {
        self.output_srcs = self
            .outputs
            .iter()
            .map(|&id| self.node(id).output_src().unwrap_or(NodeId::NULL))
            .collect();
        self.primary_output_srcs = self
            .primary_outputs
            .iter()
            .map(|&id| self.node(id).output_src().unwrap_or(NodeId::NULL))
            .collect();
    }
}
