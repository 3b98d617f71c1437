//! The polymorphic network node.
//!
//! A node is an input-side terminal (no fanin), an output-side terminal
//! (exactly one fanin, its source), or a logic node (N fanins plus a
//! function carrier). The original's virtual class hierarchy becomes the
//! [`NodeKind`] sum type here; the common attributes (ID, name, fanouts)
//! stay on [`Node`] itself.

use crate::ids::{DffId, ExprId, FuncId, NodeId, PortId};
use bnet_cell::CellId;
use bnet_logic::{Bdd, PrimType};
use serde::{Deserialize, Serialize};

/// Distinguishes the input-side terminal variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum InputKind {
    /// One bit of a port, driving the network.
    Port {
        /// Owning port.
        port: PortId,
        /// Bit index within the port.
        bit: usize,
        /// Position in the primary-input list.
        primary_pos: usize,
    },
    /// The data output of a FF/latch.
    DataOut {
        /// Owning DFF.
        dff: DffId,
    },
    /// One output pin of a mapped sequential cell.
    CellOutput {
        /// Owning DFF.
        dff: DffId,
        /// Cell output pin index.
        pin: usize,
    },
}

/// Distinguishes the output-side terminal variants.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OutputKind {
    /// One bit of a port, driven by the network.
    Port {
        /// Owning port.
        port: PortId,
        /// Bit index within the port.
        bit: usize,
        /// Position in the primary-output list.
        primary_pos: usize,
    },
    /// The data input of a FF/latch.
    DataIn {
        /// Owning DFF.
        dff: DffId,
    },
    /// The clock (or latch enable) of a FF/latch.
    Clock {
        /// Owning DFF.
        dff: DffId,
    },
    /// The asynchronous clear of a FF/latch.
    Clear {
        /// Owning DFF.
        dff: DffId,
    },
    /// The asynchronous preset of a FF/latch.
    Preset {
        /// Owning DFF.
        dff: DffId,
    },
    /// One input pin of a mapped sequential cell.
    CellInput {
        /// Owning DFF.
        dff: DffId,
        /// Cell input pin index.
        pin: usize,
    },
}

/// The function carried by a logic node.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LogicKind {
    /// A primitive gate.
    Prim(PrimType),
    /// An expression-pool entry.
    Expr(ExprId),
    /// A truth-table-pool entry.
    TvFunc(FuncId),
    /// A BDD owned by the network's manager.
    Bdd(Bdd),
    /// A combinational library cell.
    Cell(CellId),
}

/// The variant payload of a node.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// Input-side terminal: no fanin.
    Input {
        /// Position in the network input list.
        pos: usize,
        /// Which input-side variant this is.
        kind: InputKind,
    },
    /// Output-side terminal: exactly one fanin, the source.
    Output {
        /// Position in the network output list.
        pos: usize,
        /// The driving node, [`NodeId::NULL`] until connected.
        src: NodeId,
        /// Which output-side variant this is.
        kind: OutputKind,
    },
    /// Logic node: N fanins plus a function.
    Logic {
        /// Fanin node IDs; slots may hold [`NodeId::NULL`] until
        /// connected.
        fanins: Vec<NodeId>,
        /// The function carrier.
        kind: LogicKind,
    },
}

/// A network node.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) fanouts: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Returns the node ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node name (possibly empty).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns the consumers of this node, as rebuilt by the most recent
    /// `wrap_up`.
    pub fn fanout_ids(&self) -> &[NodeId] {
        &self.fanouts
    }

    /// Returns the number of consumers.
    pub fn fanout_num(&self) -> usize {
        self.fanouts.len()
    }

    /// Returns `true` for input-side terminals.
    pub fn is_input(&self) -> bool {
        matches!(self.kind, NodeKind::Input { .. })
    }

    /// Returns `true` for output-side terminals.
    pub fn is_output(&self) -> bool {
        matches!(self.kind, NodeKind::Output { .. })
    }

    /// Returns `true` for logic nodes.
    pub fn is_logic(&self) -> bool {
        matches!(self.kind, NodeKind::Logic { .. })
    }

    /// Returns `true` for a port-input bit.
    pub fn is_port_input(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Input {
                kind: InputKind::Port { .. },
                ..
            }
        )
    }

    /// Returns `true` for a port-output bit.
    pub fn is_port_output(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Output {
                kind: OutputKind::Port { .. },
                ..
            }
        )
    }

    /// Returns `true` for a FF/latch data-input terminal.
    pub fn is_data_in(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Output {
                kind: OutputKind::DataIn { .. },
                ..
            }
        )
    }

    /// Returns `true` for a FF/latch data-output terminal.
    pub fn is_data_out(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Input {
                kind: InputKind::DataOut { .. },
                ..
            }
        )
    }

    /// Returns the position in the input list, if input-side.
    pub fn input_pos(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Input { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    /// Returns the position in the output list, if output-side.
    pub fn output_pos(&self) -> Option<usize> {
        match &self.kind {
            NodeKind::Output { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    /// Returns the source of an output-side terminal
    /// ([`NodeId::NULL`] when unconnected), `None` for other variants.
    pub fn output_src(&self) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Output { src, .. } => Some(*src),
            _ => None,
        }
    }

    /// Returns the number of fanins: 0 for inputs, 1 for outputs, N for
    /// logic nodes.
    pub fn fanin_num(&self) -> usize {
        match &self.kind {
            NodeKind::Input { .. } => 0,
            NodeKind::Output { .. } => 1,
            NodeKind::Logic { fanins, .. } => fanins.len(),
        }
    }

    /// Returns fanin `pos` of a logic node, or the source of an output
    /// node at `pos == 0`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds.
    pub fn fanin_id(&self, pos: usize) -> NodeId {
        match &self.kind {
            NodeKind::Input { .. } => panic!("input node has no fanins"),
            NodeKind::Output { src, .. } => {
                assert_eq!(pos, 0, "output node has a single fanin");
                *src
            }
            NodeKind::Logic { fanins, .. } => fanins[pos],
        }
    }

    /// Returns the fanin list of a logic node (empty for terminals).
    pub fn fanin_ids(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Logic { fanins, .. } => fanins,
            _ => &[],
        }
    }

    /// Returns the primitive gate kind of a `Prim` logic node.
    pub fn primitive_type(&self) -> Option<PrimType> {
        match &self.kind {
            NodeKind::Logic {
                kind: LogicKind::Prim(p),
                ..
            } => Some(*p),
            _ => None,
        }
    }

    /// Returns the expression-pool entry of an `Expr` logic node.
    pub fn expr_id(&self) -> Option<ExprId> {
        match &self.kind {
            NodeKind::Logic {
                kind: LogicKind::Expr(e),
                ..
            } => Some(*e),
            _ => None,
        }
    }

    /// Returns the truth-table-pool entry of a `TvFunc` logic node.
    pub fn func_id(&self) -> Option<FuncId> {
        match &self.kind {
            NodeKind::Logic {
                kind: LogicKind::TvFunc(f),
                ..
            } => Some(*f),
            _ => None,
        }
    }

    /// Returns the BDD handle of a `Bdd` logic node.
    pub fn bdd(&self) -> Option<Bdd> {
        match &self.kind {
            NodeKind::Logic {
                kind: LogicKind::Bdd(b),
                ..
            } => Some(*b),
            _ => None,
        }
    }

    /// Returns the library cell of a `Cell` logic node.
    pub fn cell_id(&self) -> Option<CellId> {
        match &self.kind {
            NodeKind::Logic {
                kind: LogicKind::Cell(c),
                ..
            } => Some(*c),
            _ => None,
        }
    }

    /// Returns the owning DFF of any DFF terminal variant.
    pub fn dff_id(&self) -> Option<DffId> {
        match &self.kind {
            NodeKind::Input {
                kind: InputKind::DataOut { dff } | InputKind::CellOutput { dff, .. },
                ..
            } => Some(*dff),
            NodeKind::Output {
                kind:
                    OutputKind::DataIn { dff }
                    | OutputKind::Clock { dff }
                    | OutputKind::Clear { dff }
                    | OutputKind::Preset { dff }
                    | OutputKind::CellInput { dff, .. },
                ..
            } => Some(*dff),
            _ => None,
        }
    }

    /// Returns the owning port and bit index of a port bit.
    pub fn port_bit(&self) -> Option<(PortId, usize)> {
        match &self.kind {
            NodeKind::Input {
                kind: InputKind::Port { port, bit, .. },
                ..
            }
            | NodeKind::Output {
                kind: OutputKind::Port { port, bit, .. },
                ..
            } => Some((*port, *bit)),
            _ => None,
        }
    }
}
