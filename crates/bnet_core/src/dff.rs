//! D flip-flops, latches, and mapped sequential cells.

use crate::ids::{DffId, NodeId};
use bnet_cell::CellId;
use serde::{Deserialize, Serialize};

/// The behaviour of a flip-flop when clear and preset assert together.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ClearPresetValue {
    /// The output goes low.
    L,
    /// The output goes high.
    H,
    /// The output keeps its previous value.
    N,
    /// The output toggles.
    T,
    /// The output is undefined.
    X,
}

/// The flavour-specific payload of a [`Dff`].
///
/// The terminal fields hold node IDs: `data_in`, `clock`/`enable`,
/// `clear` and `preset` are output-side terminal nodes (they consume a
/// value from the network), while `data_out` is an input-side terminal
/// (it feeds the network).
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum DffKind {
    /// An edge-triggered D flip-flop.
    Dff {
        /// Data input terminal.
        data_in: NodeId,
        /// Data output terminal.
        data_out: NodeId,
        /// Clock terminal.
        clock: NodeId,
        /// Asynchronous clear terminal, if present.
        clear: Option<NodeId>,
        /// Asynchronous preset terminal, if present.
        preset: Option<NodeId>,
        /// Behaviour when clear and preset assert together.
        cpv: ClearPresetValue,
    },
    /// A level-sensitive latch; `enable` takes the place of the clock.
    Latch {
        /// Data input terminal.
        data_in: NodeId,
        /// Data output terminal.
        data_out: NodeId,
        /// Enable terminal.
        enable: NodeId,
        /// Asynchronous clear terminal, if present.
        clear: Option<NodeId>,
        /// Asynchronous preset terminal, if present.
        preset: Option<NodeId>,
        /// Behaviour when clear and preset assert together.
        cpv: ClearPresetValue,
    },
    /// A mapped sequential library cell with one terminal node per pin.
    Cell {
        /// The library cell.
        cell: CellId,
        /// One output-side terminal per cell input pin.
        inputs: Vec<NodeId>,
        /// One input-side terminal per cell output pin.
        outputs: Vec<NodeId>,
    },
}

/// A sequential element of the network.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Dff {
    pub(crate) id: DffId,
    pub(crate) name: String,
    pub(crate) kind: DffKind,
}

impl Dff {
    /// Returns the DFF ID.
    pub fn id(&self) -> DffId {
        self.id
    }

    /// Returns the DFF name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the flavour payload.
    pub fn kind(&self) -> &DffKind {
        &self.kind
    }

    /// Returns `true` for the flip-flop flavour.
    pub fn is_dff(&self) -> bool {
        matches!(self.kind, DffKind::Dff { .. })
    }

    /// Returns `true` for the latch flavour.
    pub fn is_latch(&self) -> bool {
        matches!(self.kind, DffKind::Latch { .. })
    }

    /// Returns `true` for the mapped-cell flavour.
    pub fn is_cell(&self) -> bool {
        matches!(self.kind, DffKind::Cell { .. })
    }

    /// Returns the data-input terminal of a FF/latch.
    ///
    /// # Panics
    ///
    /// Panics on the cell flavour.
    pub fn data_in(&self) -> NodeId {
        match &self.kind {
            DffKind::Dff { data_in, .. } | DffKind::Latch { data_in, .. } => *data_in,
            DffKind::Cell { .. } => panic!("data_in on a cell DFF"),
        }
    }

    /// Returns the data-output terminal of a FF/latch.
    ///
    /// # Panics
    ///
    /// Panics on the cell flavour.
    pub fn data_out(&self) -> NodeId {
        match &self.kind {
            DffKind::Dff { data_out, .. } | DffKind::Latch { data_out, .. } => *data_out,
            DffKind::Cell { .. } => panic!("data_out on a cell DFF"),
        }
    }

    /// Returns the clock terminal of a FF, or the enable terminal of a
    /// latch.
    ///
    /// # Panics
    ///
    /// Panics on the cell flavour.
    pub fn clock(&self) -> NodeId {
        match &self.kind {
            DffKind::Dff { clock, .. } => *clock,
            DffKind::Latch { enable, .. } => *enable,
            DffKind::Cell { .. } => panic!("clock on a cell DFF"),
        }
    }

    /// Returns the clear terminal, if present.
    pub fn clear(&self) -> Option<NodeId> {
        match &self.kind {
            DffKind::Dff { clear, .. } | DffKind::Latch { clear, .. } => *clear,
            DffKind::Cell { .. } => None,
        }
    }

    /// Returns the preset terminal, if present.
    pub fn preset(&self) -> Option<NodeId> {
        match &self.kind {
            DffKind::Dff { preset, .. } | DffKind::Latch { preset, .. } => *preset,
            DffKind::Cell { .. } => None,
        }
    }

    /// Returns the clear-preset behaviour of a FF/latch.
    pub fn clear_preset_value(&self) -> Option<ClearPresetValue> {
        match &self.kind {
            DffKind::Dff { cpv, .. } | DffKind::Latch { cpv, .. } => Some(*cpv),
            DffKind::Cell { .. } => None,
        }
    }

    /// Returns the library cell of the cell flavour.
    pub fn cell_id(&self) -> Option<CellId> {
        match &self.kind {
            DffKind::Cell { cell, .. } => Some(*cell),
            _ => None,
        }
    }

    /// Returns the number of cell input terminals (0 for FF/latch).
    pub fn cell_input_num(&self) -> usize {
        match &self.kind {
            DffKind::Cell { inputs, .. } => inputs.len(),
            _ => 0,
        }
    }

    /// Returns the number of cell output terminals (0 for FF/latch).
    pub fn cell_output_num(&self) -> usize {
        match &self.kind {
            DffKind::Cell { outputs, .. } => outputs.len(),
            _ => 0,
        }
    }

    /// Returns cell input terminal `pos`.
    ///
    /// # Panics
    ///
    /// Panics if not the cell flavour or `pos` is out of bounds.
    pub fn cell_input(&self, pos: usize) -> NodeId {
        match &self.kind {
            DffKind::Cell { inputs, .. } => inputs[pos],
            _ => panic!("cell_input on a non-cell DFF"),
        }
    }

    /// Returns cell output terminal `pos`.
    ///
    /// # Panics
    ///
    /// Panics if not the cell flavour or `pos` is out of bounds.
    pub fn cell_output(&self, pos: usize) -> NodeId {
        match &self.kind {
            DffKind::Cell { outputs, .. } => outputs[pos],
            _ => panic!("cell_output on a non-cell DFF"),
        }
    }
}
