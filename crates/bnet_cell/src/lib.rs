//! The cell-library interface consumed by the network core.
//!
//! A library yields cells with named pins, an FF/logic classification,
//! and a logic expression per output. The core only asks the questions
//! modelled here; liberty parsing, timing and power live elsewhere.

#![warn(missing_docs)]

use bnet_logic::Expr;
use serde::{Deserialize, Serialize};

/// Opaque index of a cell within its [`CellLibrary`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// The functional classification of a cell.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CellKind {
    /// A combinational cell: one expression per output pin, plus a
    /// per-output tristate flag.
    Logic {
        /// Output functions, indexed like the output pins.
        exprs: Vec<Expr>,
        /// `true` for outputs driven through a tristate enable.
        tristate: Vec<bool>,
    },
    /// A flip-flop (or other sequential) cell.
    Ff,
}

/// A library cell with named pins and a functional description.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Cell {
    /// Cell name, unique within the library.
    pub name: String,
    /// Input pin names.
    pub inputs: Vec<String>,
    /// Output pin names.
    pub outputs: Vec<String>,
    /// Inout pin names.
    pub inouts: Vec<String>,
    /// Functional classification.
    pub kind: CellKind,
}

impl Cell {
    /// Builds a single-output combinational cell.
    pub fn logic(name: &str, inputs: &[&str], output: &str, expr: Expr) -> Self {
        Self {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: vec![output.to_string()],
            inouts: Vec::new(),
            kind: CellKind::Logic {
                exprs: vec![expr],
                tristate: vec![false],
            },
        }
    }

    /// Builds a flip-flop cell with the given pin names.
    pub fn ff(name: &str, inputs: &[&str], outputs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            inouts: Vec::new(),
            kind: CellKind::Ff,
        }
    }

    /// Returns `true` for sequential (FF) cells.
    pub fn is_ff(&self) -> bool {
        matches!(self.kind, CellKind::Ff)
    }

    /// Returns `true` for combinational cells.
    pub fn is_logic(&self) -> bool {
        matches!(self.kind, CellKind::Logic { .. })
    }

    /// Returns the number of input pins.
    pub fn input_num(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of output pins.
    pub fn output_num(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the number of inout pins.
    pub fn inout_num(&self) -> usize {
        self.inouts.len()
    }

    /// Returns `true` if output `pos` is tristate-driven.
    pub fn has_tristate(&self, pos: usize) -> bool {
        match &self.kind {
            CellKind::Logic { tristate, .. } => tristate.get(pos).copied().unwrap_or(false),
            CellKind::Ff => false,
        }
    }

    /// Returns the logic expression of output `pos`, or `None` for FF
    /// cells.
    pub fn logic_expr(&self, pos: usize) -> Option<&Expr> {
        match &self.kind {
            CellKind::Logic { exprs, .. } => exprs.get(pos),
            CellKind::Ff => None,
        }
    }
}

/// An ordered collection of cells addressed by [`CellId`] or name.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct CellLibrary {
    /// Library name.
    pub name: String,
    cells: Vec<Cell>,
}

impl CellLibrary {
    /// Creates an empty library with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
        }
    }

    /// Appends a cell and returns its ID.
    pub fn add_cell(&mut self, cell: Cell) -> CellId {
        let id = CellId::from_raw(self.cells.len() as u32);
        self.cells.push(cell);
        id
    }

    /// Returns the cell with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.as_raw() as usize]
    }

    /// Looks up a cell by name.
    pub fn cell_by_name(&self, name: &str) -> Option<CellId> {
        self.cells
            .iter()
            .position(|c| c.name == name)
            .map(|i| CellId::from_raw(i as u32))
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the library has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over `(CellId, &Cell)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId::from_raw(i as u32), c))
    }
}
