//! The Boolean-network core.
//!
//! A [`Network`] is a gate-level netlist with synchronous state: ports
//! whose bits may mix directions, D flip-flops and latches with optional
//! asynchronous terminals, and logic nodes carrying primitives,
//! expressions, truth tables, BDDs, or library cells. Mutation goes
//! through the [`Modifier`] façade; `wrap_up` (run by
//! [`Modifier::into_network`]) validates the structure, rebuilds fanouts,
//! and topologically orders the logic nodes. The structural
//! transformations (sub-network import, [`Network::simple_decomp`],
//! [`Network::output_split`]) and the binary dump/restore build on the
//! same machinery.

#![warn(missing_docs)]

mod bin_io;
mod dff;
mod display;
mod func_analyzer;
mod ids;
mod import;
mod modifier;
mod network;
mod node;
mod output_split;
mod port;
mod simple_decomp;
mod wrap_up;

pub use dff::{ClearPresetValue, Dff, DffKind};
pub use func_analyzer::FuncAnalyzer;
pub use ids::{DffId, ExprId, FuncId, NodeId, PortId};
pub use import::NodeMap;
pub use modifier::Modifier;
pub use network::Network;
pub use node::{InputKind, LogicKind, Node, NodeKind, OutputKind};
pub use port::{Port, PortDir};
