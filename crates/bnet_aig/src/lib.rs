//! The AIGER and-inverter-graph interchange model.
//!
//! An [`AigModel`] holds inputs, latches, outputs, AND gates, symbol
//! names and the trailing comment of one AIGER file. Signals are encoded
//! as literals: non-negative integers whose least-significant bit is the
//! polarity, with 0 and 1 the constants. The model reads and writes both
//! the ASCII `.aag` and the delta-compressed binary `.aig` renditions.

#![warn(missing_docs)]

mod error;
mod model;
mod writer;

pub use error::AigError;
pub use model::AigModel;
