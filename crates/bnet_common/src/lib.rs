//! Shared foundational types for the bnet toolkit.
//!
//! This crate provides the common error type used across the workspace and
//! the little-endian continuation-bit binary codec shared by the AIGER
//! binary body and the network dump format.

#![warn(missing_docs)]

pub mod binenc;
pub mod error;

pub use binenc::{BinDec, BinEnc};
pub use error::{BnetError, Result};
