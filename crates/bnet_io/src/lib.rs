//! File-format front-ends for Boolean networks.
//!
//! Readers build a [`bnet_core::Network`] through a
//! [`bnet_core::Modifier`]; writers walk a wrapped-up network. BLIF and
//! ISCAS-89 input goes through small tokenizing parsers that drive the
//! [`blif::BlifHandler`] / [`iscas89::Iscas89Handler`] callback sets, so
//! other consumers can reuse the parsers with their own handlers.

#![warn(missing_docs)]

pub mod aig;
pub mod blif;
pub mod format;
pub mod iscas89;
mod name_mgr;
mod names;
pub mod truth;
pub mod verilog;

pub use aig::{parse_aag, read_aag, read_aig, write_aag, write_aig};
pub use blif::{parse_blif, read_blif, write_blif};
pub use format::Format;
pub use iscas89::{parse_iscas89, read_iscas89, write_iscas89};
pub use name_mgr::NameMgr;
pub use truth::{parse_truth, read_truth};
pub use verilog::write_verilog;
