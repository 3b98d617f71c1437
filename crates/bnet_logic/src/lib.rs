//! Logic-function representations for the bnet toolkit.
//!
//! This crate provides the function carriers the network core consumes:
//! the fixed set of primitive gate kinds ([`PrimType`]), algebraic
//! expressions ([`Expr`]), dense truth tables ([`TvFunc`]), and reduced
//! ordered binary decision diagrams ([`Bdd`] handles owned by a
//! [`BddMgr`]).

#![warn(missing_docs)]

pub mod bdd;
pub mod expr;
pub mod prim;
pub mod tvfunc;

pub use bdd::{Bdd, BddError, BddMgr};
pub use expr::Expr;
pub use prim::PrimType;
pub use tvfunc::TvFunc;
