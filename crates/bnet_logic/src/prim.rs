//! The fixed set of primitive gate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A primitive gate kind.
///
/// Constants take no fanins, `Buff`/`Not` take exactly one, and the
/// associative gates take two or more.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PrimType {
    /// Constant 0.
    C0,
    /// Constant 1.
    C1,
    /// Buffer (identity).
    Buff,
    /// Inverter.
    Not,
    /// N-ary AND.
    And,
    /// N-ary NAND.
    Nand,
    /// N-ary OR.
    Or,
    /// N-ary NOR.
    Nor,
    /// N-ary XOR (odd parity).
    Xor,
    /// N-ary XNOR (even parity).
    Xnor,
}

impl PrimType {
    /// Returns `true` if this is `C0` or `C1`.
    pub fn is_constant(self) -> bool {
        matches!(self, PrimType::C0 | PrimType::C1)
    }

    /// Returns `true` if the given fanin count is legal for this kind.
    pub fn accepts_arity(self, n: usize) -> bool {
        match self {
            PrimType::C0 | PrimType::C1 => n == 0,
            PrimType::Buff | PrimType::Not => n == 1,
            _ => n >= 2,
        }
    }

    /// Evaluates the gate on the given fanin values.
    pub fn eval(self, inputs: &[bool]) -> bool {
        match self {
            PrimType::C0 => false,
            PrimType::C1 => true,
            PrimType::Buff => inputs[0],
            PrimType::Not => !inputs[0],
            PrimType::And => inputs.iter().all(|&b| b),
            PrimType::Nand => !inputs.iter().all(|&b| b),
            PrimType::Or => inputs.iter().any(|&b| b),
            PrimType::Nor => !inputs.iter().any(|&b| b),
            PrimType::Xor => inputs.iter().filter(|&&b| b).count() % 2 == 1,
            PrimType::Xnor => inputs.iter().filter(|&&b| b).count() % 2 == 0,
        }
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimType::C0 => "C0",
            PrimType::C1 => "C1",
            PrimType::Buff => "Buff",
            PrimType::Not => "Not",
            PrimType::And => "And",
            PrimType::Nand => "Nand",
            PrimType::Or => "Or",
            PrimType::Nor => "Nor",
            PrimType::Xor => "Xor",
            PrimType::Xnor => "Xnor",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_rules() {
        assert!(PrimType::C0.accepts_arity(0));
        assert!(!PrimType::C0.accepts_arity(1));
        assert!(PrimType::Not.accepts_arity(1));
        assert!(!PrimType::Not.accepts_arity(2));
        assert!(PrimType::And.accepts_arity(2));
        assert!(PrimType::And.accepts_arity(5));
        assert!(!PrimType::And.accepts_arity(1));
    }

    #[test]
    fn eval_basic_gates() {
        assert!(!PrimType::C0.eval(&[]));
        assert!(PrimType::C1.eval(&[]));
        assert!(PrimType::Buff.eval(&[true]));
        assert!(PrimType::Not.eval(&[false]));
        assert!(PrimType::And.eval(&[true, true, true]));
        assert!(!PrimType::And.eval(&[true, false, true]));
        assert!(PrimType::Nand.eval(&[true, false]));
        assert!(PrimType::Or.eval(&[false, true]));
        assert!(PrimType::Nor.eval(&[false, false]));
        assert!(PrimType::Xor.eval(&[true, true, true]));
        assert!(!PrimType::Xor.eval(&[true, true]));
        assert!(PrimType::Xnor.eval(&[true, true]));
    }

    #[test]
    fn display_names() {
        assert_eq!(PrimType::Xnor.to_string(), "Xnor");
        assert_eq!(PrimType::C0.to_string(), "C0");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&PrimType::Nand).unwrap();
        let back: PrimType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PrimType::Nand);
    }
}
