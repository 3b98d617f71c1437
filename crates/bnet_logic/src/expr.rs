//! Algebraic logic expressions.

use crate::tvfunc::TvFunc;
use bnet_common::{BinDec, BinEnc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// A logic expression over positional variables.
///
/// Variables name fanin positions, not signals: `PosiLiteral(2)` is "the
/// third fanin of whatever node carries this expression". There is no
/// explicit NOT operator; negation is pushed onto literals
/// ([`Expr::complement`]), which keeps sum-of-products recognisable.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Expr {
    /// Constant 0.
    Zero,
    /// Constant 1.
    One,
    /// A variable used positively.
    PosiLiteral(usize),
    /// A variable used negated.
    NegaLiteral(usize),
    /// Conjunction of two or more operands.
    And(Vec<Expr>),
    /// Disjunction of two or more operands.
    Or(Vec<Expr>),
    /// Exclusive-or of two or more operands.
    Xor(Vec<Expr>),
}

impl Expr {
    /// Builds a conjunction, simplifying the empty product to `One` and a
    /// single operand to itself.
    pub fn and(mut operands: Vec<Expr>) -> Expr {
        match operands.len() {
            0 => Expr::One,
            1 => operands.swap_remove(0),
            _ => Expr::And(operands),
        }
    }

    /// Builds a disjunction, simplifying the empty sum to `Zero` and a
    /// single operand to itself.
    pub fn or(mut operands: Vec<Expr>) -> Expr {
        match operands.len() {
            0 => Expr::Zero,
            1 => operands.swap_remove(0),
            _ => Expr::Or(operands),
        }
    }

    /// Builds an exclusive-or, simplifying the empty sum to `Zero` and a
    /// single operand to itself.
    pub fn xor(mut operands: Vec<Expr>) -> Expr {
        match operands.len() {
            0 => Expr::Zero,
            1 => operands.swap_remove(0),
            _ => Expr::Xor(operands),
        }
    }

    /// Returns the complement, pushed down to the literals by De Morgan.
    ///
    /// XOR complements exactly one operand, so the operand count is
    /// preserved everywhere.
    pub fn complement(&self) -> Expr {
        match self {
            Expr::Zero => Expr::One,
            Expr::One => Expr::Zero,
            Expr::PosiLiteral(v) => Expr::NegaLiteral(*v),
            Expr::NegaLiteral(v) => Expr::PosiLiteral(*v),
            Expr::And(os) => Expr::Or(os.iter().map(Expr::complement).collect()),
            Expr::Or(os) => Expr::And(os.iter().map(Expr::complement).collect()),
            Expr::Xor(os) => {
                let mut os: Vec<Expr> = os.clone();
                os[0] = os[0].complement();
                Expr::Xor(os)
            }
        }
    }

    /// Returns `true` for `PosiLiteral` or `NegaLiteral`.
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::PosiLiteral(_) | Expr::NegaLiteral(_))
    }

    /// Returns the variable index of a literal, `None` otherwise.
    pub fn var(&self) -> Option<usize> {
        match self {
            Expr::PosiLiteral(v) | Expr::NegaLiteral(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the operand list of an `And`/`Or`/`Xor`, empty otherwise.
    pub fn operands(&self) -> &[Expr] {
        match self {
            Expr::And(os) | Expr::Or(os) | Expr::Xor(os) => os,
            _ => &[],
        }
    }

    /// Returns the number of input variables: one past the largest
    /// variable index, or 0 for constants.
    pub fn input_num(&self) -> usize {
        match self {
            Expr::Zero | Expr::One => 0,
            Expr::PosiLiteral(v) | Expr::NegaLiteral(v) => v + 1,
            Expr::And(os) | Expr::Or(os) | Expr::Xor(os) => {
                os.iter().map(Expr::input_num).max().unwrap_or(0)
            }
        }
    }

    /// Evaluates the expression on the given variable assignment.
    pub fn eval(&self, values: &[bool]) -> bool {
        match self {
            Expr::Zero => false,
            Expr::One => true,
            Expr::PosiLiteral(v) => values[*v],
            Expr::NegaLiteral(v) => !values[*v],
            Expr::And(os) => os.iter().all(|o| o.eval(values)),
            Expr::Or(os) => os.iter().any(|o| o.eval(values)),
            Expr::Xor(os) => os.iter().filter(|o| o.eval(values)).count() % 2 == 1,
        }
    }

    /// Converts the expression to a truth table over `input_num` variables.
    ///
    /// `input_num` must be at least [`Expr::input_num`].
    pub fn to_tv(&self, input_num: usize) -> TvFunc {
        debug_assert!(input_num >= self.input_num());
        let mut values = vec![false; 1 << input_num];
        let mut assignment = vec![false; input_num];
        for (p, value) in values.iter_mut().enumerate() {
            for (i, slot) in assignment.iter_mut().enumerate() {
                *slot = p & (1 << i) != 0;
            }
            *value = self.eval(&assignment);
        }
        TvFunc::from_values(input_num, &values)
    }

    /// Returns `true` if the expression is in sum-of-products form: a
    /// literal, a product of literals, or a sum of such products.
    pub fn is_sop(&self) -> bool {
        fn is_cube(e: &Expr) -> bool {
            e.is_literal() || matches!(e, Expr::And(os) if os.iter().all(Expr::is_literal))
        }
        match self {
            Expr::Zero | Expr::One => true,
            Expr::Or(os) => os.iter().all(is_cube),
            e => is_cube(e),
        }
    }

    /// Writes the expression to a binary stream.
    pub fn dump<W: Write>(&self, enc: &mut BinEnc<W>) -> io::Result<()> {
        match self {
            Expr::Zero => enc.write_u8(0),
            Expr::One => enc.write_u8(1),
            Expr::PosiLiteral(v) => {
                enc.write_u8(2)?;
                enc.write_vint(*v as u64)
            }
            Expr::NegaLiteral(v) => {
                enc.write_u8(3)?;
                enc.write_vint(*v as u64)
            }
            Expr::And(os) | Expr::Or(os) | Expr::Xor(os) => {
                let tag = match self {
                    Expr::And(_) => 4,
                    Expr::Or(_) => 5,
                    _ => 6,
                };
                enc.write_u8(tag)?;
                enc.write_vint(os.len() as u64)?;
                for o in os {
                    o.dump(enc)?;
                }
                Ok(())
            }
        }
    }

    /// Reads an expression previously written by [`Expr::dump`].
    pub fn restore<R: Read>(dec: &mut BinDec<R>) -> io::Result<Self> {
        let tag = dec.read_u8()?;
        match tag {
            0 => Ok(Expr::Zero),
            1 => Ok(Expr::One),
            2 => Ok(Expr::PosiLiteral(dec.read_vint()? as usize)),
            3 => Ok(Expr::NegaLiteral(dec.read_vint()? as usize)),
            4 | 5 | 6 => {
                let n = dec.read_vint()? as usize;
                let mut operands = Vec::with_capacity(n);
                for _ in 0..n {
                    operands.push(Expr::restore(dec)?);
                }
                Ok(match tag {
                    4 => Expr::And(operands),
                    5 => Expr::Or(operands),
                    _ => Expr::Xor(operands),
                })
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown expression tag {tag}"),
            )),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, os: &[Expr], op: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, o) in os.iter().enumerate() {
                if i > 0 {
                    write!(f, " {op} ")?;
                }
                write!(f, "{o}")?;
            }
            write!(f, ")")
        }
        match self {
            Expr::Zero => write!(f, "0"),
            Expr::One => write!(f, "1"),
            Expr::PosiLiteral(v) => write!(f, "v{v}"),
            Expr::NegaLiteral(v) => write!(f, "~v{v}"),
            Expr::And(os) => join(f, os, "&"),
            Expr::Or(os) => join(f, os, "|"),
            Expr::Xor(os) => join(f, os, "^"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: usize) -> Expr {
        Expr::PosiLiteral(i)
    }

    fn nv(i: usize) -> Expr {
        Expr::NegaLiteral(i)
    }

    #[test]
    fn constructors_simplify() {
        assert_eq!(Expr::and(vec![]), Expr::One);
        assert_eq!(Expr::or(vec![]), Expr::Zero);
        assert_eq!(Expr::and(vec![v(3)]), v(3));
        assert!(matches!(Expr::or(vec![v(0), v(1)]), Expr::Or(_)));
    }

    #[test]
    fn input_num_is_max_var_plus_one() {
        let e = Expr::or(vec![Expr::and(vec![v(0), nv(4)]), v(2)]);
        assert_eq!(e.input_num(), 5);
        assert_eq!(Expr::Zero.input_num(), 0);
    }

    #[test]
    fn eval_and_or() {
        let e = Expr::or(vec![Expr::and(vec![v(0), nv(1)]), v(2)]);
        assert!(e.eval(&[true, false, false]));
        assert!(!e.eval(&[true, true, false]));
        assert!(e.eval(&[false, false, true]));
    }

    #[test]
    fn eval_xor_parity() {
        let e = Expr::xor(vec![v(0), v(1), v(2)]);
        assert!(!e.eval(&[false, false, false]));
        assert!(e.eval(&[true, false, false]));
        assert!(!e.eval(&[true, true, false]));
        assert!(e.eval(&[true, true, true]));
    }

    #[test]
    fn complement_is_pointwise_negation() {
        let e = Expr::or(vec![Expr::and(vec![v(0), nv(1)]), Expr::xor(vec![v(1), v(2)])]);
        let c = e.complement();
        for p in 0..8usize {
            let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
            assert_eq!(e.eval(&values), !c.eval(&values), "minterm {p}");
        }
    }

    #[test]
    fn to_tv_matches_eval() {
        let e = Expr::and(vec![v(0), v(1)]);
        let tv = e.to_tv(2);
        assert!(!tv.value(0b00));
        assert!(!tv.value(0b01));
        assert!(!tv.value(0b10));
        assert!(tv.value(0b11));
    }

    #[test]
    fn to_tv_padded_arity() {
        // v0 over 3 inputs: value depends on bit 0 only.
        let tv = v(0).to_tv(3);
        for p in 0..8 {
            assert_eq!(tv.value(p), p & 1 != 0);
        }
    }

    #[test]
    fn sop_recognition() {
        assert!(v(0).is_sop());
        assert!(Expr::and(vec![v(0), nv(1)]).is_sop());
        assert!(Expr::or(vec![Expr::and(vec![v(0), nv(1)]), v(2)]).is_sop());
        assert!(!Expr::xor(vec![v(0), v(1)]).is_sop());
        assert!(!Expr::or(vec![Expr::or(vec![v(0), v(1)]), v(2)]).is_sop());
        assert!(!Expr::and(vec![Expr::or(vec![v(0), v(1)]), v(2)]).is_sop());
    }

    #[test]
    fn dump_restore_roundtrip() {
        let e = Expr::or(vec![
            Expr::and(vec![v(0), nv(1)]),
            Expr::xor(vec![v(1), v(2)]),
            Expr::Zero,
        ]);
        let mut enc = bnet_common::BinEnc::new(Vec::new());
        e.dump(&mut enc).unwrap();
        let bytes = enc.into_inner();
        let back = Expr::restore(&mut bnet_common::BinDec::new(bytes.as_slice())).unwrap();
        assert_eq!(e, back);
    }

    #[test]
    fn display_format() {
        let e = Expr::or(vec![Expr::and(vec![v(0), nv(1)]), v(2)]);
        assert_eq!(e.to_string(), "((v0 & ~v1) | v2)");
    }

    #[test]
    fn serde_roundtrip() {
        let e = Expr::xor(vec![v(0), nv(3)]);
        let json = serde_json::to_string(&e).unwrap();
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
