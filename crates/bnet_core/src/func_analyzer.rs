//! Recognition of primitive functions.

use bnet_logic::{Expr, PrimType, TvFunc};

/// Classifies truth tables and expressions as primitive gates.
pub struct FuncAnalyzer;

impl FuncAnalyzer {
    /// Classifies a truth table as one of the ten primitive kinds, or
    /// `None` when the function is not a primitive.
    pub fn analyze_tv(tv: &TvFunc) -> Option<PrimType> {
        let ni = tv.input_num();
        let np = tv.minterm_num();

        let all_zero = (0..np).all(|p| !tv.value(p));
        if all_zero {
            return Some(PrimType::C0);
        }
        let all_one = (0..np).all(|p| tv.value(p));
        if all_one {
            return Some(PrimType::C1);
        }
        if ni == 1 {
            return Some(if tv.value(1) {
                PrimType::Buff
            } else {
                PrimType::Not
            });
        }

        // Corner values plus whether any interior minterm is 0 or 1, and
        // the running parity match for XOR/XNOR.
        let val_0 = tv.value(0);
        let val_1 = tv.value(np - 1);
        let mut has_0 = false;
        let mut has_1 = false;
        let mut xor_match = true;
        let mut xnor_match = true;
        for p in 0..np {
            let val = tv.value(p);
            if p != 0 && p != np - 1 {
                if val {
                    has_1 = true;
                } else {
                    has_0 = true;
                }
            }
            let parity = p.count_ones() % 2 == 1;
            if val == parity {
                xnor_match = false;
            } else {
                xor_match = false;
            }
        }

        if !val_0 && val_1 {
            if !has_0 {
                return Some(PrimType::Or);
            }
            if !has_1 {
                return Some(PrimType::And);
            }
        }
        if val_0 && !val_1 {
            if !has_0 {
                return Some(PrimType::Nand);
            }
            if !has_1 {
                return Some(PrimType::Nor);
            }
        }
        if xor_match {
            return Some(PrimType::Xor);
        }
        if xnor_match {
            return Some(PrimType::Xnor);
        }
        None
    }

    /// Classifies an expression by its truth table, for arities up to
    /// 10; wider expressions are never classified.
    pub fn analyze_expr(expr: &Expr) -> Option<PrimType> {
        let ni = expr.input_num();
        if ni > 10 {
            return None;
        }
        Self::analyze_tv(&expr.to_tv(ni))
    }
}
