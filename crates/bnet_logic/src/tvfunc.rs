//! Dense truth-table functions.

use bnet_common::{BinDec, BinEnc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// A completely specified Boolean function stored as a packed truth table.
///
/// Minterm `p` (input `i` carried in bit `i` of `p`) occupies bit
/// `p % 64` of word `p / 64`. Unused high bits of the last word are kept
/// zero so that derived `Eq`/`Hash` are canonical; the truth-table pools
/// rely on this when hash-consing.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TvFunc {
    input_num: usize,
    words: Vec<u64>,
}

fn word_count(input_num: usize) -> usize {
    if input_num < 6 {
        1
    } else {
        1 << (input_num - 6)
    }
}

impl TvFunc {
    /// The constant-0 function of the given arity.
    pub fn zero(input_num: usize) -> Self {
        Self {
            input_num,
            words: vec![0; word_count(input_num)],
        }
    }

    /// The constant-1 function of the given arity.
    pub fn one(input_num: usize) -> Self {
        let mut f = Self::zero(input_num);
        for p in 0..f.minterm_num() {
            f.set_value(p, true);
        }
        f
    }

    /// The positive literal of variable `var` in `input_num` variables.
    pub fn posi_literal(input_num: usize, var: usize) -> Self {
        debug_assert!(var < input_num);
        let mut f = Self::zero(input_num);
        for p in 0..f.minterm_num() {
            if p & (1 << var) != 0 {
                f.set_value(p, true);
            }
        }
        f
    }

    /// The negative literal of variable `var` in `input_num` variables.
    pub fn nega_literal(input_num: usize, var: usize) -> Self {
        debug_assert!(var < input_num);
        let mut f = Self::zero(input_num);
        for p in 0..f.minterm_num() {
            if p & (1 << var) == 0 {
                f.set_value(p, true);
            }
        }
        f
    }

    /// Builds a function from one value per minterm.
    ///
    /// `values.len()` must be `2^input_num`.
    pub fn from_values(input_num: usize, values: &[bool]) -> Self {
        let mut f = Self::zero(input_num);
        debug_assert_eq!(values.len(), f.minterm_num());
        for (p, &v) in values.iter().enumerate() {
            f.set_value(p, v);
        }
        f
    }

    /// Returns the number of input variables.
    pub fn input_num(&self) -> usize {
        self.input_num
    }

    /// Returns the number of minterms, `2^input_num`.
    pub fn minterm_num(&self) -> usize {
        1 << self.input_num
    }

    /// Returns the function value on minterm `p`.
    pub fn value(&self, p: usize) -> bool {
        debug_assert!(p < self.minterm_num());
        self.words[p / 64] >> (p % 64) & 1 != 0
    }

    fn set_value(&mut self, p: usize, v: bool) {
        let mask = 1u64 << (p % 64);
        if v {
            self.words[p / 64] |= mask;
        } else {
            self.words[p / 64] &= !mask;
        }
    }

    /// Writes the function to a binary stream.
    pub fn dump<W: Write>(&self, enc: &mut BinEnc<W>) -> io::Result<()> {
        enc.write_vint(self.input_num as u64)?;
        for &w in &self.words {
            enc.write_vint(w)?;
        }
        Ok(())
    }

    /// Reads a function previously written by [`TvFunc::dump`].
    pub fn restore<R: Read>(dec: &mut BinDec<R>) -> io::Result<Self> {
        let input_num = dec.read_vint()? as usize;
        if input_num > 20 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "truth table arity out of range",
            ));
        }
        let mut words = Vec::with_capacity(word_count(input_num));
        for _ in 0..word_count(input_num) {
            words.push(dec.read_vint()?);
        }
        Ok(Self { input_num, words })
    }
}

impl fmt::Debug for TvFunc {
    /// Formats as the `2^n`-character 0/1 string, minterm `2^n - 1` first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in (0..self.minterm_num()).rev() {
            write!(f, "{}", if self.value(p) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        let z = TvFunc::zero(3);
        let o = TvFunc::one(3);
        for p in 0..8 {
            assert!(!z.value(p));
            assert!(o.value(p));
        }
        assert_ne!(z, o);
    }

    #[test]
    fn literals() {
        let f = TvFunc::posi_literal(2, 1);
        assert!(!f.value(0b00));
        assert!(!f.value(0b01));
        assert!(f.value(0b10));
        assert!(f.value(0b11));
        let g = TvFunc::nega_literal(2, 1);
        for p in 0..4 {
            assert_ne!(f.value(p), g.value(p));
        }
    }

    #[test]
    fn from_values_roundtrip() {
        let vals = [false, true, true, false, true, false, false, true];
        let f = TvFunc::from_values(3, &vals);
        for (p, &v) in vals.iter().enumerate() {
            assert_eq!(f.value(p), v);
        }
    }

    #[test]
    fn equal_tables_hash_equal() {
        use std::collections::HashMap;
        let a = TvFunc::posi_literal(1, 0);
        let b = TvFunc::posi_literal(1, 0);
        let mut map = HashMap::new();
        map.insert(a, 0usize);
        assert_eq!(map.get(&b), Some(&0));
    }

    #[test]
    fn wide_table() {
        let f = TvFunc::posi_literal(7, 6);
        assert_eq!(f.minterm_num(), 128);
        assert!(!f.value(0));
        assert!(f.value(127));
        assert!(f.value(64));
        assert!(!f.value(63));
    }

    #[test]
    fn dump_restore_roundtrip() {
        let f = TvFunc::from_values(3, &[true, false, false, true, true, true, false, false]);
        let mut enc = BinEnc::new(Vec::new());
        f.dump(&mut enc).unwrap();
        let bytes = enc.into_inner();
        let g = TvFunc::restore(&mut BinDec::new(bytes.as_slice())).unwrap();
        assert_eq!(f, g);
    }

    #[test]
    fn debug_writes_msb_first() {
        let f = TvFunc::posi_literal(1, 0); // f(0)=0, f(1)=1
        assert_eq!(format!("{f:?}"), "10");
    }

    #[test]
    fn serde_roundtrip() {
        let f = TvFunc::nega_literal(4, 2);
        let json = serde_json::to_string(&f).unwrap();
        let g: TvFunc = serde_json::from_str(&json).unwrap();
        assert_eq!(f, g);
    }
}
