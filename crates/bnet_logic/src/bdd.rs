//! Reduced ordered binary decision diagrams.
//!
//! A [`BddMgr`] owns a hash-consed node table; [`Bdd`] values are edge
//! handles into one manager and are only meaningful together with it.
//! Because the table is consed, two functions built in the same manager
//! are equal exactly when their handles are equal. Managers are
//! deliberately narrow: build from a truth table, evaluate, copy across
//! managers, and dump/restore; nothing more.

use bnet_common::{BinDec, BinEnc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Read, Write};

/// An edge handle into a [`BddMgr`].
///
/// Raw value 0 is the constant-0 terminal, 1 the constant-1 terminal, and
/// `k + 2` refers to decision node `k` of the owning manager.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Bdd(usize);

impl Bdd {
    /// The constant-0 function.
    pub const ZERO: Bdd = Bdd(0);
    /// The constant-1 function.
    pub const ONE: Bdd = Bdd(1);

    /// Returns `true` for the constant-0 terminal.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` for the constant-1 terminal.
    pub fn is_one(self) -> bool {
        self.0 == 1
    }

    /// Returns `true` for either terminal.
    pub fn is_const(self) -> bool {
        self.0 < 2
    }
}

/// A decision node: branch on `var`, to `lo` when 0 and `hi` when 1.
///
/// Variables decrease from the root towards the terminals.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct BddNode {
    var: usize,
    lo: Bdd,
    hi: Bdd,
}

/// Errors from building a BDD out of a truth-table string.
#[derive(Debug, thiserror::Error)]
pub enum BddError {
    /// The string length is not a power of two.
    #[error("truth table length {0} is not a power of two")]
    BadLength(usize),

    /// The string contains a character other than '0' or '1'.
    #[error("invalid character {0:?} in truth table")]
    BadChar(char),
}

/// A hash-consing manager owning every node of its BDDs.
#[derive(Default, Debug)]
pub struct BddMgr {
    nodes: Vec<BddNode>,
    unique: HashMap<BddNode, usize>,
}

impl BddMgr {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of decision nodes in the table.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn mk_node(&mut self, var: usize, lo: Bdd, hi: Bdd) -> Bdd {
        if lo == hi {
            return lo;
        }
        let node = BddNode { var, lo, hi };
        if let Some(&idx) = self.unique.get(&node) {
            return Bdd(idx + 2);
        }
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.unique.insert(node, idx);
        Bdd(idx + 2)
    }

    /// Builds a function from a `2^n`-character string of `0`/`1`.
    ///
    /// Character `p` is the function value on assignment `p`, with
    /// variable `i` carried in bit `i` of `p` (so the first character is
    /// the all-zeros value).
    pub fn from_truth(&mut self, s: &str) -> Result<Bdd, BddError> {
        if !s.len().is_power_of_two() {
            return Err(BddError::BadLength(s.len()));
        }
        let mut values = Vec::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0' => values.push(false),
                '1' => values.push(true),
                other => return Err(BddError::BadChar(other)),
            }
        }
        Ok(self.build(&values))
    }

    fn build(&mut self, values: &[bool]) -> Bdd {
        if values.len() == 1 {
            return if values[0] { Bdd::ONE } else { Bdd::ZERO };
        }
        let half = values.len() / 2;
        let var = values.len().trailing_zeros() as usize - 1;
        let lo = self.build(&values[..half]);
        let hi = self.build(&values[half..]);
        self.mk_node(var, lo, hi)
    }

    /// Evaluates a function on the given variable assignment.
    pub fn eval(&self, bdd: Bdd, values: &[bool]) -> bool {
        let mut edge = bdd;
        while !edge.is_const() {
            let node = self.nodes[edge.0 - 2];
            edge = if values[node.var] { node.hi } else { node.lo };
        }
        edge.is_one()
    }

    /// Writes out the `2^n`-character truth string of a function, inverse
    /// to [`BddMgr::from_truth`].
    pub fn to_truth(&self, bdd: Bdd, input_num: usize) -> String {
        let mut s = String::with_capacity(1 << input_num);
        let mut assignment = vec![false; input_num];
        for p in 0..1usize << input_num {
            for (i, slot) in assignment.iter_mut().enumerate() {
                *slot = p & (1 << i) != 0;
            }
            s.push(if self.eval(bdd, &assignment) { '1' } else { '0' });
        }
        s
    }

    /// Copies a function owned by another manager into this one,
    /// returning the local handle.
    pub fn copy(&mut self, bdd: Bdd, src: &BddMgr) -> Bdd {
        let mut memo = HashMap::new();
        self.copy_rec(bdd, src, &mut memo)
    }

    fn copy_rec(&mut self, edge: Bdd, src: &BddMgr, memo: &mut HashMap<usize, Bdd>) -> Bdd {
        if edge.is_const() {
            return edge;
        }
        if let Some(&done) = memo.get(&edge.0) {
            return done;
        }
        let node = src.nodes[edge.0 - 2];
        let lo = self.copy_rec(node.lo, src, memo);
        let hi = self.copy_rec(node.hi, src, memo);
        let result = self.mk_node(node.var, lo, hi);
        memo.insert(edge.0, result);
        result
    }

    /// Dumps the given functions, sharing nodes between them, to a binary
    /// stream.
    pub fn dump_bdds<W: Write>(&self, enc: &mut BinEnc<W>, roots: &[Bdd]) -> io::Result<()> {
        // Renumber the reachable nodes in child-first order so that every
        // edge written refers backwards.
        let mut order = Vec::new();
        let mut renumber = HashMap::new();
        for &root in roots {
            self.collect(root, &mut order, &mut renumber);
        }
        enc.write_vint(order.len() as u64)?;
        for &idx in &order {
            let node = self.nodes[idx];
            enc.write_vint(node.var as u64)?;
            enc.write_vint(encode_edge(node.lo, &renumber))?;
            enc.write_vint(encode_edge(node.hi, &renumber))?;
        }
        enc.write_vint(roots.len() as u64)?;
        for &root in roots {
            enc.write_vint(encode_edge(root, &renumber))?;
        }
        Ok(())
    }

    fn collect(&self, edge: Bdd, order: &mut Vec<usize>, renumber: &mut HashMap<usize, u64>) {
        if edge.is_const() || renumber.contains_key(&edge.0) {
            return;
        }
        let node = self.nodes[edge.0 - 2];
        self.collect(node.lo, order, renumber);
        self.collect(node.hi, order, renumber);
        renumber.insert(edge.0, order.len() as u64);
        order.push(edge.0 - 2);
    }

    /// Restores a function list written by [`BddMgr::dump_bdds`] into
    /// this manager.
    pub fn restore_bdds<R: Read>(&mut self, dec: &mut BinDec<R>) -> io::Result<Vec<Bdd>> {
        let node_num = dec.read_vint()? as usize;
        let mut edges = Vec::with_capacity(node_num);
        for i in 0..node_num {
            let var = dec.read_vint()? as usize;
            let lo = decode_edge(dec.read_vint()?, i, &edges)?;
            let hi = decode_edge(dec.read_vint()?, i, &edges)?;
            edges.push(self.mk_node(var, lo, hi));
        }
        let root_num = dec.read_vint()? as usize;
        let mut roots = Vec::with_capacity(root_num);
        for _ in 0..root_num {
            roots.push(decode_edge(dec.read_vint()?, node_num, &edges)?);
        }
        Ok(roots)
    }
}

fn encode_edge(edge: Bdd, renumber: &HashMap<usize, u64>) -> u64 {
    if edge.is_const() {
        edge.0 as u64
    } else {
        renumber[&edge.0] + 2
    }
}

fn decode_edge(raw: u64, limit: usize, edges: &[Bdd]) -> io::Result<Bdd> {
    if raw < 2 {
        return Ok(Bdd(raw as usize));
    }
    let idx = (raw - 2) as usize;
    if idx >= limit {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "BDD edge refers to an undefined node",
        ));
    }
    Ok(edges[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_from_truth() {
        let mut mgr = BddMgr::new();
        assert!(mgr.from_truth("0").unwrap().is_zero());
        assert!(mgr.from_truth("1").unwrap().is_one());
        assert!(mgr.from_truth("0000").unwrap().is_zero());
        assert_eq!(mgr.node_count(), 0);
    }

    #[test]
    fn single_variable() {
        let mut mgr = BddMgr::new();
        // f(v0) = v0: f(0)=0, f(1)=1.
        let f = mgr.from_truth("01").unwrap();
        assert!(!mgr.eval(f, &[false]));
        assert!(mgr.eval(f, &[true]));
    }

    #[test]
    fn consing_makes_equal_functions_identical() {
        let mut mgr = BddMgr::new();
        let a = mgr.from_truth("0111").unwrap();
        let b = mgr.from_truth("0111").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn xor3_truth() {
        let mut mgr = BddMgr::new();
        let f = mgr.from_truth("01101001").unwrap();
        for p in 0..8usize {
            let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
            assert_eq!(mgr.eval(f, &values), p.count_ones() % 2 == 1);
        }
    }

    #[test]
    fn to_truth_roundtrip() {
        let mut mgr = BddMgr::new();
        let s = "00101101";
        let f = mgr.from_truth(s).unwrap();
        assert_eq!(mgr.to_truth(f, 3), s);
    }

    #[test]
    fn bad_length_rejected() {
        let mut mgr = BddMgr::new();
        assert!(matches!(mgr.from_truth("011"), Err(BddError::BadLength(3))));
    }

    #[test]
    fn bad_char_rejected() {
        let mut mgr = BddMgr::new();
        assert!(matches!(mgr.from_truth("0x"), Err(BddError::BadChar('x'))));
    }

    #[test]
    fn copy_across_managers() {
        let mut src = BddMgr::new();
        let f = src.from_truth("0110").unwrap();
        let mut dst = BddMgr::new();
        let g = dst.copy(f, &src);
        for p in 0..4usize {
            let values = [p & 1 != 0, p & 2 != 0];
            assert_eq!(src.eval(f, &values), dst.eval(g, &values));
        }
    }

    #[test]
    fn copy_is_consed_in_destination() {
        let mut src = BddMgr::new();
        let f = src.from_truth("0110").unwrap();
        let mut dst = BddMgr::new();
        let g1 = dst.copy(f, &src);
        let g2 = dst.copy(f, &src);
        assert_eq!(g1, g2);
    }

    #[test]
    fn dump_restore_preserves_functions_and_sharing() {
        let mut mgr = BddMgr::new();
        let a = mgr.from_truth("0110").unwrap();
        let b = mgr.from_truth("0111").unwrap();
        let mut enc = BinEnc::new(Vec::new());
        mgr.dump_bdds(&mut enc, &[a, b, a]).unwrap();
        let bytes = enc.into_inner();

        let mut mgr2 = BddMgr::new();
        let roots = mgr2
            .restore_bdds(&mut BinDec::new(bytes.as_slice()))
            .unwrap();
        assert_eq!(roots.len(), 3);
        assert_eq!(roots[0], roots[2]);
        assert_eq!(mgr2.to_truth(roots[0], 2), "0110");
        assert_eq!(mgr2.to_truth(roots[1], 2), "0111");
    }

    #[test]
    fn restore_rejects_forward_edges() {
        // One node whose lo edge points at node 5, which does not exist.
        let mut enc = BinEnc::new(Vec::new());
        enc.write_vint(1).unwrap(); // node count
        enc.write_vint(0).unwrap(); // var
        enc.write_vint(7).unwrap(); // lo -> node 5
        enc.write_vint(1).unwrap(); // hi -> const 1
        let bytes = enc.into_inner();
        let mut mgr = BddMgr::new();
        assert!(mgr.restore_bdds(&mut BinDec::new(bytes.as_slice())).is_err());
    }
}
