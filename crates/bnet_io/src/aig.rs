//! AIGER ⇄ network conversion.
//!
//! Reading materialises an [`AigModel`] as a network: one port per
//! input/output, one DFF per latch (sharing a clock and a reset port),
//! one AND node per gate with inverters inserted only where a literal's
//! negation is actually consumed. Writing lowers every logic node onto
//! two-input AND gates with balanced trees, constants and buffers
//! vanishing into literal arithmetic.

use bnet_aig::{AigError, AigModel};
use bnet_common::{BnetError, Result};
use bnet_core::{ClearPresetValue, Modifier, Network, NodeId};
use bnet_logic::{Expr, PrimType, TvFunc};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

fn from_aig_error(e: AigError) -> BnetError {
    BnetError::format(e.to_string())
}

//////////////////////////////////////////////////////////////////////
// AIG -> network.
//////////////////////////////////////////////////////////////////////

/// Materialises an AIG as a network.
///
/// When the AIG has latches, a shared `clock_name` input port feeds
/// every DFF's clock and a shared `reset_name` port every DFF's clear.
pub fn aig_to_network(aig: &AigModel, clock_name: &str, reset_name: &str) -> Result<Network> {
    Aig2Bnet::new(aig, clock_name, reset_name).convert()
}

struct Aig2Bnet<'a> {
    aig: &'a AigModel,
    clock_name: &'a str,
    reset_name: &'a str,
    modifier: Modifier,
    /// Literal -> node computing it, for exactly the polarities built.
    lit_map: HashMap<u64, NodeId>,
}

impl<'a> Aig2Bnet<'a> {
    fn new(aig: &'a AigModel, clock_name: &'a str, reset_name: &'a str) -> Self {
        Self {
            aig,
            clock_name,
            reset_name,
            modifier: Modifier::new(),
            lit_map: HashMap::new(),
        }
    }

    fn convert(mut self) -> Result<Network> {
        let aig = self.aig;
        let (ni, nl, no, na) = (
            aig.input_num(),
            aig.latch_num(),
            aig.output_num(),
            aig.and_num(),
        );

        // Constants are synthesised lazily on first use.
        for pos in 0..ni {
            let name = nonempty_or(aig.input_symbol(pos), || format!("i{pos}"));
            let port = self.modifier.new_input_port(&name)?;
            let node = self.modifier.network().port(port).bit(0);
            self.lit_map.insert(aig.input(pos), node);
        }

        let mut output_list = Vec::with_capacity(no);
        for pos in 0..no {
            let name = nonempty_or(aig.output_symbol(pos), || format!("o{pos}"));
            let port = self.modifier.new_output_port(&name)?;
            output_list.push(self.modifier.network().port(port).bit(0));
        }

        let mut latch_list = Vec::with_capacity(nl);
        if nl > 0 {
            let clock_port = self.modifier.new_input_port(self.clock_name)?;
            let clock_id = self.modifier.network().port(clock_port).bit(0);
            let reset_port = self.modifier.new_input_port(self.reset_name)?;
            let reset_id = self.modifier.network().port(reset_port).bit(0);
            for pos in 0..nl {
                let name = nonempty_or(aig.latch_symbol(pos), || format!("l{pos}"));
                let dff = self
                    .modifier
                    .new_dff(&name, true, false, ClearPresetValue::L);
                let (data_in, data_out, clock, clear) = {
                    let dff = self.modifier.network().dff(dff);
                    (
                        dff.data_in(),
                        dff.data_out(),
                        dff.clock(),
                        dff.clear().expect("created with a clear terminal"),
                    )
                };
                self.modifier.set_output_src(clock, clock_id)?;
                self.modifier.set_output_src(clear, reset_id)?;
                self.lit_map.insert(aig.latch(pos), data_out);
                latch_list.push(data_in);
            }
        }

        // Which polarities are consumed at the outputs and latch inputs.
        let max_lit = (aig.max_var() as usize + 1) * 2;
        let mut required = vec![false; max_lit];
        for pos in 0..no {
            required[aig.output_src(pos) as usize] = true;
        }
        for pos in 0..nl {
            required[aig.latch_src(pos) as usize] = true;
        }

        // The constants, when consumed directly.
        if required[0] || required[1] {
            let c0 = self.modifier.new_primitive("", PrimType::C0, &[])?;
            self.lit_map.insert(0, c0);
            if required[1] {
                let c1 = self.modifier.new_primitive("", PrimType::Not, &[c0])?;
                self.lit_map.insert(1, c1);
            }
        }

        // An inverter per input whose negation is consumed directly.
        for pos in 0..ni {
            let lit = aig.input(pos);
            if required[lit as usize ^ 1] {
                let src = self.lit_map[&lit];
                let inv = self.modifier.new_primitive("", PrimType::Not, &[src])?;
                self.lit_map.insert(lit ^ 1, inv);
            }
        }
        for pos in 0..nl {
            let lit = aig.latch(pos);
            if required[lit as usize ^ 1] {
                let src = self.lit_map[&lit];
                let inv = self.modifier.new_primitive("", PrimType::Not, &[src])?;
                self.lit_map.insert(lit ^ 1, inv);
            }
        }

        // AND gates. When only the negative polarity is consumed the
        // node is built inverted, saving the extra inverter.
        for pos in 0..na {
            let name = format!("a{pos}");
            let (lit1, fanin1) = self.polarity_fanin(aig.and_src1(pos), 0, pos)?;
            let (lit2, fanin2) = self.polarity_fanin(aig.and_src2(pos), 1, pos)?;
            let expr = Expr::and(vec![lit1, lit2]);

            let lit = aig.and_node(pos) as usize;
            if !required[lit] && required[lit ^ 1] {
                let inverted = self
                    .modifier
                    .new_expr(&name, &expr.complement(), &[fanin1, fanin2])?;
                self.lit_map.insert(lit as u64 ^ 1, inverted);
            } else {
                let node = self.modifier.new_expr(&name, &expr, &[fanin1, fanin2])?;
                self.lit_map.insert(lit as u64, node);
                if required[lit ^ 1] {
                    let inv = self.modifier.new_primitive("", PrimType::Not, &[node])?;
                    self.lit_map.insert(lit as u64 ^ 1, inv);
                }
            }
        }

        for pos in 0..no {
            let src = self.lookup(aig.output_src(pos), &format!("Output#{pos}"))?;
            self.modifier.set_output_src(output_list[pos], src)?;
        }
        for pos in 0..nl {
            let src = self.lookup(aig.latch_src(pos), &format!("Latch#{pos}"))?;
            self.modifier.set_output_src(latch_list[pos], src)?;
        }

        self.modifier.into_network()
    }

    /// Resolves an AND source literal to an expression literal (on
    /// fanin position `var`) over the node already built for one of its
    /// polarities.
    fn polarity_fanin(&mut self, src: u64, var: usize, gate: usize) -> Result<(Expr, NodeId)> {
        if let Some(&node) = self.lit_map.get(&src) {
            return Ok((Expr::PosiLiteral(var), node));
        }
        if let Some(&node) = self.lit_map.get(&(src ^ 1)) {
            return Ok((Expr::NegaLiteral(var), node));
        }
        if src < 2 {
            // A constant feeding a gate: build it now.
            let c0 = self.modifier.new_primitive("", PrimType::C0, &[])?;
            self.lit_map.insert(0, c0);
            return if src == 0 {
                Ok((Expr::PosiLiteral(var), c0))
            } else {
                Ok((Expr::NegaLiteral(var), c0))
            };
        }
        Err(BnetError::format(format!(
            "And#{gate}: source {src} is defined after its use"
        )))
    }

    fn lookup(&self, lit: u64, who: &str) -> Result<NodeId> {
        self.lit_map.get(&lit).copied().ok_or_else(|| {
            BnetError::format(format!("{who}: literal {lit} has no node"))
        })
    }
}

fn nonempty_or(symbol: &str, fallback: impl FnOnce() -> String) -> String {
    if symbol.is_empty() {
        fallback()
    } else {
        symbol.to_string()
    }
}

//////////////////////////////////////////////////////////////////////
// Network -> AIG.
//////////////////////////////////////////////////////////////////////

/// Lowers a network onto an AIG.
///
/// Every DFF must be the plain flip-flop flavour and every logic node a
/// primitive, an expression, or a truth table; Bdd and Cell nodes are
/// refused.
pub fn network_to_aig(net: &Network, comment: &str) -> Result<AigModel> {
    for dff in net.dffs() {
        if !dff.is_dff() {
            return Err(BnetError::unsupported(format!(
                "AIGER cannot express DFF '{}' (latch or cell flavour)",
                dff.name()
            )));
        }
    }
    for &id in net.logic_ids() {
        let node = net.node(id);
        if node.bdd().is_some() || node.cell_id().is_some() {
            return Err(BnetError::unsupported(format!(
                "AIGER cannot express node '{}'",
                node.name()
            )));
        }
    }

    // Clock and reset trees have no AIG rendition: latches are
    // implicitly clocked, so only inputs and logic in some data cone
    // are lowered.
    let resolver = crate::names::NameResolver::new(net, "__node", "");
    let aig_inputs: Vec<NodeId> = net
        .primary_input_ids()
        .iter()
        .copied()
        .filter(|&id| resolver.is_data(id))
        .collect();

    let ni = aig_inputs.len();
    let nl = net.dff_num();
    let no = net.primary_output_ids().len();
    let mut aig = AigModel::with_sizes(ni, nl, no);

    let mut lit_map: HashMap<NodeId, u64> = HashMap::new();
    for (pos, &id) in aig_inputs.iter().enumerate() {
        lit_map.insert(id, 2 * (pos as u64 + 1));
    }
    for (pos, dff) in net.dffs().enumerate() {
        lit_map.insert(dff.data_out(), 2 * ((ni + pos) as u64 + 1));
    }

    for &id in net.logic_ids() {
        if !resolver.is_data(id) {
            continue;
        }
        let node = net.node(id);
        let fanin_lits: Vec<u64> = node
            .fanin_ids()
            .iter()
            .map(|f| lit_map[f])
            .collect();
        let lit = if let Some(prim) = node.primitive_type() {
            lower_primitive(&mut aig, prim, &fanin_lits)
        } else if let Some(eid) = node.expr_id() {
            lower_expr(&mut aig, net.expr(eid), &fanin_lits)
        } else if let Some(fid) = node.func_id() {
            lower_tv(&mut aig, net.func(fid), &fanin_lits)
        } else {
            unreachable!("refused above")
        };
        lit_map.insert(id, lit);
    }

    let lookup = |lit_map: &HashMap<NodeId, u64>, src: NodeId, who: &str| {
        lit_map.get(&src).copied().ok_or_else(|| {
            BnetError::unsupported(format!("{who} is driven from outside the data cone"))
        })
    };
    for (pos, dff) in net.dffs().enumerate() {
        let src = net
            .node(dff.data_in())
            .output_src()
            .filter(|s| !s.is_null())
            .ok_or_else(|| {
                BnetError::unsupported(format!("DFF '{}' has no data source", dff.name()))
            })?;
        let lit = lookup(&lit_map, src, &format!("DFF '{}'", dff.name()))?;
        aig.set_latch_src(pos, lit);
    }
    for (pos, &id) in net.primary_output_ids().iter().enumerate() {
        let node = net.node(id);
        let src = node.output_src().filter(|s| !s.is_null()).ok_or_else(|| {
            BnetError::unsupported(format!("output '{}' has no source", node.name()))
        })?;
        let lit = lookup(&lit_map, src, &format!("output '{}'", node.name()))?;
        aig.set_output_src(pos, lit);
    }

    for (pos, &id) in aig_inputs.iter().enumerate() {
        let name = net.node(id).name();
        if !name.is_empty() {
            aig.set_input_symbol(pos, name);
        }
    }
    for (pos, dff) in net.dffs().enumerate() {
        if !dff.name().is_empty() {
            aig.set_latch_symbol(pos, dff.name());
        }
    }
    for (pos, &id) in net.primary_output_ids().iter().enumerate() {
        let name = net.node(id).name();
        if !name.is_empty() {
            aig.set_output_symbol(pos, name);
        }
    }
    if !comment.is_empty() {
        aig.set_comment(comment);
    }
    Ok(aig)
}

/// Balanced AND tree over literals, optionally with inverted leaves.
fn make_and(aig: &mut AigModel, lits: &[u64], invert_leaves: bool) -> u64 {
    let mask = u64::from(invert_leaves);
    match lits.len() {
        0 => 1,
        1 => lits[0] ^ mask,
        n => {
            let (left, right) = lits.split_at(n / 2);
            let l = make_and(aig, left, invert_leaves);
            let r = make_and(aig, right, invert_leaves);
            aig.add_and(l, r)
        }
    }
}

/// Balanced XOR tree; each two-input XOR costs three ANDs.
fn make_xor(aig: &mut AigModel, lits: &[u64]) -> u64 {
    match lits.len() {
        0 => 0,
        1 => lits[0],
        n => {
            let (left, right) = lits.split_at(n / 2);
            let l = make_xor(aig, left);
            let r = make_xor(aig, right);
            let both = aig.add_and(l, r);
            let neither = aig.add_and(l ^ 1, r ^ 1);
            aig.add_and(both ^ 1, neither ^ 1)
        }
    }
}

fn lower_primitive(aig: &mut AigModel, prim: PrimType, lits: &[u64]) -> u64 {
    match prim {
        PrimType::C0 => 0,
        PrimType::C1 => 1,
        PrimType::Buff => lits[0],
        PrimType::Not => lits[0] ^ 1,
        PrimType::And => make_and(aig, lits, false),
        PrimType::Nand => make_and(aig, lits, false) ^ 1,
        PrimType::Or => make_and(aig, lits, true) ^ 1,
        PrimType::Nor => make_and(aig, lits, true),
        PrimType::Xor => make_xor(aig, lits),
        PrimType::Xnor => make_xor(aig, lits) ^ 1,
    }
}

fn lower_expr(aig: &mut AigModel, expr: &Expr, lits: &[u64]) -> u64 {
    match expr {
        Expr::Zero => 0,
        Expr::One => 1,
        Expr::PosiLiteral(v) => lits[*v],
        Expr::NegaLiteral(v) => lits[*v] ^ 1,
        Expr::And(os) | Expr::Or(os) | Expr::Xor(os) => {
            let child_lits: Vec<u64> = os.iter().map(|o| lower_expr(aig, o, lits)).collect();
            match expr {
                Expr::And(_) => make_and(aig, &child_lits, false),
                Expr::Or(_) => make_and(aig, &child_lits, true) ^ 1,
                _ => make_xor(aig, &child_lits),
            }
        }
    }
}

/// A truth table becomes its sum of minterms.
fn lower_tv(aig: &mut AigModel, tv: &TvFunc, lits: &[u64]) -> u64 {
    let ni = tv.input_num();
    let mut minterms = Vec::new();
    for p in 0..tv.minterm_num() {
        if !tv.value(p) {
            continue;
        }
        let cube: Vec<u64> = (0..ni)
            .map(|i| lits[i] ^ u64::from(p & (1 << i) == 0))
            .collect();
        minterms.push(make_and(aig, &cube, false));
    }
    make_and(aig, &minterms, true) ^ 1
}

//////////////////////////////////////////////////////////////////////
// Entry points.
//////////////////////////////////////////////////////////////////////

/// Parses ASCII AIGER text into a network.
pub fn parse_aag(text: &str) -> Result<Network> {
    let aig = AigModel::read_aag(text.as_bytes()).map_err(from_aig_error)?;
    aig_to_network(&aig, "clock", "reset")
}

/// Reads an ASCII `.aag` file into a network.
pub fn read_aag(path: impl AsRef<Path>) -> Result<Network> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| BnetError::io(path, e))?;
    let aig = AigModel::read_aag(data.as_slice()).map_err(from_aig_error)?;
    aig_to_network(&aig, "clock", "reset")
}

/// Reads a binary `.aig` file into a network.
pub fn read_aig(path: impl AsRef<Path>) -> Result<Network> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| BnetError::io(path, e))?;
    let aig = AigModel::read_aig(data.as_slice()).map_err(from_aig_error)?;
    aig_to_network(&aig, "clock", "reset")
}

/// Writes the network in ASCII AIGER form.
pub fn write_aag<W: Write>(net: &Network, sink: W, comment: &str) -> Result<()> {
    let aig = network_to_aig(net, comment)?;
    aig.write_aag(sink).map_err(from_aig_error)
}

/// Writes the network in binary AIGER form.
pub fn write_aig<W: Write>(net: &Network, sink: W, comment: &str) -> Result<()> {
    let aig = network_to_aig(net, comment)?;
    aig.write_aig(sink).map_err(from_aig_error)
}

/// Writes the network to an `.aag` file.
pub fn write_aag_file(net: &Network, path: impl AsRef<Path>, comment: &str) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| BnetError::io(path, e))?;
    write_aag(net, std::io::BufWriter::new(file), comment)
}

/// Writes the network to an `.aig` file.
pub fn write_aig_file(net: &Network, path: impl AsRef<Path>, comment: &str) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| BnetError::io(path, e))?;
    write_aig(net, std::io::BufWriter::new(file), comment)
}
