//! Binary dump and restore of a whole network.
//!
//! Layout: a fixed 10-byte signature, the model name, the expression
//! pool, the truth-table pool, a hash-consed dump of every BDD referenced
//! from Bdd nodes, the ports, the DFFs, the logic nodes in topological
//! order (one-byte type tag plus variant payload), and finally the
//! output-node fanin edges. All integers use the shared varint encoding.

use crate::dff::{ClearPresetValue, DffKind};
use crate::ids::NodeId;
use crate::modifier::Modifier;
use crate::network::Network;
use crate::node::{LogicKind, NodeKind};
use crate::port::PortDir;
use bnet_cell::{CellId, CellLibrary};
use bnet_common::{BinDec, BinEnc, BnetError, Result};
use bnet_logic::{Bdd, BddMgr, Expr, TvFunc};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const SIGNATURE: &[u8; 10] = b"bnet--1.0\0";

// One-byte logic type tags.
const TAG_C0: u8 = 1;
const TAG_C1: u8 = 2;
const TAG_BUFF: u8 = 3;
const TAG_NOT: u8 = 4;
const TAG_AND: u8 = 5;
const TAG_NAND: u8 = 6;
const TAG_OR: u8 = 7;
const TAG_NOR: u8 = 8;
const TAG_XOR: u8 = 9;
const TAG_XNOR: u8 = 10;
const TAG_EXPR: u8 = 11;
const TAG_TV: u8 = 12;
const TAG_BDD: u8 = 13;
const TAG_CELL: u8 = 14;

impl Network {
    /// Writes the network to a binary stream.
    pub fn dump<W: Write>(&self, sink: W) -> Result<()> {
        let mut enc = BinEnc::new(sink);
        enc.write_signature(SIGNATURE)?;
        enc.write_string(self.name())?;

        enc.write_vint(self.expr_num() as u64)?;
        for expr in &self.exprs {
            expr.dump(&mut enc)?;
        }
        enc.write_vint(self.func_num() as u64)?;
        for func in &self.funcs {
            func.dump(&mut enc)?;
        }

        // Shared BDD table: one entry per distinct function.
        let mut bdd_map: HashMap<Bdd, usize> = HashMap::new();
        let mut bdd_list: Vec<Bdd> = Vec::new();
        for &id in self.logic_ids() {
            if let Some(bdd) = self.node(id).bdd() {
                bdd_map.entry(bdd).or_insert_with(|| {
                    bdd_list.push(bdd);
                    bdd_list.len() - 1
                });
            }
        }
        self.bdd_mgr.dump_bdds(&mut enc, &bdd_list)?;

        enc.write_vint(self.port_num() as u64)?;
        for port in self.ports() {
            enc.write_string(port.name())?;
            enc.write_vint(port.bit_width() as u64)?;
            for &bit in port.bits() {
                enc.write_u8(if self.node(bit).is_input() { 0 } else { 1 })?;
                enc.write_vint(bit.as_raw() as u64)?;
            }
        }

        enc.write_vint(self.dff_num() as u64)?;
        for dff in self.dffs() {
            enc.write_string(dff.name())?;
            match dff.kind() {
                DffKind::Dff { .. } | DffKind::Latch { .. } => {
                    enc.write_u8(if dff.is_dff() { 1 } else { 2 })?;
                    enc.write_vint(dff.data_in().as_raw() as u64)?;
                    enc.write_vint(dff.data_out().as_raw() as u64)?;
                    enc.write_vint(dff.clock().as_raw() as u64)?;
                    enc.write_vint(dff.clear().map_or(0, |n| n.as_raw() as u64))?;
                    enc.write_vint(dff.preset().map_or(0, |n| n.as_raw() as u64))?;
                    enc.write_u8(cpv_tag(dff.clear_preset_value().unwrap_or(ClearPresetValue::L)))?;
                }
                DffKind::Cell {
                    cell,
                    inputs,
                    outputs,
                } => {
                    enc.write_u8(3)?;
                    enc.write_vint(cell.as_raw() as u64)?;
                    enc.write_vint(inputs.len() as u64)?;
                    for id in inputs {
                        enc.write_vint(id.as_raw() as u64)?;
                    }
                    enc.write_vint(outputs.len() as u64)?;
                    for id in outputs {
                        enc.write_vint(id.as_raw() as u64)?;
                    }
                }
            }
        }

        enc.write_vint(self.logic_num() as u64)?;
        for &id in self.logic_ids() {
            let node = self.node(id);
            enc.write_vint(id.as_raw() as u64)?;
            enc.write_string(node.name())?;
            enc.write_vint(node.fanin_num() as u64)?;
            for &fanin in node.fanin_ids() {
                enc.write_vint(fanin.as_raw() as u64)?;
            }
            let NodeKind::Logic { kind, .. } = node.kind() else {
                unreachable!("logic list holds only logic nodes");
            };
            match kind {
                LogicKind::Prim(prim) => enc.write_u8(prim_tag(*prim))?,
                LogicKind::Expr(eid) => {
                    enc.write_u8(TAG_EXPR)?;
                    enc.write_vint(eid.as_raw() as u64)?;
                }
                LogicKind::TvFunc(fid) => {
                    enc.write_u8(TAG_TV)?;
                    enc.write_vint(fid.as_raw() as u64)?;
                }
                LogicKind::Bdd(bdd) => {
                    enc.write_u8(TAG_BDD)?;
                    enc.write_vint(bdd_map[bdd] as u64)?;
                }
                LogicKind::Cell(cell) => {
                    enc.write_u8(TAG_CELL)?;
                    enc.write_vint(cell.as_raw() as u64)?;
                }
            }
        }

        enc.write_vint(self.output_num() as u64)?;
        for &id in self.output_ids() {
            let node = self.node(id);
            enc.write_vint(id.as_raw() as u64)?;
            let src = node.output_src().unwrap_or(NodeId::NULL);
            enc.write_vint(src.as_raw() as u64)?;
        }
        Ok(())
    }

    /// Writes the network to a file.
    pub fn dump_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| BnetError::io(path, e))?;
        self.dump(BufWriter::new(file))
    }

    /// Reads a network previously written by [`Network::dump`].
    pub fn restore<R: Read>(source: R) -> Result<Network> {
        Self::restore_impl(source, None)
    }

    /// Reads a network, attaching a cell library so that mapped nodes
    /// and DFFs can be rebuilt.
    pub fn restore_with_library<R: Read>(source: R, library: CellLibrary) -> Result<Network> {
        Self::restore_impl(source, Some(library))
    }

    /// Reads a network from a file.
    pub fn restore_from(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| BnetError::io(path, e))?;
        Self::restore(BufReader::new(file))
    }

    fn restore_impl<R: Read>(source: R, library: Option<CellLibrary>) -> Result<Network> {
        let mut dec = BinDec::new(source);
        if !dec.check_signature(SIGNATURE)? {
            return Err(BnetError::format("restore: wrong signature"));
        }

        let mut modifier = Modifier::new();
        if let Some(library) = library {
            modifier.set_library(library);
        }
        let name = dec.read_string()?;
        modifier.set_name(&name);

        let expr_num = dec.read_vint()? as usize;
        let mut exprs = Vec::with_capacity(expr_num);
        for _ in 0..expr_num {
            exprs.push(Expr::restore(&mut dec)?);
        }
        let func_num = dec.read_vint()? as usize;
        let mut funcs = Vec::with_capacity(func_num);
        for _ in 0..func_num {
            funcs.push(TvFunc::restore(&mut dec)?);
        }
        let mut tmp_mgr = BddMgr::new();
        let bdds = tmp_mgr.restore_bdds(&mut dec)?;

        // Old node ID -> new node ID.
        let mut node_map: HashMap<u64, NodeId> = HashMap::new();

        let port_num = dec.read_vint()? as usize;
        for _ in 0..port_num {
            let port_name = dec.read_string()?;
            let width = dec.read_vint()? as usize;
            let mut dirs = Vec::with_capacity(width);
            let mut old_ids = Vec::with_capacity(width);
            for _ in 0..width {
                dirs.push(match dec.read_u8()? {
                    0 => PortDir::Input,
                    1 => PortDir::Output,
                    other => {
                        return Err(BnetError::format(format!(
                            "restore: bad port direction {other}"
                        )))
                    }
                });
                old_ids.push(dec.read_vint()?);
            }
            let port_id = modifier.new_port(&port_name, &dirs)?;
            for (i, old_id) in old_ids.into_iter().enumerate() {
                node_map.insert(old_id, modifier.network().port(port_id).bit(i));
            }
        }

        let dff_num = dec.read_vint()? as usize;
        for _ in 0..dff_num {
            restore_dff(&mut dec, &mut modifier, &mut node_map)?;
        }

        let logic_num = dec.read_vint()? as usize;
        for _ in 0..logic_num {
            restore_logic(&mut dec, &mut modifier, &mut node_map, &exprs, &funcs, &bdds, &tmp_mgr)?;
        }

        let output_num = dec.read_vint()? as usize;
        for _ in 0..output_num {
            let old_output = dec.read_vint()?;
            let old_src = dec.read_vint()?;
            let &output_id = node_map
                .get(&old_output)
                .ok_or_else(|| BnetError::format("restore: undefined output node"))?;
            if old_src != 0 {
                let &src_id = node_map
                    .get(&old_src)
                    .ok_or_else(|| BnetError::format("restore: undefined output source"))?;
                modifier.set_output_src(output_id, src_id)?;
            }
        }

        modifier.into_network()
    }
}

fn restore_dff<R: Read>(
    dec: &mut BinDec<R>,
    modifier: &mut Modifier,
    node_map: &mut HashMap<u64, NodeId>,
) -> Result<()> {
    let name = dec.read_string()?;
    let ty = dec.read_u8()?;
    match ty {
        1 | 2 => {
            let old_data_in = dec.read_vint()?;
            let old_data_out = dec.read_vint()?;
            let old_clock = dec.read_vint()?;
            let old_clear = dec.read_vint()?;
            let old_preset = dec.read_vint()?;
            let cpv = cpv_from_tag(dec.read_u8()?)?;
            let dff_id = if ty == 1 {
                modifier.new_dff(&name, old_clear != 0, old_preset != 0, cpv)
            } else {
                modifier.new_latch(&name, old_clear != 0, old_preset != 0, cpv)
            };
            let net = modifier.network();
            let dff = net.dff(dff_id);
            node_map.insert(old_data_in, dff.data_in());
            node_map.insert(old_data_out, dff.data_out());
            node_map.insert(old_clock, dff.clock());
            if let Some(clear) = dff.clear() {
                node_map.insert(old_clear, clear);
            }
            if let Some(preset) = dff.preset() {
                node_map.insert(old_preset, preset);
            }
            Ok(())
        }
        3 => {
            let cell = CellId::from_raw(dec.read_vint()? as u32);
            let ni = dec.read_vint()? as usize;
            let mut old_inputs = Vec::with_capacity(ni);
            for _ in 0..ni {
                old_inputs.push(dec.read_vint()?);
            }
            let no = dec.read_vint()? as usize;
            let mut old_outputs = Vec::with_capacity(no);
            for _ in 0..no {
                old_outputs.push(dec.read_vint()?);
            }
            let dff_id = modifier.new_dff_cell(&name, cell)?;
            let net = modifier.network();
            let dff = net.dff(dff_id);
            if dff.cell_input_num() != ni || dff.cell_output_num() != no {
                return Err(BnetError::format(format!(
                    "restore: cell pin counts of DFF '{name}' do not match the library"
                )));
            }
            for (i, old_id) in old_inputs.into_iter().enumerate() {
                node_map.insert(old_id, dff.cell_input(i));
            }
            for (i, old_id) in old_outputs.into_iter().enumerate() {
                node_map.insert(old_id, dff.cell_output(i));
            }
            Ok(())
        }
        other => Err(BnetError::format(format!("restore: bad DFF type {other}"))),
    }
}

#[allow(clippy::too_many_arguments)]
fn restore_logic<R: Read>(
    dec: &mut BinDec<R>,
    modifier: &mut Modifier,
    node_map: &mut HashMap<u64, NodeId>,
    exprs: &[Expr],
    funcs: &[TvFunc],
    bdds: &[Bdd],
    tmp_mgr: &BddMgr,
) -> Result<()> {
    let old_id = dec.read_vint()?;
    let name = dec.read_string()?;
    let fanin_num = dec.read_vint()? as usize;
    let mut fanins = Vec::with_capacity(fanin_num);
    for _ in 0..fanin_num {
        let old_fanin = dec.read_vint()?;
        if old_fanin == 0 {
            fanins.push(NodeId::NULL);
        } else {
            fanins.push(*node_map.get(&old_fanin).ok_or_else(|| {
                BnetError::format("restore: logic fanin refers to an undefined node")
            })?);
        }
    }
    let tag = dec.read_u8()?;
    let node_id = match tag {
        TAG_C0..=TAG_XNOR => modifier.new_primitive(&name, prim_from_tag(tag), &fanins)?,
        TAG_EXPR => {
            let idx = dec.read_vint()? as usize;
            let expr = exprs
                .get(idx)
                .ok_or_else(|| BnetError::format("restore: bad expression index"))?;
            modifier.new_expr(&name, expr, &fanins)?
        }
        TAG_TV => {
            let idx = dec.read_vint()? as usize;
            let func = funcs
                .get(idx)
                .ok_or_else(|| BnetError::format("restore: bad truth-table index"))?;
            modifier.new_tv(&name, func, &fanins)?
        }
        TAG_BDD => {
            let idx = dec.read_vint()? as usize;
            let bdd = bdds
                .get(idx)
                .copied()
                .ok_or_else(|| BnetError::format("restore: bad BDD index"))?;
            modifier.new_bdd(&name, bdd, tmp_mgr, &fanins)?
        }
        TAG_CELL => {
            let cell = CellId::from_raw(dec.read_vint()? as u32);
            modifier.new_logic_cell(&name, cell, &fanins)?
        }
        other => return Err(BnetError::format(format!("restore: bad node tag {other}"))),
    };
    node_map.insert(old_id, node_id);
    Ok(())
}

fn prim_tag(prim: bnet_logic::PrimType) -> u8 {
    use bnet_logic::PrimType::*;
    match prim {
        C0 => TAG_C0,
        C1 => TAG_C1,
        Buff => TAG_BUFF,
        Not => TAG_NOT,
        And => TAG_AND,
        Nand => TAG_NAND,
        Or => TAG_OR,
        Nor => TAG_NOR,
        Xor => TAG_XOR,
        Xnor => TAG_XNOR,
    }
}

fn prim_from_tag(tag: u8) -> bnet_logic::PrimType {
    use bnet_logic::PrimType::*;
    match tag {
        TAG_C0 => C0,
        TAG_C1 => C1,
        TAG_BUFF => Buff,
        TAG_NOT => Not,
        TAG_AND => And,
        TAG_NAND => Nand,
        TAG_OR => Or,
        TAG_NOR => Nor,
        TAG_XOR => Xor,
        _ => Xnor,
    }
}

fn cpv_tag(cpv: ClearPresetValue) -> u8 {
    match cpv {
        ClearPresetValue::L => 0,
        ClearPresetValue::H => 1,
        ClearPresetValue::N => 2,
        ClearPresetValue::T => 3,
        ClearPresetValue::X => 4,
    }
}

fn cpv_from_tag(tag: u8) -> Result<ClearPresetValue> {
    Ok(match tag {
        0 => ClearPresetValue::L,
        1 => ClearPresetValue::H,
        2 => ClearPresetValue::N,
        3 => ClearPresetValue::T,
        4 => ClearPresetValue::X,
        other => {
            return Err(BnetError::format(format!(
                "restore: bad clear-preset value {other}"
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnet_logic::PrimType;

    fn roundtrip(net: &Network) -> Network {
        let mut buf = Vec::new();
        net.dump(&mut buf).unwrap();
        Network::restore(buf.as_slice()).unwrap()
    }

    #[test]
    fn empty_network_roundtrip() {
        let mut m = Modifier::new();
        m.set_name("empty");
        let net = m.into_network().unwrap();
        let back = roundtrip(&net);
        assert_eq!(back.name(), "empty");
        assert!(net.structural_eq(&back));
    }

    #[test]
    fn combinational_roundtrip() {
        let mut m = Modifier::new();
        m.set_name("comb");
        let mut bits = Vec::new();
        for name in ["a", "b", "c"] {
            let p = m.new_input_port(name).unwrap();
            bits.push(m.network().port(p).bit(0));
        }
        let o = m.new_output_port("o").unwrap();
        let o = m.network().port(o).bit(0);
        let e = Expr::or(vec![
            Expr::and(vec![Expr::PosiLiteral(0), Expr::NegaLiteral(1)]),
            Expr::and(vec![Expr::NegaLiteral(1), Expr::PosiLiteral(2)]),
        ]);
        let f = m.new_expr("f", &e, &bits).unwrap();
        let g = m
            .new_primitive("g", PrimType::Xor, &[f, bits[0]])
            .unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();

        let back = roundtrip(&net);
        assert!(net.structural_eq(&back));
        assert_eq!(back.expr_num(), 1);
    }

    #[test]
    fn sequential_roundtrip() {
        let mut m = Modifier::new();
        m.set_name("seq");
        let clk = m.new_input_port("clock").unwrap();
        let d = m.new_input_port("d").unwrap();
        let q = m.new_output_port("q").unwrap();
        let (clk, d, q) = {
            let net = m.network();
            (net.port(clk).bit(0), net.port(d).bit(0), net.port(q).bit(0))
        };
        let dff = m.new_dff("r0", true, false, ClearPresetValue::N);
        let (din, dout, dclk, dclr) = {
            let dff = m.network().dff(dff);
            (dff.data_in(), dff.data_out(), dff.clock(), dff.clear().unwrap())
        };
        m.set_output_src(din, d).unwrap();
        m.set_output_src(dclk, clk).unwrap();
        m.set_output_src(dclr, clk).unwrap();
        m.set_output_src(q, dout).unwrap();
        let net = m.into_network().unwrap();

        let back = roundtrip(&net);
        assert!(net.structural_eq(&back));
        let dff = back.dff(crate::DffId::from_raw(0));
        assert_eq!(dff.clear_preset_value(), Some(ClearPresetValue::N));
        assert!(dff.clear().is_some());
        assert!(dff.preset().is_none());
    }

    #[test]
    fn bdd_roundtrip() {
        let mut src_mgr = BddMgr::new();
        let xor3 = src_mgr.from_truth("01101001").unwrap();
        let mut m = Modifier::new();
        m.set_name("bddnet");
        let mut bits = Vec::new();
        for name in ["x", "y", "z"] {
            let p = m.new_input_port(name).unwrap();
            bits.push(m.network().port(p).bit(0));
        }
        let o = m.new_output_port("o").unwrap();
        let o = m.network().port(o).bit(0);
        let g = m.new_bdd("g", xor3, &src_mgr, &bits).unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();

        let back = roundtrip(&net);
        assert!(net.structural_eq(&back));
        let node = back.node(back.logic_id(0));
        assert_eq!(back.bdd_mgr().to_truth(node.bdd().unwrap(), 3), "01101001");
    }

    #[test]
    fn tv_roundtrip() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let o = m.new_output_port("o").unwrap();
        let (a, b, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(b).bit(0), net.port(o).bit(0))
        };
        let tv = TvFunc::from_values(2, &[false, true, false, false]);
        let g = m.new_tv("g", &tv, &[a, b]).unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();
        let back = roundtrip(&net);
        assert!(net.structural_eq(&back));
        assert_eq!(back.func_num(), 1);
    }

    #[test]
    fn wrong_signature_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"wrong-sig!");
        buf.extend_from_slice(&[0; 16]);
        let err = Network::restore(buf.as_slice()).unwrap_err();
        assert!(matches!(err, BnetError::Format { .. }));
    }

    #[test]
    fn truncated_stream_rejected() {
        let mut m = Modifier::new();
        let p = m.new_input_port("a").unwrap();
        let _ = p;
        let net = m.into_network().unwrap();
        let mut buf = Vec::new();
        net.dump(&mut buf).unwrap();
        buf.truncate(buf.len() - 2);
        assert!(Network::restore(buf.as_slice()).is_err());
    }

    #[test]
    fn file_roundtrip() {
        let mut m = Modifier::new();
        m.set_name("file");
        let a = m.new_input_port("a").unwrap();
        let o = m.new_output_port("o").unwrap();
        let (a, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(o).bit(0))
        };
        let inv = m.new_primitive("inv", PrimType::Not, &[a]).unwrap();
        m.set_output_src(o, inv).unwrap();
        let net = m.into_network().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.bnet");
        net.dump_to(&path).unwrap();
        let back = Network::restore_from(&path).unwrap();
        assert!(net.structural_eq(&back));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Network::restore_from("/nonexistent/net.bnet").unwrap_err();
        assert!(matches!(err, BnetError::Io { .. }));
    }
}
