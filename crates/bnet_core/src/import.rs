//! Copying between networks.
//!
//! All cross-network copying funnels through these building blocks: the
//! skeleton copy (ports only), DFF copy, logic copy, and output re-wiring.
//! `import_subnetwork` composes them to splice a whole source network into
//! a destination under an input substitution; `Network::copy` composes
//! them into a full structural copy.

use crate::dff::DffKind;
use crate::ids::{DffId, NodeId};
use crate::modifier::Modifier;
use crate::network::Network;
use crate::node::{LogicKind, NodeKind};
use crate::port::PortDir;
use bnet_common::{BnetError, Result};
use std::collections::HashMap;

/// Source-node-ID → destination-node-ID correspondence built up during a
/// copy.
pub type NodeMap = HashMap<NodeId, NodeId>;

impl Modifier {
    /// Copies the source network's name, library, and ports (with their
    /// terminal nodes) into this network, returning the bit-node
    /// correspondence.
    pub fn make_skeleton_copy(&mut self, src: &Network) -> Result<NodeMap> {
        self.set_name(src.name());
        if let Some(library) = src.library() {
            self.set_library(library.clone());
        }
        let mut map = NodeMap::new();
        for port in src.ports() {
            let dirs: Vec<PortDir> = port
                .bits()
                .iter()
                .map(|&id| {
                    if src.node(id).is_input() {
                        PortDir::Input
                    } else {
                        PortDir::Output
                    }
                })
                .collect();
            let dst_port = self.new_port(port.name(), &dirs)?;
            for (i, &src_bit) in port.bits().iter().enumerate() {
                map.insert(src_bit, self.network().port(dst_port).bit(i));
            }
        }
        Ok(map)
    }

    /// Copies one DFF (any flavour), recording the terminal-node
    /// correspondence.
    pub fn copy_dff(&mut self, src: &Network, dff_id: DffId, map: &mut NodeMap) -> Result<DffId> {
        let src_dff = src.dff(dff_id);
        let name = src_dff.name().to_string();
        let dst_id = match src_dff.kind() {
            DffKind::Dff { cpv, .. } => self.new_dff(
                &name,
                src_dff.clear().is_some(),
                src_dff.preset().is_some(),
                *cpv,
            ),
            DffKind::Latch { cpv, .. } => self.new_latch(
                &name,
                src_dff.clear().is_some(),
                src_dff.preset().is_some(),
                *cpv,
            ),
            DffKind::Cell { cell, .. } => self.new_dff_cell(&name, *cell)?,
        };
        let dst_net = self.network();
        let dst_dff = dst_net.dff(dst_id);
        match src_dff.kind() {
            DffKind::Dff { .. } | DffKind::Latch { .. } => {
                map.insert(src_dff.data_in(), dst_dff.data_in());
                map.insert(src_dff.data_out(), dst_dff.data_out());
                map.insert(src_dff.clock(), dst_dff.clock());
                if let (Some(s), Some(d)) = (src_dff.clear(), dst_dff.clear()) {
                    map.insert(s, d);
                }
                if let (Some(s), Some(d)) = (src_dff.preset(), dst_dff.preset()) {
                    map.insert(s, d);
                }
            }
            DffKind::Cell { .. } => {
                for i in 0..src_dff.cell_input_num() {
                    map.insert(src_dff.cell_input(i), dst_dff.cell_input(i));
                }
                for i in 0..src_dff.cell_output_num() {
                    map.insert(src_dff.cell_output(i), dst_dff.cell_output(i));
                }
            }
        }
        Ok(dst_id)
    }

    /// Copies one logic node, translating its fanins through the map and
    /// re-registering any pooled function in this network's pools. The
    /// new correspondence is recorded.
    pub fn copy_logic(&mut self, src: &Network, node_id: NodeId, map: &mut NodeMap) -> Result<NodeId> {
        let src_node = src.node(node_id);
        let NodeKind::Logic { fanins, kind } = src_node.kind() else {
            return Err(BnetError::domain(format!(
                "copy_logic: node #{} is not a logic node",
                node_id.as_raw()
            )));
        };
        let name = src_node.name().to_string();
        let mut dst_fanins = Vec::with_capacity(fanins.len());
        for &f in fanins {
            if f.is_null() {
                dst_fanins.push(NodeId::NULL);
            } else {
                dst_fanins.push(*map.get(&f).ok_or_else(|| {
                    BnetError::domain(format!(
                        "copy_logic: fanin #{} of node #{} has no counterpart",
                        f.as_raw(),
                        node_id.as_raw()
                    ))
                })?);
            }
        }
        let dst_id = match kind {
            LogicKind::Prim(prim) => self.new_primitive(&name, *prim, &dst_fanins)?,
            LogicKind::Expr(eid) => self.new_expr(&name, src.expr(*eid), &dst_fanins)?,
            LogicKind::TvFunc(fid) => self.new_tv(&name, src.func(*fid), &dst_fanins)?,
            LogicKind::Bdd(bdd) => self.new_bdd(&name, *bdd, src.bdd_mgr(), &dst_fanins)?,
            LogicKind::Cell(cell) => self.new_logic_cell(&name, *cell, &dst_fanins)?,
        };
        map.insert(node_id, dst_id);
        Ok(dst_id)
    }

    /// Re-wires the destination counterpart of a source output node to
    /// the counterpart of its source.
    pub fn copy_output(&mut self, src: &Network, node_id: NodeId, map: &NodeMap) -> Result<()> {
        let src_node = src.node(node_id);
        let Some(src_src) = src_node.output_src() else {
            return Err(BnetError::domain(format!(
                "copy_output: node #{} is not an output node",
                node_id.as_raw()
            )));
        };
        let &dst_id = map.get(&node_id).ok_or_else(|| {
            BnetError::domain(format!(
                "copy_output: node #{} has no counterpart",
                node_id.as_raw()
            ))
        })?;
        if src_src.is_null() {
            return Ok(());
        }
        let &dst_src = map.get(&src_src).ok_or_else(|| {
            BnetError::domain(format!(
                "copy_output: source #{} of node #{} has no counterpart",
                src_src.as_raw(),
                node_id.as_raw()
            ))
        })?;
        self.set_output_src(dst_id, dst_src)
    }

    /// Copies a whole source network into this one, substituting the
    /// given nodes for the source's inputs.
    ///
    /// `input_list` must have one entry per source input (entries for
    /// DFF data outputs are placeholders, superseded by the freshly
    /// copied DFFs). Returns the destination counterparts of the
    /// source's output sources, in output order.
    pub fn import_subnetwork(
        &mut self,
        src: &Network,
        input_list: &[NodeId],
    ) -> Result<Vec<NodeId>> {
        let mut map = NodeMap::new();
        self.import_into(src, input_list, &mut map)
    }

    pub(crate) fn import_into(
        &mut self,
        src: &Network,
        input_list: &[NodeId],
        map: &mut NodeMap,
    ) -> Result<Vec<NodeId>> {
        debug_assert!(src.is_sane());
        if input_list.len() != src.input_num() {
            return Err(BnetError::domain(format!(
                "import_subnetwork: {} inputs expected, {} given",
                src.input_num(),
                input_list.len()
            )));
        }

        for (i, &dst_id) in input_list.iter().enumerate() {
            map.insert(src.input_id(i), dst_id);
        }
        for pos in 0..src.dff_num() {
            self.copy_dff(src, DffId::from_raw(pos as u32), map)?;
        }
        for &src_id in src.logic_ids() {
            self.copy_logic(src, src_id, map)?;
        }

        let mut output_list = Vec::with_capacity(src.output_num());
        for &src_id in src.output_src_ids() {
            if src_id.is_null() {
                output_list.push(NodeId::NULL);
            } else {
                output_list.push(*map.get(&src_id).ok_or_else(|| {
                    BnetError::domain(format!(
                        "import_subnetwork: output source #{} has no counterpart",
                        src_id.as_raw()
                    ))
                })?);
            }
        }
        Ok(output_list)
    }
}

impl Network {
    /// Builds a structurally equivalent copy of this network.
    pub fn copy(&self) -> Result<Network> {
        let mut modifier = Modifier::new();
        let mut map = modifier.make_skeleton_copy(self)?;
        let input_list: Vec<NodeId> = self
            .input_ids()
            .iter()
            .map(|id| map.get(id).copied().unwrap_or(NodeId::NULL))
            .collect();
        modifier.import_into(self, &input_list, &mut map)?;
        for &src_out in self.output_ids() {
            if self
                .node(src_out)
                .output_src()
                .is_some_and(|s| !s.is_null())
            {
                modifier.copy_output(self, src_out, &map)?;
            }
        }
        modifier.into_network()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClearPresetValue;
    use bnet_logic::PrimType;

    /// Two-input AND with one output port, as in the import scenarios.
    fn and_network() -> Network {
        let mut m = Modifier::new();
        let p1 = m.new_input_port("port1").unwrap();
        let p2 = m.new_input_port("port2").unwrap();
        let p3 = m.new_output_port("port3").unwrap();
        let (i1, i2, o1) = {
            let net = m.network();
            (net.port(p1).bit(0), net.port(p2).bit(0), net.port(p3).bit(0))
        };
        let and1 = m.new_primitive("", PrimType::And, &[i1, i2]).unwrap();
        m.set_output_src(o1, and1).unwrap();
        m.into_network().unwrap()
    }

    #[test]
    fn import_twice_and_combine() {
        let network1 = and_network();

        let mut m = Modifier::new();
        let mut bits = Vec::new();
        for name in ["port1", "port2", "port3", "port4"] {
            let p = m.new_input_port(name).unwrap();
            bits.push(m.network().port(p).bit(0));
        }
        let out1 = m.import_subnetwork(&network1, &[bits[0], bits[1]]).unwrap();
        assert_eq!(out1.len(), 1);
        let out2 = m.import_subnetwork(&network1, &[bits[2], bits[3]]).unwrap();
        assert_eq!(out2.len(), 1);
        assert_ne!(out1[0], out2[0]);

        let or1 = m
            .new_primitive("", PrimType::Or, &[out1[0], out2[0]])
            .unwrap();
        let p5 = m.new_output_port("port5").unwrap();
        let o5 = m.network().port(p5).bit(0);
        m.set_output_src(o5, or1).unwrap();
        let network2 = m.into_network().unwrap();

        assert_eq!(network2.input_num(), 4);
        assert_eq!(network2.logic_num(), 3);
        assert_eq!(network2.output_src_id(0), or1);
    }

    #[test]
    fn import_checks_input_count() {
        let network1 = and_network();
        let mut m = Modifier::new();
        let p = m.new_input_port("a").unwrap();
        let a = m.network().port(p).bit(0);
        assert!(m.import_subnetwork(&network1, &[a]).is_err());
    }

    #[test]
    fn skeleton_copy_maps_every_port_bit() {
        let src = and_network();
        let mut m = Modifier::new();
        let map = m.make_skeleton_copy(&src).unwrap();
        let dst = m.into_network().unwrap();
        assert_eq!(dst.port_num(), src.port_num());
        for (src_port, dst_port) in src.ports().zip(dst.ports()) {
            assert_eq!(src_port.name(), dst_port.name());
            assert_eq!(src_port.bit_width(), dst_port.bit_width());
            for (s, d) in src_port.bits().iter().zip(dst_port.bits()) {
                assert_eq!(map.get(s), Some(d));
            }
        }
        assert_eq!(dst.logic_num(), 0);
    }

    #[test]
    fn copy_preserves_structure() {
        let mut m = Modifier::new();
        let clk = m.new_input_port("clk").unwrap();
        let d_in = m.new_input_port("d").unwrap();
        let q = m.new_output_port("q").unwrap();
        let (clk, d_in, q) = {
            let net = m.network();
            (
                net.port(clk).bit(0),
                net.port(d_in).bit(0),
                net.port(q).bit(0),
            )
        };
        let dff = m.new_dff("r0", true, false, ClearPresetValue::H);
        let (din, dout, dclk, dclr) = {
            let dff = m.network().dff(dff);
            (
                dff.data_in(),
                dff.data_out(),
                dff.clock(),
                dff.clear().unwrap(),
            )
        };
        let inv = m.new_primitive("inv", PrimType::Not, &[dout]).unwrap();
        m.set_output_src(din, d_in).unwrap();
        m.set_output_src(dclk, clk).unwrap();
        m.set_output_src(dclr, clk).unwrap();
        m.set_output_src(q, inv).unwrap();
        let src = m.into_network().unwrap();

        let copy = src.copy().unwrap();
        assert_eq!(copy.port_num(), src.port_num());
        assert_eq!(copy.dff_num(), 1);
        assert_eq!(copy.logic_num(), 1);
        assert_eq!(copy.input_num(), src.input_num());
        assert_eq!(copy.output_num(), src.output_num());
        let cd = copy.dff(DffId::from_raw(0));
        assert_eq!(cd.name(), "r0");
        assert_eq!(cd.clear_preset_value(), Some(ClearPresetValue::H));
        // The copied flop's clock is fed from the copied clk port bit.
        let clk_bit = copy.port(copy.port_by_name("clk").unwrap()).bit(0);
        assert_eq!(copy.node(cd.clock()).output_src(), Some(clk_bit));
    }

    #[test]
    fn copy_translates_expr_pool() {
        use bnet_logic::Expr;
        let mut m = Modifier::new();
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
        m.set_output_src(o, f).unwrap();
        let src = m.into_network().unwrap();
        assert_eq!(src.expr_num(), 1);

        let copy = src.copy().unwrap();
        assert_eq!(copy.expr_num(), 1);
        let copied = copy.node(copy.logic_id(0));
        assert_eq!(copy.expr(copied.expr_id().unwrap()), &e);
    }
}
