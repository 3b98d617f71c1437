//! The mutation façade.
//!
//! A [`Modifier`] takes ownership of a [`Network`], applies edits, and
//! gives the network back through [`Modifier::into_network`], which runs
//! `wrap_up`. Every successful mutation clears the `sane` flag; ordered
//! views read through [`Modifier::network`] are only meaningful after a
//! `wrap_up`.

use crate::dff::{ClearPresetValue, Dff, DffKind};
use crate::ids::{DffId, NodeId, PortId};
use crate::network::Network;
use crate::node::{InputKind, LogicKind, NodeKind, OutputKind};
use crate::port::{Port, PortDir};
use crate::FuncAnalyzer;
use bnet_cell::{CellId, CellLibrary};
use bnet_common::{BnetError, Result};
use bnet_logic::{Bdd, BddMgr, Expr, PrimType, TvFunc};

/// Mutation entry points for a network under construction or edit.
#[derive(Default)]
pub struct Modifier {
    pub(crate) net: Network,
}

impl From<Network> for Modifier {
    fn from(net: Network) -> Self {
        Self { net }
    }
}

impl Modifier {
    /// Creates a modifier over a fresh, empty network.
    pub fn new() -> Self {
        Self {
            net: Network::new(),
        }
    }

    /// Returns a read view of the network being built.
    pub fn network(&self) -> &Network {
        &self.net
    }

    /// Validates and orders the network, then releases it.
    pub fn into_network(mut self) -> Result<Network> {
        self.net.wrap_up()?;
        Ok(self.net)
    }

    /// Runs `wrap_up` in place, refreshing fanouts and the ordered views.
    pub fn wrap_up(&mut self) -> Result<()> {
        self.net.wrap_up()
    }

    /// Resets the network to the empty state.
    pub fn clear(&mut self) {
        self.net = Network::new();
    }

    /// Sets the network name.
    pub fn set_name(&mut self, name: &str) {
        self.net.name = name.to_string();
    }

    /// Attaches a cell library.
    pub fn set_library(&mut self, library: CellLibrary) {
        self.net.library = Some(library);
    }

    //////////////////////////////////////////////////////////////////
    // Ports.
    //////////////////////////////////////////////////////////////////

    /// Creates a port with one terminal node per direction entry.
    ///
    /// Bit nodes of a multi-bit port are named `"<port>.<i>"`; a
    /// single-bit port's node takes the port name. Duplicate port names
    /// are rejected.
    pub fn new_port(&mut self, name: &str, dirs: &[PortDir]) -> Result<PortId> {
        if self.net.port_names.contains_key(name) {
            return Err(BnetError::domain(format!(
                "new_port: '{name}' is already in use"
            )));
        }
        let port_id = PortId::from_raw(self.net.ports.len() as u32);
        let mut bits = Vec::with_capacity(dirs.len());
        for (i, dir) in dirs.iter().enumerate() {
            let node_name = if dirs.len() > 1 {
                format!("{name}.{i}")
            } else {
                name.to_string()
            };
            let id = match dir {
                PortDir::Input => {
                    let primary_pos = self.net.primary_inputs.len();
                    self.net.reg_input(
                        node_name,
                        InputKind::Port {
                            port: port_id,
                            bit: i,
                            primary_pos,
                        },
                    )
                }
                PortDir::Output => {
                    let primary_pos = self.net.primary_outputs.len();
                    self.net.reg_output(
                        node_name,
                        OutputKind::Port {
                            port: port_id,
                            bit: i,
                            primary_pos,
                        },
                    )
                }
            };
            bits.push(id);
        }
        self.net.ports.push(Port {
            id: port_id,
            name: name.to_string(),
            bits,
        });
        self.net.port_names.insert(name.to_string(), port_id);
        self.net.sane = false;
        Ok(port_id)
    }

    /// Creates a 1-bit input port.
    pub fn new_input_port(&mut self, name: &str) -> Result<PortId> {
        self.new_port(name, &[PortDir::Input])
    }

    /// Creates an N-bit input port.
    pub fn new_input_bus(&mut self, name: &str, width: usize) -> Result<PortId> {
        self.new_port(name, &vec![PortDir::Input; width])
    }

    /// Creates a 1-bit output port.
    pub fn new_output_port(&mut self, name: &str) -> Result<PortId> {
        self.new_port(name, &[PortDir::Output])
    }

    /// Creates an N-bit output port.
    pub fn new_output_bus(&mut self, name: &str, width: usize) -> Result<PortId> {
        self.new_port(name, &vec![PortDir::Output; width])
    }

    //////////////////////////////////////////////////////////////////
    // DFFs and latches.
    //////////////////////////////////////////////////////////////////

    /// Creates a D flip-flop with auto-named terminal nodes.
    pub fn new_dff(
        &mut self,
        name: &str,
        has_clear: bool,
        has_preset: bool,
        cpv: ClearPresetValue,
    ) -> DffId {
        self.new_ff(name, false, has_clear, has_preset, cpv)
    }

    /// Creates a level-sensitive latch; the enable terminal takes the
    /// clock slot.
    pub fn new_latch(
        &mut self,
        name: &str,
        has_clear: bool,
        has_preset: bool,
        cpv: ClearPresetValue,
    ) -> DffId {
        self.new_ff(name, true, has_clear, has_preset, cpv)
    }

    fn new_ff(
        &mut self,
        name: &str,
        latch: bool,
        has_clear: bool,
        has_preset: bool,
        cpv: ClearPresetValue,
    ) -> DffId {
        let dff = DffId::from_raw(self.net.dffs.len() as u32);
        let data_in = self
            .net
            .reg_output(format!("{name}.input"), OutputKind::DataIn { dff });
        let data_out = self
            .net
            .reg_input(format!("{name}.output"), InputKind::DataOut { dff });
        let clock = self
            .net
            .reg_output(format!("{name}.clock"), OutputKind::Clock { dff });
        let clear = has_clear.then(|| {
            self.net
                .reg_output(format!("{name}.clear"), OutputKind::Clear { dff })
        });
        let preset = has_preset.then(|| {
            self.net
                .reg_output(format!("{name}.preset"), OutputKind::Preset { dff })
        });
        let kind = if latch {
            DffKind::Latch {
                data_in,
                data_out,
                enable: clock,
                clear,
                preset,
                cpv,
            }
        } else {
            DffKind::Dff {
                data_in,
                data_out,
                clock,
                clear,
                preset,
                cpv,
            }
        };
        self.net.dffs.push(Dff {
            id: dff,
            name: name.to_string(),
            kind,
        });
        self.net.sane = false;
        dff
    }

    /// Creates a DFF carrying a sequential library cell, with one
    /// terminal node per cell pin.
    ///
    /// The cell must be a true FF cell without inout pins.
    pub fn new_dff_cell(&mut self, name: &str, cell_id: CellId) -> Result<DffId> {
        let cell = self.lookup_cell(cell_id, "new_dff_cell")?;
        if !cell.is_ff() {
            return Err(BnetError::domain(format!(
                "new_dff_cell: {} is not a FF cell",
                cell.name
            )));
        }
        if cell.inout_num() > 0 {
            return Err(BnetError::domain(format!(
                "new_dff_cell: {} has inout pins",
                cell.name
            )));
        }
        let (ni, no) = (cell.input_num(), cell.output_num());
        let dff = DffId::from_raw(self.net.dffs.len() as u32);
        let mut inputs = Vec::with_capacity(ni);
        for i in 0..ni {
            inputs.push(self.net.reg_output(
                format!("{name}.input{}", i + 1),
                OutputKind::CellInput { dff, pin: i },
            ));
        }
        let mut outputs = Vec::with_capacity(no);
        for i in 0..no {
            outputs.push(self.net.reg_input(
                format!("{name}.output{}", i + 1),
                InputKind::CellOutput { dff, pin: i },
            ));
        }
        self.net.dffs.push(Dff {
            id: dff,
            name: name.to_string(),
            kind: DffKind::Cell {
                cell: cell_id,
                inputs,
                outputs,
            },
        });
        self.net.sane = false;
        Ok(dff)
    }

    fn lookup_cell(&self, cell_id: CellId, caller: &str) -> Result<&bnet_cell::Cell> {
        let library = self
            .net
            .library
            .as_ref()
            .ok_or_else(|| BnetError::domain(format!("{caller}: no cell library attached")))?;
        if (cell_id.as_raw() as usize) < library.len() {
            Ok(library.cell(cell_id))
        } else {
            Err(BnetError::domain(format!(
                "{caller}: cell #{} is out of range",
                cell_id.as_raw()
            )))
        }
    }

    //////////////////////////////////////////////////////////////////
    // Logic nodes.
    //////////////////////////////////////////////////////////////////

    /// Creates a primitive logic node; the arity must fit the kind.
    ///
    /// Fanin slots may hold [`NodeId::NULL`] to be connected later via
    /// [`Modifier::connect`].
    pub fn new_primitive(
        &mut self,
        name: &str,
        prim: PrimType,
        fanins: &[NodeId],
    ) -> Result<NodeId> {
        if !prim.accepts_arity(fanins.len()) {
            return Err(BnetError::domain(format!(
                "new_primitive: {prim} does not take {} fanin(s)",
                fanins.len()
            )));
        }
        Ok(self
            .net
            .reg_logic(name.to_string(), fanins.to_vec(), LogicKind::Prim(prim)))
    }

    /// Creates an expression logic node.
    ///
    /// The expression's input arity determines the fanin count. When the
    /// function is recognised as a primitive the node is created as that
    /// primitive instead; a degenerate expression that collapses to a
    /// constant keeps its (unused) fanins.
    pub fn new_expr(&mut self, name: &str, expr: &Expr, fanins: &[NodeId]) -> Result<NodeId> {
        let ni = expr.input_num();
        if ni != fanins.len() {
            return Err(BnetError::domain(format!(
                "new_expr: expression takes {ni} input(s), {} fanin(s) given",
                fanins.len()
            )));
        }
        let kind = self.analyze_expr_kind(expr);
        Ok(self.net.reg_logic(name.to_string(), fanins.to_vec(), kind))
    }

    fn analyze_expr_kind(&mut self, expr: &Expr) -> LogicKind {
        match FuncAnalyzer::analyze_expr(expr) {
            Some(prim) => LogicKind::Prim(prim),
            None => LogicKind::Expr(self.net.reg_expr(expr)),
        }
    }

    /// Creates a truth-table logic node; the table is hash-consed into
    /// the network's pool.
    pub fn new_tv(&mut self, name: &str, tv: &TvFunc, fanins: &[NodeId]) -> Result<NodeId> {
        if tv.input_num() != fanins.len() {
            return Err(BnetError::domain(format!(
                "new_tv: table takes {} input(s), {} fanin(s) given",
                tv.input_num(),
                fanins.len()
            )));
        }
        let func_id = self.net.reg_tv(tv);
        Ok(self
            .net
            .reg_logic(name.to_string(), fanins.to_vec(), LogicKind::TvFunc(func_id)))
    }

    /// Creates a BDD logic node; the function is copied from `src_mgr`
    /// into the network's own manager.
    pub fn new_bdd(
        &mut self,
        name: &str,
        bdd: Bdd,
        src_mgr: &BddMgr,
        fanins: &[NodeId],
    ) -> Result<NodeId> {
        let local = self.net.bdd_mgr.copy(bdd, src_mgr);
        Ok(self
            .net
            .reg_logic(name.to_string(), fanins.to_vec(), LogicKind::Bdd(local)))
    }

    /// Creates a logic node bound to a combinational library cell.
    ///
    /// The cell must be combinational with exactly one output and no
    /// tristate; the fanin count must match its input pin count.
    pub fn new_logic_cell(
        &mut self,
        name: &str,
        cell_id: CellId,
        fanins: &[NodeId],
    ) -> Result<NodeId> {
        self.check_logic_cell(cell_id, fanins.len())?;
        Ok(self
            .net
            .reg_logic(name.to_string(), fanins.to_vec(), LogicKind::Cell(cell_id)))
    }

    fn check_logic_cell(&self, cell_id: CellId, fanin_num: usize) -> Result<()> {
        let cell = self.lookup_cell(cell_id, "new_logic_cell")?;
        if !cell.is_logic() || cell.output_num() != 1 || cell.has_tristate(0) {
            return Err(BnetError::domain(format!(
                "new_logic_cell: {} is not a simple logic cell",
                cell.name
            )));
        }
        if cell.input_num() != fanin_num {
            return Err(BnetError::domain(format!(
                "new_logic_cell: {} takes {} input(s), {fanin_num} fanin(s) given",
                cell.name,
                cell.input_num()
            )));
        }
        Ok(())
    }

    //////////////////////////////////////////////////////////////////
    // In-place retyping. The node keeps its ID and name.
    //////////////////////////////////////////////////////////////////

    fn retype(&mut self, id: NodeId, fanins: &[NodeId], kind: LogicKind) -> Result<()> {
        if !self.net.check_node_id(id) || !self.net.node(id).is_logic() {
            return Err(BnetError::domain(format!(
                "change: node #{} is not a logic node",
                id.as_raw()
            )));
        }
        self.net.node_mut(id).kind = NodeKind::Logic {
            fanins: fanins.to_vec(),
            kind,
        };
        self.net.sane = false;
        Ok(())
    }

    /// Replaces a logic node's contents with a primitive.
    pub fn change_primitive(
        &mut self,
        id: NodeId,
        prim: PrimType,
        fanins: &[NodeId],
    ) -> Result<()> {
        if !prim.accepts_arity(fanins.len()) {
            return Err(BnetError::domain(format!(
                "change_primitive: {prim} does not take {} fanin(s)",
                fanins.len()
            )));
        }
        self.retype(id, fanins, LogicKind::Prim(prim))
    }

    /// Replaces a logic node's contents with an expression (or the
    /// primitive it classifies to).
    pub fn change_expr(&mut self, id: NodeId, expr: &Expr, fanins: &[NodeId]) -> Result<()> {
        if expr.input_num() != fanins.len() {
            return Err(BnetError::domain(format!(
                "change_expr: expression takes {} input(s), {} fanin(s) given",
                expr.input_num(),
                fanins.len()
            )));
        }
        let kind = self.analyze_expr_kind(expr);
        self.retype(id, fanins, kind)
    }

    /// Replaces a logic node's contents with a truth table.
    pub fn change_tv(&mut self, id: NodeId, tv: &TvFunc, fanins: &[NodeId]) -> Result<()> {
        if tv.input_num() != fanins.len() {
            return Err(BnetError::domain(format!(
                "change_tv: table takes {} input(s), {} fanin(s) given",
                tv.input_num(),
                fanins.len()
            )));
        }
        let func_id = self.net.reg_tv(tv);
        self.retype(id, fanins, LogicKind::TvFunc(func_id))
    }

    /// Replaces a logic node's contents with a BDD.
    pub fn change_bdd(
        &mut self,
        id: NodeId,
        bdd: Bdd,
        src_mgr: &BddMgr,
        fanins: &[NodeId],
    ) -> Result<()> {
        let local = self.net.bdd_mgr.copy(bdd, src_mgr);
        self.retype(id, fanins, LogicKind::Bdd(local))
    }

    /// Replaces a logic node's contents with a combinational cell
    /// binding.
    pub fn change_cell(&mut self, id: NodeId, cell_id: CellId, fanins: &[NodeId]) -> Result<()> {
        self.check_logic_cell(cell_id, fanins.len())?;
        self.retype(id, fanins, LogicKind::Cell(cell_id))
    }

    /// Duplicates a logic node's function under a new ID with the given
    /// fanins.
    pub fn dup_logic(&mut self, name: &str, src_id: NodeId, fanins: &[NodeId]) -> Result<NodeId> {
        if !self.net.check_node_id(src_id) || !self.net.node(src_id).is_logic() {
            return Err(BnetError::domain(format!(
                "dup_logic: node #{} is not a logic node",
                src_id.as_raw()
            )));
        }
        if self.net.node(src_id).fanin_num() != fanins.len() {
            return Err(BnetError::domain(format!(
                "dup_logic: node #{} takes {} fanin(s), {} given",
                src_id.as_raw(),
                self.net.node(src_id).fanin_num(),
                fanins.len()
            )));
        }
        let kind = match self.net.node(src_id).kind() {
            NodeKind::Logic { kind, .. } => *kind,
            _ => unreachable!(),
        };
        Ok(self.net.reg_logic(name.to_string(), fanins.to_vec(), kind))
    }

    //////////////////////////////////////////////////////////////////
    // Edge operations.
    //////////////////////////////////////////////////////////////////

    /// Sets the single fanin of an output-side node.
    pub fn set_output_src(&mut self, output_id: NodeId, src_id: NodeId) -> Result<()> {
        if !self.net.check_node_id(src_id) {
            return Err(BnetError::domain(format!(
                "set_output_src: invalid source node #{}",
                src_id.as_raw()
            )));
        }
        if !self.net.check_node_id(output_id) || !self.net.node(output_id).is_output() {
            return Err(BnetError::domain(format!(
                "set_output_src: node #{} is not an output node",
                output_id.as_raw()
            )));
        }
        if let NodeKind::Output { src, .. } = &mut self.net.node_mut(output_id).kind {
            *src = src_id;
        }
        self.net.sane = false;
        Ok(())
    }

    /// Connects `src` to fanin slot `pos` of `dst` (slot 0 of an
    /// output-side node).
    pub fn connect(&mut self, src: NodeId, dst: NodeId, pos: usize) -> Result<()> {
        if !self.net.check_node_id(src) || !self.net.check_node_id(dst) {
            return Err(BnetError::domain("connect: invalid node ID".to_string()));
        }
        let connected = match &mut self.net.nodes[dst.as_raw() as usize - 1].kind {
            NodeKind::Output { src: slot, .. } if pos == 0 => {
                *slot = src;
                true
            }
            NodeKind::Logic { fanins, .. } if pos < fanins.len() => {
                fanins[pos] = src;
                true
            }
            _ => false,
        };
        if !connected {
            return Err(BnetError::domain(format!(
                "connect: node #{} has no fanin slot {pos}",
                dst.as_raw()
            )));
        }
        self.net.sane = false;
        Ok(())
    }

    /// Replaces the whole fanin vector of a logic node; the arity must
    /// match.
    pub fn connect_fanins(&mut self, id: NodeId, fanins: &[NodeId]) -> Result<()> {
        if !self.net.check_node_id(id) || !self.net.node(id).is_logic() {
            return Err(BnetError::domain(format!(
                "connect_fanins: node #{} is not a logic node",
                id.as_raw()
            )));
        }
        let connected = match &mut self.net.node_mut(id).kind {
            NodeKind::Logic { fanins: slots, .. } if slots.len() == fanins.len() => {
                slots.copy_from_slice(fanins);
                true
            }
            _ => false,
        };
        if !connected {
            return Err(BnetError::domain(format!(
                "connect_fanins: arity mismatch on node #{}",
                id.as_raw()
            )));
        }
        self.net.sane = false;
        Ok(())
    }

    /// Rewrites every consumer of `old_id` to consume `new_id` instead.
    ///
    /// Walks the fanout list recorded by the most recent `wrap_up`, so a
    /// dirty network must be wrapped up first.
    pub fn substitute_fanout(&mut self, old_id: NodeId, new_id: NodeId) -> Result<()> {
        if !self.net.check_node_id(old_id) || !self.net.check_node_id(new_id) {
            return Err(BnetError::domain(
                "substitute_fanout: invalid node ID".to_string(),
            ));
        }
        let fanouts: Vec<NodeId> = self.net.node(old_id).fanouts.clone();
        for dst in fanouts {
            match &mut self.net.nodes[dst.as_raw() as usize - 1].kind {
                NodeKind::Output { src, .. } => {
                    debug_assert_eq!(*src, old_id);
                    *src = new_id;
                }
                NodeKind::Logic { fanins, .. } => {
                    let slot = fanins.iter().position(|&f| f == old_id).ok_or_else(|| {
                        BnetError::domain(format!(
                            "substitute_fanout: node #{} does not read #{}",
                            dst.as_raw(),
                            old_id.as_raw()
                        ))
                    })?;
                    fanins[slot] = new_id;
                }
                NodeKind::Input { .. } => {
                    return Err(BnetError::domain(format!(
                        "substitute_fanout: input node #{} in a fanout list",
                        dst.as_raw()
                    )));
                }
            }
        }
        self.net.sane = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(m: &Modifier, p: PortId) -> NodeId {
        m.network().port(p).bit(0)
    }

    #[test]
    fn duplicate_port_name_rejected() {
        let mut m = Modifier::new();
        m.new_input_port("a").unwrap();
        let err = m.new_output_port("a").unwrap_err();
        assert!(matches!(err, BnetError::Domain { .. }));
    }

    #[test]
    fn port_bit_node_names() {
        let mut m = Modifier::new();
        let single = m.new_input_port("clk").unwrap();
        let bus = m.new_input_bus("data", 3).unwrap();
        let net = m.network();
        assert_eq!(net.node(net.port(single).bit(0)).name(), "clk");
        assert_eq!(net.node(net.port(bus).bit(0)).name(), "data.0");
        assert_eq!(net.node(net.port(bus).bit(2)).name(), "data.2");
    }

    #[test]
    fn mixed_port_directions() {
        let mut m = Modifier::new();
        let p = m
            .new_port("io", &[PortDir::Input, PortDir::Output])
            .unwrap();
        let net = m.network();
        assert!(net.node(net.port(p).bit(0)).is_port_input());
        assert!(net.node(net.port(p).bit(1)).is_port_output());
        assert_eq!(net.primary_input_ids().len(), 1);
        assert_eq!(net.primary_output_ids().len(), 1);
    }

    #[test]
    fn dff_terminal_names_and_kinds() {
        let mut m = Modifier::new();
        let d = m.new_dff("r0", true, false, ClearPresetValue::L);
        let net = m.network();
        let dff = net.dff(d);
        assert_eq!(net.node(dff.data_in()).name(), "r0.input");
        assert_eq!(net.node(dff.data_out()).name(), "r0.output");
        assert_eq!(net.node(dff.clock()).name(), "r0.clock");
        assert_eq!(net.node(dff.clear().unwrap()).name(), "r0.clear");
        assert!(dff.preset().is_none());
        assert!(net.node(dff.data_in()).is_data_in());
        assert!(net.node(dff.data_out()).is_data_out());
        // data_out feeds the network, the other terminals consume.
        assert!(net.node(dff.data_out()).is_input());
        assert!(net.node(dff.clock()).is_output());
    }

    #[test]
    fn primitive_arity_checked() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let a = bit(&m, a);
        assert!(m.new_primitive("g", PrimType::And, &[a]).is_err());
        assert!(m.new_primitive("g", PrimType::Not, &[a]).is_ok());
        assert!(m.new_primitive("k", PrimType::C1, &[]).is_ok());
    }

    #[test]
    fn expr_collapses_to_primitive() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let a = bit(&m, a);
        let e = Expr::NegaLiteral(0);
        let n = m.new_expr("inv", &e, &[a]).unwrap();
        assert_eq!(m.network().node(n).primitive_type(), Some(PrimType::Not));
        assert_eq!(m.network().expr_num(), 0);
    }

    #[test]
    fn change_primitive_keeps_id_and_name() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let (a, b) = (bit(&m, a), bit(&m, b));
        let g = m.new_primitive("g", PrimType::And, &[a, b]).unwrap();
        m.change_primitive(g, PrimType::Or, &[b, a]).unwrap();
        let node = m.network().node(g);
        assert_eq!(node.id(), g);
        assert_eq!(node.name(), "g");
        assert_eq!(node.primitive_type(), Some(PrimType::Or));
        assert_eq!(node.fanin_ids(), &[b, a]);
    }

    #[test]
    fn retyping_terminals_rejected() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let a = bit(&m, a);
        assert!(m.change_primitive(a, PrimType::C0, &[]).is_err());
    }

    #[test]
    fn connect_fanins_arity_mismatch() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let (a, b) = (bit(&m, a), bit(&m, b));
        let g = m.new_primitive("g", PrimType::And, &[a, b]).unwrap();
        assert!(m.connect_fanins(g, &[a]).is_err());
        assert!(m.connect_fanins(g, &[b, a]).is_ok());
    }

    #[test]
    fn deferred_connection_via_null() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let a = bit(&m, a);
        let g = m
            .new_primitive("g", PrimType::Not, &[NodeId::NULL])
            .unwrap();
        m.connect(a, g, 0).unwrap();
        assert_eq!(m.network().node(g).fanin_id(0), a);
    }

    #[test]
    fn dup_logic_copies_function() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let (a, b) = (bit(&m, a), bit(&m, b));
        let g = m.new_primitive("g", PrimType::Nand, &[a, b]).unwrap();
        let h = m.dup_logic("h", g, &[b, a]).unwrap();
        assert_ne!(g, h);
        assert_eq!(m.network().node(h).primitive_type(), Some(PrimType::Nand));
    }

    #[test]
    fn new_dff_cell_requires_ff_cell() {
        use bnet_cell::{Cell, CellLibrary};
        let mut lib = CellLibrary::new("lib");
        let and2 = lib.add_cell(Cell::logic(
            "AND2",
            &["A", "B"],
            "Y",
            Expr::and(vec![Expr::PosiLiteral(0), Expr::PosiLiteral(1)]),
        ));
        let ff = lib.add_cell(Cell::ff("DFFRS", &["D", "CK"], &["Q", "QN"]));
        let mut m = Modifier::new();
        m.set_library(lib);
        assert!(m.new_dff_cell("bad", and2).is_err());
        let d = m.new_dff_cell("ff0", ff).unwrap();
        let net = m.network();
        assert_eq!(net.dff(d).cell_input_num(), 2);
        assert_eq!(net.dff(d).cell_output_num(), 2);
        assert_eq!(net.node(net.dff(d).cell_input(0)).name(), "ff0.input1");
        assert_eq!(net.node(net.dff(d).cell_output(1)).name(), "ff0.output2");
    }

    #[test]
    fn new_logic_cell_rejects_sequential_cell() {
        use bnet_cell::{Cell, CellLibrary};
        let mut lib = CellLibrary::new("lib");
        let ff = lib.add_cell(Cell::ff("DFF", &["D", "CK"], &["Q"]));
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let (a, b) = (bit(&m, a), bit(&m, b));
        m.set_library(lib);
        let err = m.new_logic_cell("g", ff, &[a, b]).unwrap_err();
        assert!(matches!(err, BnetError::Domain { .. }));
    }
}
