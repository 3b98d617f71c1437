//! The top-level Boolean-network container.

use crate::dff::Dff;
use crate::ids::{DffId, ExprId, FuncId, NodeId, PortId};
use crate::node::{InputKind, LogicKind, Node, NodeKind, OutputKind};
use crate::port::Port;
use bnet_cell::CellLibrary;
use bnet_logic::{BddMgr, Expr, TvFunc};
use std::collections::HashMap;

/// A gate-level logic network with synchronous state.
///
/// The network exclusively owns its nodes, DFFs, ports, expression and
/// truth-table pools, and BDD manager; everything is referenced by ID.
/// A `Network` obtained from [`Modifier::into_network`](crate::Modifier)
/// is always *sane*: fanouts are rebuilt, the logic list is topologically
/// ordered, and the output-source snapshots are current. Mutation goes
/// through [`Modifier`](crate::Modifier), which takes the network and
/// gives it back.
#[derive(Default, Debug)]
pub struct Network {
    pub(crate) name: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ports: Vec<Port>,
    pub(crate) port_names: HashMap<String, PortId>,
    pub(crate) dffs: Vec<Dff>,
    pub(crate) inputs: Vec<NodeId>,
    pub(crate) primary_inputs: Vec<NodeId>,
    pub(crate) outputs: Vec<NodeId>,
    pub(crate) primary_outputs: Vec<NodeId>,
    pub(crate) output_srcs: Vec<NodeId>,
    pub(crate) primary_output_srcs: Vec<NodeId>,
    pub(crate) logic: Vec<NodeId>,
    pub(crate) exprs: Vec<Expr>,
    pub(crate) expr_map: HashMap<TvFunc, ExprId>,
    pub(crate) funcs: Vec<TvFunc>,
    pub(crate) func_map: HashMap<TvFunc, FuncId>,
    pub(crate) bdd_mgr: BddMgr,
    pub(crate) library: Option<CellLibrary>,
    pub(crate) sane: bool,
}

impl Network {
    /// Creates an empty, unnamed network.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the network name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the associated cell library, if any.
    pub fn library(&self) -> Option<&CellLibrary> {
        self.library.as_ref()
    }

    /// Returns `true` once `wrap_up` has validated and ordered the
    /// network and no mutation has happened since.
    pub fn is_sane(&self) -> bool {
        self.sane
    }

    /// Returns the number of ports.
    pub fn port_num(&self) -> usize {
        self.ports.len()
    }

    /// Returns the port with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.as_raw() as usize]
    }

    /// Iterates over all ports in ID order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// Looks up a port by name.
    pub fn port_by_name(&self, name: &str) -> Option<PortId> {
        self.port_names.get(name).copied()
    }

    /// Returns the number of DFFs.
    pub fn dff_num(&self) -> usize {
        self.dffs.len()
    }

    /// Returns the DFF with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn dff(&self, id: DffId) -> &Dff {
        &self.dffs[id.as_raw() as usize]
    }

    /// Iterates over all DFFs in ID order.
    pub fn dffs(&self) -> impl Iterator<Item = &Dff> {
        self.dffs.iter()
    }

    /// Returns the number of nodes.
    pub fn node_num(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn check_node_id(&self, id: NodeId) -> bool {
        !id.is_null() && (id.as_raw() as usize) <= self.nodes.len()
    }

    /// Returns the node with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is null or out of bounds.
    pub fn node(&self, id: NodeId) -> &Node {
        assert!(self.check_node_id(id), "invalid node ID {id:?}");
        &self.nodes[id.as_raw() as usize - 1]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        assert!(self.check_node_id(id), "invalid node ID {id:?}");
        &mut self.nodes[id.as_raw() as usize - 1]
    }

    /// Iterates over all nodes in ID order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns the number of input-side nodes.
    pub fn input_num(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the input node at the given input position.
    pub fn input_id(&self, pos: usize) -> NodeId {
        self.inputs[pos]
    }

    /// Returns the ordered input list.
    pub fn input_ids(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Returns the ordered primary-input (port bit) list.
    pub fn primary_input_ids(&self) -> &[NodeId] {
        &self.primary_inputs
    }

    /// Returns the number of output-side nodes.
    pub fn output_num(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the output node at the given output position.
    pub fn output_id(&self, pos: usize) -> NodeId {
        self.outputs[pos]
    }

    /// Returns the ordered output list.
    pub fn output_ids(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Returns the source driving output `pos`, snapshotted by the most
    /// recent `wrap_up`.
    pub fn output_src_id(&self, pos: usize) -> NodeId {
        self.output_srcs[pos]
    }

    /// Returns the snapshot of every output's driving source.
    pub fn output_src_ids(&self) -> &[NodeId] {
        &self.output_srcs
    }

    /// Returns the ordered primary-output (port bit) list.
    pub fn primary_output_ids(&self) -> &[NodeId] {
        &self.primary_outputs
    }

    /// Returns the snapshot of every primary output's driving source.
    pub fn primary_output_src_ids(&self) -> &[NodeId] {
        &self.primary_output_srcs
    }

    /// Returns the number of logic nodes.
    pub fn logic_num(&self) -> usize {
        self.logic.len()
    }

    /// Returns the logic node at the given position of the topological
    /// order.
    pub fn logic_id(&self, pos: usize) -> NodeId {
        self.logic[pos]
    }

    /// Returns the logic nodes in the topological order produced by the
    /// most recent `wrap_up`.
    pub fn logic_ids(&self) -> &[NodeId] {
        &self.logic
    }

    /// Returns the number of pooled expressions.
    pub fn expr_num(&self) -> usize {
        self.exprs.len()
    }

    /// Returns the pooled expression with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.as_raw() as usize]
    }

    /// Returns the number of pooled truth tables.
    pub fn func_num(&self) -> usize {
        self.funcs.len()
    }

    /// Returns the pooled truth table with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn func(&self, id: FuncId) -> &TvFunc {
        &self.funcs[id.as_raw() as usize]
    }

    /// Returns the BDD manager owning every `Bdd` handle stored in this
    /// network's nodes.
    pub fn bdd_mgr(&self) -> &BddMgr {
        &self.bdd_mgr
    }

    /// Returns `true` if the network contains no TvFunc or Bdd logic
    /// nodes, i.e. every function has a gate-level rendition.
    pub fn is_concrete(&self) -> bool {
        !self.logic.iter().any(|&id| {
            matches!(
                self.node(id).kind(),
                NodeKind::Logic {
                    kind: LogicKind::TvFunc(_) | LogicKind::Bdd(_),
                    ..
                }
            )
        })
    }

    /// Returns `true` if every DFF and every logic node carries a cell
    /// binding.
    pub fn is_mapped(&self) -> bool {
        self.dffs.iter().all(Dff::is_cell)
            && self.logic.iter().all(|&id| {
                matches!(
                    self.node(id).kind(),
                    NodeKind::Logic {
                        kind: LogicKind::Cell(_),
                        ..
                    }
                )
            })
    }

    //////////////////////////////////////////////////////////////////
    // Registration internals used by the Modifier.
    //////////////////////////////////////////////////////////////////

    pub(crate) fn reg_node(&mut self, name: String, kind: NodeKind) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32 + 1);
        self.nodes.push(Node {
            id,
            name,
            fanouts: Vec::new(),
            kind,
        });
        self.sane = false;
        id
    }

    pub(crate) fn reg_input(&mut self, name: String, kind: InputKind) -> NodeId {
        let pos = self.inputs.len();
        let id = self.reg_node(name, NodeKind::Input { pos, kind });
        self.inputs.push(id);
        if self.nodes[id.as_raw() as usize - 1].is_port_input() {
            self.primary_inputs.push(id);
        }
        id
    }

    pub(crate) fn reg_output(&mut self, name: String, kind: OutputKind) -> NodeId {
        let pos = self.outputs.len();
        let id = self.reg_node(
            name,
            NodeKind::Output {
                pos,
                src: NodeId::NULL,
                kind,
            },
        );
        self.outputs.push(id);
        if self.nodes[id.as_raw() as usize - 1].is_port_output() {
            self.primary_outputs.push(id);
        }
        id
    }

    pub(crate) fn reg_logic(
        &mut self,
        name: String,
        fanins: Vec<NodeId>,
        kind: LogicKind,
    ) -> NodeId {
        let id = self.reg_node(name, NodeKind::Logic { fanins, kind });
        self.logic.push(id);
        id
    }

    /// Registers an expression, hash-consing by truth table for arities
    /// up to 10; wider expressions are always fresh entries.
    pub(crate) fn reg_expr(&mut self, expr: &Expr) -> ExprId {
        let ni = expr.input_num();
        if ni <= 10 {
            let tv = expr.to_tv(ni);
            if let Some(&id) = self.expr_map.get(&tv) {
                return id;
            }
            let id = ExprId::from_raw(self.exprs.len() as u32);
            self.exprs.push(expr.clone());
            self.expr_map.insert(tv, id);
            id
        } else {
            let id = ExprId::from_raw(self.exprs.len() as u32);
            self.exprs.push(expr.clone());
            id
        }
    }

    /// Registers a truth table, hash-consing by value.
    pub(crate) fn reg_tv(&mut self, tv: &TvFunc) -> FuncId {
        if let Some(&id) = self.func_map.get(tv) {
            return id;
        }
        let id = FuncId::from_raw(self.funcs.len() as u32);
        self.funcs.push(tv.clone());
        self.func_map.insert(tv.clone(), id);
        id
    }

    //////////////////////////////////////////////////////////////////
    // Structural equality.
    //////////////////////////////////////////////////////////////////

    /// Compares two networks structurally: ports, DFFs, node variants,
    /// fanins and output sources must all coincide. Names take part;
    /// pool IDs do not (pool entries are compared by content, BDDs by
    /// their truth tables).
    pub fn structural_eq(&self, other: &Network) -> bool {
        if self.name != other.name
            || self.nodes.len() != other.nodes.len()
            || self.ports.len() != other.ports.len()
            || self.dffs.len() != other.dffs.len()
            || self.outputs != other.outputs
            || self.inputs != other.inputs
        {
            return false;
        }
        if self
            .ports
            .iter()
            .zip(&other.ports)
            .any(|(a, b)| a.name != b.name || a.bits != b.bits)
        {
            return false;
        }
        if self
            .dffs
            .iter()
            .zip(&other.dffs)
            .any(|(a, b)| a.name != b.name || a.kind != b.kind)
        {
            return false;
        }
        for (a, b) in self.nodes.iter().zip(&other.nodes) {
            if a.name != b.name {
                return false;
            }
            match (&a.kind, &b.kind) {
                (
                    NodeKind::Logic {
                        fanins: fa,
                        kind: ka,
                    },
                    NodeKind::Logic {
                        fanins: fb,
                        kind: kb,
                    },
                ) => {
                    if fa != fb || !self.logic_kind_eq(ka, other, kb, fa.len()) {
                        return false;
                    }
                }
                (ka, kb) => {
                    if ka != kb {
                        return false;
                    }
                }
            }
        }
        true
    }

    fn logic_kind_eq(&self, a: &LogicKind, other: &Network, b: &LogicKind, ni: usize) -> bool {
        match (a, b) {
            (LogicKind::Prim(pa), LogicKind::Prim(pb)) => pa == pb,
            (LogicKind::Expr(ea), LogicKind::Expr(eb)) => self.expr(*ea) == other.expr(*eb),
            (LogicKind::TvFunc(fa), LogicKind::TvFunc(fb)) => self.func(*fa) == other.func(*fb),
            (LogicKind::Bdd(ba), LogicKind::Bdd(bb)) => {
                self.bdd_mgr.to_truth(*ba, ni) == other.bdd_mgr.to_truth(*bb, ni)
            }
            (LogicKind::Cell(ca), LogicKind::Cell(cb)) => ca == cb,
            _ => false,
        }
    }
}
