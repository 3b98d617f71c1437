//! Decomposition of expression nodes into primitives.

use crate::ids::NodeId;
use crate::import::NodeMap;
use crate::modifier::Modifier;
use crate::network::Network;
use crate::node::{LogicKind, NodeKind};
use bnet_common::Result;
use bnet_logic::{Expr, PrimType};

impl Network {
    /// Rebuilds the network so that every expression node is expanded
    /// into And/Or/Xor/Not primitives.
    ///
    /// TvFunc, Bdd, and Cell nodes are outside this pass's scope and are
    /// copied untouched.
    pub fn simple_decomp(&self) -> Result<Network> {
        let mut op = SimpleDecomp {
            modifier: Modifier::new(),
            term_list: Vec::new(),
        };
        op.decomp(self)?;
        op.modifier.into_network()
    }
}

struct SimpleDecomp {
    modifier: Modifier,
    /// Slot `2i` holds the destination fanin for variable `i`; slot
    /// `2i + 1` caches the shared inverter synthesised for it, so a
    /// variable negated several times gets one Not node.
    term_list: Vec<NodeId>,
}

impl SimpleDecomp {
    fn decomp(&mut self, src: &Network) -> Result<()> {
        let mut map: NodeMap = self.modifier.make_skeleton_copy(src)?;

        for pos in 0..src.dff_num() {
            self.modifier
                .copy_dff(src, crate::DffId::from_raw(pos as u32), &mut map)?;
        }

        for &src_id in src.logic_ids() {
            let src_node = src.node(src_id);
            match src_node.kind() {
                NodeKind::Logic {
                    fanins,
                    kind: LogicKind::Expr(expr_id),
                } => {
                    let ni = fanins.len();
                    self.term_list.clear();
                    self.term_list.resize(ni * 2, NodeId::NULL);
                    for (i, f) in fanins.iter().enumerate() {
                        self.term_list[i * 2] = map[f];
                    }
                    let expr = src.expr(*expr_id).clone();
                    let dst_id = self.decomp_expr(&expr)?;
                    map.insert(src_id, dst_id);
                }
                _ => {
                    self.modifier.copy_logic(src, src_id, &mut map)?;
                }
            }
        }

        for &src_id in src.output_ids() {
            self.modifier.copy_output(src, src_id, &map)?;
        }
        Ok(())
    }

    fn decomp_expr(&mut self, expr: &Expr) -> Result<NodeId> {
        match expr {
            Expr::PosiLiteral(v) => Ok(self.term_list[v * 2]),
            Expr::NegaLiteral(v) => {
                let slot = v * 2 + 1;
                if self.term_list[slot].is_null() {
                    let fanin = self.term_list[slot - 1];
                    self.term_list[slot] =
                        self.modifier.new_primitive("", PrimType::Not, &[fanin])?;
                }
                Ok(self.term_list[slot])
            }
            // Constants only occur inside unclassified wide expressions.
            Expr::Zero => self.modifier.new_primitive("", PrimType::C0, &[]),
            Expr::One => self.modifier.new_primitive("", PrimType::C1, &[]),
            Expr::And(operands) | Expr::Or(operands) | Expr::Xor(operands) => {
                let mut fanins = Vec::with_capacity(operands.len());
                for operand in operands {
                    fanins.push(self.decomp_expr(operand)?);
                }
                let prim = match expr {
                    Expr::And(_) => PrimType::And,
                    Expr::Or(_) => PrimType::Or,
                    _ => PrimType::Xor,
                };
                self.modifier.new_primitive("", prim, &fanins)
            }
        }
    }
}
