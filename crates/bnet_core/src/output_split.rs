//! Extraction of a single output's fanin cone.

use crate::ids::NodeId;
use crate::import::NodeMap;
use crate::modifier::Modifier;
use crate::network::Network;
use bnet_common::{BnetError, Result};
use std::collections::HashSet;

impl Network {
    /// Builds a new network containing only the transitive fanin cone of
    /// output `output_pos`: one input port per support input, the cone's
    /// logic nodes, and a single output port.
    pub fn output_split(&self, output_pos: usize) -> Result<Network> {
        if output_pos >= self.output_num() {
            return Err(BnetError::domain(format!(
                "output_split: output {output_pos} is out of range"
            )));
        }
        let output_id = self.output_id(output_pos);
        let src_id = self.output_src_id(output_pos);
        if src_id.is_null() {
            return Err(BnetError::domain(format!(
                "output_split: output {output_pos} has no source"
            )));
        }

        // Depth-first post-order walk: inputs land in `input_list`, logic
        // nodes in `node_list` with every fanin before its consumer.
        let mut marks = HashSet::new();
        let mut node_list = Vec::new();
        let mut input_list = Vec::new();
        self.get_support(src_id, &mut marks, &mut node_list, &mut input_list);

        let mut modifier = Modifier::new();
        let mut map = NodeMap::new();
        for &id in &input_list {
            let port = modifier.new_input_port(self.node(id).name())?;
            map.insert(id, modifier.network().port(port).bit(0));
        }
        for &id in &node_list {
            modifier.copy_logic(self, id, &mut map)?;
        }
        let out_port = modifier.new_output_port(self.node(output_id).name())?;
        let out_bit = modifier.network().port(out_port).bit(0);
        modifier.set_output_src(out_bit, map[&src_id])?;
        modifier.into_network()
    }

    fn get_support(
        &self,
        id: NodeId,
        marks: &mut HashSet<NodeId>,
        node_list: &mut Vec<NodeId>,
        input_list: &mut Vec<NodeId>,
    ) {
        if !marks.insert(id) {
            return;
        }
        let node = self.node(id);
        if node.is_input() {
            input_list.push(id);
        } else {
            for &fanin in node.fanin_ids() {
                self.get_support(fanin, marks, node_list, input_list);
            }
            node_list.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnet_logic::PrimType;

    /// Three outputs over four inputs with distinct supports.
    fn three_output_network() -> Network {
        let mut m = Modifier::new();
        let mut bits = Vec::new();
        for name in ["a", "b", "c", "d"] {
            let p = m.new_input_port(name).unwrap();
            bits.push(m.network().port(p).bit(0));
        }
        let mut outs = Vec::new();
        for name in ["o0", "o1", "o2"] {
            let p = m.new_output_port(name).unwrap();
            outs.push(m.network().port(p).bit(0));
        }
        let g0 = m
            .new_primitive("g0", PrimType::And, &[bits[0], bits[1]])
            .unwrap();
        let g1 = m
            .new_primitive("g1", PrimType::Or, &[bits[2], bits[3]])
            .unwrap();
        let g2 = m.new_primitive("g2", PrimType::Xor, &[g0, g1]).unwrap();
        m.set_output_src(outs[0], g0).unwrap();
        m.set_output_src(outs[1], g1).unwrap();
        m.set_output_src(outs[2], g2).unwrap();
        m.into_network().unwrap()
    }

    #[test]
    fn cone_of_single_gate() {
        let net = three_output_network();
        let cone = net.output_split(1).unwrap();
        assert_eq!(cone.input_num(), 2);
        assert_eq!(cone.output_num(), 1);
        assert_eq!(cone.logic_num(), 1);
        let names: Vec<&str> = cone
            .primary_input_ids()
            .iter()
            .map(|&id| cone.node(id).name())
            .collect();
        assert_eq!(names, vec!["c", "d"]);
        assert_eq!(
            cone.node(cone.output_src_id(0)).primitive_type(),
            Some(PrimType::Or)
        );
    }

    #[test]
    fn cone_of_whole_network() {
        let net = three_output_network();
        let cone = net.output_split(2).unwrap();
        assert_eq!(cone.input_num(), 4);
        assert_eq!(cone.logic_num(), 3);
        assert_eq!(cone.output_num(), 1);
    }

    #[test]
    fn output_fed_by_input_directly() {
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let o = m.new_output_port("o").unwrap();
        let (a, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(o).bit(0))
        };
        m.set_output_src(o, a).unwrap();
        let net = m.into_network().unwrap();
        let cone = net.output_split(0).unwrap();
        assert_eq!(cone.input_num(), 1);
        assert_eq!(cone.logic_num(), 0);
    }

    #[test]
    fn out_of_range_rejected() {
        let net = three_output_network();
        assert!(net.output_split(3).is_err());
    }
}
