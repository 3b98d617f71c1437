//! End-to-end format scenarios: reading, conversion, and round trips.

use bnet_core::{Modifier, Network, NodeId};
use bnet_io::{parse_aag, parse_blif, parse_iscas89, parse_truth};
use bnet_logic::PrimType;
use std::collections::HashMap;

mod common {
    use super::*;

    /// Evaluates one output of a combinational network.
    pub fn eval_output(net: &Network, out_pos: usize, inputs: &HashMap<NodeId, bool>) -> bool {
        fn rec(net: &Network, id: NodeId, inputs: &HashMap<NodeId, bool>) -> bool {
            if let Some(&v) = inputs.get(&id) {
                return v;
            }
            let node = net.node(id);
            if let Some(src) = node.output_src() {
                return rec(net, src, inputs);
            }
            let values: Vec<bool> = node
                .fanin_ids()
                .iter()
                .map(|&f| rec(net, f, inputs))
                .collect();
            if let Some(prim) = node.primitive_type() {
                prim.eval(&values)
            } else if let Some(eid) = node.expr_id() {
                net.expr(eid).eval(&values)
            } else if let Some(fid) = node.func_id() {
                let mut p = 0usize;
                for (i, &v) in values.iter().enumerate() {
                    if v {
                        p |= 1 << i;
                    }
                }
                net.func(fid).value(p)
            } else if let Some(bdd) = node.bdd() {
                net.bdd_mgr().eval(bdd, &values)
            } else {
                panic!("cell nodes are not evaluated in these tests");
            }
        }
        rec(net, net.output_src_id(out_pos), inputs)
    }

    /// Assignment environment keyed by primary-input order.
    pub fn env(net: &Network, values: &[bool]) -> HashMap<NodeId, bool> {
        net.primary_input_ids()
            .iter()
            .copied()
            .zip(values.iter().copied())
            .collect()
    }
}

use common::{env, eval_output};

//////////////////////////////////////////////////////////////////////
// AIGER scenarios.
//////////////////////////////////////////////////////////////////////

/// AIGER ASCII round trip of a half-adder (carry and its complement).
#[test]
fn aag_half_adder() {
    let net = parse_aag("aag 3 2 0 2 1\n2\n4\n6\n7\n6 2 4\n").unwrap();
    assert_eq!(net.port_num(), 4);
    assert_eq!(net.input_num(), 2);
    assert_eq!(net.output_num(), 2);
    assert_eq!(net.logic_num(), 2);

    let and = net.output_src_id(0);
    assert_eq!(net.node(and).primitive_type(), Some(PrimType::And));
    let not = net.output_src_id(1);
    assert_eq!(net.node(not).primitive_type(), Some(PrimType::Not));
    assert_eq!(net.node(not).fanin_id(0), and);
}

/// A shared inverter: output 3 is the negation of input literal 2.
#[test]
fn aag_shared_inverter() {
    let net = parse_aag("aag 1 1 0 1 0\n2\n3\n").unwrap();
    assert_eq!(net.input_num(), 1);
    assert_eq!(net.logic_num(), 1);
    let not = net.output_src_id(0);
    assert_eq!(net.node(not).primitive_type(), Some(PrimType::Not));
    assert!(net.node(net.node(not).fanin_id(0)).is_port_input());
}

/// write(read(x)) keeps the AIG structure up to literal renumbering.
#[test]
fn aag_write_read_fixpoint() {
    let text = "aag 5 2 0 1 3\n2\n4\n10\n6 2 4\n8 3 5\n10 7 9\n";
    let net = parse_aag(text).unwrap();
    let mut buf = Vec::new();
    bnet_io::write_aag(&net, &mut buf, "").unwrap();
    let net2 = parse_aag(std::str::from_utf8(&buf).unwrap()).unwrap();

    // a XOR b built from three ANDs: equivalent on all assignments.
    for p in 0..4usize {
        let values = [p & 1 != 0, p & 2 != 0];
        assert_eq!(
            eval_output(&net, 0, &env(&net, &values)),
            eval_output(&net2, 0, &env(&net2, &values)),
            "assignment {p}"
        );
    }

    // A second write must reproduce the first text exactly.
    let mut buf2 = Vec::new();
    bnet_io::write_aag(&net2, &mut buf2, "").unwrap();
    assert_eq!(buf, buf2);
}

#[test]
fn aig_binary_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.aig");
    let net = parse_aag("aag 3 2 0 2 1\n2\n4\n6\n7\n6 2 4\n").unwrap();
    bnet_io::aig::write_aig_file(&net, &path, "roundtrip").unwrap();
    let net2 = bnet_io::read_aig(&path).unwrap();
    assert_eq!(net2.input_num(), 2);
    assert_eq!(net2.output_num(), 2);
    assert_eq!(net2.logic_num(), 2);
}

//////////////////////////////////////////////////////////////////////
// Rejection scenarios.
//////////////////////////////////////////////////////////////////////

#[test]
fn aag_bad_magic_rejected() {
    assert!(parse_aag("agg 0 0 0 0 0\n").is_err());
}

#[test]
fn aag_odd_input_literal_rejected() {
    assert!(parse_aag("aag 1 1 0 0 0\n3\n").is_err());
}

#[test]
fn aag_undefined_output_rejected() {
    assert!(parse_aag("aag 2 1 0 1 0\n2\n4\n").is_err());
}

//////////////////////////////////////////////////////////////////////
// Truth scenarios.
//////////////////////////////////////////////////////////////////////

/// A single XOR-of-three line: one BDD node over reversed inputs.
#[test]
fn truth_xor3() {
    let net = parse_truth("01101001\n").unwrap();
    assert_eq!(net.input_num(), 3);
    assert_eq!(net.output_num(), 1);
    assert_eq!(net.logic_num(), 1);
    let node = net.node(net.output_src_id(0));
    assert!(node.bdd().is_some());

    // Input i2 is the first fanin (most significant variable last).
    let i2 = net.port(net.port_by_name("i2").unwrap()).bit(0);
    assert_eq!(node.fanin_id(0), i2);

    for p in 0..8usize {
        let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
        assert_eq!(
            eval_output(&net, 0, &env(&net, &values)),
            p.count_ones() % 2 == 1,
            "assignment {p}"
        );
    }
}

//////////////////////////////////////////////////////////////////////
// Cross-format conversions.
//////////////////////////////////////////////////////////////////////

const FULL_ADDER_BLIF: &str = "\
.model full_adder
.inputs a b cin
.outputs sum cout
.names a b axb
10 1
01 1
.names axb cin sum
10 1
01 1
.names a b cin cout
11- 1
1-1 1
-11 1
.end
";

#[test]
fn blif_to_bench_preserves_semantics() {
    let net = parse_blif(FULL_ADDER_BLIF).unwrap();
    let mut buf = Vec::new();
    bnet_io::write_iscas89(&net, &mut buf).unwrap();
    let net2 = parse_iscas89(std::str::from_utf8(&buf).unwrap()).unwrap();

    for p in 0..8usize {
        let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
        for out in 0..2 {
            assert_eq!(
                eval_output(&net, out, &env(&net, &values)),
                eval_output(&net2, out, &env(&net2, &values)),
                "output {out}, assignment {p}"
            );
        }
    }
}

#[test]
fn blif_to_aag_preserves_semantics() {
    let net = parse_blif(FULL_ADDER_BLIF).unwrap();
    let mut buf = Vec::new();
    bnet_io::write_aag(&net, &mut buf, "").unwrap();
    let net2 = parse_aag(std::str::from_utf8(&buf).unwrap()).unwrap();

    for p in 0..8usize {
        let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
        for out in 0..2 {
            assert_eq!(
                eval_output(&net, out, &env(&net, &values)),
                eval_output(&net2, out, &env(&net2, &values)),
                "output {out}, assignment {p}"
            );
        }
    }
}

#[test]
fn blif_file_roundtrip_through_binary_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("net.bnet");
    let net = parse_blif(FULL_ADDER_BLIF).unwrap();
    net.dump_to(&path).unwrap();
    let net2 = Network::restore_from(&path).unwrap();
    assert!(net.structural_eq(&net2));
}

//////////////////////////////////////////////////////////////////////
// Transformation laws over parsed networks.
//////////////////////////////////////////////////////////////////////

/// simple_decomp is Boolean-equivalent and leaves only primitives.
#[test]
fn decomp_equivalence_on_parsed_network() {
    let net = parse_blif(FULL_ADDER_BLIF).unwrap();
    let decomposed = net.simple_decomp().unwrap();
    for &id in decomposed.logic_ids() {
        assert!(decomposed.node(id).primitive_type().is_some());
    }
    for p in 0..8usize {
        let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
        for out in 0..2 {
            assert_eq!(
                eval_output(&net, out, &env(&net, &values)),
                eval_output(&decomposed, out, &env(&decomposed, &values)),
                "output {out}, assignment {p}"
            );
        }
    }
}

/// output_split keeps exactly the chosen output's cone and function.
#[test]
fn split_equivalence_on_parsed_network() {
    let net = parse_blif(FULL_ADDER_BLIF).unwrap();
    // Output 1 (cout) depends on all three inputs.
    let cone = net.output_split(1).unwrap();
    assert_eq!(cone.output_num(), 1);
    assert_eq!(cone.input_num(), 3);
    for p in 0..8usize {
        let values = [p & 1 != 0, p & 2 != 0, p & 4 != 0];
        assert_eq!(
            eval_output(&net, 1, &env(&net, &values)),
            eval_output(&cone, 0, &env(&cone, &values)),
            "assignment {p}"
        );
    }
}

/// Support-restricted split: sum's cone over a sub-support network.
#[test]
fn split_restricts_support() {
    let text = "\
.model pair
.inputs a b c
.outputs x y
.names a b x
11 1
.names c y
0 1
.end
";
    let net = parse_blif(text).unwrap();
    let cone = net.output_split(1).unwrap();
    assert_eq!(cone.input_num(), 1);
    let names: Vec<&str> = cone
        .primary_input_ids()
        .iter()
        .map(|&id| cone.node(id).name())
        .collect();
    assert_eq!(names, vec!["c"]);
}

//////////////////////////////////////////////////////////////////////
// Modifier-level scenario: building then editing through a released
// network.
//////////////////////////////////////////////////////////////////////

#[test]
fn rebuild_edit_rewrap() {
    let mut m = Modifier::new();
    let a = m.new_input_port("a").unwrap();
    let b = m.new_input_port("b").unwrap();
    let o = m.new_output_port("o").unwrap();
    let (a, b, o) = {
        let net = m.network();
        (net.port(a).bit(0), net.port(b).bit(0), net.port(o).bit(0))
    };
    let and = m.new_primitive("g", PrimType::And, &[a, b]).unwrap();
    m.set_output_src(o, and).unwrap();
    let net = m.into_network().unwrap();
    assert!(net.is_sane());

    let mut m = Modifier::from(net);
    let or = m.new_primitive("h", PrimType::Or, &[a, b]).unwrap();
    m.substitute_fanout(and, or).unwrap();
    let net = m.into_network().unwrap();
    assert_eq!(net.output_src_id(0), or);
    assert_eq!(net.node(and).fanout_num(), 0);
}
