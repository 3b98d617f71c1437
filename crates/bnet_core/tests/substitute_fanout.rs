//! Fanout re-routing across a modify/release cycle.

use bnet_core::{Modifier, Network, NodeId, PortDir};
use bnet_logic::PrimType;

struct Fixture {
    network: Network,
    input1: NodeId,
    input2: NodeId,
    and1: NodeId,
    xor1: NodeId,
    output1: NodeId,
}

/// and1 = And(in1, in2); xor1 = Xor(and1, in3); o1 <- and1; o2 <- xor1.
fn build() -> Fixture {
    let mut m = Modifier::new();
    let port1 = m.new_input_port("port1").unwrap();
    let port2 = m.new_input_port("port2").unwrap();
    let port3 = m.new_input_port("port3").unwrap();
    let port4 = m.new_output_port("port4").unwrap();
    let port5 = m.new_output_port("port5").unwrap();

    let (input1, input2, input3, output1, output2) = {
        let net = m.network();
        (
            net.port(port1).bit(0),
            net.port(port2).bit(0),
            net.port(port3).bit(0),
            net.port(port4).bit(0),
            net.port(port5).bit(0),
        )
    };

    let and1 = m.new_primitive("", PrimType::And, &[input1, input2]).unwrap();
    let xor1 = m.new_primitive("", PrimType::Xor, &[and1, input3]).unwrap();
    m.set_output_src(output1, and1).unwrap();
    m.set_output_src(output2, xor1).unwrap();

    Fixture {
        network: m.into_network().unwrap(),
        input1,
        input2,
        and1,
        xor1,
        output1,
    }
}

#[test]
fn fanouts_move_to_the_substitute() {
    let f = build();
    assert_eq!(f.network.node(f.and1).fanout_num(), 2);

    let mut m = Modifier::from(f.network);
    let or1 = m
        .new_primitive("", PrimType::Or, &[f.input1, f.input2])
        .unwrap();
    m.substitute_fanout(f.and1, or1).unwrap();
    let network = m.into_network().unwrap();

    assert_eq!(network.node(f.and1).fanout_num(), 0);
    let mut or_fanouts = network.node(or1).fanout_ids().to_vec();
    or_fanouts.sort_by_key(|id| id.as_raw());
    assert_eq!(or_fanouts, vec![f.xor1, f.output1]);
    assert_eq!(network.output_src_id(0), or1);
    assert_eq!(network.node(f.xor1).fanin_id(0), or1);
}

#[test]
fn substitute_to_unconnected_node_has_no_fanouts_before() {
    let f = build();
    let mut m = Modifier::from(f.network);
    let or1 = m
        .new_primitive("", PrimType::Or, &[f.input1, f.input2])
        .unwrap();
    assert_eq!(m.network().node(or1).fanout_num(), 0);
}

#[test]
fn every_edge_has_a_matching_fanout() {
    // P1: for every edge u -> v, v is in u's fanouts and u is a fanin
    // (or the output source) of v.
    let f = build();
    let net = &f.network;
    for node in net.nodes() {
        for &fanout in node.fanout_ids() {
            let consumer = net.node(fanout);
            let reads_node = consumer.output_src() == Some(node.id())
                || consumer.fanin_ids().contains(&node.id());
            assert!(reads_node, "stale fanout {fanout:?} on {:?}", node.id());
        }
        for &fanin in node.fanin_ids() {
            assert!(
                net.node(fanin).fanout_ids().contains(&node.id()),
                "missing fanout for edge {fanin:?} -> {:?}",
                node.id()
            );
        }
    }
}

#[test]
fn mixed_direction_port_bits_follow_their_direction() {
    // P3: each port bit's variant matches the declared direction.
    let mut m = Modifier::new();
    let p = m
        .new_port("io", &[PortDir::Output, PortDir::Input, PortDir::Input])
        .unwrap();
    let a = m.network().port(p).bit(1);
    let o = m.network().port(p).bit(0);
    let inv = m.new_primitive("", PrimType::Not, &[a]).unwrap();
    m.set_output_src(o, inv).unwrap();
    let net = m.into_network().unwrap();
    let port = net.port(p);
    assert!(net.node(port.bit(0)).is_port_output());
    assert!(net.node(port.bit(1)).is_port_input());
    assert!(net.node(port.bit(2)).is_port_input());
}
