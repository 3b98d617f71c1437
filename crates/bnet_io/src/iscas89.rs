//! ISCAS-89 (`.bench`) reading and writing.
//!
//! Mirrors the BLIF front-end: a line parser drives an
//! [`Iscas89Handler`], and [`NetworkIscas89Handler`] builds the network
//! with deferred fanin resolution. `MUX` gates have no node flavour of
//! their own; they expand into a sum-of-products expression over the
//! select and data inputs.

use crate::names::NameResolver;
use bnet_common::{BnetError, Result};
use bnet_core::{ClearPresetValue, Modifier, Network, NodeId};
use bnet_logic::{Expr, PrimType};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

//////////////////////////////////////////////////////////////////////
// The handler contract.
//////////////////////////////////////////////////////////////////////

/// Callback set driven by [`Iscas89Parser`].
pub trait Iscas89Handler {
    /// Called before the first statement.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// `INPUT(name)`.
    fn read_input(&mut self, name_id: usize, name: &str) -> Result<()>;

    /// `OUTPUT(name)`.
    fn read_output(&mut self, name_id: usize, name: &str) -> Result<()>;

    /// `name = GATE(inputs...)` for the ten primitive gates.
    fn read_gate(
        &mut self,
        prim: PrimType,
        oname_id: usize,
        oname: &str,
        iname_ids: &[usize],
    ) -> Result<()>;

    /// `name = DFF(input)`.
    fn read_dff(&mut self, oname_id: usize, oname: &str, iname_id: usize) -> Result<()>;

    /// `name = MUX(selects..., data...)`.
    fn read_mux(&mut self, oname_id: usize, oname: &str, iname_ids: &[usize]) -> Result<()>;

    /// Called after the last statement; deferred references resolve
    /// here.
    fn end(&mut self) -> Result<()>;

    /// Called after a successful parse.
    fn normal_exit(&mut self) {}

    /// Called when parsing aborts.
    fn error_exit(&mut self) {}
}

//////////////////////////////////////////////////////////////////////
// The parser.
//////////////////////////////////////////////////////////////////////

/// Statement-level `.bench` parser.
#[derive(Default)]
pub struct Iscas89Parser;

impl Iscas89Parser {
    /// Creates a parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses the whole text, driving the handler.
    pub fn parse<H: Iscas89Handler>(&self, text: &str, handler: &mut H) -> Result<()> {
        match self.parse_inner(text, handler) {
            Ok(()) => {
                handler.normal_exit();
                Ok(())
            }
            Err(e) => {
                handler.error_exit();
                Err(e)
            }
        }
    }

    fn parse_inner<H: Iscas89Handler>(&self, text: &str, handler: &mut H) -> Result<()> {
        handler.init()?;
        let mut interner: HashMap<String, usize> = HashMap::new();
        let mut intern = |name: &str| {
            let next = interner.len();
            *interner.entry(name.to_string()).or_insert(next)
        };

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = match raw.find('#') {
                Some(p) => &raw[..p],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix("INPUT") {
                let name = parse_parens_one(rest, line_no)?;
                handler.read_input(intern(&name), &name)?;
            } else if let Some(rest) = line.strip_prefix("OUTPUT") {
                let name = parse_parens_one(rest, line_no)?;
                handler.read_output(intern(&name), &name)?;
            } else if let Some((lhs, rhs)) = line.split_once('=') {
                let oname = lhs.trim();
                if oname.is_empty() {
                    return Err(err(line_no, "missing signal name before '='"));
                }
                let (gate, args) = parse_call(rhs.trim(), line_no)?;
                let oname_id = intern(oname);
                let iname_ids: Vec<usize> = args.iter().map(|a| intern(a)).collect();
                match gate.to_ascii_uppercase().as_str() {
                    "CONST0" => handler.read_gate(PrimType::C0, oname_id, oname, &iname_ids)?,
                    "CONST1" => handler.read_gate(PrimType::C1, oname_id, oname, &iname_ids)?,
                    "BUFF" => handler.read_gate(PrimType::Buff, oname_id, oname, &iname_ids)?,
                    "NOT" => handler.read_gate(PrimType::Not, oname_id, oname, &iname_ids)?,
                    "AND" => handler.read_gate(PrimType::And, oname_id, oname, &iname_ids)?,
                    "NAND" => handler.read_gate(PrimType::Nand, oname_id, oname, &iname_ids)?,
                    "OR" => handler.read_gate(PrimType::Or, oname_id, oname, &iname_ids)?,
                    "NOR" => handler.read_gate(PrimType::Nor, oname_id, oname, &iname_ids)?,
                    "XOR" => handler.read_gate(PrimType::Xor, oname_id, oname, &iname_ids)?,
                    "XNOR" => handler.read_gate(PrimType::Xnor, oname_id, oname, &iname_ids)?,
                    "DFF" => {
                        if iname_ids.len() != 1 {
                            return Err(err(line_no, "DFF takes exactly one input"));
                        }
                        handler.read_dff(oname_id, oname, iname_ids[0])?;
                    }
                    "MUX" => handler.read_mux(oname_id, oname, &iname_ids)?,
                    other => {
                        return Err(err(line_no, format!("unknown gate '{other}'")));
                    }
                }
            } else {
                return Err(err(line_no, format!("cannot parse '{line}'")));
            }
        }
        handler.end()
    }
}

fn err(line_no: usize, msg: impl std::fmt::Display) -> BnetError {
    BnetError::format(format!("line {line_no}: {msg}"))
}

/// Parses `(name)`.
fn parse_parens_one(rest: &str, line_no: usize) -> Result<String> {
    let rest = rest.trim();
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| err(line_no, "expected '(name)'"))?;
    let name = inner.trim();
    if name.is_empty() || name.contains(',') {
        return Err(err(line_no, "expected a single name"));
    }
    Ok(name.to_string())
}

/// Parses `GATE(a, b, ...)` or a bare `GATE`.
fn parse_call(rhs: &str, line_no: usize) -> Result<(String, Vec<String>)> {
    match rhs.find('(') {
        None => Ok((rhs.trim().to_string(), Vec::new())),
        Some(p) => {
            let gate = rhs[..p].trim().to_string();
            let inner = rhs[p + 1..]
                .trim_end()
                .strip_suffix(')')
                .ok_or_else(|| err(line_no, "missing ')'"))?;
            let args: Vec<String> = if inner.trim().is_empty() {
                Vec::new()
            } else {
                inner.split(',').map(|a| a.trim().to_string()).collect()
            };
            if args.iter().any(String::is_empty) {
                return Err(err(line_no, "empty gate argument"));
            }
            Ok((gate, args))
        }
    }
}

//////////////////////////////////////////////////////////////////////
// The network-building handler.
//////////////////////////////////////////////////////////////////////

/// Builds a [`Network`] from the parser callbacks.
pub struct NetworkIscas89Handler {
    modifier: Modifier,
    clock_name: String,
    id_map: HashMap<usize, NodeId>,
    fanin_map: HashMap<NodeId, Vec<usize>>,
    clock_id: NodeId,
}

impl NetworkIscas89Handler {
    /// Creates a handler with the given clock port name.
    pub fn new(clock_name: &str) -> Self {
        Self {
            modifier: Modifier::new(),
            clock_name: clock_name.to_string(),
            id_map: HashMap::new(),
            fanin_map: HashMap::new(),
            clock_id: NodeId::NULL,
        }
    }

    /// Wraps up and releases the finished network.
    pub fn finish(self) -> Result<Network> {
        self.modifier.into_network()
    }

    fn port_bit(&self, port: bnet_core::PortId) -> NodeId {
        self.modifier.network().port(port).bit(0)
    }
}

impl Iscas89Handler for NetworkIscas89Handler {
    fn init(&mut self) -> Result<()> {
        self.modifier.set_name("iscas89_network");
        Ok(())
    }

    fn read_input(&mut self, name_id: usize, name: &str) -> Result<()> {
        let port = self.modifier.new_input_port(name)?;
        self.id_map.insert(name_id, self.port_bit(port));
        Ok(())
    }

    fn read_output(&mut self, name_id: usize, name: &str) -> Result<()> {
        let port = self.modifier.new_output_port(name)?;
        let bit = self.port_bit(port);
        self.fanin_map.insert(bit, vec![name_id]);
        Ok(())
    }

    fn read_gate(
        &mut self,
        prim: PrimType,
        oname_id: usize,
        oname: &str,
        iname_ids: &[usize],
    ) -> Result<()> {
        let fanins = vec![NodeId::NULL; iname_ids.len()];
        let node = self.modifier.new_primitive(oname, prim, &fanins)?;
        self.id_map.insert(oname_id, node);
        self.fanin_map.insert(node, iname_ids.to_vec());
        Ok(())
    }

    fn read_dff(&mut self, oname_id: usize, oname: &str, iname_id: usize) -> Result<()> {
        // This format has no control terminals beyond the clock.
        let dff = self
            .modifier
            .new_dff(oname, false, false, ClearPresetValue::L);
        let (data_in, data_out, clock) = {
            let dff = self.modifier.network().dff(dff);
            (dff.data_in(), dff.data_out(), dff.clock())
        };
        self.id_map.insert(oname_id, data_out);
        self.fanin_map.insert(data_in, vec![iname_id]);

        if self.clock_id.is_null() {
            let port = self.modifier.new_input_port(&self.clock_name)?;
            self.clock_id = self.port_bit(port);
        }
        self.modifier.connect(self.clock_id, clock, 0)?;
        Ok(())
    }

    fn read_mux(&mut self, oname_id: usize, oname: &str, iname_ids: &[usize]) -> Result<()> {
        let ni = iname_ids.len();
        let mut nc = 0usize;
        let mut nd = 1usize;
        while nc + nd < ni {
            nc += 1;
            nd <<= 1;
        }
        if nc + nd != ni {
            return Err(BnetError::format(format!(
                "MUX '{oname}' has {ni} inputs, which fits no select/data split"
            )));
        }

        // One product per data input, gated by the select pattern.
        let mut products = Vec::with_capacity(nd);
        for p in 0..nd {
            let mut factors = Vec::with_capacity(nc + 1);
            for i in 0..nc {
                factors.push(if p & (1 << i) != 0 {
                    Expr::PosiLiteral(i)
                } else {
                    Expr::NegaLiteral(i)
                });
            }
            factors.push(Expr::PosiLiteral(nc + p));
            products.push(Expr::and(factors));
        }
        let mux_expr = Expr::or(products);

        let fanins = vec![NodeId::NULL; ni];
        let node = self.modifier.new_expr(oname, &mux_expr, &fanins)?;
        self.id_map.insert(oname_id, node);
        self.fanin_map.insert(node, iname_ids.to_vec());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let mut entries: Vec<(NodeId, Vec<usize>)> = self.fanin_map.drain().collect();
        entries.sort_by_key(|(id, _)| id.as_raw());
        for (node, fanin_names) in entries {
            for (pos, name_id) in fanin_names.into_iter().enumerate() {
                let &src = self.id_map.get(&name_id).ok_or_else(|| {
                    BnetError::format(format!(
                        "node #{} reads an undefined signal",
                        node.as_raw()
                    ))
                })?;
                self.modifier.connect(src, node, pos)?;
            }
        }
        Ok(())
    }

    fn error_exit(&mut self) {
        self.modifier.clear();
    }
}

//////////////////////////////////////////////////////////////////////
// Entry points.
//////////////////////////////////////////////////////////////////////

/// Parses `.bench` text into a network; latches share a `clock` port.
pub fn parse_iscas89(text: &str) -> Result<Network> {
    parse_iscas89_with(text, "clock")
}

/// Parses `.bench` text with an explicit clock port name.
pub fn parse_iscas89_with(text: &str, clock_name: &str) -> Result<Network> {
    let parser = Iscas89Parser::new();
    let mut handler = NetworkIscas89Handler::new(clock_name);
    parser.parse(text, &mut handler)?;
    handler.finish()
}

/// Reads a `.bench` file into a network.
pub fn read_iscas89(path: impl AsRef<Path>) -> Result<Network> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| BnetError::io(path, e))?;
    parse_iscas89(&text)
}

//////////////////////////////////////////////////////////////////////
// The writer.
//////////////////////////////////////////////////////////////////////

/// Writes the network in ISCAS-89 with default generated-name affixes.
pub fn write_iscas89<W: Write>(net: &Network, sink: W) -> Result<()> {
    write_iscas89_with(net, sink, "__node", "")
}

/// Writes the network in ISCAS-89.
///
/// Latch-flavoured DFFs and TvFunc/Bdd/Cell nodes are refused.
/// Expression nodes are handled by decomposing the network into
/// primitives first.
pub fn write_iscas89_with<W: Write>(
    net: &Network,
    sink: W,
    prefix: &str,
    suffix: &str,
) -> Result<()> {
    for dff in net.dffs() {
        if !dff.is_dff() {
            return Err(BnetError::unsupported(format!(
                "ISCAS-89 cannot express DFF '{}' (latch or cell flavour)",
                dff.name()
            )));
        }
    }
    for &id in net.logic_ids() {
        let node = net.node(id);
        if node.primitive_type().is_none() && node.expr_id().is_none() {
            return Err(BnetError::unsupported(format!(
                "ISCAS-89 cannot express node '{}'",
                node.name()
            )));
        }
    }
    if net
        .logic_ids()
        .iter()
        .any(|&id| net.node(id).expr_id().is_some())
    {
        let decomposed = net.simple_decomp()?;
        return write_iscas89_body(&decomposed, sink, prefix, suffix);
    }
    write_iscas89_body(net, sink, prefix, suffix)
}

/// Writes the network to a `.bench` file.
pub fn write_iscas89_file(net: &Network, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| BnetError::io(path, e))?;
    write_iscas89(net, std::io::BufWriter::new(file))
}

fn write_iscas89_body<W: Write>(
    net: &Network,
    mut sink: W,
    prefix: &str,
    suffix: &str,
) -> Result<()> {
    let prefix = if prefix.is_empty() { "__node" } else { prefix };
    let resolver = NameResolver::new(net, prefix, suffix);

    for &id in net.primary_input_ids() {
        if resolver.is_data(id) {
            writeln!(sink, "INPUT({})", resolver.node_name(id))?;
        }
    }
    writeln!(sink)?;

    for &id in net.primary_output_ids() {
        let src = required_src(net, id)?;
        writeln!(sink, "OUTPUT({})", resolver.node_name(src))?;
    }
    writeln!(sink)?;

    for dff in net.dffs() {
        writeln!(
            sink,
            "{} = DFF({})",
            resolver.node_name(dff.data_out()),
            resolver.node_name(dff.data_in())
        )?;
    }
    writeln!(sink)?;

    for &id in net.primary_output_ids() {
        let src = required_src(net, id)?;
        let name = resolver.node_name(id);
        let src_name = resolver.node_name(src);
        if name != src_name {
            writeln!(sink, "{name} = BUFF({src_name})")?;
        }
    }

    for &id in net.logic_ids() {
        if !resolver.is_data(id) {
            continue;
        }
        let node = net.node(id);
        let prim = node
            .primitive_type()
            .expect("non-primitive nodes were decomposed or refused");
        let gate = match prim {
            PrimType::C0 => "CONST0",
            PrimType::C1 => "CONST1",
            PrimType::Buff => "BUFF",
            PrimType::Not => "NOT",
            PrimType::And => "AND",
            PrimType::Nand => "NAND",
            PrimType::Or => "OR",
            PrimType::Nor => "NOR",
            PrimType::Xor => "XOR",
            PrimType::Xnor => "XNOR",
        };
        write!(sink, "{} = {gate}", resolver.node_name(id))?;
        if node.fanin_num() > 0 && !prim.is_constant() {
            write!(sink, "(")?;
            let mut comma = "";
            for &fanin in node.fanin_ids() {
                write!(sink, "{comma}{}", resolver.node_name(fanin))?;
                comma = ", ";
            }
            write!(sink, ")")?;
        }
        writeln!(sink)?;
    }
    Ok(())
}

fn required_src(net: &Network, id: NodeId) -> Result<NodeId> {
    match net.node(id).output_src() {
        Some(src) if !src.is_null() => Ok(src),
        _ => Err(BnetError::unsupported(format!(
            "output '{}' has no source",
            net.node(id).name()
        ))),
    }
}
