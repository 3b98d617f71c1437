//! BLIF reading and writing.
//!
//! The reader is split the classic way: a tokenizing parser walks the
//! statements and drives a [`BlifHandler`]; [`NetworkBlifHandler`] is the
//! handler that builds a [`Network`], deferring fanin resolution until
//! `.end` because `.names` statements freely reference signals defined
//! later in the file.

use crate::names::NameResolver;
use bnet_cell::{CellId, CellLibrary};
use bnet_common::{BnetError, Result};
use bnet_core::{ClearPresetValue, Modifier, Network, NodeId};
use bnet_logic::{Expr, PrimType};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

//////////////////////////////////////////////////////////////////////
// Covers.
//////////////////////////////////////////////////////////////////////

/// A sum-of-products cover attached to a `.names` statement.
#[derive(Clone, Debug)]
pub struct BlifCover {
    /// Number of cover inputs.
    pub input_num: usize,
    /// One cube per line; each cube is `input_num` characters from
    /// `{'0', '1', '-'}`.
    pub cubes: Vec<Vec<u8>>,
    /// The shared output character, `'1'` or `'0'`.
    pub output_pat: u8,
}

impl BlifCover {
    /// Converts the cover to an expression over its input positions.
    pub fn to_expr(&self) -> Expr {
        let mut products = Vec::with_capacity(self.cubes.len());
        for cube in &self.cubes {
            let mut literals = Vec::new();
            for (i, &pat) in cube.iter().enumerate() {
                match pat {
                    b'0' => literals.push(Expr::NegaLiteral(i)),
                    b'1' => literals.push(Expr::PosiLiteral(i)),
                    _ => {}
                }
            }
            products.push(Expr::and(literals));
        }
        let expr = Expr::or(products);
        if self.output_pat == b'0' {
            expr.complement()
        } else {
            expr
        }
    }
}

//////////////////////////////////////////////////////////////////////
// The handler contract.
//////////////////////////////////////////////////////////////////////

/// Callback set driven by [`BlifParser`].
///
/// Names are interned by the parser: each distinct signal name gets a
/// dense `name_id`, so handlers can keep cheap integer maps.
pub trait BlifHandler {
    /// Called before the first statement.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// `.model <name>`.
    fn model(&mut self, name: &str) -> Result<()>;

    /// One name of an `.inputs` statement.
    fn inputs_elem(&mut self, name_id: usize, name: &str) -> Result<()>;

    /// One name of an `.outputs` statement.
    fn outputs_elem(&mut self, name_id: usize, name: &str) -> Result<()>;

    /// A `.names` statement with its cover.
    fn names(
        &mut self,
        oname_id: usize,
        oname: &str,
        inode_ids: &[usize],
        cover: &BlifCover,
    ) -> Result<()>;

    /// A `.gate` statement, with inputs ordered like the cell's pins.
    fn gate(&mut self, oname_id: usize, oname: &str, inode_ids: &[usize], cell: CellId)
        -> Result<()>;

    /// A `.latch` statement; `rval` is the reset character (`'0'`,
    /// `'1'`, `'2'`, or `'3'`).
    fn latch(&mut self, oname_id: usize, oname: &str, iname_id: usize, rval: u8) -> Result<()>;

    /// `.end`; deferred references are resolved here.
    fn end(&mut self) -> Result<()>;

    /// Called after a successful parse.
    fn normal_exit(&mut self) {}

    /// Called when parsing aborts; the handler discards partial state.
    fn error_exit(&mut self) {}
}

//////////////////////////////////////////////////////////////////////
// The parser.
//////////////////////////////////////////////////////////////////////

/// Statement-level BLIF parser.
pub struct BlifParser<'a> {
    library: Option<&'a CellLibrary>,
}

impl<'a> BlifParser<'a> {
    /// Creates a parser; a library is only needed for `.gate`
    /// statements.
    pub fn new(library: Option<&'a CellLibrary>) -> Self {
        Self { library }
    }

    /// Parses the whole text, driving the handler. On any error the
    /// handler's `error_exit` runs and the error is returned.
    pub fn parse<H: BlifHandler>(&self, text: &str, handler: &mut H) -> Result<()> {
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

    fn parse_inner<H: BlifHandler>(&self, text: &str, handler: &mut H) -> Result<()> {
        handler.init()?;
        let mut interner = NameInterner::default();
        let lines = logical_lines(text);
        let mut pos = 0;
        let mut saw_end = false;
        while pos < lines.len() {
            let (line_no, ref tokens) = lines[pos];
            pos += 1;
            let head = tokens[0].as_str();
            match head {
                ".model" => {
                    let name = tokens
                        .get(1)
                        .ok_or_else(|| err(line_no, ".model needs a name"))?;
                    handler.model(name)?;
                }
                ".inputs" => {
                    for name in &tokens[1..] {
                        handler.inputs_elem(interner.intern(name), name)?;
                    }
                }
                ".outputs" => {
                    for name in &tokens[1..] {
                        handler.outputs_elem(interner.intern(name), name)?;
                    }
                }
                ".names" => {
                    if tokens.len() < 2 {
                        return Err(err(line_no, ".names needs at least an output"));
                    }
                    let oname = tokens[tokens.len() - 1].clone();
                    let inode_ids: Vec<usize> = tokens[1..tokens.len() - 1]
                        .iter()
                        .map(|t| interner.intern(t))
                        .collect();
                    let cover = parse_cover(&lines, &mut pos, inode_ids.len())?;
                    let oname_id = interner.intern(&oname);
                    handler.names(oname_id, &oname, &inode_ids, &cover)?;
                }
                ".latch" => {
                    if tokens.len() < 3 {
                        return Err(err(line_no, ".latch needs an input and an output"));
                    }
                    let iname = &tokens[1];
                    let oname = &tokens[2];
                    // Optional: <type> <control> and/or <init-val>.
                    let rval = match tokens.len() {
                        3 => b'2',
                        4 | 6 => parse_rval(&tokens[tokens.len() - 1], line_no)?,
                        5 => b'2',
                        _ => return Err(err(line_no, ".latch has too many fields")),
                    };
                    let iname_id = interner.intern(iname);
                    let oname_id = interner.intern(oname);
                    handler.latch(oname_id, oname, iname_id, rval)?;
                }
                ".gate" => {
                    let (cell, inode_ids, oname) =
                        self.parse_gate(tokens, &mut interner, line_no)?;
                    let oname_id = interner.intern(&oname);
                    handler.gate(oname_id, &oname, &inode_ids, cell)?;
                }
                ".end" => {
                    handler.end()?;
                    saw_end = true;
                    break;
                }
                other => {
                    return Err(err(line_no, format!("unsupported directive '{other}'")));
                }
            }
        }
        if !saw_end {
            return Err(BnetError::format("unexpected EOF, '.end' expected"));
        }
        Ok(())
    }

    fn parse_gate(
        &self,
        tokens: &[String],
        interner: &mut NameInterner,
        line_no: usize,
    ) -> Result<(CellId, Vec<usize>, String)> {
        let library = self
            .library
            .ok_or_else(|| err(line_no, ".gate used without a cell library"))?;
        let cell_name = tokens
            .get(1)
            .ok_or_else(|| err(line_no, ".gate needs a cell name"))?;
        let cell_id = library
            .cell_by_name(cell_name)
            .ok_or_else(|| err(line_no, format!("unknown cell '{cell_name}'")))?;
        let cell = library.cell(cell_id);

        let mut pin_map = HashMap::new();
        for assign in &tokens[2..] {
            let (pin, net) = assign
                .split_once('=')
                .ok_or_else(|| err(line_no, format!("bad pin assignment '{assign}'")))?;
            pin_map.insert(pin.to_string(), net.to_string());
        }
        let mut inode_ids = Vec::with_capacity(cell.input_num());
        for pin in &cell.inputs {
            let net = pin_map
                .get(pin)
                .ok_or_else(|| err(line_no, format!("input pin '{pin}' is not connected")))?;
            inode_ids.push(interner.intern(net));
        }
        let out_pin = cell
            .outputs
            .first()
            .ok_or_else(|| err(line_no, format!("cell '{cell_name}' has no output")))?;
        let oname = pin_map
            .get(out_pin)
            .ok_or_else(|| err(line_no, format!("output pin '{out_pin}' is not connected")))?;
        Ok((cell_id, inode_ids, oname.clone()))
    }
}

#[derive(Default)]
struct NameInterner {
    ids: HashMap<String, usize>,
}

impl NameInterner {
    fn intern(&mut self, name: &str) -> usize {
        let next = self.ids.len();
        *self.ids.entry(name.to_string()).or_insert(next)
    }
}

fn err(line_no: usize, msg: impl std::fmt::Display) -> BnetError {
    BnetError::format(format!("line {line_no}: {msg}"))
}

fn parse_rval(token: &str, line_no: usize) -> Result<u8> {
    match token {
        "0" => Ok(b'0'),
        "1" => Ok(b'1'),
        "2" => Ok(b'2'),
        "3" => Ok(b'3'),
        other => Err(err(line_no, format!("bad latch init value '{other}'"))),
    }
}

/// Splits into comment-stripped, continuation-joined token lines, each
/// tagged with its (1-based) starting line number.
fn logical_lines(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    let mut pending_start = 0;
    for (i, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(p) => &raw[..p],
            None => raw,
        };
        let line = line.trim_end();
        if pending.is_empty() {
            pending_start = i + 1;
        }
        if let Some(stripped) = line.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
            continue;
        }
        pending.push_str(line);
        let tokens: Vec<String> = pending.split_whitespace().map(str::to_string).collect();
        pending.clear();
        if !tokens.is_empty() {
            lines.push((pending_start, tokens));
        }
    }
    lines
}

/// Gathers the cover lines following a `.names` statement.
fn parse_cover(
    lines: &[(usize, Vec<String>)],
    pos: &mut usize,
    input_num: usize,
) -> Result<BlifCover> {
    let mut cubes = Vec::new();
    let mut output_pat = None;
    while *pos < lines.len() && !lines[*pos].1[0].starts_with('.') {
        let (line_no, ref tokens) = lines[*pos];
        *pos += 1;
        let (cube, out) = if input_num == 0 {
            (Vec::new(), tokens[0].as_str())
        } else {
            if tokens.len() != 2 {
                return Err(err(line_no, "cover line needs inputs and an output"));
            }
            (tokens[0].clone().into_bytes(), tokens[1].as_str())
        };
        if cube.len() != input_num {
            return Err(err(line_no, "cover line width does not match the inputs"));
        }
        if cube.iter().any(|&c| !matches!(c, b'0' | b'1' | b'-')) {
            return Err(err(line_no, "cover line contains an illegal character"));
        }
        let out = match out {
            "0" => b'0',
            "1" => b'1',
            other => return Err(err(line_no, format!("bad output character '{other}'"))),
        };
        if *output_pat.get_or_insert(out) != out {
            return Err(err(line_no, "cover mixes output values"));
        }
        cubes.push(cube);
    }
    let output_pat = output_pat.unwrap_or(b'1');
    Ok(BlifCover {
        input_num,
        cubes,
        output_pat,
    })
}

//////////////////////////////////////////////////////////////////////
// The network-building handler.
//////////////////////////////////////////////////////////////////////

/// Builds a [`Network`] from the parser callbacks.
pub struct NetworkBlifHandler {
    modifier: Modifier,
    clock_name: String,
    reset_name: String,
    /// Interned name -> node carrying that signal.
    id_map: HashMap<usize, NodeId>,
    /// Node -> interned fanin names, resolved in `end`.
    fanin_map: HashMap<NodeId, Vec<usize>>,
    clock_id: NodeId,
    reset_id: NodeId,
}

impl NetworkBlifHandler {
    /// Creates a handler; `library` enables `.gate` statements.
    pub fn new(library: Option<CellLibrary>, clock_name: &str, reset_name: &str) -> Self {
        let mut modifier = Modifier::new();
        if let Some(library) = library {
            modifier.set_library(library);
        }
        Self {
            modifier,
            clock_name: clock_name.to_string(),
            reset_name: reset_name.to_string(),
            id_map: HashMap::new(),
            fanin_map: HashMap::new(),
            clock_id: NodeId::NULL,
            reset_id: NodeId::NULL,
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

impl BlifHandler for NetworkBlifHandler {
    fn model(&mut self, name: &str) -> Result<()> {
        self.modifier.set_name(name);
        Ok(())
    }

    fn inputs_elem(&mut self, name_id: usize, name: &str) -> Result<()> {
        let port = self.modifier.new_input_port(name)?;
        self.id_map.insert(name_id, self.port_bit(port));
        Ok(())
    }

    fn outputs_elem(&mut self, name_id: usize, name: &str) -> Result<()> {
        let port = self.modifier.new_output_port(name)?;
        let bit = self.port_bit(port);
        self.fanin_map.insert(bit, vec![name_id]);
        Ok(())
    }

    fn names(
        &mut self,
        oname_id: usize,
        oname: &str,
        inode_ids: &[usize],
        cover: &BlifCover,
    ) -> Result<()> {
        let expr = cover.to_expr();
        if matches!(expr, Expr::Zero | Expr::One) {
            // A constant cover; any declared inputs are unused.
            let prim = if expr == Expr::One {
                PrimType::C1
            } else {
                PrimType::C0
            };
            let node = self.modifier.new_primitive(oname, prim, &[])?;
            self.id_map.insert(oname_id, node);
            return Ok(());
        }
        if expr.input_num() < inode_ids.len() {
            return Err(BnetError::format(format!(
                "cover of '{oname}' leaves trailing inputs unused"
            )));
        }
        let fanins = vec![NodeId::NULL; inode_ids.len()];
        let node = self.modifier.new_expr(oname, &expr, &fanins)?;
        self.id_map.insert(oname_id, node);
        self.fanin_map.insert(node, inode_ids.to_vec());
        Ok(())
    }

    fn gate(
        &mut self,
        oname_id: usize,
        oname: &str,
        inode_ids: &[usize],
        cell: CellId,
    ) -> Result<()> {
        let fanins = vec![NodeId::NULL; inode_ids.len()];
        let node = self.modifier.new_logic_cell(oname, cell, &fanins)?;
        self.id_map.insert(oname_id, node);
        self.fanin_map.insert(node, inode_ids.to_vec());
        Ok(())
    }

    fn latch(&mut self, oname_id: usize, oname: &str, iname_id: usize, rval: u8) -> Result<()> {
        let has_clear = rval == b'0';
        let has_preset = rval == b'1';
        let dff = self
            .modifier
            .new_dff(oname, has_clear, has_preset, ClearPresetValue::L);
        let (data_in, data_out, clock, clear, preset) = {
            let dff = self.modifier.network().dff(dff);
            (
                dff.data_in(),
                dff.data_out(),
                dff.clock(),
                dff.clear(),
                dff.preset(),
            )
        };
        self.id_map.insert(oname_id, data_out);
        self.fanin_map.insert(data_in, vec![iname_id]);

        if self.clock_id.is_null() {
            let port = self.modifier.new_input_port(&self.clock_name)?;
            self.clock_id = self.port_bit(port);
        }
        self.modifier.connect(self.clock_id, clock, 0)?;

        if has_clear || has_preset {
            if self.reset_id.is_null() {
                let port = self.modifier.new_input_port(&self.reset_name)?;
                self.reset_id = self.port_bit(port);
            }
            if let Some(clear) = clear {
                self.modifier.connect(self.reset_id, clear, 0)?;
            }
            if let Some(preset) = preset {
                self.modifier.connect(self.reset_id, preset, 0)?;
            }
        }
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        // Resolve the deferred name references now that every signal has
        // a defining statement.
        let mut entries: Vec<(NodeId, Vec<usize>)> =
            self.fanin_map.drain().collect();
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

/// Parses BLIF text into a network, with `clock`/`reset` port names for
/// latches.
pub fn parse_blif(text: &str) -> Result<Network> {
    parse_blif_with(text, None, "clock", "reset")
}

/// Parses BLIF text with an optional cell library for `.gate`
/// statements and explicit clock/reset port names.
pub fn parse_blif_with(
    text: &str,
    library: Option<CellLibrary>,
    clock_name: &str,
    reset_name: &str,
) -> Result<Network> {
    let parser = BlifParser::new(library.as_ref());
    let mut handler = NetworkBlifHandler::new(library.clone(), clock_name, reset_name);
    parser.parse(text, &mut handler)?;
    handler.finish()
}

/// Reads a BLIF file into a network.
pub fn read_blif(path: impl AsRef<Path>) -> Result<Network> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| BnetError::io(path, e))?;
    parse_blif(&text)
}

//////////////////////////////////////////////////////////////////////
// The writer.
//////////////////////////////////////////////////////////////////////

/// Writes the network in BLIF with default generated-name affixes.
pub fn write_blif<W: Write>(net: &Network, sink: W) -> Result<()> {
    write_blif_with(net, sink, "__node", "")
}

/// Writes the network in BLIF; generated names use the given prefix and
/// suffix.
///
/// Latch-flavoured DFFs only; TvFunc, Bdd and Cell logic nodes have no
/// BLIF rendition and are refused; run `simple_decomp` first where that
/// suffices.
pub fn write_blif_with<W: Write>(
    net: &Network,
    mut sink: W,
    prefix: &str,
    suffix: &str,
) -> Result<()> {
    for dff in net.dffs() {
        if !dff.is_dff() {
            return Err(BnetError::unsupported(format!(
                "BLIF cannot express DFF '{}' (latch or cell flavour)",
                dff.name()
            )));
        }
    }
    for &id in net.logic_ids() {
        let node = net.node(id);
        if node.primitive_type().is_none() && node.expr_id().is_none() {
            return Err(BnetError::unsupported(format!(
                "BLIF cannot express node '{}'",
                node.name()
            )));
        }
    }

    let prefix = if prefix.is_empty() { "__node" } else { prefix };
    let resolver = NameResolver::new(net, prefix, suffix);

    writeln!(sink, ".model {}", net.name())?;

    let mut count = 0;
    for &id in net.primary_input_ids() {
        if !resolver.is_data(id) {
            continue;
        }
        if count == 0 {
            write!(sink, ".inputs")?;
        }
        write!(sink, " {}", resolver.node_name(id))?;
        count += 1;
        if count >= 10 {
            writeln!(sink)?;
            count = 0;
        }
    }
    if count > 0 {
        writeln!(sink)?;
    }

    let mut count = 0;
    for &id in net.primary_output_ids() {
        let src = output_src(net, id)?;
        if count == 0 {
            write!(sink, ".outputs")?;
        }
        write!(sink, " {}", resolver.node_name(src))?;
        count += 1;
        if count >= 10 {
            writeln!(sink)?;
            count = 0;
        }
    }
    if count > 0 {
        writeln!(sink)?;
    }

    for dff in net.dffs() {
        writeln!(
            sink,
            ".latch {} {}",
            resolver.node_name(dff.data_in()),
            resolver.node_name(dff.data_out())
        )?;
    }

    // A buffer per output whose name could not be folded onto its source
    // (the source is an input with its own name).
    for &id in net.primary_output_ids() {
        let src = output_src(net, id)?;
        let name = resolver.node_name(id);
        let src_name = resolver.node_name(src);
        if name != src_name {
            writeln!(sink, ".names {src_name} {name}")?;
            writeln!(sink, "1 1")?;
        }
    }

    for &id in net.logic_ids() {
        if !resolver.is_data(id) {
            continue;
        }
        let node = net.node(id);
        write!(sink, ".names")?;
        for &fanin in node.fanin_ids() {
            write!(sink, " {}", resolver.node_name(fanin))?;
        }
        writeln!(sink, " {}", resolver.node_name(id))?;
        let ni = node.fanin_num();
        if let Some(prim) = node.primitive_type() {
            write_primitive_cover(&mut sink, prim, ni)?;
        } else if let Some(eid) = node.expr_id() {
            write_expr_cover(&mut sink, net.expr(eid), ni)?;
        }
    }
    writeln!(sink, ".end")?;
    Ok(())
}

/// Writes the network to a BLIF file.
pub fn write_blif_file(net: &Network, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| BnetError::io(path, e))?;
    write_blif(net, std::io::BufWriter::new(file))
}

fn output_src(net: &Network, id: NodeId) -> Result<NodeId> {
    match net.node(id).output_src() {
        Some(src) if !src.is_null() => Ok(src),
        _ => Err(BnetError::unsupported(format!(
            "output '{}' has no source",
            net.node(id).name()
        ))),
    }
}

fn write_primitive_cover<W: Write>(sink: &mut W, prim: PrimType, ni: usize) -> Result<()> {
    match prim {
        PrimType::C0 => {
            // No cube: the function is constant 0. The no-input form
            // keeps the explicit "0" line.
            if ni == 0 {
                writeln!(sink, "0")?;
            }
        }
        PrimType::C1 => {
            if ni == 0 {
                writeln!(sink, "1")?;
            } else {
                writeln!(sink, "{} 1", "-".repeat(ni))?;
            }
        }
        PrimType::Buff => writeln!(sink, "1 1")?,
        PrimType::Not => writeln!(sink, "0 1")?,
        PrimType::And => writeln!(sink, "{} 1", "1".repeat(ni))?,
        PrimType::Nand => {
            for i in 0..ni {
                let row: String = (0..ni).map(|j| if i == j { '0' } else { '-' }).collect();
                writeln!(sink, "{row} 1")?;
            }
        }
        PrimType::Or => {
            for i in 0..ni {
                let row: String = (0..ni).map(|j| if i == j { '1' } else { '-' }).collect();
                writeln!(sink, "{row} 1")?;
            }
        }
        PrimType::Nor => writeln!(sink, "{} 1", "0".repeat(ni))?,
        PrimType::Xor | PrimType::Xnor => {
            let want_odd = prim == PrimType::Xor;
            for p in 0..1usize << ni {
                if (p.count_ones() % 2 == 1) == want_odd {
                    writeln!(sink, "{} 1", minterm_row(p, ni))?;
                }
            }
        }
    }
    Ok(())
}

fn write_expr_cover<W: Write>(sink: &mut W, expr: &Expr, ni: usize) -> Result<()> {
    if expr.is_sop() {
        match expr {
            Expr::Or(cubes) => {
                for cube in cubes {
                    writeln!(sink, "{} 1", cube_row(cube, ni))?;
                }
            }
            cube => writeln!(sink, "{} 1", cube_row(cube, ni))?,
        }
    } else {
        // Not a sum of products: fall back to one row per minterm.
        let mut values = vec![false; ni];
        for p in 0..1usize << ni {
            for (i, slot) in values.iter_mut().enumerate() {
                *slot = p & (1 << i) != 0;
            }
            if expr.eval(&values) {
                writeln!(sink, "{} 1", minterm_row(p, ni))?;
            }
        }
    }
    Ok(())
}

fn cube_row(cube: &Expr, ni: usize) -> String {
    let mut row = vec![b'-'; ni];
    let mut set = |literal: &Expr| {
        if let Some(var) = literal.var() {
            row[var] = if matches!(literal, Expr::PosiLiteral(_)) {
                b'1'
            } else {
                b'0'
            };
        }
    };
    match cube {
        Expr::And(literals) => literals.iter().for_each(&mut set),
        literal => set(literal),
    }
    row.iter().map(|&b| b as char).collect()
}

fn minterm_row(p: usize, ni: usize) -> String {
    (0..ni)
        .map(|i| if p & (1 << i) != 0 { '1' } else { '0' })
        .collect()
}
