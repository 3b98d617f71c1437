//! Gate-level Verilog output.

use crate::name_mgr::NameMgr;
use bnet_common::{BnetError, Result};
use bnet_core::{Network, NodeId};
use bnet_logic::{Expr, PrimType};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Writes the network as a Verilog module with default generated-name
/// affixes (`__port`, `__wire`, `__U`).
pub fn write_verilog<W: Write>(net: &Network, sink: W) -> Result<()> {
    write_verilog_with(net, sink, "__port", "", "__wire", "", "__U", "")
}

/// Writes the network as a Verilog module.
///
/// Primitive and expression nodes become `assign` statements, DFFs and
/// latches become `always` blocks, and cell-bound nodes and DFFs become
/// instances (which requires the network's cell library). TvFunc and Bdd
/// nodes have no Verilog rendition and are refused.
#[allow(clippy::too_many_arguments)]
pub fn write_verilog_with<W: Write>(
    net: &Network,
    mut sink: W,
    port_prefix: &str,
    port_suffix: &str,
    node_prefix: &str,
    node_suffix: &str,
    instance_prefix: &str,
    instance_suffix: &str,
) -> Result<()> {
    if !net.is_concrete() {
        return Err(BnetError::unsupported(
            "Verilog output requires a concrete network (no TvFunc/Bdd nodes)",
        ));
    }
    let needs_library = net.dffs().any(|d| d.is_cell())
        || net.logic_ids().iter().any(|&id| net.node(id).cell_id().is_some());
    if needs_library && net.library().is_none() {
        return Err(BnetError::unsupported(
            "Verilog output of mapped nodes requires a cell library",
        ));
    }

    let names = Names::new(
        net,
        defaulted(port_prefix, "__port"),
        port_suffix,
        defaulted(node_prefix, "__wire"),
        node_suffix,
        defaulted(instance_prefix, "__U"),
        instance_suffix,
    );

    // Module header with named port connections.
    write!(sink, "module {}(", coerce_name(net.name()))?;
    let mut comma = "";
    for port in net.ports() {
        let port_name = &names.port_names[port.id().as_raw() as usize];
        write!(sink, "{comma}")?;
        comma = ", ";
        if port.bit_width() == 1 {
            let bit_name = names.node(port.bit(0));
            if port_name == bit_name {
                write!(sink, "{port_name}")?;
            } else {
                write!(sink, ".{port_name}({bit_name})")?;
            }
        } else {
            write!(sink, ".{port_name}({{")?;
            let mut bit_comma = "";
            for &bit in port.bits() {
                write!(sink, "{bit_comma}{}", names.node(bit))?;
                bit_comma = ", ";
            }
            write!(sink, "}})")?;
        }
    }
    writeln!(sink, ");")?;

    for &id in net.primary_input_ids() {
        writeln!(sink, "  input  {};", names.node(id))?;
    }
    for &id in net.primary_output_ids() {
        writeln!(sink, "  output {};", names.node(id))?;
    }
    writeln!(sink)?;

    for dff in net.dffs() {
        if dff.is_cell() {
            for i in 0..dff.cell_output_num() {
                writeln!(sink, "  wire   {};", names.node(dff.cell_output(i)))?;
            }
        } else {
            writeln!(sink, "  reg    {};", names.node(dff.data_out()))?;
        }
    }
    for &id in net.logic_ids() {
        writeln!(sink, "  wire   {};", names.node(id))?;
    }
    writeln!(sink)?;

    // Outputs that could not take over their source's name.
    for &id in net.primary_output_ids() {
        if let Some(src) = valid_src(net, id) {
            let name = names.node(id);
            let src_name = names.node(src);
            if name != src_name {
                writeln!(sink, "  assign {name} = {src_name};")?;
            }
        }
    }

    for dff in net.dffs() {
        if dff.is_cell() {
            let library = net.library().expect("checked above");
            let cell = library.cell(dff.cell_id().expect("cell flavour"));
            let instance = &names.dff_instances[dff.id().as_raw() as usize];
            write!(sink, "  {} {instance}(", coerce_name(&cell.name))?;
            let mut comma = "";
            for (i, pin) in cell.inputs.iter().enumerate() {
                write!(
                    sink,
                    "{comma}.{}({})",
                    coerce_name(pin),
                    names.node(dff.cell_input(i))
                )?;
                comma = ", ";
            }
            for (i, pin) in cell.outputs.iter().enumerate() {
                write!(
                    sink,
                    "{comma}.{}({})",
                    coerce_name(pin),
                    names.node(dff.cell_output(i))
                )?;
                comma = ", ";
            }
            writeln!(sink, ");")?;
        } else {
            let q = names.node(dff.data_out());
            let d = names.node(dff.data_in());
            let clock = names.node(dff.clock());
            let clear = dff.clear().map(|id| names.node(id));
            let preset = dff.preset().map(|id| names.node(id));
            let edge = if dff.is_dff() { "posedge " } else { "" };
            let assign = if dff.is_dff() { "<=" } else { "=" };

            write!(sink, "  always @ ( {edge}{clock}")?;
            if let Some(clear) = clear {
                write!(sink, " or {edge}{clear}")?;
            }
            if let Some(preset) = preset {
                write!(sink, " or {edge}{preset}")?;
            }
            writeln!(sink, " )")?;
            let mut if_str = "if";
            if let Some(clear) = clear {
                writeln!(sink, "    {if_str} ( {clear} )")?;
                writeln!(sink, "      {q} {assign} 1'b0;")?;
                if_str = "else if";
            }
            if let Some(preset) = preset {
                writeln!(sink, "    {if_str} ( {preset} )")?;
                writeln!(sink, "      {q} {assign} 1'b1;")?;
                if_str = "else if";
            }
            if clear.is_some() || preset.is_some() {
                writeln!(sink, "    else")?;
                writeln!(sink, "      {q} {assign} {d};")?;
            } else {
                writeln!(sink, "    {q} {assign} {d};")?;
            }
        }
    }

    for &id in net.logic_ids() {
        let node = net.node(id);
        let fanin_names: Vec<&str> = node.fanin_ids().iter().map(|&f| names.node(f)).collect();
        if let Some(cell_id) = node.cell_id() {
            let library = net.library().expect("checked above");
            let cell = library.cell(cell_id);
            let instance = &names.node_instances[id.as_raw() as usize - 1];
            write!(sink, "  {} {instance}(", coerce_name(&cell.name))?;
            write!(sink, ".{}({})", coerce_name(&cell.outputs[0]), names.node(id))?;
            for (i, pin) in cell.inputs.iter().enumerate() {
                write!(sink, ", .{}({})", coerce_name(pin), fanin_names[i])?;
            }
            writeln!(sink, ");")?;
        } else {
            write!(sink, "  assign {} = ", names.node(id))?;
            if let Some(prim) = node.primitive_type() {
                write_primitive(&mut sink, prim, &fanin_names)?;
            } else if let Some(eid) = node.expr_id() {
                write_expr(&mut sink, net.expr(eid), &fanin_names)?;
            }
            writeln!(sink, ";")?;
        }
    }

    writeln!(sink, "endmodule")?;
    Ok(())
}

/// Writes the network to a Verilog file.
pub fn write_verilog_file(net: &Network, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).map_err(|e| BnetError::io(path, e))?;
    write_verilog(net, std::io::BufWriter::new(file))
}

fn defaulted<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn valid_src(net: &Network, id: NodeId) -> Option<NodeId> {
    net.node(id).output_src().filter(|s| !s.is_null())
}

struct Names {
    port_names: Vec<String>,
    node_names: Vec<String>,
    node_instances: Vec<String>,
    dff_instances: Vec<String>,
}

impl Names {
    #[allow(clippy::too_many_arguments)]
    fn new(
        net: &Network,
        port_prefix: &str,
        port_suffix: &str,
        node_prefix: &str,
        node_suffix: &str,
        instance_prefix: &str,
        instance_suffix: &str,
    ) -> Self {
        // Port names: originals when unique, generated otherwise.
        let mut port_mgr = NameMgr::new(port_prefix, port_suffix);
        let mut port_names = vec![String::new(); net.port_num()];
        let mut taken = HashSet::new();
        for (i, port) in net.ports().enumerate() {
            if port.name().is_empty() {
                continue;
            }
            let name = coerce_name(port.name());
            if taken.insert(name.clone()) {
                port_mgr.add(&name);
                port_names[i] = name;
            }
        }
        for slot in port_names.iter_mut() {
            if slot.is_empty() {
                *slot = port_mgr.new_name();
            }
        }

        // Node names.
        let mut node_mgr = NameMgr::new(node_prefix, node_suffix);
        let mut node_names = vec![String::new(); net.node_num()];
        let mut taken = HashSet::new();
        let mut reg = |id: NodeId, slots: &mut Vec<String>, mgr: &mut NameMgr| {
            let slot = id.as_raw() as usize - 1;
            let name = net.node(id).name();
            if !slots[slot].is_empty() || name.is_empty() {
                return;
            }
            let name = coerce_name(name);
            if taken.insert(name.clone()) {
                mgr.add(&name);
                slots[slot] = name;
            }
        };
        for &id in net.primary_input_ids() {
            reg(id, &mut node_names, &mut node_mgr);
        }
        for dff in net.dffs() {
            if dff.is_cell() {
                for i in 0..dff.cell_output_num() {
                    reg(dff.cell_output(i), &mut node_names, &mut node_mgr);
                }
            } else {
                reg(dff.data_out(), &mut node_names, &mut node_mgr);
            }
        }
        for &id in net.primary_output_ids() {
            reg(id, &mut node_names, &mut node_mgr);
        }
        for &id in net.logic_ids() {
            reg(id, &mut node_names, &mut node_mgr);
        }
        for slot in node_names.iter_mut() {
            if slot.is_empty() {
                *slot = node_mgr.new_name();
            }
        }

        // Instance names for cell-bound nodes and DFFs; node names are
        // off limits.
        let mut instance_mgr = NameMgr::new(instance_prefix, instance_suffix);
        for name in &node_names {
            instance_mgr.add(name);
        }
        let mut node_instances = vec![String::new(); net.node_num()];
        for &id in net.logic_ids() {
            if net.node(id).cell_id().is_some() {
                node_instances[id.as_raw() as usize - 1] = instance_mgr.new_name();
            }
        }
        let mut dff_instances = vec![String::new(); net.dff_num()];
        for (i, dff) in net.dffs().enumerate() {
            if dff.is_cell() {
                dff_instances[i] = instance_mgr.new_name();
            }
        }

        let mut names = Self {
            port_names,
            node_names,
            node_instances,
            dff_instances,
        };

        // Output-side terminals take their drivers' names so always
        // blocks and declarations read naturally. A primary output keeps
        // its own name (and gets an assign) when the source is an input,
        // or when another output already claimed the source's name.
        let mut claimed = HashSet::new();
        for &id in net.primary_output_ids() {
            if let Some(src) = valid_src(net, id) {
                let src_name = names.node_names[src.as_raw() as usize - 1].clone();
                if !net.node(src).is_input() && claimed.insert(src_name.clone()) {
                    names.node_names[id.as_raw() as usize - 1] = src_name;
                }
            }
        }
        for dff in net.dffs() {
            if dff.is_cell() {
                for i in 0..dff.cell_input_num() {
                    names.take_src_name(net, dff.cell_input(i));
                }
            } else {
                names.take_src_name(net, dff.data_in());
                names.take_src_name(net, dff.clock());
                if let Some(clear) = dff.clear() {
                    names.take_src_name(net, clear);
                }
                if let Some(preset) = dff.preset() {
                    names.take_src_name(net, preset);
                }
            }
        }
        names
    }

    /// Renames an output-side terminal to its driver's name.
    fn take_src_name(&mut self, net: &Network, id: NodeId) {
        if let Some(src) = valid_src(net, id) {
            self.node_names[id.as_raw() as usize - 1] =
                self.node_names[src.as_raw() as usize - 1].clone();
        }
    }

    fn node(&self, id: NodeId) -> &str {
        &self.node_names[id.as_raw() as usize - 1]
    }
}

/// Escapes names that are not plain Verilog identifiers.
fn coerce_name(name: &str) -> String {
    let plain = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\\{name} ")
    }
}

fn write_op<W: Write>(sink: &mut W, op: &str, negate: bool, inputs: &[&str]) -> Result<()> {
    if negate {
        write!(sink, "~(")?;
    }
    let mut sep = "";
    for name in inputs {
        write!(sink, "{sep}{name}")?;
        sep = op;
    }
    if negate {
        write!(sink, ")")?;
    }
    Ok(())
}

fn write_primitive<W: Write>(sink: &mut W, prim: PrimType, inputs: &[&str]) -> Result<()> {
    match prim {
        PrimType::C0 => write!(sink, "1'b0")?,
        PrimType::C1 => write!(sink, "1'b1")?,
        PrimType::Buff => write!(sink, "{}", inputs[0])?,
        PrimType::Not => write!(sink, "~{}", inputs[0])?,
        PrimType::And => write_op(sink, " & ", false, inputs)?,
        PrimType::Nand => write_op(sink, " & ", true, inputs)?,
        PrimType::Or => write_op(sink, " | ", false, inputs)?,
        PrimType::Nor => write_op(sink, " | ", true, inputs)?,
        PrimType::Xor => write_op(sink, " ^ ", false, inputs)?,
        PrimType::Xnor => write_op(sink, " ^ ", true, inputs)?,
    }
    Ok(())
}

fn write_expr<W: Write>(sink: &mut W, expr: &Expr, inputs: &[&str]) -> Result<()> {
    match expr {
        Expr::Zero => write!(sink, "1'b0")?,
        Expr::One => write!(sink, "1'b1")?,
        Expr::PosiLiteral(v) => write!(sink, "{}", inputs[*v])?,
        Expr::NegaLiteral(v) => write!(sink, "~{}", inputs[*v])?,
        Expr::And(os) | Expr::Or(os) | Expr::Xor(os) => {
            let op = match expr {
                Expr::And(_) => " & ",
                Expr::Or(_) => " | ",
                _ => " ^ ",
            };
            let mut sep = "";
            for operand in os {
                write!(sink, "{sep}(")?;
                sep = op;
                write_expr(sink, operand, inputs)?;
                write!(sink, ")")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnet_core::{ClearPresetValue, Modifier};

    fn text_of(net: &Network) -> String {
        let mut buf = Vec::new();
        write_verilog(net, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn combinational_module() {
        let mut m = Modifier::new();
        m.set_name("comb");
        let a = m.new_input_port("a").unwrap();
        let b = m.new_input_port("b").unwrap();
        let o = m.new_output_port("f").unwrap();
        let (a, b, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(b).bit(0), net.port(o).bit(0))
        };
        let g = m.new_primitive("", PrimType::Nand, &[a, b]).unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();
        let text = text_of(&net);
        assert!(text.starts_with("module comb("));
        assert!(text.contains("  input  a;"));
        // The output takes the name of its (generated-name) driver, and
        // the module header binds the port to it.
        assert!(text.contains(".f(__wire0)"));
        assert!(text.contains("  output __wire0;"));
        assert!(text.contains("assign __wire0 = ~(a & b);"));
        assert!(text.ends_with("endmodule\n"));
    }

    #[test]
    fn dff_with_clear_uses_async_reset_block() {
        let mut m = Modifier::new();
        m.set_name("seq");
        let clk = m.new_input_port("clk").unwrap();
        let rst = m.new_input_port("rst").unwrap();
        let d = m.new_input_port("d").unwrap();
        let q = m.new_output_port("q").unwrap();
        let (clk, rst, d, q) = {
            let net = m.network();
            (
                net.port(clk).bit(0),
                net.port(rst).bit(0),
                net.port(d).bit(0),
                net.port(q).bit(0),
            )
        };
        let dff = m.new_dff("state", true, false, ClearPresetValue::L);
        let (din, dout, dclk, dclr) = {
            let dff = m.network().dff(dff);
            (dff.data_in(), dff.data_out(), dff.clock(), dff.clear().unwrap())
        };
        m.set_output_src(din, d).unwrap();
        m.set_output_src(dclk, clk).unwrap();
        m.set_output_src(dclr, rst).unwrap();
        m.set_output_src(q, dout).unwrap();
        let net = m.into_network().unwrap();
        let text = text_of(&net);
        // The flop's output node is named "state.output", which needs an
        // escaped identifier; the q port binds straight to it.
        assert!(text.contains("  reg    \\state.output ;"));
        assert!(text.contains("always @ ( posedge clk or posedge rst )"));
        assert!(text.contains("\\state.output  <= 1'b0;"));
        assert!(text.contains("\\state.output  <= d;"));
        assert!(text.contains(".q(\\state.output )"));
    }

    #[test]
    fn escaped_identifiers() {
        let mut m = Modifier::new();
        m.set_name("esc");
        let a = m.new_input_port("a[0]").unwrap();
        let o = m.new_output_port("f").unwrap();
        let (a, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(o).bit(0))
        };
        let g = m.new_primitive("", PrimType::Not, &[a]).unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();
        let text = text_of(&net);
        assert!(text.contains("\\a[0] "));
    }

    #[test]
    fn bdd_nodes_are_refused() {
        use bnet_logic::BddMgr;
        let mut mgr = BddMgr::new();
        let f = mgr.from_truth("01").unwrap();
        let mut m = Modifier::new();
        let a = m.new_input_port("a").unwrap();
        let o = m.new_output_port("f").unwrap();
        let (a, o) = {
            let net = m.network();
            (net.port(a).bit(0), net.port(o).bit(0))
        };
        let g = m.new_bdd("g", f, &mgr, &[a]).unwrap();
        m.set_output_src(o, g).unwrap();
        let net = m.into_network().unwrap();
        assert!(matches!(
            write_verilog(&net, Vec::new()),
            Err(BnetError::Unsupported { .. })
        ));
    }

    #[test]
    fn latch_uses_level_sensitive_block() {
        let mut m = Modifier::new();
        m.set_name("lt");
        let en = m.new_input_port("en").unwrap();
        let d = m.new_input_port("d").unwrap();
        let q = m.new_output_port("q").unwrap();
        let (en, d, q) = {
            let net = m.network();
            (net.port(en).bit(0), net.port(d).bit(0), net.port(q).bit(0))
        };
        let latch = m.new_latch("mem", false, false, ClearPresetValue::L);
        let (din, dout, enable) = {
            let dff = m.network().dff(latch);
            (dff.data_in(), dff.data_out(), dff.clock())
        };
        m.set_output_src(din, d).unwrap();
        m.set_output_src(enable, en).unwrap();
        m.set_output_src(q, dout).unwrap();
        let net = m.into_network().unwrap();
        let text = text_of(&net);
        assert!(text.contains("always @ ( en )"));
        assert!(text.contains("\\mem.output  = d;"));
    }
}
