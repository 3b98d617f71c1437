//! bnet CLI: convert and inspect Boolean-network files.
//!
//! Supports the formats of the `bnet_io` crate: BLIF, ISCAS-89 bench,
//! ASCII/binary AIGER, truth-table dumps, the native binary dump, and
//! Verilog output.

#![warn(missing_docs)]

use std::path::PathBuf;
use std::process;

use bnet_common::Result;
use bnet_core::Network;
use bnet_io::Format;
use clap::{Parser, Subcommand};

/// bnet, the Boolean-network file tool.
#[derive(Parser, Debug)]
#[command(name = "bnet", version, about = "Boolean network converter")]
struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a network between file formats.
    Convert {
        /// Input file; the format is inferred from the extension.
        input: PathBuf,

        /// Output file; the format is inferred from the extension.
        output: PathBuf,

        /// Override the input format (blif, bench, aag, aig, truth, bnet).
        #[arg(long)]
        from: Option<String>,

        /// Override the output format (blif, bench, aag, aig, bnet, verilog).
        #[arg(long)]
        to: Option<String>,
    },
    /// Print size statistics of a network.
    Stats {
        /// Input file.
        input: PathBuf,

        /// Override the input format.
        #[arg(long)]
        from: Option<String>,
    },
    /// Print the whole structure in a line-oriented text form.
    Show {
        /// Input file.
        input: PathBuf,

        /// Override the input format.
        #[arg(long)]
        from: Option<String>,
    },
    /// Decompose every expression node into primitive gates.
    Decomp {
        /// Input file.
        input: PathBuf,

        /// Output file.
        output: PathBuf,
    },
    /// Extract the fanin cone of a single output.
    Split {
        /// Input file.
        input: PathBuf,

        /// Output file.
        output: PathBuf,

        /// Output position to extract.
        #[arg(long, default_value_t = 0)]
        output_pos: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("bnet: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            input,
            output,
            from,
            to,
        } => {
            let net = read(&input, from.as_deref())?;
            let format = pick_format(&output, to.as_deref())?;
            format.write(&net, &output)
        }
        Command::Stats { input, from } => {
            let net = read(&input, from.as_deref())?;
            print_stats(&net);
            Ok(())
        }
        Command::Show { input, from } => {
            let net = read(&input, from.as_deref())?;
            print!("{net}");
            Ok(())
        }
        Command::Decomp { input, output } => {
            let net = read(&input, None)?;
            let decomposed = net.simple_decomp()?;
            let format = pick_format(&output, None)?;
            format.write(&decomposed, &output)
        }
        Command::Split {
            input,
            output,
            output_pos,
        } => {
            let net = read(&input, None)?;
            let cone = net.output_split(output_pos)?;
            let format = pick_format(&output, None)?;
            format.write(&cone, &output)
        }
    }
}

fn pick_format(path: &PathBuf, name: Option<&str>) -> Result<Format> {
    if let Some(name) = name {
        return Format::from_name(name).ok_or_else(|| {
            bnet_common::BnetError::domain(format!("unknown format '{name}'"))
        });
    }
    Format::from_path(path).ok_or_else(|| {
        bnet_common::BnetError::domain(format!(
            "cannot infer a format from '{}'",
            path.display()
        ))
    })
}

fn read(path: &PathBuf, from: Option<&str>) -> Result<Network> {
    pick_format(path, from)?.read(path)
}

fn print_stats(net: &Network) {
    println!("name:     {}", net.name());
    println!("ports:    {}", net.port_num());
    println!("inputs:   {}", net.input_num());
    println!("outputs:  {}", net.output_num());
    println!("dffs:     {}", net.dff_num());
    println!("logic:    {}", net.logic_num());
    println!("nodes:    {}", net.node_num());
    println!("exprs:    {}", net.expr_num());
    println!("funcs:    {}", net.func_num());
    println!("concrete: {}", net.is_concrete());
}
