//! Reading dense truth-table dumps.
//!
//! One output per line, each line a `2^n`-character string of `0`/`1`
//! over the same `n` inputs, most significant variable last. Every
//! function lands in one BDD node whose fanin list is the input list
//! reversed, which realises the MSB-last convention.

use bnet_common::{BnetError, Result};
use bnet_core::{Modifier, Network, NodeId};
use bnet_logic::BddMgr;
use std::fs;
use std::path::Path;

/// Parses `.truth` text into a network.
pub fn parse_truth(text: &str) -> Result<Network> {
    let mut mgr = BddMgr::new();
    let mut funcs = Vec::new();
    let mut width = None;
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if *width.get_or_insert(line.len()) != line.len() {
            return Err(BnetError::format(format!(
                "line {}: truth table width differs from the first line",
                i + 1
            )));
        }
        let bdd = mgr
            .from_truth(line)
            .map_err(|e| BnetError::format(format!("line {}: {e}", i + 1)))?;
        funcs.push(bdd);
    }

    let mut modifier = Modifier::new();
    if let Some(width) = width {
        let input_num = width.trailing_zeros() as usize;

        let mut input_list = Vec::with_capacity(input_num);
        for i in 0..input_num {
            let port = modifier.new_input_port(&format!("i{i}"))?;
            input_list.push(modifier.network().port(port).bit(0));
        }
        let mut output_list = Vec::with_capacity(funcs.len());
        for i in 0..funcs.len() {
            let port = modifier.new_output_port(&format!("o{i}"))?;
            output_list.push(modifier.network().port(port).bit(0));
        }

        // The file's top variable is the last input.
        let fanins: Vec<NodeId> = input_list.iter().rev().copied().collect();
        for (i, &bdd) in funcs.iter().enumerate() {
            let node = modifier.new_bdd(&format!("l{i}"), bdd, &mgr, &fanins)?;
            modifier.set_output_src(output_list[i], node)?;
        }
    }
    modifier.into_network()
}

/// Reads a `.truth` file into a network.
pub fn read_truth(path: impl AsRef<Path>) -> Result<Network> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| BnetError::io(path, e))?;
    parse_truth(&text)
}
