//! AIGER serialisation.

use crate::error::AigError;
use crate::model::AigModel;
use bnet_common::BinEnc;
use std::io::Write;

impl AigModel {
    /// Writes the ASCII `aag` rendition.
    pub fn write_aag<W: Write>(&self, mut sink: W) -> Result<(), AigError> {
        writeln!(
            sink,
            "aag {} {} {} {} {}",
            self.max_var(),
            self.input_num(),
            self.latch_num(),
            self.output_num(),
            self.and_num()
        )?;
        for input in &self.inputs {
            writeln!(sink, "{}", input.literal)?;
        }
        for latch in &self.latches {
            writeln!(sink, "{} {}", latch.literal, latch.src)?;
        }
        for output in &self.outputs {
            writeln!(sink, "{}", output.src)?;
        }
        for and in &self.ands {
            writeln!(sink, "{} {} {}", and.literal, and.src1, and.src2)?;
        }
        self.write_symbols(&mut sink)?;
        Ok(())
    }

    /// Writes the binary `aig` rendition.
    ///
    /// Requires canonical numbering (input `i` = literal `2(i + 1)`,
    /// latches and gates following on) with every AND reading literals
    /// below its own; models built through [`AigModel::with_sizes`] and
    /// [`AigModel::add_and`] satisfy this by construction.
    pub fn write_aig<W: Write>(&self, mut sink: W) -> Result<(), AigError> {
        for (i, input) in self.inputs.iter().enumerate() {
            if input.literal != 2 * (i as u64 + 1) {
                return Err(AigError::format(
                    "binary AIGER requires canonically numbered inputs",
                ));
            }
        }
        let input_num = self.input_num() as u64;
        for (i, latch) in self.latches.iter().enumerate() {
            if latch.literal != 2 * (input_num + i as u64 + 1) {
                return Err(AigError::format(
                    "binary AIGER requires canonically numbered latches",
                ));
            }
        }

        writeln!(
            sink,
            "aig {} {} {} {} {}",
            self.max_var(),
            self.input_num(),
            self.latch_num(),
            self.output_num(),
            self.and_num()
        )?;
        for latch in &self.latches {
            writeln!(sink, "{}", latch.src)?;
        }
        for output in &self.outputs {
            writeln!(sink, "{}", output.src)?;
        }
        let base = input_num + self.latch_num() as u64;
        let mut enc = BinEnc::new(&mut sink);
        for (i, and) in self.ands.iter().enumerate() {
            let lhs = 2 * (base + i as u64 + 1);
            let (src1, src2) = if and.src1 >= and.src2 {
                (and.src1, and.src2)
            } else {
                (and.src2, and.src1)
            };
            if and.literal != lhs || src1 >= lhs {
                return Err(AigError::format(format!(
                    "And#{i} is not in topological, canonical order"
                )));
            }
            enc.write_vint(lhs - src1)?;
            enc.write_vint(src1 - src2)?;
        }
        self.write_symbols(&mut sink)?;
        Ok(())
    }

    fn write_symbols<W: Write>(&self, sink: &mut W) -> Result<(), AigError> {
        for (i, input) in self.inputs.iter().enumerate() {
            if !input.symbol.is_empty() {
                writeln!(sink, "i{i} {}", input.symbol)?;
            }
        }
        for (i, latch) in self.latches.iter().enumerate() {
            if !latch.symbol.is_empty() {
                writeln!(sink, "l{i} {}", latch.symbol)?;
            }
        }
        for (i, output) in self.outputs.iter().enumerate() {
            if !output.symbol.is_empty() {
                writeln!(sink, "o{i} {}", output.symbol)?;
            }
        }
        if !self.comment.is_empty() {
            writeln!(sink, "c")?;
            write!(sink, "{}", self.comment)?;
        }
        Ok(())
    }
}
