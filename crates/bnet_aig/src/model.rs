//! The in-memory AIG and its readers.

use crate::error::AigError;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct InputInfo {
    pub literal: u64,
    pub symbol: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct LatchInfo {
    pub literal: u64,
    pub src: u64,
    pub symbol: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct OutputInfo {
    pub src: u64,
    pub symbol: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub(crate) struct AndInfo {
    pub literal: u64,
    pub src1: u64,
    pub src2: u64,
}

/// An and-inverter graph: inputs, latches, outputs, AND gates, symbols,
/// and a free-form comment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AigModel {
    pub(crate) inputs: Vec<InputInfo>,
    pub(crate) latches: Vec<LatchInfo>,
    pub(crate) outputs: Vec<OutputInfo>,
    pub(crate) ands: Vec<AndInfo>,
    pub(crate) comment: String,
}

impl AigModel {
    /// Creates a canonically numbered model: input `i` is literal
    /// `2(i + 1)`, latch `i` is literal `2(I + i + 1)`; sources start
    /// out as constant 0.
    pub fn with_sizes(input_num: usize, latch_num: usize, output_num: usize) -> Self {
        let mut model = Self::default();
        for i in 0..input_num {
            model.inputs.push(InputInfo {
                literal: 2 * (i as u64 + 1),
                symbol: String::new(),
            });
        }
        for i in 0..latch_num {
            model.latches.push(LatchInfo {
                literal: 2 * ((input_num + i) as u64 + 1),
                src: 0,
                symbol: String::new(),
            });
        }
        model.outputs.resize_with(output_num, OutputInfo::default);
        model
    }

    /// Returns the maximum variable index (`M` of the header).
    pub fn max_var(&self) -> u64 {
        let mut max = 0;
        for input in &self.inputs {
            max = max.max(input.literal / 2);
        }
        for latch in &self.latches {
            max = max.max(latch.literal / 2);
        }
        for and in &self.ands {
            max = max.max(and.literal / 2);
        }
        max
    }

    /// Returns the number of inputs (`I`).
    pub fn input_num(&self) -> usize {
        self.inputs.len()
    }

    /// Returns the number of latches (`L`).
    pub fn latch_num(&self) -> usize {
        self.latches.len()
    }

    /// Returns the number of outputs (`O`).
    pub fn output_num(&self) -> usize {
        self.outputs.len()
    }

    /// Returns the number of AND gates (`A`).
    pub fn and_num(&self) -> usize {
        self.ands.len()
    }

    /// Returns the literal of input `pos`.
    pub fn input(&self, pos: usize) -> u64 {
        self.inputs[pos].literal
    }

    /// Returns the literal of latch `pos`.
    pub fn latch(&self, pos: usize) -> u64 {
        self.latches[pos].literal
    }

    /// Returns the source literal of latch `pos`.
    pub fn latch_src(&self, pos: usize) -> u64 {
        self.latches[pos].src
    }

    /// Returns the source literal of output `pos`.
    pub fn output_src(&self, pos: usize) -> u64 {
        self.outputs[pos].src
    }

    /// Returns the left-hand-side literal of AND gate `pos`.
    pub fn and_node(&self, pos: usize) -> u64 {
        self.ands[pos].literal
    }

    /// Returns the first source literal of AND gate `pos`.
    pub fn and_src1(&self, pos: usize) -> u64 {
        self.ands[pos].src1
    }

    /// Returns the second source literal of AND gate `pos`.
    pub fn and_src2(&self, pos: usize) -> u64 {
        self.ands[pos].src2
    }

    /// Returns the symbol of input `pos` (empty when unnamed).
    pub fn input_symbol(&self, pos: usize) -> &str {
        &self.inputs[pos].symbol
    }

    /// Returns the symbol of latch `pos` (empty when unnamed).
    pub fn latch_symbol(&self, pos: usize) -> &str {
        &self.latches[pos].symbol
    }

    /// Returns the symbol of output `pos` (empty when unnamed).
    pub fn output_symbol(&self, pos: usize) -> &str {
        &self.outputs[pos].symbol
    }

    /// Returns the trailing comment (empty when absent).
    pub fn comment(&self) -> &str {
        &self.comment
    }

    //////////////////////////////////////////////////////////////////
    // Builder API.
    //////////////////////////////////////////////////////////////////

    /// Appends an AND gate over two existing literals and returns its
    /// (even) literal. The larger source goes first, as the binary
    /// encoding expects.
    pub fn add_and(&mut self, src1: u64, src2: u64) -> u64 {
        let (src1, src2) = if src1 < src2 { (src2, src1) } else { (src1, src2) };
        let literal = 2 * ((self.inputs.len() + self.latches.len() + self.ands.len()) as u64 + 1);
        self.ands.push(AndInfo {
            literal,
            src1,
            src2,
        });
        literal
    }

    /// Sets the source literal of latch `pos`.
    pub fn set_latch_src(&mut self, pos: usize, src: u64) {
        self.latches[pos].src = src;
    }

    /// Sets the source literal of output `pos`.
    pub fn set_output_src(&mut self, pos: usize, src: u64) {
        self.outputs[pos].src = src;
    }

    /// Sets the symbol of input `pos`.
    pub fn set_input_symbol(&mut self, pos: usize, name: &str) {
        self.inputs[pos].symbol = name.to_string();
    }

    /// Sets the symbol of latch `pos`.
    pub fn set_latch_symbol(&mut self, pos: usize, name: &str) {
        self.latches[pos].symbol = name.to_string();
    }

    /// Sets the symbol of output `pos`.
    pub fn set_output_symbol(&mut self, pos: usize, name: &str) {
        self.outputs[pos].symbol = name.to_string();
    }

    /// Sets the trailing comment.
    pub fn set_comment(&mut self, comment: &str) {
        self.comment = comment.to_string();
    }

    //////////////////////////////////////////////////////////////////
    // Readers.
    //////////////////////////////////////////////////////////////////

    /// Parses the ASCII `aag` format.
    pub fn read_aag<R: Read>(source: R) -> Result<Self, AigError> {
        let mut cursor = Cursor::read_from(source)?;
        let header = Header::parse(&mut cursor, "aag")?;
        let mut model = Self::default();
        model.outputs.resize_with(header.o, OutputInfo::default);

        let mut defined = Defined::new(header.m);

        for i in 0..header.i {
            let line = cursor.next_line_or_eof()?;
            let lit = parse_fields::<1>(line)?[0];
            defined.define(lit, &format!("Input#{i}"))?;
            model.inputs.push(InputInfo {
                literal: lit,
                symbol: String::new(),
            });
        }
        for i in 0..header.l {
            let line = cursor.next_line_or_eof()?;
            let [lit, src] = parse_fields::<2>(line)?;
            defined.define(lit, &format!("Latch#{i}"))?;
            model.latches.push(LatchInfo {
                literal: lit,
                src,
                symbol: String::new(),
            });
        }
        for i in 0..header.o {
            let line = cursor.next_line_or_eof()?;
            model.outputs[i].src = parse_fields::<1>(line)?[0];
        }
        for i in 0..header.a {
            let line = cursor.next_line_or_eof()?;
            let [lit, src1, src2] = parse_fields::<3>(line)?;
            defined.define(lit, &format!("And#{i}"))?;
            model.ands.push(AndInfo { literal: lit, src1, src2 });
        }

        model.check_sources(&defined)?;
        model.read_symbols(&mut cursor)?;
        Ok(model)
    }

    /// Parses the binary `aig` format.
    pub fn read_aig<R: Read>(source: R) -> Result<Self, AigError> {
        let mut cursor = Cursor::read_from(source)?;
        let header = Header::parse(&mut cursor, "aig")?;
        if header.m != (header.i + header.l + header.a) as u64 {
            return Err(AigError::format(format!(
                "header: M = {} but I + L + A = {}",
                header.m,
                header.i + header.l + header.a
            )));
        }

        let mut model = Self::with_sizes(header.i, header.l, header.o);
        let mut defined = Defined::new(header.m);
        for input in &model.inputs {
            defined.mark(input.literal);
        }
        for latch in &model.latches {
            defined.mark(latch.literal);
        }

        for i in 0..header.l {
            let line = cursor.next_line_or_eof()?;
            model.latches[i].src = parse_fields::<1>(line)?[0];
        }
        for i in 0..header.o {
            let line = cursor.next_line_or_eof()?;
            model.outputs[i].src = parse_fields::<1>(line)?[0];
        }
        for i in 0..header.a {
            let delta0 = cursor.read_number()?;
            let delta1 = cursor.read_number()?;
            let lhs = 2 * ((header.i + header.l + i) as u64 + 1);
            let src1 = lhs.checked_sub(delta0).ok_or_else(|| {
                AigError::format(format!("And#{i}: delta {delta0} exceeds literal {lhs}"))
            })?;
            let src2 = src1.checked_sub(delta1).ok_or_else(|| {
                AigError::format(format!("And#{i}: delta {delta1} exceeds literal {src1}"))
            })?;
            defined.mark(lhs);
            model.ands.push(AndInfo {
                literal: lhs,
                src1,
                src2,
            });
        }

        model.check_sources(&defined)?;
        model.read_symbols(&mut cursor)?;
        Ok(model)
    }

    /// Every referenced source must be defined in either polarity.
    fn check_sources(&self, defined: &Defined) -> Result<(), AigError> {
        for (i, latch) in self.latches.iter().enumerate() {
            defined.check(latch.src, &format!("Latch#{i}"))?;
        }
        for (i, output) in self.outputs.iter().enumerate() {
            defined.check(output.src, &format!("Output#{i}"))?;
        }
        for (i, and) in self.ands.iter().enumerate() {
            defined.check(and.src1, &format!("And#{i}"))?;
            defined.check(and.src2, &format!("And#{i}"))?;
        }
        Ok(())
    }

    /// Symbol lines (`i<k> name`, `l<k> name`, `o<k> name`) followed by
    /// an optional comment section started by a lone `c`.
    fn read_symbols(&mut self, cursor: &mut Cursor) -> Result<(), AigError> {
        let mut in_comment = false;
        while let Some(line) = cursor.next_line() {
            if in_comment {
                self.comment.push_str(line);
                self.comment.push('\n');
                continue;
            }
            if line == "c" {
                in_comment = true;
                continue;
            }
            let (tag, name) = line
                .split_once(' ')
                .ok_or_else(|| AigError::format(format!("bad symbol line {line:?}")))?;
            let pos: usize = tag[1..]
                .parse()
                .map_err(|_| AigError::format(format!("bad symbol position in {line:?}")))?;
            let slot = match tag.as_bytes()[0] {
                b'i' => self.inputs.get_mut(pos).map(|e| &mut e.symbol),
                b'l' => self.latches.get_mut(pos).map(|e| &mut e.symbol),
                b'o' => self.outputs.get_mut(pos).map(|e| &mut e.symbol),
                _ => return Err(AigError::format(format!("bad symbol prefix in {line:?}"))),
            };
            match slot {
                Some(slot) => *slot = name.to_string(),
                None => {
                    return Err(AigError::format(format!(
                        "symbol position out of range in {line:?}"
                    )))
                }
            }
        }
        Ok(())
    }
}

/// The five header counts.
struct Header {
    m: u64,
    i: usize,
    l: usize,
    o: usize,
    a: usize,
}

impl Header {
    fn parse(cursor: &mut Cursor, magic: &str) -> Result<Self, AigError> {
        let line = cursor
            .next_line()
            .ok_or_else(|| AigError::format("unexpected EOF before header"))?;
        let mut fields = line.split_whitespace();
        if fields.next() != Some(magic) {
            return Err(AigError::format(format!(
                "{line:?}: illegal header signature, '{magic}' expected"
            )));
        }
        let mut next = |what: &str| -> Result<u64, AigError> {
            fields
                .next()
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| AigError::format(format!("header: bad {what} field")))
        };
        Ok(Self {
            m: next("M")?,
            i: next("I")? as usize,
            l: next("L")? as usize,
            o: next("O")? as usize,
            a: next("A")? as usize,
        })
    }
}

/// Tracks which literals carry a definition. The constants 0 and 1 are
/// always defined.
struct Defined {
    flags: Vec<bool>,
}

impl Defined {
    fn new(max_var: u64) -> Self {
        let mut flags = vec![false; (max_var as usize + 1) * 2];
        flags[0] = true;
        flags[1] = true;
        Self { flags }
    }

    fn mark(&mut self, literal: u64) {
        self.flags[literal as usize] = true;
    }

    /// Defines an even, fresh, in-range literal.
    fn define(&mut self, literal: u64, who: &str) -> Result<(), AigError> {
        if literal % 2 == 1 {
            return Err(AigError::format(format!(
                "{who}: positive literal (even number) expected, got {literal}"
            )));
        }
        if literal as usize >= self.flags.len() {
            return Err(AigError::format(format!(
                "{who}: literal {literal} exceeds the maximum variable index"
            )));
        }
        if self.flags[literal as usize] {
            return Err(AigError::format(format!(
                "{who}: {literal} is already defined"
            )));
        }
        self.flags[literal as usize] = true;
        Ok(())
    }

    /// A source must be defined in either polarity.
    fn check(&self, literal: u64, who: &str) -> Result<(), AigError> {
        let lit = literal as usize;
        if lit >= self.flags.len() {
            return Err(AigError::format(format!(
                "{who}: literal {literal} exceeds the maximum variable index"
            )));
        }
        if !self.flags[lit] && !self.flags[lit ^ 1] {
            return Err(AigError::format(format!(
                "{who}: {literal} is not defined"
            )));
        }
        Ok(())
    }
}

/// Byte cursor mixing line-oriented and raw-byte reads, as the binary
/// format interleaves both.
struct Cursor {
    data: Vec<u8>,
    pos: usize,
}

impl Cursor {
    fn read_from<R: Read>(mut source: R) -> Result<Self, AigError> {
        let mut data = Vec::new();
        source.read_to_end(&mut data)?;
        Ok(Self { data, pos: 0 })
    }

    fn next_line(&mut self) -> Option<&str> {
        if self.pos >= self.data.len() {
            return None;
        }
        let start = self.pos;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.data.len(), |i| start + i);
        self.pos = (end + 1).min(self.data.len());
        std::str::from_utf8(&self.data[start..end]).ok()
    }

    fn next_line_or_eof(&mut self) -> Result<&str, AigError> {
        let pos = self.pos;
        match self.next_line() {
            Some(line) => Ok(line),
            None => Err(AigError::format(format!(
                "unexpected EOF at byte {pos}"
            ))),
        }
    }

    /// Little-endian base-128 number with continuation bits, the same
    /// encoding as the network dump's varints.
    fn read_number(&mut self) -> Result<u64, AigError> {
        let mut value = 0u64;
        let mut weight = 0u32;
        loop {
            if self.pos >= self.data.len() {
                return Err(AigError::format("unexpected EOF in binary AND section"));
            }
            let byte = self.data[self.pos];
            self.pos += 1;
            if weight >= 64 {
                return Err(AigError::format("binary number exceeds 64 bits"));
            }
            value |= u64::from(byte & 0x7f) << weight;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            weight += 7;
        }
    }
}

fn parse_fields<const N: usize>(line: &str) -> Result<[u64; N], AigError> {
    let mut out = [0u64; N];
    let mut fields = line.split_whitespace();
    for slot in &mut out {
        *slot = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| AigError::format(format!("bad line {line:?}")))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_ADDER: &str = "aag 3 2 0 2 1\n2\n4\n6\n7\n6 2 4\n";

    #[test]
    fn read_half_adder() {
        let model = AigModel::read_aag(HALF_ADDER.as_bytes()).unwrap();
        assert_eq!(model.max_var(), 3);
        assert_eq!(model.input_num(), 2);
        assert_eq!(model.latch_num(), 0);
        assert_eq!(model.output_num(), 2);
        assert_eq!(model.and_num(), 1);
        assert_eq!(model.input(0), 2);
        assert_eq!(model.input(1), 4);
        assert_eq!(model.output_src(0), 6);
        assert_eq!(model.output_src(1), 7);
        assert_eq!(model.and_node(0), 6);
        assert_eq!(model.and_src1(0), 2);
        assert_eq!(model.and_src2(0), 4);
    }

    #[test]
    fn read_symbols_and_comment() {
        let text = "aag 1 1 0 1 0\n2\n2\ni0 foo\no0 bar\nc\nhello\nworld\n";
        let model = AigModel::read_aag(text.as_bytes()).unwrap();
        assert_eq!(model.input_symbol(0), "foo");
        assert_eq!(model.output_symbol(0), "bar");
        assert_eq!(model.comment(), "hello\nworld\n");
    }

    #[test]
    fn bad_magic_rejected() {
        let err = AigModel::read_aag(b"agg 0 0 0 0 0\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("'aag' expected"));
        let err = AigModel::read_aig(b"aag 0 0 0 0 0\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("'aig' expected"));
    }

    #[test]
    fn odd_input_literal_rejected() {
        let err = AigModel::read_aag(b"aag 1 1 0 0 0\n3\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("even number"));
    }

    #[test]
    fn duplicate_definition_rejected() {
        let err = AigModel::read_aag(b"aag 2 2 0 0 0\n2\n2\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn undefined_output_rejected() {
        let err = AigModel::read_aag(b"aag 2 1 0 1 0\n2\n4\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("not defined"));
    }

    #[test]
    fn complement_of_defined_is_accepted() {
        let model = AigModel::read_aag(b"aag 1 1 0 1 0\n2\n3\n".as_slice()).unwrap();
        assert_eq!(model.output_src(0), 3);
    }

    #[test]
    fn constant_outputs_are_defined() {
        let model = AigModel::read_aag(b"aag 0 0 0 2 0\n0\n1\n".as_slice()).unwrap();
        assert_eq!(model.output_src(0), 0);
        assert_eq!(model.output_src(1), 1);
    }

    #[test]
    fn truncated_body_rejected() {
        let err = AigModel::read_aag(b"aag 2 2 0 0 0\n2\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("unexpected EOF"));
    }

    #[test]
    fn read_binary_half_adder() {
        // aig 3 2 0 2 1 with AND 6 = 2 & 4: deltas 2 and 2.
        let mut data = b"aig 3 2 0 2 1\n6\n7\n".to_vec();
        data.push(2);
        data.push(2);
        let model = AigModel::read_aig(data.as_slice()).unwrap();
        assert_eq!(model.input(0), 2);
        assert_eq!(model.input(1), 4);
        assert_eq!(model.and_node(0), 6);
        assert_eq!(model.and_src1(0), 4);
        assert_eq!(model.and_src2(0), 2);
        assert_eq!(model.output_src(0), 6);
        assert_eq!(model.output_src(1), 7);
    }

    #[test]
    fn binary_header_count_mismatch_rejected() {
        let err = AigModel::read_aig(b"aig 5 2 0 0 1\n".as_slice()).unwrap_err();
        assert!(err.to_string().contains("M = 5"));
    }

    #[test]
    fn binary_latches() {
        // One input, one latch fed by the input's complement.
        let data = b"aig 2 1 1 1 0\n3\n4\n".to_vec();
        let model = AigModel::read_aig(data.as_slice()).unwrap();
        assert_eq!(model.latch(0), 4);
        assert_eq!(model.latch_src(0), 3);
        assert_eq!(model.output_src(0), 4);
    }

    #[test]
    fn builder_numbers_canonically() {
        let mut model = AigModel::with_sizes(2, 1, 1);
        assert_eq!(model.input(0), 2);
        assert_eq!(model.input(1), 4);
        assert_eq!(model.latch(0), 6);
        let and = model.add_and(2, 4);
        assert_eq!(and, 8);
        assert_eq!(model.and_src1(0), 4);
        model.set_output_src(0, and ^ 1);
        assert_eq!(model.output_src(0), 9);
    }
}
