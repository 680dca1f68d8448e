//! Parser for the textual program format.
//!
//! A program file interleaves heading lines with body lines. The headings
//! `ds`, `es` and `ts` select a segment-range state whose body lines carry
//! decimal `start end` pairs; `dd` and `td` select the data and text
//! payload states whose body lines carry one decimal word each. Blank
//! lines and lines starting with `;` are skipped. The stack segment is not
//! declared: it takes everything above the highest declared segment.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{ensure, Context};
use libisa::Word;

use crate::segment::{SegmentKind, SegmentRange};

/// A parsed program: payloads for the data and code segments plus the
/// segment layout, ready for [`Emulator::new`](crate::Emulator::new) and
/// the segment loaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub data: Vec<Word>,
    pub instructions: Vec<Word>,
    pub segments: BTreeMap<SegmentKind, SegmentRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    DataSize,
    ExtraSize,
    TextSize,
    DataPayload,
    TextPayload,
}

impl Section {
    fn from_heading(line: &str) -> Option<Self> {
        match line {
            "ds" => Some(Self::DataSize),
            "es" => Some(Self::ExtraSize),
            "ts" => Some(Self::TextSize),
            "dd" => Some(Self::DataPayload),
            "td" => Some(Self::TextPayload),
            _ => None,
        }
    }
}

pub fn load_program_file(path: &Path, memory_size: usize) -> anyhow::Result<Program> {
    let file =
        File::open(path).with_context(|| format!("Opening program file {}", path.display()))?;

    parse_program(BufReader::new(file), memory_size)
        .with_context(|| format!("Parsing program file {}", path.display()))
}

pub fn parse_program(reader: impl BufRead, memory_size: usize) -> anyhow::Result<Program> {
    let mut section = None;
    let mut program = Program {
        data: Vec::new(),
        instructions: Vec::new(),
        segments: BTreeMap::new(),
    };

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("Reading line {}", line_no))?;
        let line = line.trim();

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        if let Some(heading) = Section::from_heading(line) {
            section = Some(heading);
            continue;
        }

        let section =
            section.with_context(|| format!("Line {} appears before any heading", line_no))?;

        parse_body_line(section, line, &mut program)
            .with_context(|| format!("Line {}", line_no))?;
    }

    append_stack_segment(&mut program.segments, memory_size)?;

    Ok(program)
}

fn parse_body_line(section: Section, line: &str, program: &mut Program) -> anyhow::Result<()> {
    match section {
        Section::DataSize => parse_range(line, SegmentKind::Ds, &mut program.segments),
        Section::ExtraSize => parse_range(line, SegmentKind::Es, &mut program.segments),
        Section::TextSize => parse_range(line, SegmentKind::Cs, &mut program.segments),

        Section::DataPayload => {
            program.data.push(parse_word(line)?);
            Ok(())
        }
        Section::TextPayload => {
            program.instructions.push(parse_word(line)?);
            Ok(())
        }
    }
}

fn parse_range(
    line: &str,
    kind: SegmentKind,
    segments: &mut BTreeMap<SegmentKind, SegmentRange>,
) -> anyhow::Result<()> {
    let mut tokens = line.split_whitespace();

    let (start, end) = tokens
        .next()
        .zip(tokens.next())
        .with_context(|| format!("Expected \"start end\" for the {}", kind))?;
    ensure!(
        tokens.next().is_none(),
        "Trailing tokens after the {} range",
        kind
    );

    let start = parse_word(start)?;
    let end = parse_word(end)?;
    ensure!(
        start <= end,
        "{} starts at {}, above its end {}",
        kind,
        start,
        end
    );

    segments.insert(kind, SegmentRange::new(start, end));
    Ok(())
}

fn parse_word(token: &str) -> anyhow::Result<Word> {
    token
        .parse()
        .with_context(|| format!("\"{}\" is not a word value", token))
}

fn append_stack_segment(
    segments: &mut BTreeMap<SegmentKind, SegmentRange>,
    memory_size: usize,
) -> anyhow::Result<()> {
    let highest = segments
        .values()
        .map(|range| range.end)
        .max()
        .context("Program declares no segments")?;

    segments.insert(
        SegmentKind::Ss,
        SegmentRange::new(highest + 1, memory_size as Word - 1),
    );

    Ok(())
}
