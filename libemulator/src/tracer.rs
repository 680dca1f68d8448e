use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use libisa::instruction::opcode::{OpCode, OpType};
use libisa::instruction::Instruction;
use libisa::register::Reg;
use libisa::Word;

use crate::alu::flags::PSR_FLAG_COUNT;
use crate::memory::Memory;
use crate::regfile::RegFile;
use crate::segment::SegmentMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLevel {
    Info,
    Warning,
    Error,
}

impl TraceLevel {
    fn prefix(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

/// Writes leveled log lines and one structured record per executed
/// instruction. Sink failures are swallowed, stream-style; tracing never
/// stops the machine.
pub struct Tracer {
    sink: Box<dyn Write>,
    instruction_count: u32,
}

impl Tracer {
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;

        Ok(Self::with_writer(Box::new(BufWriter::new(file))))
    }

    pub fn with_writer(sink: Box<dyn Write>) -> Self {
        Self {
            sink,
            instruction_count: 0,
        }
    }

    /// Error-level lines flush the sink, as they are the last thing written
    /// before the machine unwinds.
    pub fn log(&mut self, level: TraceLevel, message: &str) {
        let _ = writeln!(self.sink, "{}: {}", level.prefix(), message);

        if level == TraceLevel::Error {
            let _ = self.sink.flush();
        }
    }

    /// One record per executed instruction: the raw word, the decoded
    /// fields, the full register file and PSR, and the contents of every
    /// segment in kind order.
    pub fn emit_record(
        &mut self,
        binary: Word,
        instruction: &Instruction,
        memory: &Memory,
        reg_file: &RegFile,
        segments: &SegmentMap,
    ) {
        let _ = self.write_record(binary, instruction, memory, reg_file, segments);
        self.instruction_count += 1;
    }

    fn write_record(
        &mut self,
        binary: Word,
        instruction: &Instruction,
        memory: &Memory,
        reg_file: &RegFile,
        segments: &SegmentMap,
    ) -> io::Result<()> {
        writeln!(
            self.sink,
            "Instruction #{}, 0x{:08x}",
            self.instruction_count, binary
        )?;

        writeln!(self.sink, "OpType,OpCode,Rd,Rm,Rn,Imm,")?;
        writeln!(
            self.sink,
            "{},{},{},{},{},{}",
            op_type_label(instruction.op_type),
            op_code_label(instruction.op_code),
            instruction.rd,
            instruction.rm,
            instruction.rn,
            instruction.imm,
        )?;

        writeln!(self.sink, "{},", Reg::ALL.iter().join(","))?;
        writeln!(self.sink, "{},", reg_file.registers().iter().join(","))?;

        writeln!(self.sink, "N,Z,C,V,")?;
        let flags = (0..PSR_FLAG_COUNT)
            .map(|flag| (reg_file.psr_value() >> flag) & 1)
            .join(",");
        writeln!(self.sink, "{},", flags)?;

        for (kind, range) in segments.iter() {
            writeln!(self.sink, "{},", kind)?;

            let contents = (range.start..=range.end)
                .map(|addr| memory.read(addr).unwrap_or(0))
                .join(",");
            writeln!(self.sink, "{},", contents)?;
        }

        writeln!(self.sink)?;
        Ok(())
    }
}

fn op_type_label(value: u8) -> String {
    match OpType::from_value(value) {
        Some(op_type) => op_type.to_string(),
        None => format!("type {}", value),
    }
}

fn op_code_label(value: u8) -> String {
    match OpCode::from_value(value) {
        Some(op_code) => op_code.to_string(),
        None => format!("op {}", value),
    }
}
