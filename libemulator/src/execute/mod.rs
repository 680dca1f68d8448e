use libisa::instruction::opcode::OpType;
use libisa::instruction::Instruction;
use libisa::register::Reg;
use libisa::{bits, Word};
use thiserror::Error;

use crate::memory::MemoryError;
use crate::regfile::RegFileError;
use crate::segment::SegmentKind;
use crate::syscall::SyscallError;
use crate::tracer::TraceLevel;
use crate::Emulator;

mod dispatch;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOk {
    Normal,
    Halted,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("PC 0x{0:08x} exceeds the code segment")]
    ExceedsCs(Word),

    #[error("failed to fetch the instruction at 0x{0:08x}")]
    FetchFailed(Word),

    #[error("unknown opcode {op_code} for op type {op_type}")]
    UnknownOpcode { op_type: u8, op_code: u8 },

    #[error("jump-type instruction fell through to the execute stage")]
    FallThrough,

    #[error("push target 0x{0:08x} is outside the stack segment")]
    StackOverflow(Word),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    RegFile(#[from] RegFileError),

    #[error(transparent)]
    Syscall(#[from] SyscallError),
}

impl CoreError {
    fn unknown_opcode(instruction: &Instruction) -> Self {
        Self::UnknownOpcode {
            op_type: instruction.op_type,
            op_code: instruction.op_code,
        }
    }
}

impl<'t> Emulator<'t> {
    /// Runs instructions until the sentinel word ends the program. Every
    /// error is fatal: logged through the tracer, then handed to the
    /// caller.
    pub fn run(&mut self) -> Result<(), CoreError> {
        loop {
            match self.step() {
                Ok(ExecuteOk::Normal) => {}
                Ok(ExecuteOk::Halted) => return Ok(()),

                Err(e) => {
                    self.trace_log(TraceLevel::Error, &e.to_string());
                    return Err(e);
                }
            }
        }
    }

    /// Executes a single instruction.
    pub fn step(&mut self) -> Result<ExecuteOk, CoreError> {
        let binary = self.fetch()?;

        // The sentinel is never decoded.
        if bits::test_bit_all(binary) {
            return Ok(ExecuteOk::Halted);
        }

        let instruction = Instruction::decode(binary);

        if instruction.op_type == OpType::Jt.value() {
            self.jump(&instruction)?;
        } else {
            let result = self.execute_alu(&instruction)?;
            self.memory_access(&instruction, result)?;
        }

        self.emit_trace(binary, &instruction);

        Ok(ExecuteOk::Normal)
    }

    fn fetch(&mut self) -> Result<Word, CoreError> {
        let pc = self.reg_file.gp(Reg::Pc);

        if !self.segments.contains(SegmentKind::Cs, pc) {
            return Err(CoreError::ExceedsCs(pc));
        }

        let binary = self
            .memory
            .read(pc)
            .map_err(|_| CoreError::FetchFailed(pc))?;
        *self.reg_file.gp_mut(Reg::Pc) = pc.wrapping_add(1);

        Ok(binary)
    }

    fn trace_log(&mut self, level: TraceLevel, message: &str) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.log(level, message);
        }
    }

    fn emit_trace(&mut self, binary: Word, instruction: &Instruction) {
        if let Some(tracer) = self.tracer.as_deref_mut() {
            tracer.emit_record(
                binary,
                instruction,
                &self.memory,
                &self.reg_file,
                &self.segments,
            );
        }
    }
}
