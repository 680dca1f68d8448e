use libisa::instruction::opcode::{OpCode, OpType};
use libisa::instruction::Instruction;
use libisa::register::Reg;
use libisa::Word;

use crate::alu::flags::PsrFlags;
use crate::alu::{self, AluInput, AluOp};
use crate::segment::SegmentKind;
use crate::Emulator;

use super::CoreError;

impl<'t> Emulator<'t> {
    /// Handles a jump-type instruction: a PC update, or a syscall. Anything
    /// else wearing the jump op type is an encoding mistake.
    pub(super) fn jump(&mut self, instruction: &Instruction) -> Result<(), CoreError> {
        let code = OpCode::from_value(instruction.op_code)
            .ok_or_else(|| CoreError::unknown_opcode(instruction))?;

        let taken = match code {
            OpCode::Jmp => true,
            OpCode::Jz => self.flag(PsrFlags::Z)?,
            OpCode::Jn => self.flag(PsrFlags::N)?,
            OpCode::Jc => self.flag(PsrFlags::C)?,
            OpCode::Jv => self.flag(PsrFlags::V)?,
            OpCode::Jzn => self.flag(PsrFlags::Z)? || self.flag(PsrFlags::N)?,

            OpCode::Syscall => {
                self.syscalls
                    .dispatch(instruction.imm, &mut self.memory, &mut self.reg_file)?;
                false
            }

            _ => return Err(CoreError::unknown_opcode(instruction)),
        };

        if taken {
            *self.reg_file.gp_mut(Reg::Pc) = instruction.imm;
        }

        Ok(())
    }

    pub(super) fn execute_alu(&mut self, instruction: &Instruction) -> Result<Word, CoreError> {
        let output = alu::execute(self.alu_input(instruction)?);
        self.update_psr(output.flags)?;

        Ok(output.result)
    }

    fn alu_input(&self, instruction: &Instruction) -> Result<AluInput, CoreError> {
        let code = OpCode::from_value(instruction.op_code)
            .ok_or_else(|| CoreError::unknown_opcode(instruction))?;

        let sp = self.reg_file.gp(Reg::Sp);

        let input = match code {
            OpCode::Add => self.binary_input(instruction, AluOp::Add)?,
            OpCode::Umul => self.binary_input(instruction, AluOp::Umul)?,
            OpCode::Udiv => self.binary_input(instruction, AluOp::Udiv)?,
            OpCode::Umol => self.binary_input(instruction, AluOp::Umol)?,
            OpCode::And => self.binary_input(instruction, AluOp::And)?,
            OpCode::Orr => self.binary_input(instruction, AluOp::Orr)?,
            OpCode::Xor => self.binary_input(instruction, AluOp::Xor)?,
            OpCode::Shl => self.binary_input(instruction, AluOp::Shl)?,
            OpCode::Shr => self.binary_input(instruction, AluOp::Shr)?,
            OpCode::Rtl => self.binary_input(instruction, AluOp::Rtl)?,
            OpCode::Rtr => self.binary_input(instruction, AluOp::Rtr)?,

            OpCode::Not => AluInput {
                op: AluOp::Comp,
                a: self.reg_file.gp(instruction.rm),
                b: 0,
            },

            // The effective address is the source register passed through.
            OpCode::Ldr | OpCode::Str => AluInput {
                op: AluOp::Pass,
                a: self.reg_file.gp(instruction.rm),
                b: 0,
            },

            OpCode::Push => AluInput {
                op: AluOp::Add,
                a: sp,
                // Two's-complement -1: the slot below SP.
                b: Word::MAX,
            },
            OpCode::Pop => AluInput {
                op: AluOp::Add,
                a: sp,
                b: 1,
            },

            OpCode::Jmp
            | OpCode::Jz
            | OpCode::Jn
            | OpCode::Jc
            | OpCode::Jv
            | OpCode::Jzn
            | OpCode::Syscall => return Err(CoreError::FallThrough),
        };

        Ok(input)
    }

    fn binary_input(&self, instruction: &Instruction, op: AluOp) -> Result<AluInput, CoreError> {
        let op_type = OpType::from_value(instruction.op_type)
            .ok_or_else(|| CoreError::unknown_opcode(instruction))?;

        let a = self.reg_file.gp(instruction.rm);
        let b = match op_type {
            OpType::Rt => self.reg_file.gp(instruction.rn),
            OpType::It => instruction.imm,
            _ => return Err(CoreError::unknown_opcode(instruction)),
        };

        Ok(AluInput { op, a, b })
    }

    // The ALU owns the flag rules; the PSR only mirrors its output.
    fn update_psr(&mut self, flags: PsrFlags) -> Result<(), CoreError> {
        self.reg_file.clear_psr();

        for flag in flags.iter() {
            self.reg_file.set_program_status(flag.index(), true)?;
        }

        Ok(())
    }

    pub(super) fn memory_access(
        &mut self,
        instruction: &Instruction,
        result: Word,
    ) -> Result<(), CoreError> {
        let code = OpCode::from_value(instruction.op_code)
            .ok_or_else(|| CoreError::unknown_opcode(instruction))?;

        match code {
            OpCode::Ldr => {
                let value = self.memory.read(result)?;
                *self.reg_file.gp_mut(instruction.rd) = value;
            }

            OpCode::Str => {
                self.memory.write(self.reg_file.gp(instruction.rd), result)?;
            }

            OpCode::Push => {
                if !self.segments.contains(SegmentKind::Ss, result) {
                    return Err(CoreError::StackOverflow(result));
                }

                self.memory.write(self.reg_file.gp(instruction.rd), result)?;
                *self.reg_file.gp_mut(Reg::Sp) = result;
            }

            OpCode::Pop => {
                // An empty stack leaves the registers untouched.
                if !self
                    .segments
                    .contains(SegmentKind::Ss, result.wrapping_sub(1))
                {
                    return Ok(());
                }

                let value = self.memory.read(self.reg_file.gp(Reg::Sp))?;
                *self.reg_file.gp_mut(instruction.rd) = value;
                *self.reg_file.gp_mut(Reg::Sp) = result;
            }

            _ => {
                *self.reg_file.gp_mut(instruction.rd) = result;
            }
        }

        Ok(())
    }

    fn flag(&self, flag: PsrFlags) -> Result<bool, CoreError> {
        Ok(self.reg_file.program_status(flag.index())?)
    }
}
