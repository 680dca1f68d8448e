use std::io::{self, BufRead, BufReader, Write};

use libisa::{register::Reg, Word};
use thiserror::Error;

use crate::memory::{Memory, MemoryError};
use crate::regfile::RegFile;

#[derive(Debug, Error)]
pub enum SyscallError {
    #[error("unknown syscall number {0}")]
    Unknown(Word),

    #[error("input line of {len} bytes exceeds the requested maximum {max}")]
    InputTooLong { len: usize, max: Word },

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

const WELCOME_BANNER: &str = "\
Welcome, stranger!\n\
\n\
This is the machine speaking. If you can read this, the whole path from\n\
the instruction stream down to the console is alive and well. Poke\n\
around, run some programs, and enjoy the visit.\n\
\n\
Bye!\n";

/// Host routines reachable through `SYSCALL imm`. The table owns the
/// console handles, so programs and tests alike can run against any byte
/// streams.
pub struct SyscallTable {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl SyscallTable {
    /// A table bound to the process console.
    pub fn new() -> Self {
        Self::with_io(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self { input, output }
    }

    pub fn dispatch(
        &mut self,
        number: Word,
        memory: &mut Memory,
        reg_file: &mut RegFile,
    ) -> Result<(), SyscallError> {
        match number {
            0 => self.welcome(),
            1 => self.console_out(memory, reg_file),
            2 => self.console_in(memory, reg_file),
            _ => Err(SyscallError::Unknown(number)),
        }
    }

    fn welcome(&mut self) -> Result<(), SyscallError> {
        self.output.write_all(WELCOME_BANNER.as_bytes())?;
        self.output.flush()?;

        Ok(())
    }

    /// R0 holds the start address and R1 the byte length. Each memory word
    /// carries one byte of text in its low bits.
    fn console_out(&mut self, memory: &Memory, reg_file: &RegFile) -> Result<(), SyscallError> {
        let start = reg_file.gp(Reg::R0);
        let len = reg_file.gp(Reg::R1);

        let mut text = Vec::with_capacity(len as usize);
        for offset in 0..len {
            let word = memory.read(start.wrapping_add(offset))?;
            text.push(word as u8);
        }

        self.output.write_all(&text)?;
        self.output.flush()?;

        Ok(())
    }

    /// Reads one line into memory, one byte per word from R0. The line must
    /// fit the R1 words the caller reserved.
    fn console_in(&mut self, memory: &mut Memory, reg_file: &RegFile) -> Result<(), SyscallError> {
        let start = reg_file.gp(Reg::R0);
        let max = reg_file.gp(Reg::R1);

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let line = line.trim_end_matches(['\n', '\r']);

        if line.len() > max as usize {
            return Err(SyscallError::InputTooLong {
                len: line.len(),
                max,
            });
        }

        for (offset, byte) in line.bytes().enumerate() {
            memory.write(byte.into(), start.wrapping_add(offset as Word))?;
        }

        Ok(())
    }
}

impl Default for SyscallTable {
    fn default() -> Self {
        Self::new()
    }
}
