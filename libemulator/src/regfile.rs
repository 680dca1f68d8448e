use libisa::{bits, register::Reg, Word, REGISTER_COUNT};
use thiserror::Error;

use crate::alu::flags::PSR_FLAG_COUNT;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RegFileError {
    #[error("no PSR flag with index {0}")]
    BadFlag(u8),

    #[error(transparent)]
    Bit(#[from] bits::BitError),
}

/// The register file: sixteen general-purpose words plus the PSR flag byte.
/// Everything starts at zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegFile {
    gp: [Word; REGISTER_COUNT],
    psr: u8,
}

impl RegFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gp(&self, reg: Reg) -> Word {
        self.gp[reg.index()]
    }

    pub fn gp_mut(&mut self, reg: Reg) -> &mut Word {
        &mut self.gp[reg.index()]
    }

    pub fn registers(&self) -> &[Word; REGISTER_COUNT] {
        &self.gp
    }

    pub fn program_status(&self, flag: u8) -> Result<bool, RegFileError> {
        Self::check_flag(flag)?;

        Ok(bits::test_bit(self.psr.into(), flag.into())?)
    }

    pub fn set_program_status(&mut self, flag: u8, value: bool) -> Result<(), RegFileError> {
        Self::check_flag(flag)?;

        let psr = Word::from(self.psr);
        let updated = if value {
            bits::set_bit(psr, flag.into())?
        } else {
            bits::reset_bit(psr, flag.into())?
        };

        self.psr = updated as u8;
        Ok(())
    }

    pub fn psr_value(&self) -> u8 {
        self.psr
    }

    pub fn clear_psr(&mut self) {
        self.psr = 0;
    }

    fn check_flag(flag: u8) -> Result<(), RegFileError> {
        if flag < PSR_FLAG_COUNT {
            Ok(())
        } else {
            Err(RegFileError::BadFlag(flag))
        }
    }
}
