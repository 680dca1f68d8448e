use std::fmt::Display;

use thiserror::Error;

use crate::REGISTER_COUNT;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no register with index {0}")]
pub struct InvalidRegister(pub u8);

/// The sixteen general-purpose register names. SP, LR and PC are ordinary
/// slots of the file with conventional roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    R10,
    R11,
    R12,

    Sp,
    Lr,
    Pc,
}

impl Reg {
    pub const ALL: [Reg; REGISTER_COUNT] = [
        Reg::R0,
        Reg::R1,
        Reg::R2,
        Reg::R3,
        Reg::R4,
        Reg::R5,
        Reg::R6,
        Reg::R7,
        Reg::R8,
        Reg::R9,
        Reg::R10,
        Reg::R11,
        Reg::R12,
        Reg::Sp,
        Reg::Lr,
        Reg::Pc,
    ];

    /// Total over the 4-bit register fields of the encoding.
    pub fn from_nibble(bits: u8) -> Reg {
        Self::ALL[usize::from(bits & 0xF)]
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Reg {
    type Error = InvalidRegister;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InvalidRegister(value))
    }
}

impl Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::R0 => "R0",
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::R6 => "R6",
            Self::R7 => "R7",
            Self::R8 => "R8",
            Self::R9 => "R9",
            Self::R10 => "R10",
            Self::R11 => "R11",
            Self::R12 => "R12",
            Self::Sp => "SP",
            Self::Lr => "LR",
            Self::Pc => "PC",
        })
    }
}
