use std::fmt::Display;

use bimap::BiMap;
use lazy_static::lazy_static;

lazy_static! {
    static ref OPCODE_VALUE_BIMAP: BiMap<OpCode, u8> = BiMap::from_iter([
        (OpCode::Add, 0),
        (OpCode::Umul, 1),
        (OpCode::Udiv, 2),
        (OpCode::Umol, 3),
        (OpCode::And, 4),
        (OpCode::Orr, 5),
        (OpCode::Xor, 6),
        (OpCode::Shl, 7),
        (OpCode::Shr, 8),
        (OpCode::Rtl, 9),
        (OpCode::Rtr, 10),
        (OpCode::Not, 11),
        (OpCode::Ldr, 12),
        (OpCode::Str, 13),
        (OpCode::Push, 14),
        (OpCode::Pop, 15),
        (OpCode::Jmp, 16),
        (OpCode::Jz, 17),
        (OpCode::Jn, 18),
        (OpCode::Jc, 19),
        (OpCode::Jv, 20),
        (OpCode::Jzn, 21),
        (OpCode::Syscall, 22),
    ]);
}

/// Format class of an instruction: whether the second operand is a register
/// (R), an immediate (I), absent (U, S), or the instruction only steers the
/// PC (J).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpType {
    Rt,
    It,
    Ut,
    St,
    Jt,
}

impl OpType {
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Rt),
            1 => Some(Self::It),
            2 => Some(Self::Ut),
            3 => Some(Self::St),
            4 => Some(Self::Jt),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

impl Display for OpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Rt => "R type",
            Self::It => "I type",
            Self::Ut => "U type",
            Self::St => "S type",
            Self::Jt => "J type",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Add,
    Umul,
    Udiv,
    Umol,

    And,
    Orr,
    Xor,
    Shl,
    Shr,
    Rtl,
    Rtr,

    Not,

    Ldr,
    Str,

    Push,
    Pop,

    Jmp,
    Jz,
    Jn,
    Jc,
    Jv,
    Jzn,

    Syscall,
}

impl OpCode {
    pub fn from_value(value: u8) -> Option<Self> {
        OPCODE_VALUE_BIMAP.get_by_right(&value).copied()
    }

    pub fn value(&self) -> u8 {
        *OPCODE_VALUE_BIMAP
            .get_by_left(self)
            .expect("No wire value mapping for opcode")
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Add => "ADD",
            Self::Umul => "UMUL",
            Self::Udiv => "UDIV",
            Self::Umol => "UMOL",
            Self::And => "AND",
            Self::Orr => "ORR",
            Self::Xor => "XOR",
            Self::Shl => "SHL",
            Self::Shr => "SHR",
            Self::Rtl => "RTL",
            Self::Rtr => "RTR",
            Self::Not => "NOT",
            Self::Ldr => "LDR",
            Self::Str => "STR",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Jmp => "JMP",
            Self::Jz => "JZ",
            Self::Jn => "JN",
            Self::Jc => "JC",
            Self::Jv => "JV",
            Self::Jzn => "JZN",
            Self::Syscall => "SYSCALL",
        })
    }
}
