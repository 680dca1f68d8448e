use libisa::{bits, Word, WORD_BITS};

pub mod flags;


use flags::PsrFlags;

/// The micro-operations the ALU implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Umul,
    Udiv,
    Umol,
    Pass,

    And,
    Orr,
    Xor,
    Comp,

    Shl,
    Shr,
    Rtl,
    Rtr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluInput {
    pub op: AluOp,
    pub a: Word,
    pub b: Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub result: Word,
    pub flags: PsrFlags,
}

impl AluOutput {
    fn zeroed() -> Self {
        Self {
            result: 0,
            flags: PsrFlags::empty(),
        }
    }
}

/// Runs one micro-operation. The ALU never fails: divide and modulus by
/// zero produce the zeroed output with no flags set.
pub fn execute(input: AluInput) -> AluOutput {
    let AluInput { op, a, b } = input;

    match op {
        AluOp::Add => add(a, b),
        AluOp::Umul => umul(a, b),
        AluOp::Udiv => udiv(a, b),
        AluOp::Umol => umol(a, b),
        AluOp::Pass => from_result(a),

        AluOp::And => from_result(a & b),
        AluOp::Orr => from_result(a | b),
        AluOp::Xor => from_result(a ^ b),
        AluOp::Comp => from_result(bits::flip_bit_all(a)),

        AluOp::Shl => from_result(shifted(a, b, Word::checked_shl)),
        AluOp::Shr => from_result(shifted(a, b, Word::checked_shr)),
        AluOp::Rtl => from_result(a.rotate_left(b % WORD_BITS)),
        AluOp::Rtr => from_result(a.rotate_right(b % WORD_BITS)),
    }
}

fn msb(value: Word) -> bool {
    value & (1 << (WORD_BITS - 1)) != 0
}

// N and Z come from the result alone, on every operation.
fn result_flags(result: Word) -> PsrFlags {
    let mut flags = PsrFlags::empty();

    if msb(result) {
        flags |= PsrFlags::N;
    }
    if result == 0 {
        flags |= PsrFlags::Z;
    }

    flags
}

fn from_result(result: Word) -> AluOutput {
    AluOutput {
        result,
        flags: result_flags(result),
    }
}

fn add(a: Word, b: Word) -> AluOutput {
    let result = a.wrapping_add(b);
    let mut flags = result_flags(result);

    if result < a && result < b {
        flags |= PsrFlags::C;
    }
    // Equal operand sign bits that differ from the result's sign bit mean
    // the signed interpretation wrapped.
    if msb(a) == msb(b) && msb(a) != msb(result) {
        flags |= PsrFlags::V;
    }

    AluOutput { result, flags }
}

fn umul(a: Word, b: Word) -> AluOutput {
    // Carry and overflow are not detected for multiplication.
    from_result((bits::promote(a) * bits::promote(b)) as Word)
}

fn udiv(a: Word, b: Word) -> AluOutput {
    if bits::test_bit_none(b) {
        return AluOutput::zeroed();
    }

    from_result(a / b)
}

fn umol(a: Word, b: Word) -> AluOutput {
    if bits::test_bit_none(b) {
        return AluOutput::zeroed();
    }

    from_result(a % b)
}

// Logical shifts drain to zero past the word width.
fn shifted(a: Word, b: Word, op: fn(Word, u32) -> Option<Word>) -> Word {
    op(a, b).unwrap_or(0)
}
