use super::opcode::{OpCode, OpType};
use super::Instruction;
use crate::register::Reg;
use crate::Word;

#[test]
fn decode_extracts_every_field() {
    // I-type ADD R1, R0, 1
    let instruction = Instruction::decode(0x0010_1001);

    assert_eq!(instruction.op_type, OpType::It.value());
    assert_eq!(instruction.op_code, OpCode::Add.value());
    assert_eq!(instruction.rd, Reg::R1);
    assert_eq!(instruction.rm, Reg::R0);
    assert_eq!(instruction.imm, 1);
}

#[test]
fn rn_and_imm_share_their_low_bits() {
    // R-type XOR R2, R3, R4: Rn and the immediate field overlap, so a
    // register in bits 20..24 reads back as both.
    let word = Instruction::rtype(OpCode::Xor, Reg::R2, Reg::R3, Reg::R4).encode();
    let instruction = Instruction::decode(word);

    assert_eq!(instruction.rn, Reg::R4);
    assert_eq!(instruction.imm, Reg::R4.index() as Word);
}

#[test]
fn encode_then_decode_is_identity() {
    let originals = [
        Instruction::rtype(OpCode::Add, Reg::R1, Reg::R2, Reg::R3),
        Instruction::itype(OpCode::Shl, Reg::R12, Reg::R12, 0xFFF),
        Instruction::utype(OpCode::Not, Reg::R5, Reg::R6),
        Instruction::stype(OpCode::Push, Reg::R7),
        Instruction::jtype(OpCode::Syscall, 2),
        Instruction::jtype(OpCode::Jzn, 0x7FF),
    ];

    for original in originals {
        let decoded = Instruction::decode(original.encode());

        assert_eq!(decoded.op_type, original.op_type);
        assert_eq!(decoded.op_code, original.op_code);
        assert_eq!(decoded.rd, original.rd);
        assert_eq!(decoded.rm, original.rm);
        assert_eq!(decoded.imm, original.imm);
    }
}

#[test]
fn decode_of_any_word_roundtrips_through_encode() {
    for word in [0x0000_0000, 0xDEAD_BEEF, 0x7FFF_FFFE, 0x1234_5678] {
        let decoded = Instruction::decode(word);
        assert_eq!(Instruction::decode(decoded.encode()), decoded);
    }
}

#[test]
fn immediate_is_truncated_to_its_field() {
    let word = Instruction::jtype(OpCode::Jmp, 0x1FFF).encode();
    assert_eq!(Instruction::decode(word).imm, 0xFFF);
}

#[test]
fn opcode_wire_values_are_stable() {
    assert_eq!(OpCode::Add.value(), 0);
    assert_eq!(OpCode::Rtr.value(), 10);
    assert_eq!(OpCode::Pop.value(), 15);
    assert_eq!(OpCode::Jmp.value(), 16);
    assert_eq!(OpCode::Syscall.value(), 22);

    assert_eq!(OpCode::from_value(12), Some(OpCode::Ldr));
    assert_eq!(OpCode::from_value(23), None);
    assert_eq!(OpType::from_value(4), Some(OpType::Jt));
    assert_eq!(OpType::from_value(5), None);
}
