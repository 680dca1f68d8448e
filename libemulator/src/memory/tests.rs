use super::{Memory, MemoryError};

#[test]
fn write_then_read_roundtrips() {
    let mut memory = Memory::new(8);

    memory.write(0xABCD, 3).expect("Writing in range");

    assert_eq!(memory.read(3), Ok(0xABCD));
}

#[test]
fn out_of_range_accesses_leave_memory_untouched() {
    let mut memory = Memory::new(4);
    memory.write(7, 0).unwrap();

    let expected = MemoryError { addr: 4, size: 4 };
    assert_eq!(memory.read(4), Err(expected));
    assert_eq!(memory.write(1, 4), Err(expected));

    assert_eq!(memory.read(0), Ok(7));
    assert_eq!(memory.read(1), Ok(0));
}

#[test]
fn clear_zeroes_every_cell() {
    let mut memory = Memory::new(4);
    for addr in 0..4 {
        memory.write(0xFF, addr).unwrap();
    }

    memory.clear();

    for addr in 0..4 {
        assert_eq!(memory.read(addr), Ok(0));
    }
}

#[test]
fn clear_range_is_inclusive_and_bounded() {
    let mut memory = Memory::new(8);
    for addr in 0..8 {
        memory.write(1, addr).unwrap();
    }

    memory.clear_range(2, 4).expect("Clearing in range");

    assert_eq!(memory.read(1), Ok(1));
    assert_eq!(memory.read(2), Ok(0));
    assert_eq!(memory.read(4), Ok(0));
    assert_eq!(memory.read(5), Ok(1));

    assert_eq!(
        memory.clear_range(6, 8),
        Err(MemoryError { addr: 8, size: 8 })
    );
    assert_eq!(memory.read(6), Ok(1));
}
