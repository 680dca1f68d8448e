pub mod alu;
pub mod loader;
pub mod memory;
pub mod regfile;
pub mod segment;
pub mod syscall;
pub mod tracer;

mod execute;

use std::collections::BTreeMap;

use libisa::{register::Reg, Word};

pub use execute::{CoreError, ExecuteOk};

use memory::Memory;
use regfile::RegFile;
use segment::{SegmentError, SegmentKind, SegmentMap, SegmentRange};
use syscall::SyscallTable;
use tracer::Tracer;

/// The machine: memory, registers and the segment layout, driven by the
/// fetch-decode-execute loop in [`execute`]. The tracer, when present, is
/// borrowed for the machine's whole run.
pub struct Emulator<'t> {
    pub memory: Memory,
    pub reg_file: RegFile,
    pub segments: SegmentMap,

    syscalls: SyscallTable,
    tracer: Option<&'t mut Tracer>,
}

impl<'t> Emulator<'t> {
    /// Validates the segment layout and places SP one past the stack
    /// segment and PC at the bottom of the code segment.
    pub fn new(
        memory_size: usize,
        segment_config: BTreeMap<SegmentKind, SegmentRange>,
        syscalls: SyscallTable,
        tracer: Option<&'t mut Tracer>,
    ) -> Result<Self, SegmentError> {
        let segments = SegmentMap::new(segment_config, memory_size)?;

        let mut reg_file = RegFile::new();
        *reg_file.gp_mut(Reg::Sp) = segments.get(SegmentKind::Ss).end + 1;
        *reg_file.gp_mut(Reg::Pc) = segments.get(SegmentKind::Cs).start;

        Ok(Self {
            memory: Memory::new(memory_size),
            reg_file,
            segments,
            syscalls,
            tracer,
        })
    }

    /// Places the data payload at the bottom of the data segment. Words
    /// past the segment end are dropped.
    pub fn load_data(&mut self, data: &[Word]) {
        self.load_into(SegmentKind::Ds, data);
    }

    /// Places the instruction payload at the bottom of the code segment.
    /// Words past the segment end are dropped.
    pub fn load_program(&mut self, instructions: &[Word]) {
        self.load_into(SegmentKind::Cs, instructions);
    }

    fn load_into(&mut self, kind: SegmentKind, words: &[Word]) {
        let range = self.segments.get(kind);

        for (addr, word) in (range.start..=range.end).zip(words) {
            self.memory
                .write(*word, addr)
                .expect("Segment ranges are validated against the memory size");
        }
    }
}
