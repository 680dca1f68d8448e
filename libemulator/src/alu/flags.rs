use bitflags::bitflags;

bitflags! {
    /// The four program-status flags. Bit positions match the PSR flag
    /// indices, so a flag set converts to the PSR byte without translation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PsrFlags: u8 {
        const N = 1 << 0;
        const Z = 1 << 1;
        const C = 1 << 2;
        const V = 1 << 3;
    }
}

pub const PSR_FLAG_COUNT: u8 = 4;

impl PsrFlags {
    /// Bit index of a single-flag value.
    pub fn index(self) -> u8 {
        self.bits().trailing_zeros() as u8
    }
}
