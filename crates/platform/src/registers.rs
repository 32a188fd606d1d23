//! Register write batches
//!
//! Peripheral setup in this crate is computed as an ordered list of
//! `(address, value)` pairs. The firmware applies a batch with volatile
//! stores; tests apply it to [`crate::mocks::MockRegisters`] and assert on
//! the result. Keeping the math here means every bit position is covered by
//! host tests before it ever reaches the chip.

/// Offset of the atomic bitmask-set alias of an RP2040 peripheral register.
pub const ALIAS_SET: u32 = 0x2000;

/// Offset of the atomic bitmask-clear alias of an RP2040 peripheral register.
pub const ALIAS_CLEAR: u32 = 0x3000;

/// One 32-bit store to a memory-mapped register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterWrite {
    /// Absolute register address.
    pub addr: u32,
    /// Value stored.
    pub value: u32,
}

impl RegisterWrite {
    /// Plain store.
    pub const fn new(addr: u32, value: u32) -> Self {
        Self { addr, value }
    }

    /// Set `mask` bits through the atomic set alias, leaving other bits alone.
    pub const fn set_bits(addr: u32, mask: u32) -> Self {
        Self {
            addr: addr | ALIAS_SET,
            value: mask,
        }
    }

    /// Clear `mask` bits through the atomic clear alias.
    pub const fn clear_bits(addr: u32, mask: u32) -> Self {
        Self {
            addr: addr | ALIAS_CLEAR,
            value: mask,
        }
    }
}

/// Something that can perform register stores.
pub trait RegisterBus {
    /// Perform one store.
    fn write(&mut self, write: RegisterWrite);

    /// Perform a batch of stores in order.
    fn apply(&mut self, writes: &[RegisterWrite]) {
        for write in writes {
            self.write(*write);
        }
    }
}
