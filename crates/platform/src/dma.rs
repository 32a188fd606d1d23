//! RP2040 DMA register encoding
//!
//! The scanout uses two channels:
//!
//! ```text
//!  descriptor chain (RAM)          control channel            data channel
//! ┌──────────────┬──────────┐     ┌──────────────────┐      ┌──────────────────┐
//! │ count        │ read_addr│ ──▶ │ 2 words / trigger│ ──▶  │ AL3_TRANS_COUNT  │
//! ├──────────────┼──────────┤     │ write ring 8 B   │      │ AL3_READ_ADDR_TRIG│──▶ PIO0 TXF[sm]
//! │ ...          │ ...      │     └──────────────────┘      └──────────────────┘
//! └──────────────┴──────────┘              ▲                         │ chain_to
//!                                          └─────────────────────────┘
//! ```
//!
//! The control channel copies one [`Descriptor`] into the data channel's
//! alias-3 registers; writing `AL3_READ_ADDR_TRIG` starts the data channel,
//! which chains back to the control channel when its segment is done. The
//! write ring wraps the control channel's destination every 8 bytes so it
//! always lands on the same register pair. A `(0, null)` descriptor is a
//! null trigger: with `IRQ_QUIET` set the data channel raises its interrupt
//! instead of running, which marks the end of the frame.

use crate::pio;
use crate::registers::RegisterWrite;

// ── Register map ────────────────────────────────────────────────────────────

/// DMA controller base address.
pub const DMA_BASE: u32 = 0x5000_0000;

/// Per-channel register offsets (channel block stride is 0x40).
pub mod offset {
    /// Read address (no trigger).
    pub const READ_ADDR: u32 = 0x00;
    /// Write address (no trigger).
    pub const WRITE_ADDR: u32 = 0x04;
    /// Transfer count reload value (no trigger).
    pub const TRANS_COUNT: u32 = 0x08;
    /// Control register, triggering alias.
    pub const CTRL_TRIG: u32 = 0x0c;
    /// Control register, non-triggering alias 1.
    pub const AL1_CTRL: u32 = 0x10;
    /// Transfer count, alias 3 (no trigger).
    pub const AL3_TRANS_COUNT: u32 = 0x38;
    /// Read address, alias 3 (trigger).
    pub const AL3_READ_ADDR_TRIG: u32 = 0x3c;
}

/// Interrupt enable for DMA_IRQ_0.
pub const INTE0: u32 = DMA_BASE | 0x404;
/// Interrupt enable for DMA_IRQ_1.
pub const INTE1: u32 = DMA_BASE | 0x414;
/// Interrupt status for DMA_IRQ_1 (write 1 to clear).
pub const INTS1: u32 = DMA_BASE | 0x41c;
/// Start any set of channels with one store.
pub const MULTI_CHAN_TRIGGER: u32 = DMA_BASE | 0x430;

/// Transfer request that never throttles.
pub const TREQ_PERMANENT: u8 = 0x3f;

/// Address of a per-channel register.
pub const fn channel_register(channel: u8, offset: u32) -> u32 {
    DMA_BASE | ((channel as u32) << 6) | offset
}

/// DREQ number of a PIO0 TX FIFO.
pub const fn pio0_tx_dreq(state_machine: u8) -> u8 {
    state_machine & 0x3
}

// ── CTRL word ───────────────────────────────────────────────────────────────

const EN: u32 = 1 << 0;
const DATA_SIZE_WORD: u32 = 2 << 2;
const INCR_READ: u32 = 1 << 4;
const INCR_WRITE: u32 = 1 << 5;
const RING_SIZE_SHIFT: u32 = 6;
const RING_SEL: u32 = 1 << 10;
const CHAIN_TO_SHIFT: u32 = 11;
const TREQ_SEL_SHIFT: u32 = 15;
const IRQ_QUIET: u32 = 1 << 21;

/// Builder for a channel's `CTRL` register.
///
/// Starts from the same defaults as the SDK's `dma_channel_get_default_config`:
/// enabled, 32-bit, read increment, no write increment, no ring, permanent
/// transfer request, chained to itself (i.e. no chaining). The scanout only
/// moves words, so the transfer size is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelControl {
    read_increment: bool,
    write_increment: bool,
    write_ring: Option<u8>,
    chain_to: u8,
    treq: u8,
    irq_quiet: bool,
}

impl ChannelControl {
    /// Defaults for `channel`.
    pub const fn new(channel: u8) -> Self {
        Self {
            read_increment: true,
            write_increment: false,
            write_ring: None,
            chain_to: channel,
            treq: TREQ_PERMANENT,
            irq_quiet: false,
        }
    }

    /// Increment the read address after each transfer.
    pub const fn read_increment(mut self, on: bool) -> Self {
        self.read_increment = on;
        self
    }

    /// Increment the write address after each transfer.
    pub const fn write_increment(mut self, on: bool) -> Self {
        self.write_increment = on;
        self
    }

    /// Wrap the write address on a `1 << size_bits` byte boundary (1..=15).
    pub const fn write_ring(mut self, size_bits: u8) -> Self {
        self.write_ring = Some(size_bits & 0xf);
        self
    }

    /// Trigger `channel` when this one completes.
    pub const fn chain_to(mut self, channel: u8) -> Self {
        self.chain_to = channel & 0xf;
        self
    }

    /// Pace transfers by data request `dreq`.
    pub const fn dreq(mut self, dreq: u8) -> Self {
        self.treq = dreq & 0x3f;
        self
    }

    /// Raise the interrupt only on a null trigger instead of on every completion.
    pub const fn irq_quiet(mut self, on: bool) -> Self {
        self.irq_quiet = on;
        self
    }

    /// Encoded register value.
    pub const fn bits(self) -> u32 {
        let mut bits = EN | DATA_SIZE_WORD;
        if self.read_increment {
            bits |= INCR_READ;
        }
        if self.write_increment {
            bits |= INCR_WRITE;
        }
        if let Some(size) = self.write_ring {
            bits |= ((size as u32) << RING_SIZE_SHIFT) | RING_SEL;
        }
        bits |= (self.chain_to as u32) << CHAIN_TO_SHIFT;
        bits |= (self.treq as u32) << TREQ_SEL_SHIFT;
        if self.irq_quiet {
            bits |= IRQ_QUIET;
        }
        bits
    }
}

// ── Descriptors ─────────────────────────────────────────────────────────────

/// Number of 32-bit words the control channel copies per descriptor.
pub const DESCRIPTOR_WORDS: u32 = 2;

/// log2 of the control channel's write ring, in bytes (one descriptor).
pub const DESCRIPTOR_RING_BITS: u8 = 3;

/// One entry of the descriptor chain.
///
/// The field order matches the destination register pair: `count` lands in
/// `AL3_TRANS_COUNT`, `read_addr` in `AL3_READ_ADDR_TRIG`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Number of 32-bit transfers.
    pub count: u32,
    /// Source address of the segment.
    pub read_addr: usize,
}

impl Descriptor {
    /// Null trigger that ends the chain.
    pub const TERMINATOR: Self = Self {
        count: 0,
        read_addr: 0,
    };

    /// Segment of `count` words at `read_addr`.
    pub const fn new(read_addr: usize, count: u32) -> Self {
        Self { count, read_addr }
    }

    /// Descriptor streaming all of `words`.
    #[allow(clippy::cast_possible_truncation)] // segments are at most a few hundred words
    pub fn for_words(words: &[u32]) -> Self {
        Self::new(words.as_ptr() as usize, words.len() as u32)
    }

    /// Whether this entry is the chain terminator.
    pub const fn is_terminator(&self) -> bool {
        self.read_addr == 0
    }
}

// ── Scanout channel pair ────────────────────────────────────────────────────

/// The channels and state machine the scanout owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanoutChannels {
    /// Descriptor-copying channel.
    pub control: u8,
    /// Segment-streaming channel.
    pub data: u8,
    /// PIO0 state machine fed by the data channel.
    pub state_machine: u8,
}

impl ScanoutChannels {
    /// Resources named in [`crate::config`].
    pub const DEFAULT: Self = Self {
        control: crate::config::DMA_CONTROL_CHANNEL,
        data: crate::config::DMA_DATA_CHANNEL,
        state_machine: crate::config::PIXEL_STATE_MACHINE,
    };

    /// CTRL word of the control channel.
    pub const fn control_word(&self) -> u32 {
        ChannelControl::new(self.control)
            .read_increment(true)
            .write_increment(true)
            .write_ring(DESCRIPTOR_RING_BITS)
            .bits()
    }

    /// CTRL word of the data channel.
    pub const fn data_word(&self) -> u32 {
        ChannelControl::new(self.data)
            .read_increment(true)
            .write_increment(false)
            .dreq(pio0_tx_dreq(self.state_machine))
            .chain_to(self.control)
            .irq_quiet(true)
            .bits()
    }

    /// Bit of the data channel in the interrupt registers.
    pub const fn data_irq_mask(&self) -> u32 {
        1 << (self.data & 0xf)
    }

    /// Register pair the control channel writes each descriptor into.
    pub const fn descriptor_target(&self) -> u32 {
        channel_register(self.data, offset::AL3_TRANS_COUNT)
    }

    /// Configure both channels without starting them.
    ///
    /// The data channel is moved from DMA_IRQ_0 (owned by embassy-rp's async
    /// DMA driver, whose handler would acknowledge our status bit) to
    /// DMA_IRQ_1.
    #[allow(clippy::cast_possible_truncation)] // addresses are 32-bit on the RP2040
    pub fn setup_writes(&self, chain_addr: usize) -> [RegisterWrite; 11] {
        let control = |offset| channel_register(self.control, offset);
        let data = |offset| channel_register(self.data, offset);
        [
            RegisterWrite::new(control(offset::READ_ADDR), chain_addr as u32),
            RegisterWrite::new(control(offset::WRITE_ADDR), self.descriptor_target()),
            RegisterWrite::new(control(offset::TRANS_COUNT), DESCRIPTOR_WORDS),
            RegisterWrite::new(control(offset::AL1_CTRL), self.control_word()),
            RegisterWrite::new(data(offset::READ_ADDR), 0),
            RegisterWrite::new(data(offset::WRITE_ADDR), pio::txf_address(self.state_machine)),
            RegisterWrite::new(data(offset::TRANS_COUNT), 0),
            RegisterWrite::new(data(offset::AL1_CTRL), self.data_word()),
            RegisterWrite::clear_bits(INTE0, self.data_irq_mask()),
            RegisterWrite::set_bits(INTE1, self.data_irq_mask()),
            RegisterWrite::new(INTS1, self.data_irq_mask()),
        ]
    }

    /// Kick off the control channel.
    pub const fn start_write(&self) -> RegisterWrite {
        RegisterWrite::new(MULTI_CHAN_TRIGGER, 1 << (self.control & 0xf))
    }

    /// Acknowledge the end-of-chain interrupt.
    pub const fn acknowledge_write(&self) -> RegisterWrite {
        RegisterWrite::new(INTS1, self.data_irq_mask())
    }

    /// Point the control channel back at the start of the chain and trigger it.
    #[allow(clippy::cast_possible_truncation)] // addresses are 32-bit on the RP2040
    pub const fn rearm_write(&self, chain_addr: usize) -> RegisterWrite {
        RegisterWrite::new(
            channel_register(self.control, offset::AL3_READ_ADDR_TRIG),
            chain_addr as u32,
        )
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_registers_follow_the_0x40_stride() {
        assert_eq!(channel_register(0, offset::READ_ADDR), 0x5000_0000);
        assert_eq!(channel_register(1, offset::AL3_TRANS_COUNT), 0x5000_0078);
        assert_eq!(channel_register(11, offset::AL3_READ_ADDR_TRIG), 0x5000_02fc);
    }

    #[test]
    fn default_control_matches_sdk_defaults() {
        // EN | DATA_SIZE=word | INCR_READ | CHAIN_TO=self(3) | TREQ=0x3f
        let bits = ChannelControl::new(3).bits();
        assert_eq!(bits, 1 | (2 << 2) | (1 << 4) | (3 << 11) | (0x3f << 15));
    }

    #[test]
    fn scanout_control_word() {
        let channels = ScanoutChannels::DEFAULT;
        // EN, word, read+write increment, write ring of 8 bytes, permanent TREQ.
        assert_eq!(channels.control_word(), 0x001F_84F9);
    }

    #[test]
    fn scanout_data_word() {
        let channels = ScanoutChannels::DEFAULT;
        // EN, word, read increment, chain to channel 0, DREQ PIO0 TX0, IRQ_QUIET.
        assert_eq!(channels.data_word(), 0x0020_0019);
    }

    #[test]
    fn descriptor_target_is_ring_aligned() {
        let target = ScanoutChannels::DEFAULT.descriptor_target();
        let ring_bytes = 1u32 << DESCRIPTOR_RING_BITS;
        assert_eq!(target % ring_bytes, 0, "write ring must start on AL3_TRANS_COUNT");
        assert_eq!(
            target + 4,
            channel_register(DMA_DATA, offset::AL3_READ_ADDR_TRIG),
            "second descriptor word must land on the trigger register"
        );
    }

    const DMA_DATA: u8 = crate::config::DMA_DATA_CHANNEL;

    #[test]
    fn setup_moves_interrupt_to_irq1() {
        let channels = ScanoutChannels::DEFAULT;
        let writes = channels.setup_writes(0x2000_1000);
        assert!(writes.contains(&RegisterWrite::clear_bits(INTE0, 0b10)));
        assert!(writes.contains(&RegisterWrite::set_bits(INTE1, 0b10)));
    }

    #[test]
    fn setup_points_control_channel_at_chain() {
        let writes = ScanoutChannels::DEFAULT.setup_writes(0x2000_1000);
        assert_eq!(writes[0], RegisterWrite::new(0x5000_0000, 0x2000_1000));
        assert_eq!(writes[1], RegisterWrite::new(0x5000_0004, 0x5000_0078));
        assert_eq!(writes[2].value, DESCRIPTOR_WORDS);
    }

    #[test]
    fn rearm_targets_control_trigger() {
        let write = ScanoutChannels::DEFAULT.rearm_write(0x2000_1000);
        assert_eq!(write, RegisterWrite::new(0x5000_003c, 0x2000_1000));
    }

    #[test]
    fn terminator_is_null_trigger() {
        assert!(Descriptor::TERMINATOR.is_terminator());
        assert_eq!(Descriptor::TERMINATOR.count, 0);
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn descriptor_is_two_words_on_target() {
        assert_eq!(core::mem::size_of::<Descriptor>(), 8);
    }
}
