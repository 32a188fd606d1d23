//! PIO0 pixel state machine
//!
//! The pixel program is a single instruction:
//!
//! ```text
//! .wrap_target
//!     out pins, 8        ; one packed pixel byte per cycle
//! .wrap
//! ```
//!
//! With autopull at 32 bits and a right shift, every word the data channel
//! pushes into the TX FIFO comes out as four consecutive pixel bytes, low
//! byte first. The clock divider sets the pixel clock; joining the RX FIFO
//! into TX gives an 8-word buffer against DMA bus stalls.
//!
//! Instruction words are hand-encoded here so the register batch can be a
//! `const` computation and tested on the host.

#![allow(clippy::arithmetic_side_effects)] // pin and sm indices are masked to their field widths

use crate::clock_config::ClockDivider;
use crate::registers::RegisterWrite;

// ── Register map ────────────────────────────────────────────────────────────

/// PIO0 base address.
pub const PIO0_BASE: u32 = 0x5020_0000;

/// PIO control register (SM_ENABLE, SM_RESTART, CLKDIV_RESTART).
pub const CTRL: u32 = PIO0_BASE;

/// First word of instruction memory.
pub const INSTR_MEM0: u32 = PIO0_BASE | 0x048;

/// Number of instruction memory slots.
pub const INSTR_MEM_SIZE: u8 = 32;

const SM0_CLKDIV: u32 = 0x0c8;
const SM_STRIDE: u32 = 0x18;
const CLKDIV: u32 = 0x00;
const EXECCTRL: u32 = 0x04;
const SHIFTCTRL: u32 = 0x08;
const PINCTRL: u32 = 0x14;
const INSTR: u32 = 0x10;

/// IO_BANK0 base address.
pub const IO_BANK0_BASE: u32 = 0x4001_4000;

/// GPIO function select value for PIO0.
pub const FUNCSEL_PIO0: u32 = 6;

/// GPIO function select value that disconnects the pad (output disabled).
pub const FUNCSEL_NULL: u32 = 0x1f;

/// TX FIFO address of a state machine.
pub const fn txf_address(state_machine: u8) -> u32 {
    PIO0_BASE | (0x010 + 4 * (state_machine as u32 & 0x3))
}

/// Address of a per-state-machine register.
const fn sm_register(state_machine: u8, offset: u32) -> u32 {
    PIO0_BASE | (SM0_CLKDIV + SM_STRIDE * (state_machine as u32 & 0x3) + offset)
}

/// `GPIOn_CTRL` address.
pub const fn gpio_ctrl(pin: u8) -> u32 {
    IO_BANK0_BASE | (0x004 + 8 * (pin as u32 & 0x1f))
}

// ── Instruction encoding ────────────────────────────────────────────────────

/// `out pins, 8`
pub const OUT_PINS_8: u16 = 0x6008;

/// `set pindirs, value` (value is 5 bits)
pub const fn set_pindirs(value: u8) -> u16 {
    0xe080 | (value as u16 & 0x1f)
}

/// `jmp address` (unconditional)
pub const fn jmp(address: u8) -> u16 {
    address as u16 & 0x1f
}

// ── State machine configuration ─────────────────────────────────────────────

const EXEC_WRAP_TOP_SHIFT: u32 = 12;
const EXEC_WRAP_BOTTOM_SHIFT: u32 = 7;
const SHIFT_AUTOPULL: u32 = 1 << 17;
const SHIFT_IN_RIGHT: u32 = 1 << 18;
const SHIFT_OUT_RIGHT: u32 = 1 << 19;
const SHIFT_FJOIN_TX: u32 = 1 << 30;
const PIN_OUT_COUNT_SHIFT: u32 = 20;
const PIN_SET_BASE_SHIFT: u32 = 5;
const PIN_SET_COUNT_SHIFT: u32 = 26;

/// `set pindirs` reaches at most five pins per instruction.
const SET_CHUNK: u8 = 5;

/// The pixel program and where it is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelProgram {
    /// Instruction memory slot of the program.
    pub origin: u8,
}

impl PixelProgram {
    /// Program loaded at slot 0.
    pub const AT_ORIGIN: Self = Self { origin: 0 };

    /// The program text.
    pub const INSTRUCTIONS: [u16; 1] = [OUT_PINS_8];

    /// EXECCTRL value: wrap the single instruction onto itself.
    pub const fn execctrl(&self) -> u32 {
        let slot = self.origin as u32 & 0x1f;
        (slot << EXEC_WRAP_TOP_SHIFT) | (slot << EXEC_WRAP_BOTTOM_SHIFT)
    }

    /// SHIFTCTRL value: autopull at 32 bits, shift right, TX FIFO joined.
    pub const fn shiftctrl() -> u32 {
        // PULL_THRESH = 0 encodes 32.
        SHIFT_AUTOPULL | SHIFT_IN_RIGHT | SHIFT_OUT_RIGHT | SHIFT_FJOIN_TX
    }

    /// PINCTRL value: `count` OUT pins starting at `pin_base`.
    pub const fn pinctrl(pin_base: u8, count: u8) -> u32 {
        (pin_base as u32 & 0x1f) | ((count as u32 & 0x3f) << PIN_OUT_COUNT_SHIFT)
    }

    /// Register batch that loads the program, routes `count` pins from
    /// `pin_base` to PIO0, sets them as outputs and starts `state_machine`.
    pub fn setup_writes(
        &self,
        state_machine: u8,
        pin_base: u8,
        count: u8,
        divider: ClockDivider,
    ) -> heapless::Vec<RegisterWrite, 48> {
        let sm = state_machine & 0x3;
        let mut writes = heapless::Vec::new();
        let mut push = |write| {
            // Capacity covers 8 + 30 pins worth of writes; excess pins are ignored.
            let _ = writes.push(write);
        };

        push(RegisterWrite::clear_bits(CTRL, 1 << sm));
        let mut slot = u32::from(self.origin & 0x1f);
        for instruction in Self::INSTRUCTIONS {
            push(RegisterWrite::new(INSTR_MEM0 + 4 * slot, u32::from(instruction)));
            slot += 1;
        }
        for pin in pin_base..pin_base.saturating_add(count) {
            push(RegisterWrite::new(gpio_ctrl(pin), FUNCSEL_PIO0));
        }
        push(RegisterWrite::new(sm_register(sm, CLKDIV), divider.register_value()));
        push(RegisterWrite::new(sm_register(sm, EXECCTRL), self.execctrl()));
        push(RegisterWrite::new(sm_register(sm, SHIFTCTRL), Self::shiftctrl()));

        // Pin directions are set by executing `set pindirs` with SET_BASE moved
        // across the pins, five at a time.
        let mut pin = pin_base;
        let end = pin_base.saturating_add(count);
        while pin < end {
            let chunk = (end - pin).min(SET_CHUNK);
            let pinctrl = ((u32::from(pin) & 0x1f) << PIN_SET_BASE_SHIFT)
                | (u32::from(chunk) << PIN_SET_COUNT_SHIFT);
            push(RegisterWrite::new(sm_register(sm, PINCTRL), pinctrl));
            let mask = (1u8 << chunk) - 1;
            push(RegisterWrite::new(
                sm_register(sm, INSTR),
                u32::from(set_pindirs(mask)),
            ));
            pin += chunk;
        }

        push(RegisterWrite::new(
            sm_register(sm, PINCTRL),
            Self::pinctrl(pin_base, count),
        ));
        // SM_RESTART and CLKDIV_RESTART, then jump to the program origin.
        push(RegisterWrite::set_bits(CTRL, (1 << (4 + sm)) | (1 << (8 + sm))));
        push(RegisterWrite::new(
            sm_register(sm, INSTR),
            u32::from(jmp(self.origin)),
        ));
        push(RegisterWrite::set_bits(CTRL, 1 << sm));
        writes
    }

    /// Register batch that halts `state_machine` and disconnects `count`
    /// pins from `pin_base`, undoing [`setup_writes`](Self::setup_writes).
    pub fn stop_writes(
        state_machine: u8,
        pin_base: u8,
        count: u8,
    ) -> heapless::Vec<RegisterWrite, 32> {
        let mut writes = heapless::Vec::new();
        // Capacity covers every GPIO; excess pins are ignored.
        let _ = writes.push(RegisterWrite::clear_bits(CTRL, 1 << (state_machine & 0x3)));
        for pin in pin_base..pin_base.saturating_add(count) {
            let _ = writes.push(RegisterWrite::new(gpio_ctrl(pin), FUNCSEL_NULL));
        }
        writes
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
