//! Architecture tests: source-level rules the firmware relies on.
//!
//! The hardware path cannot run on the host, so these check its source for
//! the properties that would otherwise only show up on a scope.

#![allow(clippy::unwrap_used)]

const BOARD_RS: &str = include_str!("../src/hal/board.rs");
const MAIN_RS: &str = include_str!("../src/main.rs");
const ENGINE_RS: &str = include_str!("../src/video/engine.rs");
const FRAME_RS: &str = include_str!("../src/video/frame.rs");

/// `static mut` is UB as soon as a reference is taken; video memory must go
/// through `ConstStaticCell`.
#[test]
fn no_static_mut_anywhere_in_the_hardware_path() {
    for (name, source) in [("board.rs", BOARD_RS), ("main.rs", MAIN_RS)] {
        assert!(!source.contains("static mut"), "{name} declares a static mut");
    }
    assert!(BOARD_RS.contains("ConstStaticCell<StaticVideo>"));
}

/// embassy-rp owns DMA_IRQ_0 and acknowledges every channel routed to it,
/// which would swallow the end-of-frame interrupt.
#[test]
fn end_of_frame_interrupt_is_dma_irq_1() {
    assert!(BOARD_RS.contains("fn DMA_IRQ_1()"));
    assert!(!BOARD_RS.contains("fn DMA_IRQ_0()"));
}

/// The handler re-arms the chain during vertical sync, so it must never wait
/// on a lock core 0 might hold.
#[test]
fn end_of_frame_handler_never_locks() {
    let handler = BOARD_RS.find("fn DMA_IRQ_1()").unwrap();
    let body = &BOARD_RS[handler..];
    let body = &body[..body.find("\n}\n").unwrap()];
    assert!(!body.contains("critical_section"), "handler takes a critical section");
    assert!(!BOARD_RS.contains("Mutex<"), "interrupt context behind a lock");
    assert!(BOARD_RS.contains("CHAIN_ADDR.load(Ordering::Acquire)"));
}

/// Video memory is checked against the DMA-reachable SRAM window before the
/// engine gets it.
#[test]
fn video_memory_is_placement_checked() {
    let claim = BOARD_RS.find("pub fn claim_video_memory").unwrap();
    let body = &BOARD_RS[claim..];
    let check = body.find("is_scanout_buffer").unwrap();
    let handout = body.find("store.provide").unwrap();
    assert!(check < handout, "buffers handed out before the placement check");
}

/// The stream must not start until the interrupt is in place, or the first
/// end-of-frame would be missed and the chain would stop.
#[test]
fn stream_starts_after_the_interrupt_is_installed() {
    let irq = ENGINE_RS.find("enable_completion_irq()").unwrap();
    let start = ENGINE_RS.find("hardware.start()").unwrap();
    assert!(irq < start);
}

/// Cortex-M0+ has no atomic read-modify-write; the counter must not use one.
#[test]
fn frame_counter_avoids_read_modify_write_atomics() {
    assert!(!FRAME_RS.contains("fetch_add"));
    assert!(FRAME_RS.contains("wrapping_add"));
}

/// The main loop swaps with vsync so presenting never tears.
#[test]
fn main_loop_swaps_on_vsync() {
    assert!(MAIN_RS.contains("swap_async(true)"));
}
