//! Video engine tests against the recording scanout.
//!
//! Run with `cargo test -p pico-vga --test engine`.

// Test files legitimately use arithmetic and indexing for verification.
#![allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use pico_vga::video::{DescriptorChain, FramebufferStore, SlotStore};
use pico_vga::{FrameCounter, SignalGeometry, Sprite, Vga, VgaError, VideoMemory};
use platform::dma_safety::{CHAIN_ENTRIES, FRAMEBUFFER_WORDS, TEMPLATE_WORDS};
use platform::mocks::{MockScanout, ScanoutEvent};
use platform::{Descriptor, HandshakeError};

const VGA: SignalGeometry = SignalGeometry::VGA_320X240;

/// Host-side stand-in for the firmware's static video memory.
struct Memory {
    chain: Vec<Descriptor>,
    templates: Vec<u32>,
    front: Vec<u32>,
    back: Vec<u32>,
}

impl Memory {
    fn new() -> Self {
        Self {
            chain: vec![Descriptor::TERMINATOR; CHAIN_ENTRIES],
            templates: vec![0; TEMPLATE_WORDS],
            front: vec![0xdead_beef; FRAMEBUFFER_WORDS],
            back: vec![0xdead_beef; FRAMEBUFFER_WORDS],
        }
    }

    fn split(&mut self) -> (VideoMemory<'_>, SlotStore<'_, 2>) {
        let mut store = SlotStore::new();
        store.provide(self.front.as_mut_slice()).unwrap();
        store.provide(self.back.as_mut_slice()).unwrap();
        let memory = VideoMemory {
            chain: self.chain.as_mut_slice(),
            templates: self.templates.as_mut_slice(),
        };
        (memory, store)
    }
}

fn start<'a>(
    memory: VideoMemory<'a>,
    store: &mut SlotStore<'a, 2>,
    frames: &'a FrameCounter,
) -> Vga<'a, MockScanout> {
    Vga::initialize(MockScanout::new(), VGA, memory, store, frames, 2).unwrap()
}

fn active_data(vga: &Vga<'_, MockScanout>, row: usize) -> Descriptor {
    let line = VGA.active_start() + row * VGA.line_divisor();
    vga.chain().entries()[DescriptorChain::data_index(line)]
}

#[test]
fn initialization_programs_then_starts() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let vga = start(memory, &mut store, &frames);

    let start_address = vga.chain().start_address();
    assert_eq!(
        vga.hardware().events(),
        &[
            ScanoutEvent::Output {
                pin_base: 2,
                pixel_clock_hz: VGA.pixel_clock_hz(),
            },
            ScanoutEvent::Chain(start_address),
            ScanoutEvent::Irq,
            ScanoutEvent::Start,
        ]
    );
    assert_eq!(vga.chain().len(), 1051);
    assert_eq!(store.available(), 0);
}

#[test]
fn both_buffers_start_black_with_idle_sync() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    {
        let (memory, mut store) = mem.split();
        let _vga = start(memory, &mut store, &frames);
    }
    assert!(mem.front.iter().all(|&w| w == 0xc0c0_c0c0));
    assert!(mem.back.iter().all(|&w| w == 0xc0c0_c0c0));
}

#[test]
fn active_lines_read_the_front_buffer() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let vga = start(memory, &mut store, &frames);

    for row in 0..240 {
        let entry = active_data(&vga, row);
        assert_eq!(entry.count, 80);
        assert_eq!(entry.read_addr, vga.front_address() + row * 80 * 4);
    }
}

#[test]
fn back_buffer_alternates_strictly() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);

    let first = vga.back_address();
    let second = vga.front_address();
    assert_ne!(first, second);
    for i in 0..6 {
        let expected = if i % 2 == 0 { first } else { second };
        assert_eq!(vga.back_address(), expected);
        vga.swap(false);
        // The buffer just drawn is the one being scanned out.
        assert_eq!(vga.front_address(), expected);
        assert_eq!(active_data(&vga, 0).read_addr, expected);
    }
}

#[test]
fn swaps_only_touch_active_data_entries() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);

    let before = vga.chain().entries().to_vec();
    vga.swap(false);
    vga.swap(false);
    vga.swap(false);
    let after = vga.chain().entries();

    let active = VGA.active_start()..VGA.active_start() + 480;
    for (index, (old, new)) in before.iter().zip(after).enumerate() {
        let line = index / 2;
        let is_active_data = index % 2 == 1 && active.contains(&line);
        if !is_active_data {
            assert_eq!(old, new, "entry {index} changed");
        }
    }
    assert!(after.last().unwrap().is_terminator());
}

#[test]
fn clear_and_draw_land_in_the_back_buffer_only() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);

    vga.clear(0x15);
    let block = [0xffff_ffff_u32; 4];
    vga.draw(&Sprite::new(16, 1, 4, &block), 4, 7, false);

    let back = vga.back_buffer();
    assert_eq!(back.pixel(0, 0), Some(0xd5));
    assert_eq!(back.pixel(319, 239), Some(0xd5));
    assert_eq!(back.pixel(4, 7), Some(0xff));
    assert_eq!(back.pixel(19, 7), Some(0xff));
    assert_eq!(back.pixel(20, 7), Some(0xd5));
    drop(back);

    vga.swap(false);
    // The old front buffer is untouched.
    assert_eq!(vga.back_buffer().pixel(4, 7), Some(0xc0));
}

#[test]
fn frame_count_follows_the_interrupt() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let vga = start(memory, &mut store, &frames);

    assert_eq!(vga.frame_count(), 0);
    frames.increment();
    frames.increment();
    assert_eq!(vga.frame_count(), 2);
}

#[test]
fn waiting_swap_returns_after_the_next_frame() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);
    let back = vga.back_address();

    thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(20));
            frames.increment();
        });
        vga.swap(true);
    });

    assert_eq!(frames.now(), 1);
    assert_eq!(vga.front_address(), back);
}

#[test]
fn every_waiting_swap_sees_a_later_frame() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);
    let running = AtomicBool::new(true);
    let mut observed = Vec::new();

    thread::scope(|s| {
        s.spawn(|| {
            while running.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(2));
                frames.increment();
            }
        });

        for _ in 0..10 {
            let back = vga.back_address();
            let before = vga.frame_count();
            vga.swap(true);
            observed.push((before, vga.frame_count(), back, vga.front_address()));
        }
        running.store(false, Ordering::Relaxed);
    });

    let mut previous = 0;
    for (before, after, drawn, shown) in observed {
        assert!(before >= previous, "frame count went backwards");
        assert!(after > before, "swap returned without a new frame");
        assert_eq!(shown, drawn);
        previous = after;
    }
}

#[tokio::test]
async fn async_swap_yields_until_the_next_frame() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut vga = start(memory, &mut store, &frames);
    let back = vga.back_address();

    let interrupt = async {
        tokio::task::yield_now().await;
        frames.increment();
    };
    tokio::join!(vga.swap_async(true), interrupt);

    assert_eq!(vga.front_address(), back);
    assert_eq!(active_data(&vga, 239).read_addr, back + 239 * 80 * 4);
}

#[test]
fn missing_framebuffer_releases_the_one_taken() {
    let frames = FrameCounter::new();
    let mut chain = vec![Descriptor::TERMINATOR; CHAIN_ENTRIES];
    let mut templates = vec![0u32; TEMPLATE_WORDS];
    let mut front = vec![0u32; FRAMEBUFFER_WORDS];
    let mut short = vec![0u32; FRAMEBUFFER_WORDS - 1];
    let mut store: SlotStore<'_, 2> = SlotStore::new();
    store.provide(front.as_mut_slice()).unwrap();
    store.provide(short.as_mut_slice()).unwrap();

    let mut scanout = MockScanout::new();
    let memory = VideoMemory {
        chain: chain.as_mut_slice(),
        templates: templates.as_mut_slice(),
    };
    let result = Vga::initialize(&mut scanout, VGA, memory, &mut store, &frames, 2);

    assert_eq!(result.err(), Some(VgaError::Allocation));
    assert_eq!(store.available(), 2);
    assert!(scanout.events().is_empty());
}

#[test]
fn short_chain_storage_is_an_allocation_error() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    mem.chain.truncate(CHAIN_ENTRIES - 1);
    let (memory, mut store) = mem.split();
    let mut scanout = MockScanout::new();

    let result = Vga::initialize(&mut scanout, VGA, memory, &mut store, &frames, 2);

    assert_eq!(result.err(), Some(VgaError::Allocation));
    assert_eq!(store.available(), 2);
    assert!(!scanout.started());
}

#[test]
fn handshake_failure_never_starts_the_stream() {
    let frames = FrameCounter::new();
    let mut mem = Memory::new();
    let (memory, mut store) = mem.split();
    let mut scanout = MockScanout::failing(HandshakeError::Timeout);

    let result = Vga::initialize(&mut scanout, VGA, memory, &mut store, &frames, 2);

    assert_eq!(
        result.err(),
        Some(VgaError::Coordination(HandshakeError::Timeout))
    );
    assert!(!scanout.started());
    // The state machine was already running; it is halted and the pins let go.
    let events = scanout.events();
    assert_eq!(&events[events.len() - 2..], &[ScanoutEvent::Irq, ScanoutEvent::Stop]);
    // Both buffers are back in the store for another attempt.
    assert_eq!(store.available(), 2);
    assert!(store.acquire(FRAMEBUFFER_WORDS).is_some());
}
