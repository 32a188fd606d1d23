//! Pico VGA - Main Entry Point
//!
//! Hardware-only entry point for the Raspberry Pi Pico (RP2040).

#![no_std]
#![no_main]
#![allow(missing_docs)]

use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_time::Instant;
use platform::config;

use pico_vga::demo::{Blinker, FpsCounter, Scene};
use pico_vga::hal::board::{self, PicoScanout, RoscRandom, ScanoutResources};
use pico_vga::{SignalGeometry, TextRenderer, Vga, FONT_6X8};

// Panic handler and log transport
use defmt_rtt as _;
use panic_probe as _;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    defmt::info!("{=str} v{=str}", config::APP_NAME, config::APP_VERSION);
    defmt::info!("{=str}", config::dev_banner());

    let p = embassy_rp::init(Default::default());

    // Status LED lit until the first blink.
    let mut led = Output::new(p.PIN_25, Level::High);
    defmt::info!("status LED on GPIO {=u8}", config::LED_PIN);

    let Some((memory, mut framebuffers)) = board::claim_video_memory() else {
        defmt::error!("video memory already claimed or misplaced");
        park();
    };

    let resources = ScanoutResources {
        pio: p.PIO0,
        control: p.DMA_CH0,
        data: p.DMA_CH1,
    };

    #[cfg(feature = "multicore")]
    let scanout = PicoScanout::new(resources, board::Core1Irq::new(p.CORE1));
    #[cfg(not(feature = "multicore"))]
    let scanout = PicoScanout::new(resources, board::LocalIrq);

    let mut vga = match Vga::initialize(
        scanout,
        SignalGeometry::VGA_320X240,
        memory,
        &mut framebuffers,
        &board::FRAME_COUNTER,
        config::VGA_PIN_BASE,
    ) {
        Ok(vga) => vga,
        Err(err) => {
            defmt::error!("VGA initialization failed: {}", err);
            park();
        }
    };

    let screen = vga.screen();
    let width = i32::try_from(screen.width).unwrap_or(i32::MAX);
    let height = i32::try_from(screen.height).unwrap_or(i32::MAX);
    let mut scene = Scene::new(RoscRandom, width, height);
    let mut text = TextRenderer::new(FONT_6X8);
    let mut fps = FpsCounter::new();
    let mut blinker = Blinker::new();
    let mut last_fps = 0;

    loop {
        if let Some(on) = blinker.tick() {
            led.set_level(Level::from(on));
        }

        scene.step();

        let current = fps.tick(Instant::now().as_millis());
        if current != last_fps {
            defmt::debug!("{=u32} fps", current);
            last_fps = current;
        }

        {
            let mut target = vga.back_buffer();
            scene.render(&mut target, &mut text, current);
        }

        vga.swap_async(true).await;
    }
}

fn park() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
