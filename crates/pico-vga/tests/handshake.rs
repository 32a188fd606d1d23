//! Startup rendezvous across two real threads standing in for the cores.

use std::thread;
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::delay::NoopDelay;
use pico_vga::video::handshake::DEFAULT_POLL_BUDGET;
use pico_vga::video::Rendezvous;
use platform::HandshakeError;

/// Delay that actually sleeps, so the budget is wall-clock time.
struct Sleep;

impl DelayNs for Sleep {
    fn delay_ns(&mut self, ns: u32) {
        thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

#[test]
fn both_sides_complete() {
    let rendezvous = Rendezvous::new();
    let (primary, secondary) = thread::scope(|s| {
        let secondary = s.spawn(|| {
            thread::sleep(Duration::from_millis(5));
            rendezvous.secondary(&mut Sleep, DEFAULT_POLL_BUDGET)
        });
        let primary = rendezvous.primary(&mut Sleep, DEFAULT_POLL_BUDGET);
        (primary, secondary.join().unwrap())
    });
    assert_eq!(primary, Ok(()));
    assert_eq!(secondary, Ok(()));
}

#[test]
fn secondary_first_still_completes() {
    let rendezvous = Rendezvous::new();
    thread::scope(|s| {
        let secondary = s.spawn(|| rendezvous.secondary(&mut Sleep, DEFAULT_POLL_BUDGET));
        thread::sleep(Duration::from_millis(5));
        assert_eq!(rendezvous.primary(&mut Sleep, DEFAULT_POLL_BUDGET), Ok(()));
        assert_eq!(secondary.join().unwrap(), Ok(()));
    });
}

#[test]
fn a_core_that_never_starts_is_a_timeout() {
    let rendezvous = Rendezvous::new();
    assert_eq!(
        rendezvous.primary(&mut NoopDelay::new(), DEFAULT_POLL_BUDGET),
        Err(HandshakeError::Timeout)
    );
}

#[test]
fn rendezvous_is_one_shot() {
    let rendezvous = Rendezvous::new();
    thread::scope(|s| {
        let secondary = s.spawn(|| rendezvous.secondary(&mut Sleep, DEFAULT_POLL_BUDGET));
        assert_eq!(rendezvous.primary(&mut Sleep, DEFAULT_POLL_BUDGET), Ok(()));
        assert_eq!(secondary.join().unwrap(), Ok(()));
    });
    // Nothing is left in the mailboxes for a second primary to find.
    assert_eq!(
        rendezvous.primary(&mut NoopDelay::new(), 10),
        Err(HandshakeError::Timeout)
    );
}
