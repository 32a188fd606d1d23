//! One-shot startup rendezvous with the interrupt core
//!
//! ```text
//!   secondary (core 1)                primary (core 0)
//!   ── SECONDARY_READY ───────────▶  verify
//!   verify  ◀────────── PRIMARY_CONTINUE ──
//!   enable end-of-frame interrupt
//! ```
//!
//! Each side polls with a bounded budget, so a core that never starts turns
//! into [`HandshakeError::Timeout`] instead of a hang.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::delay::DelayNs;
use platform::HandshakeError;

/// Mark posted by the secondary core once it runs.
pub const SECONDARY_READY: u32 = 0x1234_5678;

/// Mark the primary core answers with.
pub const PRIMARY_CONTINUE: u32 = 0x8765_4321;

/// Delay between polls.
pub const POLL_INTERVAL_US: u32 = 100;

/// Polls before giving up (100 ms at [`POLL_INTERVAL_US`]).
pub const DEFAULT_POLL_BUDGET: u32 = 1_000;

type Mailbox = Channel<CriticalSectionRawMutex, u32, 1>;

/// Two single-slot mailboxes, one per direction.
pub struct Rendezvous {
    to_primary: Mailbox,
    to_secondary: Mailbox,
}

impl Rendezvous {
    /// Empty mailboxes.
    pub const fn new() -> Self {
        Self {
            to_primary: Channel::new(),
            to_secondary: Channel::new(),
        }
    }

    /// Secondary side: announce readiness, then wait for the go-ahead.
    pub fn secondary<D: DelayNs>(&self, delay: &mut D, budget: u32) -> Result<(), HandshakeError> {
        post(&self.to_primary, SECONDARY_READY, delay, budget)?;
        expect(&self.to_secondary, PRIMARY_CONTINUE, delay, budget)
    }

    /// Primary side: wait for readiness, then give the go-ahead.
    pub fn primary<D: DelayNs>(&self, delay: &mut D, budget: u32) -> Result<(), HandshakeError> {
        expect(&self.to_primary, SECONDARY_READY, delay, budget)?;
        post(&self.to_secondary, PRIMARY_CONTINUE, delay, budget)
    }
}

impl Default for Rendezvous {
    fn default() -> Self {
        Self::new()
    }
}

fn post<D: DelayNs>(
    mailbox: &Mailbox,
    mark: u32,
    delay: &mut D,
    budget: u32,
) -> Result<(), HandshakeError> {
    for _ in 0..budget {
        if mailbox.try_send(mark).is_ok() {
            return Ok(());
        }
        delay.delay_us(POLL_INTERVAL_US);
    }
    Err(HandshakeError::Timeout)
}

fn expect<D: DelayNs>(
    mailbox: &Mailbox,
    expected: u32,
    delay: &mut D,
    budget: u32,
) -> Result<(), HandshakeError> {
    for _ in 0..budget {
        if let Ok(received) = mailbox.try_receive() {
            return if received == expected {
                Ok(())
            } else {
                Err(HandshakeError::UnexpectedMark { expected, received })
            };
        }
        delay.delay_us(POLL_INTERVAL_US);
    }
    Err(HandshakeError::Timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn primary_times_out_without_secondary() {
        let rendezvous = Rendezvous::new();
        assert_eq!(
            rendezvous.primary(&mut NoopDelay::new(), 10),
            Err(HandshakeError::Timeout)
        );
    }

    #[test]
    fn primary_rejects_a_wrong_mark() {
        let rendezvous = Rendezvous::new();
        assert!(rendezvous.to_primary.try_send(0xdead_beef).is_ok());
        assert_eq!(
            rendezvous.primary(&mut NoopDelay::new(), 10),
            Err(HandshakeError::UnexpectedMark {
                expected: SECONDARY_READY,
                received: 0xdead_beef,
            })
        );
        // No go-ahead was sent.
        assert!(rendezvous.to_secondary.try_receive().is_err());
    }

    #[test]
    fn secondary_rejects_a_wrong_reply() {
        let rendezvous = Rendezvous::new();
        assert!(rendezvous.to_secondary.try_send(SECONDARY_READY).is_ok());
        assert_eq!(
            rendezvous.secondary(&mut NoopDelay::new(), 10),
            Err(HandshakeError::UnexpectedMark {
                expected: PRIMARY_CONTINUE,
                received: SECONDARY_READY,
            })
        );
    }

    #[test]
    fn secondary_times_out_without_reply() {
        let rendezvous = Rendezvous::new();
        assert_eq!(
            rendezvous.secondary(&mut NoopDelay::new(), 10),
            Err(HandshakeError::Timeout)
        );
        // The ready mark is still waiting for a primary.
        assert_eq!(rendezvous.to_primary.try_receive(), Ok(SECONDARY_READY));
    }
}
