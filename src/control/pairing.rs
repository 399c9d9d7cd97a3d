//! Peer Pairing
//!
//! Registers the remote controller with the local radio, retrying a bounded
//! number of times with a fixed delay between attempts. A successful pairing
//! yields a [`Paired`] proof, which is the only way to move the link watchdog
//! out of `Unpaired`.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::{PAIRING_MAX_ATTEMPTS, PAIRING_RETRY_DELAY_MS};
use crate::platform::{PeerRegistry, RegistrationError};
use crate::types::{PeerAddress, RadioChannel};

/// Channel value asking the radio to use whatever channel it is tuned to
const CURRENT_CHANNEL: u8 = 0;

/// Retry policy for pairing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay between attempts in milliseconds
    pub retry_delay_ms: u32,
}

impl RetryPolicy {
    /// Policy used on the rover
    pub const ROVER: Self = Self {
        max_retries: PAIRING_MAX_ATTEMPTS,
        retry_delay_ms: PAIRING_RETRY_DELAY_MS,
    };

    /// Total registration attempts this policy allows
    #[must_use]
    pub const fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::ROVER
    }
}

/// Proof that a peer was registered with the radio
///
/// Only [`PairingManager`] can construct one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paired {
    peer: PeerAddress,
    channel: u8,
    attempts: u32,
}

impl Paired {
    /// Registered peer
    #[must_use]
    pub const fn peer(&self) -> PeerAddress {
        self.peer
    }

    /// Channel the peer was registered on (0 = radio's current channel)
    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// Attempts it took
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Paired {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Paired({} ch={} after {})",
            self.peer,
            self.channel,
            self.attempts
        );
    }
}

/// Pairing failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingError {
    /// Every attempt failed
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last: RegistrationError,
    },
    /// Configured or reported channel is outside 1-14
    InvalidChannel(u8),
}

impl fmt::Display for PairingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { attempts, last } => {
                write!(f, "pairing failed after {attempts} attempts: {last}")
            }
            Self::InvalidChannel(ch) => write!(f, "invalid radio channel {ch}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PairingError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Exhausted { attempts, last } => {
                defmt::write!(f, "Exhausted({}, last={})", attempts, last);
            }
            Self::InvalidChannel(ch) => defmt::write!(f, "InvalidChannel({})", ch),
        }
    }
}

/// Pairing manager
#[derive(Clone, Copy, Debug, Default)]
pub struct PairingManager {
    /// Retry policy
    policy: RetryPolicy,
    /// Last successful pairing
    paired: Option<Paired>,
}

impl PairingManager {
    /// Create a manager with a custom policy
    #[must_use]
    pub const fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            paired: None,
        }
    }

    /// Get retry policy
    #[must_use]
    pub const fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Last successful pairing, if any
    #[must_use]
    pub const fn paired(&self) -> Option<Paired> {
        self.paired
    }

    /// Register `peer` with the radio
    ///
    /// Pairing the peer that is already paired returns the stored proof
    /// without touching the radio. A radio that reports the peer as already
    /// registered counts as success.
    ///
    /// # Errors
    ///
    /// Returns [`PairingError::InvalidChannel`] for a channel outside 1-14
    /// and [`PairingError::Exhausted`] when every attempt failed.
    pub fn pair<R, D>(
        &mut self,
        registry: &mut R,
        delay: &mut D,
        peer: PeerAddress,
        channel: RadioChannel,
    ) -> Result<Paired, PairingError>
    where
        R: PeerRegistry,
        D: DelayNs,
    {
        if let Some(done) = self.paired.filter(|p| p.peer == peer) {
            debug!("peer {} already paired", peer);
            return Ok(done);
        }

        let channel = Self::resolve_channel(registry, channel)?;
        let total = self.policy.total_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match registry.add_peer(&peer, channel) {
                Ok(()) | Err(RegistrationError::AlreadyRegistered) => {
                    let proof = Paired {
                        peer,
                        channel,
                        attempts: attempt,
                    };
                    info!("paired with {} on channel {}", peer, channel);
                    self.paired = Some(proof);
                    return Ok(proof);
                }
                Err(last) if attempt >= total => {
                    error!("pairing gave up after {} attempts: {}", attempt, last);
                    return Err(PairingError::Exhausted {
                        attempts: attempt,
                        last,
                    });
                }
                Err(e) => {
                    warn!("pairing attempt {}/{} failed: {}", attempt, total, e);
                    delay.delay_ms(self.policy.retry_delay_ms);
                }
            }
        }
    }

    /// Pick the channel to register on
    ///
    /// Auto asks the radio; if it cannot answer, the peer is registered on
    /// whatever channel the radio is tuned to.
    fn resolve_channel<R: PeerRegistry>(
        registry: &mut R,
        channel: RadioChannel,
    ) -> Result<u8, PairingError> {
        let ch = match channel {
            RadioChannel::Fixed(ch) => ch,
            RadioChannel::Auto => match registry.current_channel() {
                Ok(ch) => ch,
                Err(e) => {
                    warn!("channel query failed: {}, using current", e);
                    return Ok(CURRENT_CHANNEL);
                }
            },
        };
        if RadioChannel::is_valid(ch) {
            Ok(ch)
        } else {
            Err(PairingError::InvalidChannel(ch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_counts_first_attempt() {
        assert_eq!(RetryPolicy::ROVER.total_attempts(), 16);
        let none = RetryPolicy {
            max_retries: 0,
            retry_delay_ms: 0,
        };
        assert_eq!(none.total_attempts(), 1);
    }

    #[test]
    fn test_default_manager_unpaired() {
        let mgr = PairingManager::default();
        assert!(mgr.paired().is_none());
        assert_eq!(mgr.policy(), RetryPolicy::ROVER);
    }
}
