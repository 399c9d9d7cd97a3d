//! Link Watchdog
//!
//! Derives link health from a per-tick "frame arrived?" signal. Loss is
//! counted in ticks rather than wall-clock time so the threshold keeps its
//! meaning if the tick rate changes.

use crate::config::LOSS_THRESHOLD_TICKS;
use crate::control::pairing::Paired;
use crate::types::LinkState;

/// Link state machine
///
/// ```text
/// Unpaired --on_paired--> Paired --(missed > threshold)--> Lost
///                            ^                              |
///                            +-------- frame arrived -------+
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LinkWatchdog {
    /// Current state
    state: LinkState,
    /// Consecutive ticks without a new frame
    missed_ticks: u32,
    /// Ticks of silence tolerated while paired
    loss_threshold: u32,
}

impl LinkWatchdog {
    /// Create a watchdog with a custom loss threshold
    #[must_use]
    pub const fn new(loss_threshold: u32) -> Self {
        Self {
            state: LinkState::Unpaired,
            missed_ticks: 0,
            loss_threshold,
        }
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Get consecutive missed ticks
    #[must_use]
    pub const fn missed_ticks(&self) -> u32 {
        self.missed_ticks
    }

    /// Get loss threshold in ticks
    #[must_use]
    pub const fn loss_threshold(&self) -> u32 {
        self.loss_threshold
    }

    /// Enter `Paired` after a successful pairing
    ///
    /// Only leaves `Unpaired`; a lost link recovers through frames, not
    /// through pairing again.
    pub fn on_paired(&mut self, _proof: &Paired) {
        if self.state == LinkState::Unpaired {
            self.state = LinkState::Paired;
            self.missed_ticks = 0;
        }
    }

    /// Advance one tick and return the resulting state
    pub fn on_tick(&mut self, frame_arrived: bool) -> LinkState {
        if frame_arrived {
            self.missed_ticks = 0;
            if self.state == LinkState::Lost {
                self.state = LinkState::Paired;
            }
        } else {
            self.missed_ticks = self.missed_ticks.saturating_add(1);
            if self.state == LinkState::Paired && self.missed_ticks > self.loss_threshold {
                self.state = LinkState::Lost;
            }
        }
        self.state
    }
}

impl Default for LinkWatchdog {
    fn default() -> Self {
        Self::new(LOSS_THRESHOLD_TICKS)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkWatchdog {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Watchdog({}, missed={}/{})",
            self.state,
            self.missed_ticks,
            self.loss_threshold
        );
    }
}
