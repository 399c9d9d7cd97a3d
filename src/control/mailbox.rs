//! Frame Mailbox
//!
//! Single-slot handoff from the radio receive context to the control loop.
//! The receive side overwrites, the loop takes. The whole frame moves inside
//! one critical section, so a reader never sees half of two frames.

use core::cell::Cell;

use critical_section::Mutex;

use crate::protocol::frame::{ControlFrame, FrameError};

#[derive(Clone, Copy)]
struct Slot {
    pending: Option<ControlFrame>,
    rejected: u32,
}

/// Latest-wins mailbox for control frames
pub struct FrameMailbox {
    slot: Mutex<Cell<Slot>>,
}

impl FrameMailbox {
    /// Create an empty mailbox
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot {
                pending: None,
                rejected: 0,
            })),
        }
    }

    /// Decode a received payload and post it
    ///
    /// Payloads of the wrong size are counted and dropped; the pending
    /// frame, if any, is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError`] if the payload is not a control frame.
    pub fn deliver(&self, payload: &[u8]) -> Result<(), FrameError> {
        match ControlFrame::decode(payload) {
            Ok(frame) => {
                self.post(frame);
                Ok(())
            }
            Err(e) => {
                self.update(|slot| slot.rejected = slot.rejected.saturating_add(1));
                debug!("dropped payload: {}", e);
                Err(e)
            }
        }
    }

    /// Post a decoded frame, replacing any frame not yet taken
    pub fn post(&self, frame: ControlFrame) {
        self.update(|slot| slot.pending = Some(frame));
    }

    /// Take the pending frame, if one arrived since the last take
    pub fn take(&self) -> Option<ControlFrame> {
        let mut taken = None;
        self.update(|slot| taken = slot.pending.take());
        taken
    }

    /// Number of payloads dropped for having the wrong size
    #[must_use]
    pub fn rejected(&self) -> u32 {
        critical_section::with(|cs| self.slot.borrow(cs).get().rejected)
    }

    fn update(&self, f: impl FnOnce(&mut Slot)) {
        critical_section::with(|cs| {
            let cell = self.slot.borrow(cs);
            let mut slot = cell.get();
            f(&mut slot);
            cell.set(slot);
        });
    }
}

impl Default for FrameMailbox {
    fn default() -> Self {
        Self::new()
    }
}
