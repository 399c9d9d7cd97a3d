//! Rover Control Logic
//!
//! Link supervision and command handling for the caterpillar rover.
//! Everything here except `scheduler` is a pure function or a plain state
//! machine; the scheduler is the only code that calls out to capabilities.

pub mod dispatcher;
pub mod mailbox;
pub mod pairing;
pub mod scheduler;
pub mod translator;
pub mod watchdog;
