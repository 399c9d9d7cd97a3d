//! Actuation Dispatch
//!
//! Chooses actuator outputs for one tick from the link state and the most
//! recent control frame. Pure: the same inputs always give the same command.

use crate::config::{BREATHING_PERIOD_MS, OUTPUT_MAX};
use crate::control::translator::axis_drive;
use crate::protocol::frame::ControlFrame;
use crate::types::{ActuatorCommand, LinkState};

/// Compute the actuator command for one tick
///
/// | state    | motors        | buzzer        | indicator |
/// |----------|---------------|---------------|-----------|
/// | Paired   | from axes     | from switch   | 255       |
/// | Lost     | stop          | off           | breathing |
/// | Unpaired | stop          | off           | 0         |
#[must_use]
pub fn dispatch(state: LinkState, frame: &ControlFrame, now_ms: u64) -> ActuatorCommand {
    match state {
        LinkState::Paired => ActuatorCommand {
            motor1: axis_drive(frame.axis1),
            motor2: axis_drive(frame.axis2),
            buzzer: frame.buzzer_pressed(),
            indicator: OUTPUT_MAX,
        },
        LinkState::Lost => ActuatorCommand {
            indicator: breathing_brightness(now_ms),
            ..ActuatorCommand::SAFE
        },
        LinkState::Unpaired => ActuatorCommand::SAFE,
    }
}

// One brightness per millisecond of the period, generated by build.rs
include!(concat!(env!("OUT_DIR"), "/breathing.rs"));

const _: () = assert!(BREATHING_TABLE.len() as u64 == BREATHING_PERIOD_MS);

/// Breathing indicator level at `now_ms`
///
/// A raised sine with a 2 s period: 0 at the start of each period, 255 at
/// the midpoint, read from the build-time table.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn breathing_brightness(now_ms: u64) -> u8 {
    BREATHING_TABLE[(now_ms % BREATHING_PERIOD_MS) as usize]
}
