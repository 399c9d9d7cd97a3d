//! Command Translation
//!
//! Maps a raw slider reading (0-255, 128 neutral) onto a motor speed
//! magnitude. The two halves of the range use different divisors (127 above
//! center, 128 below) to match the transmitter's scale, so 255 and 0 both
//! land exactly on full speed.

use core::cmp::Ordering;

use crate::config::{AXIS_CENTER, AXIS_MAX};
use crate::types::{Direction, MotorDrive};

/// Span of the range above center
const SPAN_ABOVE: i32 = AXIS_MAX - AXIS_CENTER;

/// Span of the range below center
const SPAN_BELOW: i32 = AXIS_CENTER;

/// Translate a raw axis value to a speed magnitude (0-255)
///
/// Out-of-range input is clamped first. Rounding is half away from zero.
#[must_use]
pub fn transform_axis(raw: i32) -> u8 {
    let raw = raw.clamp(0, AXIS_MAX);
    match raw.cmp(&AXIS_CENTER) {
        Ordering::Equal => 0,
        Ordering::Greater => scale(raw - AXIS_CENTER, SPAN_ABOVE),
        Ordering::Less => scale(AXIS_CENTER - raw, SPAN_BELOW),
    }
}

/// Direction implied by a raw axis value
#[must_use]
pub const fn axis_direction(raw: i32) -> Direction {
    if raw >= AXIS_CENTER {
        Direction::Forward
    } else {
        Direction::Reverse
    }
}

/// Full drive command for one axis
#[must_use]
pub fn axis_drive(raw: i32) -> MotorDrive {
    MotorDrive::new(axis_direction(raw), transform_axis(raw))
}

/// `round(diff * 255 / span)` in exact integer arithmetic, saturated to 255
fn scale(diff: i32, span: i32) -> u8 {
    let scaled = (diff * i32::from(u8::MAX) + span / 2) / span;
    u8::try_from(scaled).unwrap_or(u8::MAX)
}
