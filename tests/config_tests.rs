//! Configuration Tests
//!
//! Sanity checks on link policy and hardware constants.

use rover_firmware::config::{self, *};
use rover_firmware::types::RadioChannel;

#[test]
fn test_loss_window_is_about_200ms() {
    assert_eq!(u64::from(LOSS_THRESHOLD_TICKS) * LOOP_INTERVAL_MS, 200);
}

#[test]
fn test_pairing_policy() {
    assert_eq!(PAIRING_MAX_ATTEMPTS, 15);
    assert_eq!(PAIRING_RETRY_DELAY_MS, 500);
}

#[test]
fn test_breathing_period_spans_many_ticks() {
    assert_eq!(BREATHING_PERIOD_MS, 2000);
    assert!(BREATHING_PERIOD_MS / LOOP_INTERVAL_MS >= 50);
}

#[test]
fn test_axis_range() {
    assert_eq!(AXIS_CENTER, 128);
    assert_eq!(AXIS_MAX, 255);
    assert_eq!(OUTPUT_MAX, 255);
}

#[test]
fn test_adc_is_12_bit() {
    assert_eq!(ADC_FULL_SCALE, (1 << 12) - 1);
}

#[test]
fn test_default_peer_parses() {
    assert!(rover_firmware::types::PeerAddress::parse(DEFAULT_PEER_MAC).is_ok());
}

#[test]
fn test_build_time_peer_is_valid() {
    // Unset in test builds, or set to a well-formed address
    assert!(config::peer_address().is_ok());
}

#[test]
fn test_build_time_channel_is_valid() {
    match config::radio_channel() {
        RadioChannel::Auto => {}
        RadioChannel::Fixed(ch) => assert!(RadioChannel::is_valid(ch)),
    }
}

#[test]
fn test_motor_pins_are_distinct() {
    let pins = [
        pins::MOTOR1_IN1,
        pins::MOTOR1_IN2,
        pins::MOTOR2_IN3,
        pins::MOTOR2_IN4,
        pins::BUZZER,
        pins::BATTERY_SENSE,
        pins::BRIDGE_TX,
        pins::BRIDGE_RX,
        pins::WARNING_LED,
        pins::LINK_LED,
    ];
    for (i, a) in pins.iter().enumerate() {
        for b in &pins[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn test_output_timers_are_distinct() {
    assert_ne!(timers::MOTOR_PWM, timers::BUZZER_PWM);
    assert_ne!(timers::MOTOR_PWM, timers::LED_PWM);
    assert_ne!(timers::BUZZER_PWM, timers::LED_PWM);
}
