//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the rover hardware.
//! All pin mappings, timing parameters, and link policy are centralized here.

use crate::types::{AddressError, PeerAddress, RadioChannel};

/// Control loop period in milliseconds
pub const LOOP_INTERVAL_MS: u64 = 20;

/// Silent ticks tolerated before the link is declared lost
///
/// 10 ticks at 20 ms is roughly 200 ms of silence.
pub const LOSS_THRESHOLD_TICKS: u32 = 10;

/// Pairing retries after the first failed registration
pub const PAIRING_MAX_ATTEMPTS: u32 = 15;

/// Delay between pairing retries in milliseconds
pub const PAIRING_RETRY_DELAY_MS: u32 = 500;

/// Period of the link-lost breathing indicator in milliseconds
pub const BREATHING_PERIOD_MS: u64 = 2000;

/// Raw axis value meaning "neutral"
pub const AXIS_CENTER: i32 = 128;

/// Largest raw axis value
pub const AXIS_MAX: i32 = 255;

/// Full-scale actuator output (8-bit PWM)
pub const OUTPUT_MAX: u8 = 255;

/// Motor H-bridge PWM frequency
pub const MOTOR_PWM_HZ: u32 = 5_000;

/// Indicator LED PWM frequency
pub const LED_PWM_HZ: u32 = 5_000;

/// Buzzer tone frequency
pub const BUZZER_TONE_HZ: u32 = 1_000;

/// ADC reference voltage in millivolts
pub const ADC_VREF_MV: u32 = 3_300;

/// ADC full-scale count (12-bit)
pub const ADC_FULL_SCALE: u32 = 4_095;

/// Battery divider high-side resistor (ohms)
pub const BATTERY_R1_OHMS: u32 = 10_000;

/// Battery divider low-side resistor (ohms)
pub const BATTERY_R2_OHMS: u32 = 20_000;

/// Battery voltage below which the warning LED is lit
pub const LOW_BATTERY_MV: i32 = 3_300;

/// Radio bridge UART baud rate
pub const BRIDGE_BAUD: u32 = 115_200;

/// Bytes to wait for a bridge reply before giving up on an attempt
pub const BRIDGE_REPLY_BUDGET: usize = 512;

/// Time to wait for a bridge reply before giving up on an attempt
pub const BRIDGE_REPLY_TIMEOUT_MS: u64 = 200;

/// Fallback peer when `ROVER_PEER_MAC` is not set at build time
pub const DEFAULT_PEER_MAC: &str = "FF:FF:FF:FF:FF:FF";

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the rover wiring

    /// Motor 1 H-bridge input 1 (TIM1 CH1)
    pub const MOTOR1_IN1: &str = "PA8";

    /// Motor 1 H-bridge input 2 (TIM1 CH2)
    pub const MOTOR1_IN2: &str = "PA9";

    /// Motor 2 H-bridge input 3 (TIM1 CH3)
    pub const MOTOR2_IN3: &str = "PA10";

    /// Motor 2 H-bridge input 4 (TIM1 CH4)
    pub const MOTOR2_IN4: &str = "PA11";

    /// Piezo buzzer (TIM2 CH1)
    pub const BUZZER: &str = "PA0";

    /// Battery divider tap (ADC1)
    pub const BATTERY_SENSE: &str = "PA1";

    /// Radio bridge UART TX (USART2)
    pub const BRIDGE_TX: &str = "PA2";

    /// Radio bridge UART RX (USART2)
    pub const BRIDGE_RX: &str = "PA3";

    /// White low-battery warning LED (TIM3 CH1)
    pub const WARNING_LED: &str = "PA6";

    /// Blue link indicator LED (TIM3 CH2)
    pub const LINK_LED: &str = "PA7";
}

/// Timer assignments
pub mod timers {
    //! Hardware timer assignments

    /// Motor H-bridge PWM (4 channels)
    pub const MOTOR_PWM: u8 = 1;

    /// Buzzer tone generation
    pub const BUZZER_PWM: u8 = 2;

    /// Indicator LEDs
    pub const LED_PWM: u8 = 3;
}

/// Build-time peer address (`ROVER_PEER_MAC`)
///
/// # Errors
///
/// Returns [`AddressError`] if the configured text is malformed.
pub fn peer_address() -> Result<PeerAddress, AddressError> {
    PeerAddress::parse(option_env!("ROVER_PEER_MAC").unwrap_or(DEFAULT_PEER_MAC))
}

/// Build-time radio channel (`ROVER_RADIO_CHANNEL`), auto when unset or invalid
#[must_use]
pub fn radio_channel() -> RadioChannel {
    option_env!("ROVER_RADIO_CHANNEL")
        .and_then(|text| text.parse::<u8>().ok())
        .and_then(RadioChannel::fixed)
        .unwrap_or(RadioChannel::Auto)
}
