//! Caterpillar Rover Firmware Library
//!
//! This library provides the control core for a radio-linked, two-motor
//! caterpillar rover. The rover pairs with a single handheld transmitter over
//! an ESP-NOW radio bridge, watches the link for silence, and turns each
//! control frame into motor, buzzer and indicator outputs. When the link
//! degrades every actuator falls back to a safe stop.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │   ControlLoop (20 ms tick)  │  PairingManager (startup)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     CONTROL CORE                             │
//! │  LinkWatchdog  │  ActuationDispatcher  │  CommandTranslator  │
//! ├─────────────────────────────────────────────────────────────┤
//! │              PROTOCOL / PLATFORM CAPABILITIES                │
//! │  Frame codec  │  Bridge codec  │  Actuators  │  Battery      │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  PWM (H-bridge, buzzer, LEDs)  │  ADC  │  Bridge UART        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: translation, watchdog and
//!   dispatch are pure; only `ControlLoop` touches capabilities
//! - **Type-driven design**: a link can only become `Paired` by presenting
//!   the proof returned from a successful pairing
//! - **No unsafe in application code**: the receive handoff is a
//!   critical-section mailbox
//! - **Nothing is fatal**: every failure degrades to stopped actuators

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module below
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// STM32G474 implementations of the platform capabilities.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral Drivers
///
/// H-bridge motors, buzzer and LEDs over `embedded-hal` PWM channels.
pub mod drivers;

/// Rover Control Logic
///
/// Link watchdog, pairing, command translation, dispatch and the tick loop.
pub mod control;

/// Power Management
///
/// Battery divider conversion and low-battery warning.
pub mod power;

/// Communication Protocols
///
/// Control/telemetry frame layouts and the radio bridge serial codec.
pub mod protocol;

/// Platform capabilities consumed by the control core
pub mod platform;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::pwm::SetDutyCycle;

    // Embassy
    pub use embassy_time::{Duration, Instant, Ticker, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
