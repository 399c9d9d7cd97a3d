//! Hardware Abstraction Layer
//!
//! STM32G474 implementations of the platform capabilities. PWM channels
//! need no wrapper here; embassy's `SimplePwmChannel` already implements
//! `SetDutyCycle` and is used by `drivers` directly.

pub mod adc;
pub mod radio;
