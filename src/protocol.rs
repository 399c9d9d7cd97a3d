//! Communication Protocols
//!
//! Fixed-layout control/telemetry records exchanged with the handheld
//! transmitter, and the serial framing spoken to the radio bridge module.

pub mod bridge;
pub mod frame;
