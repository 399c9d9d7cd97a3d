//! Platform Capabilities
//!
//! The control core never touches hardware directly. Everything it needs
//! from the board is expressed as one of these traits, implemented by
//! `drivers`/`hal` on target and by simple fakes in the host tests.

use core::fmt;

use crate::types::{MotorDrive, PeerAddress};

/// Actuator outputs driven once per tick
pub trait Actuators {
    /// Drive motor 1
    fn drive_motor1(&mut self, drive: MotorDrive);

    /// Drive motor 2
    fn drive_motor2(&mut self, drive: MotorDrive);

    /// Switch the buzzer tone on or off
    fn set_buzzer(&mut self, on: bool);

    /// Set link indicator brightness (0-255)
    fn set_link_indicator(&mut self, brightness: u8);

    /// Set low-battery warning LED brightness (0-255)
    fn set_battery_warning(&mut self, brightness: u8);
}

/// Battery voltage source
pub trait BatterySensor {
    /// Read the battery voltage in millivolts
    fn read_millivolts(&mut self) -> i32;
}

/// Outbound radio path
pub trait TelemetryLink {
    /// Send one payload to a peer
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if the radio could not queue the packet.
    fn send(&mut self, peer: &PeerAddress, payload: &[u8]) -> Result<(), SendError>;
}

/// Peer table of the local radio
pub trait PeerRegistry {
    /// Channel the radio is currently tuned to
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if the radio could not be queried.
    fn current_channel(&mut self) -> Result<u8, RegistrationError>;

    /// Register a peer on a channel
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::AlreadyRegistered`] if the peer exists,
    /// or another variant if registration failed.
    fn add_peer(&mut self, peer: &PeerAddress, channel: u8) -> Result<(), RegistrationError>;
}

/// Telemetry transmit failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendError {
    /// Radio or bridge refused the packet
    Radio(u8),
    /// Serial link to the radio failed
    Transport,
    /// Payload does not fit one radio packet
    TooLong(usize),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radio(code) => write!(f, "radio send error {code}"),
            Self::Transport => write!(f, "radio transport error"),
            Self::TooLong(len) => write!(f, "payload of {len} bytes too long"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SendError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Radio(code) => defmt::write!(f, "Radio({})", code),
            Self::Transport => defmt::write!(f, "Transport"),
            Self::TooLong(len) => defmt::write!(f, "TooLong({})", len),
        }
    }
}

/// Peer registration failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    /// Peer already present in the radio's table
    AlreadyRegistered,
    /// Radio rejected the request with an error code
    Rejected(u8),
    /// No usable reply from the radio
    NoReply,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered => write!(f, "peer already registered"),
            Self::Rejected(code) => write!(f, "registration rejected with error {code}"),
            Self::NoReply => write!(f, "no reply from radio"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RegistrationError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::AlreadyRegistered => defmt::write!(f, "AlreadyRegistered"),
            Self::Rejected(code) => defmt::write!(f, "Rejected({})", code),
            Self::NoReply => defmt::write!(f, "NoReply"),
        }
    }
}
