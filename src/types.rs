//! Shared types used across the rover firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// 6-byte hardware address of the remote station
///
/// Configured once at startup and used for both pairing and every
/// outbound send. Never generated by the rover itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress([u8; 6]);

impl PeerAddress {
    /// Broadcast address (all ones)
    pub const BROADCAST: Self = Self([0xFF; 6]);

    /// Create from raw bytes
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Parse the text form `AA:BB:CC:DD:EE:FF`
    ///
    /// Accepts `:` or `-` separators and either letter case.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the text is not six separated hex octets.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        let bytes = text.as_bytes();
        if bytes.len() != 17 {
            return Err(AddressError::Length(bytes.len()));
        }

        let mut out = [0u8; 6];
        for (i, octet) in out.iter_mut().enumerate() {
            let base = i * 3;
            if i > 0 && !matches!(bytes[base - 1], b':' | b'-') {
                return Err(AddressError::Separator(base - 1));
            }
            let hi = hex_nibble(bytes[base]).ok_or(AddressError::Digit(base))?;
            let lo = hex_nibble(bytes[base + 1]).ok_or(AddressError::Digit(base + 1))?;
            *octet = (hi << 4) | lo;
        }

        Ok(Self(out))
    }

    /// Get the raw bytes
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Borrow the raw bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

const fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl fmt::Debug for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerAddress({self})")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PeerAddress {
    fn format(&self, f: defmt::Formatter) {
        let [a, b, c, d, e, g] = self.0;
        defmt::write!(f, "{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}:{=u8:02X}", a, b, c, d, e, g);
    }
}

/// Error parsing a [`PeerAddress`] from text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// Text was not 17 characters long
    Length(usize),
    /// Non-hex character at the given offset
    Digit(usize),
    /// Missing separator at the given offset
    Separator(usize),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(n) => write!(f, "expected 17 characters, got {n}"),
            Self::Digit(at) => write!(f, "invalid hex digit at offset {at}"),
            Self::Separator(at) => write!(f, "expected ':' or '-' at offset {at}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AddressError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Length(n) => defmt::write!(f, "Length({})", n),
            Self::Digit(at) => defmt::write!(f, "Digit({})", at),
            Self::Separator(at) => defmt::write!(f, "Separator({})", at),
        }
    }
}

/// Radio channel used when registering the peer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioChannel {
    /// Use whatever channel the local radio is on at pairing time
    #[default]
    Auto,
    /// Explicit 2.4 GHz channel number
    Fixed(u8),
}

impl RadioChannel {
    /// Lowest valid 2.4 GHz channel
    pub const MIN: u8 = 1;

    /// Highest valid 2.4 GHz channel
    pub const MAX: u8 = 14;

    /// Create an explicit channel, returns None if out of range
    #[must_use]
    pub const fn fixed(channel: u8) -> Option<Self> {
        if Self::is_valid(channel) {
            Some(Self::Fixed(channel))
        } else {
            None
        }
    }

    /// Check a raw channel number
    #[must_use]
    pub const fn is_valid(channel: u8) -> bool {
        channel >= Self::MIN && channel <= Self::MAX
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RadioChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Auto => defmt::write!(f, "auto"),
            Self::Fixed(ch) => defmt::write!(f, "ch{}", ch),
        }
    }
}

/// Health of the link to the remote peer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Pairing has not succeeded (initial state)
    #[default]
    Unpaired,
    /// Paired and frames are arriving
    Paired,
    /// Paired, but no frame for longer than the loss threshold
    Lost,
}

impl LinkState {
    /// Check if the link is healthy enough to drive actuators
    #[must_use]
    pub const fn is_paired(self) -> bool {
        matches!(self, Self::Paired)
    }

    /// Check if pairing ever succeeded
    #[must_use]
    pub const fn has_peer(self) -> bool {
        !matches!(self, Self::Unpaired)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Unpaired => defmt::write!(f, "UNPAIRED"),
            Self::Paired => defmt::write!(f, "PAIRED"),
            Self::Lost => defmt::write!(f, "LOST"),
        }
    }
}

/// Direction of travel for one motor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Raw axis at or above center
    #[default]
    Forward,
    /// Raw axis below center
    Reverse,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Direction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Forward => defmt::write!(f, "FWD"),
            Self::Reverse => defmt::write!(f, "REV"),
        }
    }
}

/// Drive command for one motor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MotorDrive {
    /// Direction of travel
    pub direction: Direction,
    /// Speed magnitude (0-255)
    pub magnitude: u8,
}

impl MotorDrive {
    /// Motor stopped
    pub const STOP: Self = Self {
        direction: Direction::Forward,
        magnitude: 0,
    };

    /// Create a drive command
    #[must_use]
    pub const fn new(direction: Direction, magnitude: u8) -> Self {
        Self {
            direction,
            magnitude,
        }
    }

    /// Check if the motor is stopped
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.magnitude == 0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MotorDrive {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}:{}", self.direction, self.magnitude);
    }
}

/// Which of the two caterpillar motors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motor {
    /// Motor driven by axis 1
    One,
    /// Motor driven by axis 2
    Two,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Motor {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::One => defmt::write!(f, "M1"),
            Self::Two => defmt::write!(f, "M2"),
        }
    }
}

/// Full actuator output set for one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ActuatorCommand {
    /// Motor 1 drive
    pub motor1: MotorDrive,
    /// Motor 2 drive
    pub motor2: MotorDrive,
    /// Buzzer on
    pub buzzer: bool,
    /// Link indicator brightness (0-255)
    pub indicator: u8,
}

impl ActuatorCommand {
    /// Everything off
    pub const SAFE: Self = Self {
        motor1: MotorDrive::STOP,
        motor2: MotorDrive::STOP,
        buzzer: false,
        indicator: 0,
    };

    /// Check if both motors are stopped and the buzzer is silent
    #[must_use]
    pub const fn is_safe_stop(&self) -> bool {
        self.motor1.is_stopped() && self.motor2.is_stopped() && !self.buzzer
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ActuatorCommand {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Cmd(m1={}, m2={}, bz={}, led={})",
            self.motor1,
            self.motor2,
            self.buzzer,
            self.indicator
        );
    }
}
