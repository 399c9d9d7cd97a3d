//! Control and Telemetry Frames
//!
//! Both records are packed little-endian `i32` fields with no header: the
//! transmitter and the rover agree on layout purely by position.

use core::fmt;

/// Number of `i32` fields in a control frame
pub const CONTROL_FIELDS: usize = 18;

/// Control frame size on the wire
pub const CONTROL_FRAME_LEN: usize = CONTROL_FIELDS * 4;

/// Number of `i32` fields in a telemetry frame
pub const TELEMETRY_FIELDS: usize = 5;

/// Telemetry frame size on the wire
pub const TELEMETRY_FRAME_LEN: usize = TELEMETRY_FIELDS * 4;

/// Switch reading for "pressed" (switches are active low)
pub const SWITCH_PRESSED: i32 = 0;

/// Switch reading for "released"
pub const SWITCH_RELEASED: i32 = 1;

/// Index into [`ControlFrame::buttons`] of the buzzer push button
pub const BUZZER_BUTTON: usize = 0;

/// Latest remote-input snapshot
///
/// Wire order: `axis1`, `axis2`, four slide switches with two state fields
/// each, then eight push buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ControlFrame {
    /// Slider 1 (0-255, 128 neutral), drives motor 1
    pub axis1: i32,
    /// Slider 2 (0-255, 128 neutral), drives motor 2
    pub axis2: i32,
    /// Slide switch state pairs
    pub slides: [[i32; 2]; 4],
    /// Push button states
    pub buttons: [i32; 8],
}

impl ControlFrame {
    /// Sticks centered, every switch released
    pub const NEUTRAL: Self = Self {
        axis1: 128,
        axis2: 128,
        slides: [[SWITCH_RELEASED; 2]; 4],
        buttons: [SWITCH_RELEASED; 8],
    };

    /// Decode a received payload
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::SizeMismatch`] unless the payload is exactly
    /// [`CONTROL_FRAME_LEN`] bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() != CONTROL_FRAME_LEN {
            return Err(FrameError::SizeMismatch {
                expected: CONTROL_FRAME_LEN,
                actual: bytes.len(),
            });
        }

        let mut fields = [0i32; CONTROL_FIELDS];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(4)) {
            *field = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        let mut slides = [[0i32; 2]; 4];
        for (i, pair) in slides.iter_mut().enumerate() {
            *pair = [fields[2 + i * 2], fields[3 + i * 2]];
        }
        let mut buttons = [0i32; 8];
        buttons.copy_from_slice(&fields[10..18]);

        Ok(Self {
            axis1: fields[0],
            axis2: fields[1],
            slides,
            buttons,
        })
    }

    /// Encode to the wire layout
    #[must_use]
    pub fn encode(&self) -> [u8; CONTROL_FRAME_LEN] {
        let mut fields = [0i32; CONTROL_FIELDS];
        fields[0] = self.axis1;
        fields[1] = self.axis2;
        for (i, pair) in self.slides.iter().enumerate() {
            fields[2 + i * 2] = pair[0];
            fields[3 + i * 2] = pair[1];
        }
        fields[10..18].copy_from_slice(&self.buttons);

        let mut out = [0u8; CONTROL_FRAME_LEN];
        for (chunk, field) in out.chunks_exact_mut(4).zip(fields.iter()) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }

    /// Check if the buzzer button is held
    ///
    /// Anything other than a clean "released" reads as pressed.
    #[must_use]
    pub const fn buzzer_pressed(&self) -> bool {
        self.buttons[BUZZER_BUTTON] != SWITCH_RELEASED
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ControlFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Ctrl(a1={}, a2={}, btn={})",
            self.axis1,
            self.axis2,
            self.buttons
        );
    }
}

/// Outbound status snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TelemetryFrame {
    /// Battery voltage in millivolts
    pub battery_mv: i32,
    /// Reserved for future fields, sent as zero
    pub reserved: [i32; 4],
}

impl TelemetryFrame {
    /// Build a frame carrying only the battery reading
    #[must_use]
    pub const fn new(battery_mv: i32) -> Self {
        Self {
            battery_mv,
            reserved: [0; 4],
        }
    }

    /// Encode to the wire layout
    #[must_use]
    pub fn encode(&self) -> [u8; TELEMETRY_FRAME_LEN] {
        let mut out = [0u8; TELEMETRY_FRAME_LEN];
        out[..4].copy_from_slice(&self.battery_mv.to_le_bytes());
        for (chunk, field) in out[4..].chunks_exact_mut(4).zip(self.reserved.iter()) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TelemetryFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Tlm({}mV)", self.battery_mv);
    }
}

/// Frame decoding error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Payload length does not match the record size
    SizeMismatch {
        /// Expected length in bytes
        expected: usize,
        /// Received length in bytes
        actual: usize,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "frame size mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SizeMismatch { expected, actual } => {
                defmt::write!(f, "SizeMismatch(expected={}, got={})", expected, actual);
            }
        }
    }
}
