//! Power Management
//!
//! Battery divider conversion and the low-battery warning.

use crate::config::{
    ADC_FULL_SCALE, ADC_VREF_MV, BATTERY_R1_OHMS, BATTERY_R2_OHMS, LOW_BATTERY_MV,
};

/// Resistor divider between the battery and the ADC pin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Divider {
    /// High-side resistor (battery to tap), ohms
    pub r1_ohms: u32,
    /// Low-side resistor (tap to ground), ohms
    pub r2_ohms: u32,
}

impl Divider {
    /// Divider fitted to the rover board
    pub const ROVER: Self = Self {
        r1_ohms: BATTERY_R1_OHMS,
        r2_ohms: BATTERY_R2_OHMS,
    };
}

impl Default for Divider {
    fn default() -> Self {
        Self::ROVER
    }
}

/// Battery voltage reading
#[derive(Clone, Copy, Debug)]
pub struct BatteryVoltage {
    /// Raw ADC reading (12-bit)
    raw: u16,
    /// Voltage divider
    divider: Divider,
    /// Reference voltage in millivolts
    vref_mv: u32,
}

impl BatteryVoltage {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16, divider: Divider, vref_mv: u32) -> Self {
        Self {
            raw,
            divider,
            vref_mv,
        }
    }

    /// Create from ADC reading using the rover board's divider and reference
    #[must_use]
    pub const fn from_rover_adc(raw: u16) -> Self {
        Self::from_adc(raw, Divider::ROVER, ADC_VREF_MV)
    }

    /// Get the raw ADC count
    #[must_use]
    pub const fn raw(&self) -> u16 {
        self.raw
    }

    /// Get battery voltage in millivolts (rounded to nearest)
    ///
    /// `mv = raw / 4095 * vref * (R1 + R2) / R2`
    #[must_use]
    pub fn millivolts(&self) -> i32 {
        if self.divider.r2_ohms == 0 {
            return 0;
        }
        let num = u64::from(self.raw)
            * u64::from(self.vref_mv)
            * (u64::from(self.divider.r1_ohms) + u64::from(self.divider.r2_ohms));
        let den = u64::from(ADC_FULL_SCALE) * u64::from(self.divider.r2_ohms);
        i32::try_from((num + den / 2) / den).unwrap_or(i32::MAX)
    }

    /// Check if battery is below the warning threshold
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.millivolts() < LOW_BATTERY_MV
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}mV", self.millivolts());
    }
}

/// Tracks the last battery reading and drives the warning state
#[derive(Clone, Copy, Debug)]
pub struct BatteryMonitor {
    /// Last reading in millivolts
    last_mv: Option<i32>,
    /// Warning threshold in millivolts
    low_threshold_mv: i32,
}

impl BatteryMonitor {
    /// Create a monitor with a custom threshold
    #[must_use]
    pub const fn new(low_threshold_mv: i32) -> Self {
        Self {
            last_mv: None,
            low_threshold_mv,
        }
    }

    /// Record a new reading
    pub fn update(&mut self, millivolts: i32) {
        self.last_mv = Some(millivolts);
    }

    /// Last reading, if any
    #[must_use]
    pub const fn last_mv(&self) -> Option<i32> {
        self.last_mv
    }

    /// Check if the last reading is under the threshold
    ///
    /// No reading yet is not a warning.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.last_mv.is_some_and(|mv| mv < self.low_threshold_mv)
    }

    /// Warning LED brightness for the current reading
    #[must_use]
    pub fn warning_brightness(&self) -> u8 {
        if self.is_low() {
            u8::MAX
        } else {
            0
        }
    }
}

impl Default for BatteryMonitor {
    fn default() -> Self {
        Self::new(LOW_BATTERY_MV)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryMonitor {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Battery(last={}, low={})", self.last_mv, self.is_low());
    }
}
