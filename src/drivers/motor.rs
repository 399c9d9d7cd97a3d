//! H-Bridge Motor Driver
//!
//! One DC motor on two PWM inputs of a dual H-bridge.
//!
//! | drive            | input A   | input B   |
//! |------------------|-----------|-----------|
//! | forward, speed s | s         | s         |
//! | reverse, speed s | 0         | s         |
//! | stop             | 0         | 0         |

use embedded_hal::pwm::{ErrorKind, SetDutyCycle};

use crate::config::OUTPUT_MAX;
use crate::types::{Direction, MotorDrive};

/// Duty levels (input A, input B) for a drive command
#[must_use]
pub const fn levels(drive: MotorDrive) -> (u8, u8) {
    match drive.direction {
        Direction::Forward => (drive.magnitude, drive.magnitude),
        Direction::Reverse => (0, drive.magnitude),
    }
}

/// H-bridge motor driver
pub struct HBridge<P> {
    in_a: P,
    in_b: P,
    drive: MotorDrive,
}

impl<P: SetDutyCycle> HBridge<P> {
    /// Take ownership of both inputs and stop the motor
    pub fn new(in_a: P, in_b: P) -> Self {
        let mut bridge = Self {
            in_a,
            in_b,
            drive: MotorDrive::STOP,
        };
        if bridge.stop().is_err() {
            warn!("pwm fault stopping motor at startup");
        }
        bridge
    }

    /// Apply a drive command
    ///
    /// # Errors
    ///
    /// Returns the PWM error kind if either input could not be written.
    pub fn drive(&mut self, drive: MotorDrive) -> Result<(), ErrorKind> {
        let (a, b) = levels(drive);
        self.write(a, b)?;
        self.drive = drive;
        Ok(())
    }

    /// Stop the motor
    ///
    /// # Errors
    ///
    /// Returns the PWM error kind if either input could not be written.
    pub fn stop(&mut self) -> Result<(), ErrorKind> {
        self.drive(MotorDrive::STOP)
    }

    /// Last drive command applied
    #[must_use]
    pub const fn current(&self) -> MotorDrive {
        self.drive
    }

    /// Borrow both inputs (A, B)
    #[must_use]
    pub const fn inputs(&self) -> (&P, &P) {
        (&self.in_a, &self.in_b)
    }

    fn write(&mut self, a: u8, b: u8) -> Result<(), ErrorKind> {
        use embedded_hal::pwm::Error as _;

        self.in_a
            .set_duty_cycle_fraction(u16::from(a), u16::from(OUTPUT_MAX))
            .map_err(|e| e.kind())?;
        self.in_b
            .set_duty_cycle_fraction(u16::from(b), u16::from(OUTPUT_MAX))
            .map_err(|e| e.kind())
    }
}
