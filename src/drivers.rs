//! Peripheral Drivers
//!
//! Rover outputs built on `embedded_hal::pwm::SetDutyCycle`, so the same
//! code drives embassy timer channels on target and recording fakes in the
//! host tests.

pub mod indicator;
pub mod motor;

use embedded_hal::pwm::SetDutyCycle;

use crate::platform::Actuators;
use crate::types::{Motor, MotorDrive};

pub use indicator::{Buzzer, Led};
pub use motor::HBridge;

/// Every rover output behind one [`Actuators`] implementation
///
/// `M` is the motor timer channel type, `Z` the buzzer channel and `L` the
/// LED channel. Output faults are logged and counted; the loop keeps going.
pub struct RoverActuators<M, Z, L> {
    motor1: HBridge<M>,
    motor2: HBridge<M>,
    buzzer: Buzzer<Z>,
    link_led: Led<L>,
    warning_led: Led<L>,
    faults: u32,
}

impl<M, Z, L> RoverActuators<M, Z, L>
where
    M: SetDutyCycle,
    Z: SetDutyCycle,
    L: SetDutyCycle,
{
    /// Bundle the rover outputs
    pub fn new(
        motor1: HBridge<M>,
        motor2: HBridge<M>,
        buzzer: Buzzer<Z>,
        link_led: Led<L>,
        warning_led: Led<L>,
    ) -> Self {
        Self {
            motor1,
            motor2,
            buzzer,
            link_led,
            warning_led,
            faults: 0,
        }
    }

    /// Motor driver
    #[must_use]
    pub fn motor(&self, motor: Motor) -> &HBridge<M> {
        match motor {
            Motor::One => &self.motor1,
            Motor::Two => &self.motor2,
        }
    }

    /// Buzzer driver
    #[must_use]
    pub fn buzzer(&self) -> &Buzzer<Z> {
        &self.buzzer
    }

    /// Link indicator LED
    #[must_use]
    pub fn link_led(&self) -> &Led<L> {
        &self.link_led
    }

    /// Low-battery warning LED
    #[must_use]
    pub fn warning_led(&self) -> &Led<L> {
        &self.warning_led
    }

    /// Output writes that failed
    #[must_use]
    pub fn faults(&self) -> u32 {
        self.faults
    }

    fn drive(&mut self, motor: Motor, drive: MotorDrive) {
        let bridge = match motor {
            Motor::One => &mut self.motor1,
            Motor::Two => &mut self.motor2,
        };
        if bridge.drive(drive).is_err() {
            self.faults = self.faults.saturating_add(1);
            warn!("pwm fault on {}", motor);
        }
    }
}

impl<M, Z, L> Actuators for RoverActuators<M, Z, L>
where
    M: SetDutyCycle,
    Z: SetDutyCycle,
    L: SetDutyCycle,
{
    fn drive_motor1(&mut self, drive: MotorDrive) {
        self.drive(Motor::One, drive);
    }

    fn drive_motor2(&mut self, drive: MotorDrive) {
        self.drive(Motor::Two, drive);
    }

    fn set_buzzer(&mut self, on: bool) {
        if self.buzzer.set(on).is_err() {
            self.faults = self.faults.saturating_add(1);
            warn!("pwm fault on buzzer");
        }
    }

    fn set_link_indicator(&mut self, brightness: u8) {
        if self.link_led.set(brightness).is_err() {
            self.faults = self.faults.saturating_add(1);
            warn!("pwm fault on link led");
        }
    }

    fn set_battery_warning(&mut self, brightness: u8) {
        if self.warning_led.set(brightness).is_err() {
            self.faults = self.faults.saturating_add(1);
            warn!("pwm fault on warning led");
        }
    }
}
