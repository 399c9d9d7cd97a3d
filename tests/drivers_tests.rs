//! Driver Tests
//!
//! Tests for the H-bridge, LED and buzzer drivers against fake PWM channels.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};
use rover_firmware::drivers::motor::levels;
use rover_firmware::drivers::{Buzzer, HBridge, Led, RoverActuators};
use rover_firmware::platform::Actuators;
use rover_firmware::types::{Direction, Motor, MotorDrive};

/// PWM channel with an 8-bit-friendly period, optionally broken
#[derive(Debug, Default)]
struct FakePwm {
    duty: u16,
    max: u16,
    broken: bool,
    writes: u32,
}

impl FakePwm {
    fn new(max: u16) -> Self {
        Self {
            max,
            ..Self::default()
        }
    }

    fn broken() -> Self {
        Self {
            max: 255,
            broken: true,
            ..Self::default()
        }
    }
}

impl ErrorType for FakePwm {
    type Error = ErrorKind;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if self.broken {
            return Err(ErrorKind::Other);
        }
        self.duty = duty;
        self.writes += 1;
        Ok(())
    }
}

/// Channel whose duty is visible after the driver takes ownership
#[derive(Clone, Default)]
struct SharedPwm(Rc<RefCell<u16>>);

impl ErrorType for SharedPwm {
    type Error = core::convert::Infallible;
}

impl SetDutyCycle for SharedPwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        *self.0.borrow_mut() = duty;
        Ok(())
    }
}

// =============================================================================
// H-Bridge
// =============================================================================

#[test]
fn test_bridge_levels_table() {
    assert_eq!(levels(MotorDrive::new(Direction::Forward, 200)), (200, 200));
    assert_eq!(levels(MotorDrive::new(Direction::Reverse, 200)), (0, 200));
    assert_eq!(levels(MotorDrive::STOP), (0, 0));
    assert_eq!(levels(MotorDrive::new(Direction::Reverse, 0)), (0, 0));
}

#[test]
fn test_bridge_starts_stopped() {
    let bridge = HBridge::new(FakePwm::new(255), FakePwm::new(255));
    let (a, b) = bridge.inputs();
    assert_eq!((a.duty, b.duty), (0, 0));
    assert_eq!(a.writes, 1);
    assert_eq!(bridge.current(), MotorDrive::STOP);
}

#[test]
fn test_bridge_forward_and_reverse() {
    let mut bridge = HBridge::new(FakePwm::new(255), FakePwm::new(255));
    bridge.drive(MotorDrive::new(Direction::Forward, 145)).unwrap();
    let (a, b) = bridge.inputs();
    assert_eq!((a.duty, b.duty), (145, 145));

    bridge.drive(MotorDrive::new(Direction::Reverse, 155)).unwrap();
    let (a, b) = bridge.inputs();
    assert_eq!((a.duty, b.duty), (0, 155));

    bridge.stop().unwrap();
    let (a, b) = bridge.inputs();
    assert_eq!((a.duty, b.duty), (0, 0));
}

#[test]
fn test_bridge_scales_to_timer_period() {
    let mut bridge = HBridge::new(FakePwm::new(1000), FakePwm::new(1000));
    bridge.drive(MotorDrive::new(Direction::Forward, 255)).unwrap();
    assert_eq!(bridge.inputs().0.duty, 1000);
    bridge.drive(MotorDrive::new(Direction::Reverse, 51)).unwrap();
    assert_eq!(bridge.inputs().1.duty, 200);
}

#[test]
fn test_bridge_reports_fault_and_keeps_last_drive() {
    let mut bridge = HBridge::new(FakePwm::broken(), FakePwm::new(255));
    let err = bridge.drive(MotorDrive::new(Direction::Forward, 10));
    assert_eq!(err, Err(ErrorKind::Other));
    assert_eq!(bridge.current(), MotorDrive::STOP);
}

#[test]
fn test_bridge_built_on_dead_channel_stays_stopped() {
    let mut bridge = HBridge::new(FakePwm::broken(), FakePwm::new(255));
    assert_eq!(bridge.current(), MotorDrive::STOP);
    assert_eq!(bridge.inputs().1.writes, 0);
    assert_eq!(bridge.stop(), Err(ErrorKind::Other));
}

// =============================================================================
// LED and Buzzer
// =============================================================================

#[test]
fn test_led_brightness() {
    let mut led = Led::new(FakePwm::new(255));
    assert_eq!(led.brightness(), 0);
    led.set(128).unwrap();
    assert_eq!(led.pin().duty, 128);
    assert_eq!(led.brightness(), 128);
}

#[test]
fn test_indicators_built_on_dead_channels_stay_off() {
    let led = Led::new(FakePwm::broken());
    assert_eq!(led.brightness(), 0);
    let buzzer = Buzzer::new(FakePwm::broken());
    assert!(!buzzer.is_on());
}

#[test]
fn test_buzzer_half_duty_when_on() {
    let mut buzzer = Buzzer::new(FakePwm::new(1000));
    assert!(!buzzer.is_on());
    assert_eq!(buzzer.pin().duty, 0);
    buzzer.set(true).unwrap();
    assert!(buzzer.is_on());
    assert_eq!(buzzer.pin().duty, 500);
    buzzer.set(false).unwrap();
    assert_eq!(buzzer.pin().duty, 0);
}

// =============================================================================
// Actuator Bundle
// =============================================================================

#[test]
fn test_rover_actuators_route_outputs() {
    let m1a = SharedPwm::default();
    let m1b = SharedPwm::default();
    let m2a = SharedPwm::default();
    let m2b = SharedPwm::default();
    let link = SharedPwm::default();
    let warn = SharedPwm::default();
    let mut outputs = RoverActuators::new(
        HBridge::new(m1a.clone(), m1b.clone()),
        HBridge::new(m2a.clone(), m2b.clone()),
        Buzzer::new(FakePwm::new(255)),
        Led::new(link.clone()),
        Led::new(warn.clone()),
    );

    outputs.drive_motor1(MotorDrive::new(Direction::Forward, 100));
    outputs.drive_motor2(MotorDrive::new(Direction::Reverse, 50));
    outputs.set_link_indicator(255);
    outputs.set_battery_warning(0);
    outputs.set_buzzer(true);

    assert_eq!((*m1a.0.borrow(), *m1b.0.borrow()), (100, 100));
    assert_eq!((*m2a.0.borrow(), *m2b.0.borrow()), (0, 50));
    assert_eq!(*link.0.borrow(), 255);
    assert_eq!(*warn.0.borrow(), 0);
    assert!(outputs.buzzer().is_on());
    assert_eq!(
        outputs.motor(Motor::Two).current(),
        MotorDrive::new(Direction::Reverse, 50)
    );
    assert_eq!(outputs.link_led().brightness(), 255);
    assert_eq!(outputs.warning_led().brightness(), 0);
    assert_eq!(outputs.faults(), 0);
}

#[test]
fn test_rover_actuators_count_faults() {
    let mut outputs = RoverActuators::new(
        HBridge::new(FakePwm::broken(), FakePwm::broken()),
        HBridge::new(FakePwm::new(255), FakePwm::new(255)),
        Buzzer::new(FakePwm::broken()),
        Led::new(FakePwm::new(255)),
        Led::new(FakePwm::new(255)),
    );
    outputs.drive_motor1(MotorDrive::new(Direction::Forward, 1));
    outputs.set_buzzer(true);
    outputs.drive_motor2(MotorDrive::new(Direction::Forward, 1));
    assert_eq!(outputs.faults(), 2);
    assert_eq!(outputs.motor(Motor::Two).current().magnitude, 1);
}
