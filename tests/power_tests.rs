//! Power Management Tests
//!
//! Tests for battery divider conversion and the low-battery warning.

use rover_firmware::config::LOW_BATTERY_MV;
use rover_firmware::power::{BatteryMonitor, BatteryVoltage, Divider};

// =============================================================================
// Battery Voltage Tests
// =============================================================================

#[test]
fn test_full_scale_reading() {
    // 3.3 V at the tap through a 10k/20k divider is 4.95 V at the battery
    assert_eq!(BatteryVoltage::from_rover_adc(4095).millivolts(), 4950);
}

#[test]
fn test_zero_reading() {
    assert_eq!(BatteryVoltage::from_rover_adc(0).millivolts(), 0);
}

#[test]
fn test_mid_reading_rounds() {
    // 2482 / 4095 * 3300 * 1.5 = 3000.33
    assert_eq!(BatteryVoltage::from_rover_adc(2482).millivolts(), 3000);
    assert_eq!(BatteryVoltage::from_rover_adc(2482).raw(), 2482);
}

#[test]
fn test_custom_divider() {
    let divider = Divider {
        r1_ohms: 0,
        r2_ohms: 1000,
    };
    assert_eq!(BatteryVoltage::from_adc(4095, divider, 3300).millivolts(), 3300);
}

#[test]
fn test_open_divider_reads_zero() {
    let divider = Divider {
        r1_ohms: 1000,
        r2_ohms: 0,
    };
    assert_eq!(BatteryVoltage::from_adc(4095, divider, 3300).millivolts(), 0);
}

#[test]
fn test_low_threshold() {
    // 2700 counts is about 3264 mV, 2800 about 3385 mV
    assert!(BatteryVoltage::from_rover_adc(2700).is_low());
    assert!(!BatteryVoltage::from_rover_adc(2800).is_low());
}

#[test]
fn test_default_divider_is_rover() {
    assert_eq!(Divider::default(), Divider::ROVER);
}

// =============================================================================
// Battery Monitor Tests
// =============================================================================

#[test]
fn test_monitor_without_reading_is_not_low() {
    let monitor = BatteryMonitor::default();
    assert_eq!(monitor.last_mv(), None);
    assert!(!monitor.is_low());
    assert_eq!(monitor.warning_brightness(), 0);
}

#[test]
fn test_monitor_lights_warning_when_low() {
    let mut monitor = BatteryMonitor::default();
    monitor.update(LOW_BATTERY_MV - 1);
    assert!(monitor.is_low());
    assert_eq!(monitor.warning_brightness(), 255);
}

#[test]
fn test_threshold_itself_is_not_low() {
    let mut monitor = BatteryMonitor::default();
    monitor.update(LOW_BATTERY_MV);
    assert!(!monitor.is_low());
}

#[test]
fn test_monitor_follows_latest_reading() {
    let mut monitor = BatteryMonitor::new(3000);
    monitor.update(2900);
    assert!(monitor.is_low());
    monitor.update(3100);
    assert!(!monitor.is_low());
    assert_eq!(monitor.last_mv(), Some(3100));
}
