//! ADC Driver
//!
//! Blocking battery voltage reads through the divider on the sense pin.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use crate::platform::BatterySensor;
use crate::power::BatteryVoltage;

/// Battery sense ADC
pub struct BatteryAdc<'d, P> {
    adc: Adc<'d, ADC1>,
    pin: P,
}

impl<P: AdcChannel<ADC1>> BatteryAdc<'_, P> {
    /// Create the battery ADC on `pin`
    ///
    /// Uses the longest sample time; the divider's source impedance is high.
    #[must_use]
    pub fn new(adc: ADC1, pin: P) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, pin }
    }

    /// Read the divider tap
    pub fn read(&mut self) -> BatteryVoltage {
        BatteryVoltage::from_rover_adc(self.adc.blocking_read(&mut self.pin))
    }
}

impl<P: AdcChannel<ADC1>> BatterySensor for BatteryAdc<'_, P> {
    fn read_millivolts(&mut self) -> i32 {
        self.read().millivolts()
    }
}
