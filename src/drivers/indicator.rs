//! LED and Buzzer Drivers

use embedded_hal::pwm::{Error as _, ErrorKind, SetDutyCycle};

use crate::config::OUTPUT_MAX;

/// Dimmable LED on one PWM channel
pub struct Led<P> {
    pin: P,
    brightness: u8,
}

impl<P: SetDutyCycle> Led<P> {
    /// Take ownership of the channel and switch the LED off
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, brightness: 0 };
        if led.set(0).is_err() {
            warn!("pwm fault switching led off at startup");
        }
        led
    }

    /// Set brightness (0-255)
    ///
    /// # Errors
    ///
    /// Returns the PWM error kind if the channel could not be written.
    pub fn set(&mut self, brightness: u8) -> Result<(), ErrorKind> {
        self.pin
            .set_duty_cycle_fraction(u16::from(brightness), u16::from(OUTPUT_MAX))
            .map_err(|e| e.kind())?;
        self.brightness = brightness;
        Ok(())
    }

    /// Last brightness written
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Borrow the channel
    #[must_use]
    pub const fn pin(&self) -> &P {
        &self.pin
    }
}

/// Piezo buzzer on a timer channel already running at the tone frequency
///
/// On is a 50% square wave, off is a silent channel.
pub struct Buzzer<P> {
    pin: P,
    on: bool,
}

impl<P: SetDutyCycle> Buzzer<P> {
    /// Take ownership of the channel and silence it
    pub fn new(pin: P) -> Self {
        let mut buzzer = Self { pin, on: false };
        if buzzer.set(false).is_err() {
            warn!("pwm fault silencing buzzer at startup");
        }
        buzzer
    }

    /// Start or stop the tone
    ///
    /// # Errors
    ///
    /// Returns the PWM error kind if the channel could not be written.
    pub fn set(&mut self, on: bool) -> Result<(), ErrorKind> {
        let result = if on {
            self.pin.set_duty_cycle_percent(50)
        } else {
            self.pin.set_duty_cycle_fully_off()
        };
        result.map_err(|e| e.kind())?;
        self.on = on;
        Ok(())
    }

    /// Tone currently on
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// Borrow the channel
    #[must_use]
    pub const fn pin(&self) -> &P {
        &self.pin
    }
}
