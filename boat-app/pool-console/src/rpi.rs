//! Raspberry Pi servo HAL on top of `rppal` software PWM.

use std::{collections::HashMap, time::Duration};

use boat_core::utils::ServoHal;
use rppal::gpio::{Gpio, OutputPin};

/// 50 Hz servo frame.
const SERVO_PERIOD: Duration = Duration::from_millis(20);

#[derive(Debug)]
pub enum RpiError {
    Gpio(rppal::gpio::Error),
    NotInitialised,
    UnknownPin(u8),
}

#[derive(Default)]
pub struct RppalServoHal {
    gpio: Option<Gpio>,
    pins: HashMap<u8, OutputPin>,
}

impl ServoHal for RppalServoHal {
    type Error = RpiError;

    fn initialise(&mut self) -> Result<(), RpiError> {
        self.gpio = Some(Gpio::new().map_err(RpiError::Gpio)?);
        Ok(())
    }

    fn set_output(
        &mut self,
        pin: u8,
    ) -> Result<(), RpiError> {
        let gpio = self.gpio.as_ref().ok_or(RpiError::NotInitialised)?;
        let output = gpio.get(pin).map_err(RpiError::Gpio)?.into_output_low();
        self.pins.insert(pin, output);
        Ok(())
    }

    fn set_servo_pulse(
        &mut self,
        pin: u8,
        pulse_us: u32,
    ) -> Result<(), RpiError> {
        let output = self.pins.get_mut(&pin).ok_or(RpiError::UnknownPin(pin))?;
        output
            .set_pwm(SERVO_PERIOD, Duration::from_micros(pulse_us as u64))
            .map_err(RpiError::Gpio)
    }

    fn terminate(&mut self) {
        for (pin, mut output) in self.pins.drain() {
            if let Err(e) = output.clear_pwm() {
                tracing::warn!(pin, "failed to clear PWM: {:?}", e);
            }
        }
        self.gpio = None;
    }
}
