//! Backends that log pulses to the console instead of driving GPIO.

use std::convert::Infallible;

use boat_core::utils::{PwmTimebase, ServoHal, TimingConfig};
use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use tracing::info;

/// Servo HAL that prints every pulse width it is asked to emit.
#[derive(Default)]
pub struct ConsoleServoHal;

impl ServoHal for ConsoleServoHal {
    type Error = Infallible;

    fn initialise(&mut self) -> Result<(), Infallible> {
        info!("console servo HAL initialised");
        Ok(())
    }

    fn set_output(
        &mut self,
        pin: u8,
    ) -> Result<(), Infallible> {
        info!(pin, "GPIO set to output");
        Ok(())
    }

    fn set_servo_pulse(
        &mut self,
        pin: u8,
        pulse_us: u32,
    ) -> Result<(), Infallible> {
        info!(pin, pulse_us, "servo pulse");
        Ok(())
    }

    fn terminate(&mut self) {
        info!("console servo HAL terminated");
    }
}

/// PWM slice that reports a fixed system clock and prints compare levels.
pub struct ConsolePwm {
    clock_hz: u32,
    top: u16,
}

impl ConsolePwm {
    pub fn new(clock_hz: u32) -> Self {
        ConsolePwm {
            clock_hz,
            top: u16::MAX,
        }
    }
}

impl ErrorType for ConsolePwm {
    type Error = Infallible;
}

impl SetDutyCycle for ConsolePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.top
    }

    fn set_duty_cycle(
        &mut self,
        duty: u16,
    ) -> Result<(), Infallible> {
        info!(duty, top = self.top, "PWM level");
        Ok(())
    }
}

impl PwmTimebase for ConsolePwm {
    fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    fn configure(
        &mut self,
        pin: u8,
        timing: &TimingConfig,
    ) -> Result<(), Infallible> {
        // wrap was validated against 16 bits by the caller
        self.top = timing.wrap().min(u16::MAX as u32) as u16;
        info!(
            pin,
            divider = timing.divider(),
            wrap = timing.wrap(),
            hz = timing.achieved_frequency_hz(),
            "PWM slice configured"
        );
        Ok(())
    }
}
