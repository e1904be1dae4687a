//! Conveyor belt servo on a tick-based PWM timer.
//!
//! The belt runs on a continuous-rotation servo fed from a hardware PWM slice
//! (RP2040-style: integer clock divider, 16-bit wrap). At init the live system
//! clock is queried and the wrap for 50 Hz derived; every speed change after
//! that only converts the pulse width to a compare level.

use embedded_hal::pwm::SetDutyCycle;
use serde::{Deserialize, Serialize};

use crate::utils::{
    controllers::{ActuatorChannel, DriveError, SpeedDrive},
    math::{
        pulse::PulseWidthSpec,
        timing::{TimingConfig, DEFAULT_DIVIDER, SERVO_FREQ_HZ},
    },
};

/// Default GPIO for the belt servo.
pub const DEFAULT_BELT_PIN: u8 = 15;

/// A PWM slice whose clock divider and wrap can be programmed.
///
/// Compare levels are written through `SetDutyCycle::set_duty_cycle` and
/// never exceed the configured wrap.
pub trait PwmTimebase: SetDutyCycle {
    /// Current system clock feeding the slice (Hz).
    fn clock_hz(&self) -> u32;

    /// Route `pin` to the slice, program divider and wrap, and enable it.
    ///
    /// Afterwards `max_duty_cycle()` must report `timing.wrap()`, since every
    /// level is computed on that tick basis.
    fn configure(
        &mut self,
        pin: u8,
        timing: &TimingConfig,
    ) -> Result<(), Self::Error>;
}

/// Divider, frequency and pulse calibration for the belt servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConveyorConfig {
    pub divider: u32,
    pub target_hz: u32,
    pub pulse: PulseWidthSpec,
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        ConveyorConfig {
            divider: DEFAULT_DIVIDER,
            target_hz: SERVO_FREQ_HZ,
            pulse: PulseWidthSpec::default(),
        }
    }
}

/// Belt servo bound to one PWM slice channel.
pub struct ConveyorServo<P> {
    pwm: P,
    channel: ActuatorChannel,
    timing: TimingConfig,
    spec: PulseWidthSpec,
    level: Option<u16>,
}

impl<P> ConveyorServo<P>
where
    P: PwmTimebase,
{
    /// Derive timing from the live clock, program the slice and command stop.
    ///
    /// An unachievable frequency or a wrap beyond 16 bits is fatal here.
    pub fn init(
        mut pwm: P,
        pin: u8,
        config: Option<ConveyorConfig>,
    ) -> Result<Self, DriveError<P::Error>> {
        let config = config.unwrap_or_default();
        let clock_hz = pwm.clock_hz();
        let timing = TimingConfig::new(clock_hz, config.divider, config.target_hz)
            .inspect_err(|e| tracing::error!(pin, "belt timing rejected: {}", e))?;
        timing.wrap_u16()?;

        pwm.configure(pin, &timing).map_err(DriveError::Hal)?;
        tracing::info!(
            pin,
            clock_hz,
            divider = timing.divider(),
            wrap = timing.wrap(),
            "belt servo PWM configured"
        );

        let mut channel = ActuatorChannel::new(pin);
        channel.mark_ready();
        let mut servo = ConveyorServo {
            pwm,
            channel,
            timing,
            spec: config.pulse,
            level: None,
        };
        servo.stop();
        Ok(servo)
    }

    /// Run the belt forward at `magnitude` percent; the sign is ignored.
    pub fn forward(
        &mut self,
        magnitude: i32,
    ) {
        self.set_speed(unsigned_percent(magnitude));
    }

    /// Run the belt in reverse at `magnitude` percent; the sign is ignored.
    pub fn reverse(
        &mut self,
        magnitude: i32,
    ) {
        self.set_speed(-unsigned_percent(magnitude));
    }

    pub fn pulse_us(&self) -> Option<u32> {
        self.channel.pulse_us()
    }

    /// Last compare level written to the slice.
    pub fn level(&self) -> Option<u16> {
        self.level
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn channel(&self) -> &ActuatorChannel {
        &self.channel
    }

    /// Give the PWM slice back.
    pub fn release(self) -> P {
        self.pwm
    }
}

fn unsigned_percent(magnitude: i32) -> i32 {
    magnitude.unsigned_abs().min(100) as i32
}

impl<P> SpeedDrive for ConveyorServo<P>
where
    P: PwmTimebase,
{
    fn set_speed(
        &mut self,
        percent: i32,
    ) {
        let Some(pulse_us) = self.channel.command(percent, &self.spec) else {
            return;
        };
        let wrap = self.timing.wrap();
        let level = self.timing.duration_to_level(pulse_us).min(wrap) as u16;
        tracing::debug!(pin = self.channel.pin(), pulse_us, level, "belt level");
        if let Err(e) = self.pwm.set_duty_cycle(level) {
            tracing::error!(pin = self.channel.pin(), level, "belt level write failed: {:?}", e);
        }
        self.level = Some(level);
    }

    fn is_ready(&self) -> bool {
        self.channel.is_ready()
    }
}
