//! Dual thruster control over a microsecond pulse HAL.
//!
//! Each thruster is an ESC on its own GPIO. The HAL accepts pulse widths in
//! microseconds directly (pigpio's `gpioServo` model), so no timer math is
//! involved: percent → pulse width → write.

use crate::utils::{
    controllers::{ActuatorChannel, DriveError, SpeedDrive},
    math::{
        mixer::DriveCommand,
        pulse::{PulseWidthSpec, SpeedCommand},
    },
};

/// Default GPIO for the left thruster.
pub const DEFAULT_LEFT_PIN: u8 = 18;
/// Default GPIO for the right thruster.
pub const DEFAULT_RIGHT_PIN: u8 = 19;

/// Hardware layer that emits servo pulses given in microseconds.
pub trait ServoHal {
    type Error: core::fmt::Debug;

    /// Bring the GPIO library up. Fails without privileges or hardware.
    fn initialise(&mut self) -> Result<(), Self::Error>;

    /// Configure `pin` as an output.
    fn set_output(
        &mut self,
        pin: u8,
    ) -> Result<(), Self::Error>;

    /// Emit a continuous pulse train of `pulse_us` on `pin`.
    fn set_servo_pulse(
        &mut self,
        pin: u8,
        pulse_us: u32,
    ) -> Result<(), Self::Error>;

    /// Release the GPIO library.
    fn terminate(&mut self) {}
}

/// Left/right thruster pair driven through one `ServoHal`.
///
/// Not internally synchronized; callers sharing it between tasks must
/// serialize access themselves.
pub struct ThrusterPair<H> {
    hal: H,
    left: ActuatorChannel,
    right: ActuatorChannel,
    spec: PulseWidthSpec,
}

impl<H> ThrusterPair<H>
where
    H: ServoHal,
{
    /// Wrap a HAL. Nothing is touched until `init`.
    pub fn new(
        hal: H,
        spec: Option<PulseWidthSpec>,
    ) -> Self {
        ThrusterPair {
            hal,
            left: ActuatorChannel::new(DEFAULT_LEFT_PIN),
            right: ActuatorChannel::new(DEFAULT_RIGHT_PIN),
            spec: spec.unwrap_or_default(),
        }
    }

    /// Bind both thrusters to their pins and command stop.
    ///
    /// On failure the pair stays uninitialized and ignores further commands.
    /// A HAL that came up before the failure is terminated again.
    pub fn init(
        &mut self,
        left_pin: u8,
        right_pin: u8,
    ) -> Result<(), DriveError<H::Error>> {
        if self.is_ready() {
            tracing::warn!("thrusters already initialized");
            return Err(DriveError::AlreadyInitialized);
        }

        let mut left = ActuatorChannel::new(left_pin);
        let mut right = ActuatorChannel::new(right_pin);

        if let Err(e) = self.hal.initialise() {
            tracing::error!("thruster HAL init failed: {:?}", e);
            return Err(DriveError::Hal(e));
        }
        if let Err(e) = self.bind_outputs(left_pin, right_pin) {
            tracing::error!(left_pin, right_pin, "thruster output setup failed: {:?}", e);
            self.hal.terminate();
            return Err(DriveError::Hal(e));
        }

        left.mark_ready();
        right.mark_ready();
        self.left = left;
        self.right = right;
        tracing::info!(left_pin, right_pin, "thrusters ready");

        self.stop();
        Ok(())
    }

    fn bind_outputs(
        &mut self,
        left_pin: u8,
        right_pin: u8,
    ) -> Result<(), H::Error> {
        self.hal.set_output(left_pin)?;
        self.hal.set_output(right_pin)
    }

    /// Command each thruster independently (percent, clamped).
    pub fn set(
        &mut self,
        left_percent: i32,
        right_percent: i32,
    ) {
        let left = self.left.command(left_percent, &self.spec);
        let right = self.right.command(right_percent, &self.spec);
        if let Some(us) = left {
            Self::write(&mut self.hal, self.left.pin(), us);
        }
        if let Some(us) = right {
            Self::write(&mut self.hal, self.right.pin(), us);
        }
    }

    fn write(
        hal: &mut H,
        pin: u8,
        pulse_us: u32,
    ) {
        if let Err(e) = hal.set_servo_pulse(pin, pulse_us) {
            tracing::error!(pin, pulse_us, "servo pulse write failed: {:?}", e);
        }
    }

    pub fn apply(
        &mut self,
        cmd: DriveCommand,
    ) {
        let (left, right) = cmd.percents();
        self.set(left, right);
    }

    pub fn forward(
        &mut self,
        percent: i32,
    ) {
        self.apply(DriveCommand::forward(SpeedCommand::new(percent)));
    }

    pub fn turn_left(
        &mut self,
        percent: i32,
    ) {
        self.apply(DriveCommand::turn_left(SpeedCommand::new(percent)));
    }

    pub fn turn_right(
        &mut self,
        percent: i32,
    ) {
        self.apply(DriveCommand::turn_right(SpeedCommand::new(percent)));
    }

    /// Last commanded `(left, right)` pulse widths.
    pub fn pulse_widths(&self) -> (Option<u32>, Option<u32>) {
        (self.left.pulse_us(), self.right.pulse_us())
    }

    pub fn channels(&self) -> (&ActuatorChannel, &ActuatorChannel) {
        (&self.left, &self.right)
    }

    pub fn spec(&self) -> &PulseWidthSpec {
        &self.spec
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Stop both thrusters, release the GPIO library and hand the HAL back.
    pub fn shutdown(mut self) -> H {
        if self.is_ready() {
            self.stop();
            self.hal.terminate();
            tracing::info!("thrusters stopped and released");
        }
        self.hal
    }
}

impl<H> SpeedDrive for ThrusterPair<H>
where
    H: ServoHal,
{
    fn set_speed(
        &mut self,
        percent: i32,
    ) {
        self.forward(percent);
    }

    fn stop(&mut self) {
        self.set(0, 0);
    }

    fn is_ready(&self) -> bool {
        self.left.is_ready() && self.right.is_ready()
    }
}
