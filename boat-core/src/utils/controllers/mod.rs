//! Actuator controllers for the cleanup boat.
//!
//! - `thrusters`: dual ESC surface over a microsecond pulse HAL
//! - `conveyor`: single belt servo over a tick-based PWM timer
//!
//! Both backends keep one `ActuatorChannel` per physical output and share the
//! `SpeedDrive` surface.

pub mod conveyor;
pub mod thrusters;

use core::fmt;

use crate::utils::math::{
    pulse::{clamp_percent, PulseWidthSpec},
    ConfigError,
};

/// Errors surfaced while bringing an actuator backend up.
#[derive(Debug)]
pub enum DriveError<E: core::fmt::Debug> {
    /// The hardware layer refused to initialize.
    Hal(E),
    /// Timing or pulse-width configuration is unusable.
    Config(ConfigError),
    /// `init` was called on a backend that is already ready.
    AlreadyInitialized,
}

impl<E: core::fmt::Debug> From<ConfigError> for DriveError<E> {
    fn from(e: ConfigError) -> Self {
        DriveError::Config(e)
    }
}

impl<E: core::fmt::Debug> fmt::Display for DriveError<E> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DriveError::Hal(e) => write!(f, "hardware init failed: {e:?}"),
            DriveError::Config(e) => write!(f, "invalid configuration: {e}"),
            DriveError::AlreadyInitialized => f.write_str("actuator already initialized"),
        }
    }
}

/// Common speed surface of every actuator backend.
pub trait SpeedDrive {
    /// Command a signed speed percent; out-of-range values are clamped.
    fn set_speed(
        &mut self,
        percent: i32,
    );

    /// Command the neutral pulse. Safe to repeat.
    fn stop(&mut self) {
        self.set_speed(0);
    }

    fn is_ready(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Uninitialized,
    Ready,
}

/// One physical output: its pin and the last pulse width commanded on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorChannel {
    pin: u8,
    state: ChannelState,
    pulse_us: Option<u32>,
}

impl ActuatorChannel {
    pub fn new(pin: u8) -> Self {
        ActuatorChannel {
            pin,
            state: ChannelState::Uninitialized,
            pulse_us: None,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ChannelState::Ready
    }

    /// Last commanded pulse width, `None` until the first command.
    pub fn pulse_us(&self) -> Option<u32> {
        self.pulse_us
    }

    pub(crate) fn mark_ready(&mut self) {
        self.state = ChannelState::Ready;
    }

    /// Clamp, map and cache a speed command.
    ///
    /// Returns the pulse width to write, or `None` if the channel is not ready.
    pub fn command(
        &mut self,
        percent: i32,
        spec: &PulseWidthSpec,
    ) -> Option<u32> {
        if !self.is_ready() {
            tracing::warn!(pin = self.pin, percent, "command ignored, channel not initialized");
            return None;
        }
        let percent = clamp_percent(percent);
        let pulse_us = spec.percent_to_duration(percent);
        tracing::debug!(pin = self.pin, percent, pulse_us, "pulse width computed");
        self.pulse_us = Some(pulse_us);
        Some(pulse_us)
    }
}
