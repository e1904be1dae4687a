//! Math utilities for the boat actuators.
//!
//! Everything in here is pure and platform-agnostic:
//!
//! - `pulse`: percent clamping and percent → pulse-width mapping
//! - `timing`: hardware clock → divider/wrap/level derivation
//! - `mixer`: differential drive mixing for the thruster pair

pub mod mixer;
pub mod pulse;
pub mod timing;

use core::fmt;

/// Errors raised while validating actuator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Pulse widths must satisfy `min < stop < max`.
    InvalidPulseWidths { min: u32, stop: u32, max: u32 },
    /// The clock divider must be non-zero.
    ZeroDivider,
    /// The target signal frequency must be non-zero.
    ZeroFrequency,
    /// The divider is too coarse to reach the target frequency at this clock.
    UnachievableFrequency {
        clock_hz: u32,
        divider: u32,
        target_hz: u32,
    },
    /// The derived wrap does not fit the 16-bit PWM counter.
    WrapOverflow { wrap: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            ConfigError::InvalidPulseWidths { min, stop, max } => write!(
                f,
                "pulse widths must satisfy min < stop < max (got {min}/{stop}/{max} us)"
            ),
            ConfigError::ZeroDivider => f.write_str("clock divider must be non-zero"),
            ConfigError::ZeroFrequency => f.write_str("target frequency must be non-zero"),
            ConfigError::UnachievableFrequency {
                clock_hz,
                divider,
                target_hz,
            } => write!(
                f,
                "{target_hz} Hz is unachievable from {clock_hz} Hz with divider {divider}"
            ),
            ConfigError::WrapOverflow { wrap } => {
                write!(f, "wrap {wrap} exceeds the 16-bit counter")
            }
        }
    }
}
