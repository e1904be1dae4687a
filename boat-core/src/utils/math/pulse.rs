//! Speed percent clamping and pulse-width mapping.
//!
//! A continuous-rotation servo or ESC reads its commanded speed from the width
//! of a ~50 Hz pulse: `stop` holds still, `min` is full reverse and `max` is
//! full forward. The two half-ranges are interpolated independently, so a
//! servo whose neutral point is off-centre still reaches both extremes.
//!
//! # Example
//! ```rust
//! use boat_core::utils::math::pulse::{PulseWidthSpec, SpeedCommand};
//! let spec = PulseWidthSpec::default();
//! assert_eq!(spec.percent_to_duration(SpeedCommand::new(50).get()), 1750);
//! ```

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Smallest legal speed percent (full reverse).
pub const PERCENT_MIN: i32 = -100;
/// Largest legal speed percent (full forward).
pub const PERCENT_MAX: i32 = 100;

/// Neutral pulse width (us).
pub const STOP_US: u32 = 1500;
/// Full reverse pulse width (us).
pub const MIN_US: u32 = 1000;
/// Full forward pulse width (us).
pub const MAX_US: u32 = 2000;

/// Bound any signed speed value to `[-100, 100]`.
pub fn clamp_percent(v: i32) -> i32 {
    v.clamp(PERCENT_MIN, PERCENT_MAX)
}

/// A speed percent that is always within `[-100, 100]`; `0` means stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeedCommand(i32);

impl SpeedCommand {
    pub const STOP: SpeedCommand = SpeedCommand(0);

    /// Clamp `percent` into range. Out-of-range input is never an error.
    pub fn new(percent: i32) -> Self {
        SpeedCommand(clamp_percent(percent))
    }

    pub fn get(self) -> i32 {
        self.0
    }

    /// Half of this command, truncated toward zero.
    pub(crate) fn halved(self) -> Self {
        SpeedCommand(self.0 / 2)
    }
}

impl From<i32> for SpeedCommand {
    fn from(percent: i32) -> Self {
        SpeedCommand::new(percent)
    }
}

impl From<SpeedCommand> for i32 {
    fn from(cmd: SpeedCommand) -> Self {
        cmd.0
    }
}

/// Stop/min/max pulse widths (us) for one actuator family.
///
/// Always satisfies `min < stop < max`, including when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPulseWidths")]
pub struct PulseWidthSpec {
    min: u32,
    stop: u32,
    max: u32,
}

#[derive(Deserialize)]
struct RawPulseWidths {
    min: u32,
    stop: u32,
    max: u32,
}

impl TryFrom<RawPulseWidths> for PulseWidthSpec {
    type Error = ConfigError;

    fn try_from(raw: RawPulseWidths) -> Result<Self, Self::Error> {
        PulseWidthSpec::new(raw.min, raw.stop, raw.max)
    }
}

impl Default for PulseWidthSpec {
    fn default() -> Self {
        PulseWidthSpec {
            min: MIN_US,
            stop: STOP_US,
            max: MAX_US,
        }
    }
}

impl PulseWidthSpec {
    /// Build pulse widths, rejecting anything that is not strictly `min < stop < max`.
    pub fn new(
        min: u32,
        stop: u32,
        max: u32,
    ) -> Result<Self, ConfigError> {
        if min < stop && stop < max {
            Ok(PulseWidthSpec { min, stop, max })
        } else {
            Err(ConfigError::InvalidPulseWidths { min, stop, max })
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn stop(&self) -> u32 {
        self.stop
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Map a clamped percent to a pulse width, truncated to whole microseconds.
    ///
    /// Positive percents interpolate from `stop` toward `max`, negative ones
    /// from `stop` toward `min`. The caller clamps first; out-of-range input is
    /// clamped here as well rather than extrapolated.
    pub fn percent_to_duration(
        &self,
        percent: i32,
    ) -> u32 {
        debug_assert!((PERCENT_MIN..=PERCENT_MAX).contains(&percent));
        let percent = clamp_percent(percent) as i64;
        let stop = self.stop as i64;
        let offset = match percent {
            0 => 0,
            p if p > 0 => (self.max as i64 - stop) * p / 100,
            p => (stop - self.min as i64) * p / 100,
        };
        (stop + offset) as u32
    }
}
