//! Timer timing derived from a live hardware clock.
//!
//! Tick-based PWM peripherals count `clock_hz / divider` ticks per second and
//! restart after `wrap + 1` ticks, so the output frequency is
//! `clock_hz / divider / (wrap + 1)`. The wrap is derived once at init; each
//! speed change only converts a pulse width to a tick level on the same basis.
//!
//! # Example
//! ```rust
//! use boat_core::utils::math::timing::TimingConfig;
//! let timing = TimingConfig::new(125_000_000, 64, 50).unwrap();
//! assert_eq!(timing.wrap(), 39_061);
//! assert_eq!(timing.duration_to_level(1500), 2929);
//! ```

use serde::Serialize;

use super::ConfigError;

/// Servo/ESC signal frequency (Hz).
pub const SERVO_FREQ_HZ: u32 = 50;
/// Clock divider that keeps a 50 Hz wrap inside 16 bits on RP2040-class parts.
pub const DEFAULT_DIVIDER: u32 = 64;

const US_PER_SECOND: u64 = 1_000_000;

/// Derive the wrap (`period ticks - 1`) for `target_hz` at the given clock.
///
/// `wrap = floor(clock_hz / divider / target_hz) - 1`; anything `<= 0` means
/// the target frequency cannot be produced with this divider.
pub fn compute_wrap(
    clock_hz: u32,
    divider: u32,
    target_hz: u32,
) -> Result<u32, ConfigError> {
    if divider == 0 {
        return Err(ConfigError::ZeroDivider);
    }
    if target_hz == 0 {
        return Err(ConfigError::ZeroFrequency);
    }
    let ticks_per_period = clock_hz / divider / target_hz;
    if ticks_per_period <= 1 {
        return Err(ConfigError::UnachievableFrequency {
            clock_hz,
            divider,
            target_hz,
        });
    }
    Ok(ticks_per_period - 1)
}

/// Convert a pulse width to a whole number of divided-clock ticks (truncated).
///
/// A zero divider yields level 0.
pub fn duration_to_level(
    duration_us: u32,
    clock_hz: u32,
    divider: u32,
) -> u32 {
    let ticks = (duration_us as u64 * clock_hz as u64)
        .checked_div(divider as u64 * US_PER_SECOND)
        .unwrap_or(0);
    ticks.min(u32::MAX as u64) as u32
}

/// A validated clock/divider/wrap triple for one PWM slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingConfig {
    clock_hz: u32,
    divider: u32,
    wrap: u32,
    target_hz: u32,
}

impl TimingConfig {
    /// Derive the wrap for `target_hz`, failing if it is unachievable.
    pub fn new(
        clock_hz: u32,
        divider: u32,
        target_hz: u32,
    ) -> Result<Self, ConfigError> {
        let wrap = compute_wrap(clock_hz, divider, target_hz)?;
        Ok(TimingConfig {
            clock_hz,
            divider,
            wrap,
            target_hz,
        })
    }

    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn divider(&self) -> u32 {
        self.divider
    }

    /// Period length in ticks, minus one.
    pub fn wrap(&self) -> u32 {
        self.wrap
    }

    pub fn target_hz(&self) -> u32 {
        self.target_hz
    }

    /// Wrap as a 16-bit counter top, for peripherals with 16-bit counters.
    pub fn wrap_u16(&self) -> Result<u16, ConfigError> {
        u16::try_from(self.wrap).map_err(|_| ConfigError::WrapOverflow { wrap: self.wrap })
    }

    /// Tick level for a pulse width on this configuration's tick basis.
    pub fn duration_to_level(
        &self,
        duration_us: u32,
    ) -> u32 {
        duration_to_level(duration_us, self.clock_hz, self.divider)
    }

    /// Frequency actually produced by this divider/wrap pair.
    pub fn achieved_frequency_hz(&self) -> f32 {
        self.clock_hz as f32 / self.divider as f32 / (self.wrap as f32 + 1.0)
    }

    /// Length of one signal period in microseconds, truncated.
    pub fn period_us(&self) -> u32 {
        let ticks = self.wrap as u64 + 1;
        (ticks * self.divider as u64 * US_PER_SECOND / self.clock_hz as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_wrap_pico_defaults() {
        let wrap = compute_wrap(125_000_000, 64, 50).unwrap();
        assert_eq!(wrap, 125_000_000 / 64 / 50 - 1);
        assert_eq!(wrap, 39_061);
    }

    #[test]
    fn test_achieved_frequency_close_to_target() {
        let timing = TimingConfig::new(125_000_000, 64, 50).unwrap();
        let hz = timing.achieved_frequency_hz();
        assert!((hz - 50.0).abs() < 0.01, "got {} Hz", hz);
        assert_eq!(timing.period_us(), 19_999);
    }

    #[test]
    fn test_other_clocks() {
        // RP2350 default system clock
        let timing = TimingConfig::new(150_000_000, 64, 50).unwrap();
        assert_eq!(timing.wrap(), 46_874);
        assert!((timing.achieved_frequency_hz() - 50.0).abs() < 0.01);
        assert!(timing.wrap_u16().is_ok());
    }

    #[test]
    fn test_unachievable_frequency() {
        // exactly one tick per period leaves a zero wrap
        assert_eq!(
            compute_wrap(3_200, 64, 50),
            Err(ConfigError::UnachievableFrequency {
                clock_hz: 3_200,
                divider: 64,
                target_hz: 50
            })
        );
        assert!(compute_wrap(1_000, 64, 50).is_err());
        assert!(TimingConfig::new(1_000, 64, 50).is_err());
        assert_eq!(compute_wrap(6_400, 64, 50), Ok(1));
        assert_eq!(compute_wrap(9_600, 64, 50), Ok(2));
    }

    #[test]
    fn test_zero_parameters() {
        assert_eq!(compute_wrap(125_000_000, 0, 50), Err(ConfigError::ZeroDivider));
        assert_eq!(compute_wrap(125_000_000, 64, 0), Err(ConfigError::ZeroFrequency));
        assert_eq!(duration_to_level(1500, 125_000_000, 0), 0);
    }

    #[test]
    fn test_wrap_overflow() {
        let timing = TimingConfig::new(125_000_000, 16, 50).unwrap();
        assert_eq!(timing.wrap(), 156_249);
        assert_eq!(
            timing.wrap_u16(),
            Err(ConfigError::WrapOverflow { wrap: 156_249 })
        );
    }

    #[test]
    fn test_duration_to_level() {
        // one tick is 0.512 us at 125 MHz / 64
        assert_eq!(duration_to_level(1000, 125_000_000, 64), 1953);
        assert_eq!(duration_to_level(1500, 125_000_000, 64), 2929);
        assert_eq!(duration_to_level(1750, 125_000_000, 64), 3417);
        assert_eq!(duration_to_level(2000, 125_000_000, 64), 3906);
        assert_eq!(duration_to_level(0, 125_000_000, 64), 0);
    }

    #[test]
    fn test_level_and_wrap_share_tick_basis() {
        let timing = TimingConfig::new(125_000_000, 64, 50).unwrap();
        // a full-period pulse lands on the wrap boundary
        assert_eq!(timing.duration_to_level(20_000), timing.wrap() + 1);
    }
}
