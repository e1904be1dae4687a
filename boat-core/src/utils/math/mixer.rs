//! Differential drive mixing for the thruster pair.
//!
//! Turning slows the inner thruster to half of the commanded percent while the
//! outer one keeps it. Halving truncates toward zero, so `turn_left(-81)`
//! yields `(-40, -81)`.

use super::pulse::SpeedCommand;

/// Left/right speed percents for a two-thruster boat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveCommand {
    pub left: SpeedCommand,
    pub right: SpeedCommand,
}

impl DriveCommand {
    pub fn new(
        left: SpeedCommand,
        right: SpeedCommand,
    ) -> Self {
        DriveCommand { left, right }
    }

    /// Both thrusters at the same speed.
    pub fn forward(percent: SpeedCommand) -> Self {
        DriveCommand::new(percent, percent)
    }

    /// Left slower, right at full `percent`.
    pub fn turn_left(percent: SpeedCommand) -> Self {
        DriveCommand::new(percent.halved(), percent)
    }

    /// Right slower, left at full `percent`.
    pub fn turn_right(percent: SpeedCommand) -> Self {
        DriveCommand::new(percent, percent.halved())
    }

    /// `(left, right)` as raw percents.
    pub fn percents(&self) -> (i32, i32) {
        (self.left.get(), self.right.get())
    }
}
