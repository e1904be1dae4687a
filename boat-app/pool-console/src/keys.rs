//! Single-key thruster control for pool testing.
//!
//! `w`/`s` raise and lower the base thrust, `a`/`d` turn at the base thrust,
//! space stops, `q` quits. Any other key re-applies the base thrust straight
//! ahead.

use std::ops::ControlFlow;

use boat_core::utils::{clamp_percent, ServoHal, SpeedDrive, ThrusterPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Stop,
    /// Raise (`1`) or lower (`-1`) the base thrust by one step.
    Throttle(i32),
    TurnLeft,
    TurnRight,
    Forward,
}

/// Map a key press; line endings and NULs are not key presses.
pub fn key_action(key: char) -> Option<KeyAction> {
    let action = match key.to_ascii_lowercase() {
        '\n' | '\r' | '\0' => return None,
        'q' => KeyAction::Quit,
        ' ' => KeyAction::Stop,
        'w' => KeyAction::Throttle(1),
        's' => KeyAction::Throttle(-1),
        'a' => KeyAction::TurnLeft,
        'd' => KeyAction::TurnRight,
        _ => KeyAction::Forward,
    };
    Some(action)
}

/// Base thrust state of one pool session.
pub struct PoolSession {
    base: i32,
    step: i32,
}

impl PoolSession {
    pub fn new(step: i32) -> Self {
        PoolSession {
            base: 0,
            step: clamp_percent(step),
        }
    }

    #[cfg(test)]
    pub fn base(&self) -> i32 {
        self.base
    }

    /// Apply one key press to the thrusters. Breaks on quit.
    pub fn handle<H: ServoHal>(
        &mut self,
        pair: &mut ThrusterPair<H>,
        key: char,
    ) -> ControlFlow<()> {
        let Some(action) = key_action(key) else {
            return ControlFlow::Continue(());
        };
        match action {
            KeyAction::Quit => return ControlFlow::Break(()),
            KeyAction::Stop => {
                self.base = 0;
                pair.stop();
                return ControlFlow::Continue(());
            }
            KeyAction::Throttle(dir) => {
                self.base = clamp_percent(self.base + dir * self.step);
                pair.forward(self.base);
            }
            KeyAction::TurnLeft => pair.turn_left(self.base),
            KeyAction::TurnRight => pair.turn_right(self.base),
            KeyAction::Forward => pair.forward(self.base),
        }
        // raw terminal mode needs the explicit carriage return
        print!("Thrust: {}%\r\n", self.base);
        ControlFlow::Continue(())
    }
}
