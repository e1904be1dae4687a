//! Utility re-exports for the cleanup boat actuators.
//!
//! - `math`: speed clamping, pulse-width mapping, timer timing and drive mixing
//! - `controllers`: actuator channels and the two hardware backends

pub mod controllers;
pub mod math;

pub use controllers::{
    conveyor::{ConveyorConfig, ConveyorServo, PwmTimebase},
    thrusters::{ServoHal, ThrusterPair},
    ActuatorChannel, ChannelState, DriveError, SpeedDrive,
};
pub use math::{
    mixer::DriveCommand,
    pulse::{clamp_percent, PulseWidthSpec, SpeedCommand},
    timing::TimingConfig,
    ConfigError,
};
