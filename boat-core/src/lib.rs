//! Core actuator control for the cleanup boat on no-std embedded platforms.
//!
//! Converts signed speed percentages into servo/ESC pulse widths and drives
//! them out through either a microsecond-based or a tick-based PWM backend.
//! For a runnable host harness, see the `pool-console` crate.
#![no_std]

pub mod utils;
