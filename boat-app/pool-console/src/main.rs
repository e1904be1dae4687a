mod console;
mod input;
mod keys;
#[cfg(feature = "rpi")]
mod rpi;

use std::{ops::ControlFlow, process::ExitCode, thread, time::Duration};

use boat_core::utils::{
    controllers::{
        conveyor::DEFAULT_BELT_PIN,
        thrusters::{DEFAULT_LEFT_PIN, DEFAULT_RIGHT_PIN},
    },
    ConveyorConfig, ConveyorServo, PulseWidthSpec, ServoHal, SpeedDrive, ThrusterPair,
};
use clap::{Parser, Subcommand, ValueEnum};
use console::{ConsolePwm, ConsoleServoHal};
use input::{KeyPoll, KeySource};
use keys::PoolSession;
use serde::de::DeserializeOwned;
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    #[clap(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Drive the thruster pair from the keyboard (W/A/S/D, space, Q)
    Thrusters {
        #[clap(long, default_value_t = DEFAULT_LEFT_PIN)]
        left_pin: u8,
        #[clap(long, default_value_t = DEFAULT_RIGHT_PIN)]
        right_pin: u8,
        /// base thrust change per W/S press (percent)
        #[clap(long, default_value_t = 10)]
        step: i32,
        /// pulse calibration as JSON, e.g. '{"min":1000,"stop":1500,"max":2000}'
        #[clap(long)]
        pulse: Option<String>,
        #[clap(long, value_enum, default_value_t = Backend::Console)]
        backend: Backend,
    },
    /// Cycle the conveyor belt servo between running and stopped
    Belt {
        #[clap(long, default_value_t = DEFAULT_BELT_PIN)]
        pin: u8,
        /// system clock reported by the simulated PWM slice
        #[clap(long, default_value_t = 125_000_000)]
        clock_hz: u32,
        /// belt config as JSON (divider, target_hz, pulse)
        #[clap(long)]
        config: Option<String>,
        #[clap(long, default_value_t = 60)]
        speed: i32,
        #[clap(long, default_value_t = 3)]
        cycles: u32,
        #[clap(long, default_value_t = 5000)]
        run_ms: u64,
        #[clap(long, default_value_t = 2000)]
        pause_ms: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// log pulses instead of driving GPIO
    Console,
    /// Raspberry Pi GPIO through rppal (needs the `rpi` feature)
    Rpi,
}

fn run_thrusters<H: ServoHal>(
    hal: H,
    left_pin: u8,
    right_pin: u8,
    step: i32,
    spec: Option<PulseWidthSpec>,
) -> ExitCode {
    let mut pair = ThrusterPair::new(hal, spec);
    if let Err(e) = pair.init(left_pin, right_pin) {
        error!("propulsion init failed: {}", e);
        return ExitCode::FAILURE;
    }
    println!("Propulsion ready. Use W/A/S/D, space=stop, Q=quit");

    let keys = KeySource::open();
    let mut session = PoolSession::new(step);
    loop {
        match keys.poll(POLL_INTERVAL) {
            KeyPoll::Key(key) => {
                if let ControlFlow::Break(()) = session.handle(&mut pair, key) {
                    break;
                }
            }
            KeyPoll::Idle => {}
            KeyPoll::Closed => {
                info!("input closed");
                break;
            }
        }
    }
    drop(keys);

    pair.shutdown();
    ExitCode::SUCCESS
}

fn run_belt(
    pin: u8,
    clock_hz: u32,
    config: Option<ConveyorConfig>,
    speed: i32,
    cycles: u32,
    run: Duration,
    pause: Duration,
) -> ExitCode {
    let mut belt = match ConveyorServo::init(ConsolePwm::new(clock_hz), pin, config) {
        Ok(belt) => belt,
        Err(e) => {
            error!("belt init failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for cycle in 1..=cycles {
        info!(cycle, speed, "belt running");
        belt.forward(speed);
        thread::sleep(run);
        info!(cycle, "belt paused");
        belt.stop();
        thread::sleep(pause);
    }

    belt.stop();
    ExitCode::SUCCESS
}

fn parse_json<T: DeserializeOwned>(
    what: &str,
    raw: Option<&str>,
) -> Result<Option<T>, ExitCode> {
    raw.map(serde_json::from_str::<T>)
        .transpose()
        .map_err(|e| {
            error!("invalid {} JSON: {}", what, e);
            ExitCode::FAILURE
        })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    match opts.mode {
        Mode::Thrusters {
            left_pin,
            right_pin,
            step,
            pulse,
            backend,
        } => {
            let spec = match parse_json::<PulseWidthSpec>("pulse", pulse.as_deref()) {
                Ok(spec) => spec,
                Err(code) => return code,
            };
            match backend {
                Backend::Console => {
                    run_thrusters(ConsoleServoHal, left_pin, right_pin, step, spec)
                }
                #[cfg(feature = "rpi")]
                Backend::Rpi => {
                    run_thrusters(rpi::RppalServoHal::default(), left_pin, right_pin, step, spec)
                }
                #[cfg(not(feature = "rpi"))]
                Backend::Rpi => {
                    error!("built without the `rpi` feature");
                    ExitCode::FAILURE
                }
            }
        }
        Mode::Belt {
            pin,
            clock_hz,
            config,
            speed,
            cycles,
            run_ms,
            pause_ms,
        } => {
            let config = match parse_json::<ConveyorConfig>("belt config", config.as_deref()) {
                Ok(config) => config,
                Err(code) => return code,
            };
            run_belt(
                pin,
                clock_hz,
                config,
                speed,
                cycles,
                Duration::from_millis(run_ms),
                Duration::from_millis(pause_ms),
            )
        }
    }
}
