//! # Lanegate Binary
//!
//! Process wiring for the lane-gating control core: loads the TOML
//! configuration, builds the simulation collaborators, registers the
//! lane state machine with the tick engine, and runs until stopped.
//!
//! # Usage
//!
//! ```bash
//! # Run with built-in defaults and the simulation backends
//! lanegate --simulate
//!
//! # Run with a config file and verbose logging
//! lanegate --config config/lanegate.toml -v
//!
//! # JSON logs
//! lanegate --simulate --json
//! ```

use clap::Parser;
use lanegate_common::config::LaneConfig;
use lanegate_control::drivers::{SimLineDriver, SimSubjectLocator};
use lanegate_control::{ActuatorController, LaneStateMachine, TickEngine};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Lanegate - lane-gating control core for a behavioral-testing apparatus
#[derive(Parser, Debug)]
#[command(name = "lanegate")]
#[command(version)]
#[command(about = "Lane-gating control loop: actuator peek cycle + supervisory state machine")]
struct Args {
    /// Path to the lane configuration file (lanegate.toml).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use the simulation backends (the only backends in this build).
    #[arg(short = 's', long)]
    simulate: bool,

    /// Perform a manual recovery (blocking pull) and exit instead of
    /// running the lane cycle.
    #[arg(long)]
    recover: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("lanegate run failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(&args);

    info!("lanegate v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => LaneConfig::load(path)?,
        None => {
            info!("no config file given, using built-in defaults");
            LaneConfig::default()
        }
    };

    if !args.simulate {
        info!("no hardware backend in this build, falling back to simulation");
    }
    let driver = SimLineDriver::new();
    let mut locator = SimSubjectLocator::new();

    let mut actuator = ActuatorController::new(Box::new(driver), &config);

    if args.recover {
        info!("manual recovery: blocking pull");
        actuator.pull(true)?;
        actuator.rest()?;
        info!("manual recovery complete");
        return Ok(());
    }

    let mut engine = TickEngine::new(config.state_timer());

    let running = engine.running_flag();
    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let mut machine = LaneStateMachine::new(&mut actuator, &mut locator, &config);
    machine.setup(&mut engine)?;

    // Cleanup runs exactly once, on both the normal and the error
    // path; a failed tick aborts the run first.
    let run_result = engine.run(&mut machine);
    let cleanup_result = machine.clean_up();
    run_result?;
    cleanup_result?;

    info!("lanegate shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
