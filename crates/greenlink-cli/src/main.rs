//! # greenlink CLI entry point
//!
//! Parses arguments, installs the tracing subscriber and dispatches to the
//! subcommand handlers in the library.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use greenlink_cli::assess::{run_assess, AssessArgs};
use greenlink_cli::award::{run_award, AwardArgs};
use greenlink_cli::demo::{run_demo, DemoArgs};
use greenlink_cli::load_config;
use greenlink_cli::route::{run_route, RouteArgs};

/// GreenLink e-waste platform tools.
#[derive(Parser, Debug)]
#[command(name = "greenlink", version, about, long_about = None)]
struct Cli {
    /// Verbose output. Repeat for more (-v, -vv, -vvv). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Simulation config (YAML).
    #[arg(long, env = "GREENLINK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Multiplier applied to every simulated delay.
    #[arg(long, global = true)]
    time_scale: Option<f64>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Repair feasibility verdict for a device.
    Assess(AssessArgs),

    /// Apply a green-credit award.
    Award(AwardArgs),

    /// Resolve which screen a session shows.
    Route(RouteArgs),

    /// Run a role's workflow over the demo seed data.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    tracing::debug!("greenlink CLI starting");

    let result = load_config(cli.config.as_deref(), cli.time_scale).and_then(|config| {
        match cli.command {
            Commands::Assess(args) => run_assess(&args),
            Commands::Award(args) => run_award(&args, &config),
            Commands::Route(args) => run_route(&args),
            Commands::Demo(args) => run_demo(&args, config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
