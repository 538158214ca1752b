//! # greenlink-cli: GreenLink Command Line
//!
//! ## Subcommands
//!
//! - `greenlink assess`: repair feasibility verdict for a device.
//! - `greenlink award`: apply a green-credit award to a stats record.
//! - `greenlink route`: which screen a session would show.
//! - `greenlink demo <role>`: run a role's workflow over the seed data.
//!
//! ```bash
//! greenlink assess --type "iPhone 12" --age 3 --condition "software glitch"
//! greenlink award --action eol --points 1900
//! greenlink route --role technician --unverified
//! greenlink --time-scale 0 demo recycler
//! ```

pub mod assess;
pub mod award;
pub mod demo;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};

use greenlink_sim::SimConfig;

/// Load the simulation config, or defaults when no path is given, then
/// apply a time-scale override.
pub fn load_config(path: Option<&Path>, time_scale: Option<f64>) -> Result<SimConfig> {
    let mut config = match path {
        Some(path) => SimConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(scale) = time_scale {
        config = config.with_time_scale(scale);
        config.validate().context("invalid --time-scale")?;
    }
    Ok(config)
}

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
