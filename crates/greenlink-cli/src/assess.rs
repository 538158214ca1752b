//! `greenlink assess`: live repair feasibility for an intake form.

use anyhow::{bail, Result};
use clap::Args;

use greenlink_scoring::assess;

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Model name, e.g. "MacBook Pro".
    #[arg(long = "type", value_name = "MODEL")]
    pub device_type: String,

    /// Age in years. Leading digits are read, e.g. "3 years".
    #[arg(long)]
    pub age: String,

    /// Observed condition or issue.
    #[arg(long)]
    pub condition: String,

    /// Print the assessment as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_assess(args: &AssessArgs) -> Result<u8> {
    let Some(feasibility) = assess(&args.device_type, &args.age, &args.condition) else {
        bail!("model, age and condition are all required");
    };
    tracing::debug!(score = feasibility.score, verdict = %feasibility.verdict, "assessed");

    if args.json {
        crate::print_json(&feasibility)?;
    } else {
        println!("Feasibility: {} (score {}/6)", feasibility.verdict, feasibility.score);
        println!("  {}", feasibility.advisory);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(device_type: &str, age: &str, condition: &str) -> AssessArgs {
        AssessArgs {
            device_type: device_type.to_string(),
            age: age.to_string(),
            condition: condition.to_string(),
            json: true,
        }
    }

    #[test]
    fn complete_form_succeeds() {
        assert_eq!(run_assess(&args("iPhone 12", "3", "software glitch")).unwrap(), 0);
    }

    #[test]
    fn blank_field_fails() {
        assert!(run_assess(&args("iPhone 12", " ", "software")).is_err());
    }
}
