//! Simulation configuration.
//!
//! Every simulated delay, the technician node's signer id, the consumer's
//! starting stats and the level-up policy. All fields default, so an empty
//! YAML document is a valid configuration.
//!
//! ```yaml
//! time_scale: 0.1
//! signer_id: TECH-NODE-BNG-007
//! level_up_policy: cascade
//! timing:
//!   logistics_dispatch_ms: 3000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenlink_scoring::{LevelUpPolicy, UserStats};

/// Node identifier stamped onto technician sign-offs.
pub const DEFAULT_SIGNER_ID: &str = "TECH-NODE-HYD-042";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse config: {0}")]
    ParseStr(#[from] serde_yaml::Error),

    #[error("time_scale must be a finite, non-negative number (got {0})")]
    InvalidTimeScale(f64),
}

/// Simulated delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pickup-Requested → In-Repair logistics dispatch.
    pub logistics_dispatch_ms: u64,
    /// Technician biometric authorization.
    pub biometric_auth_ms: u64,
    /// Signing a job's lifecycle record.
    pub sign_off_ms: u64,
    /// Technician ledger sync.
    pub chain_sync_ms: u64,
    /// One recycler recovery step.
    pub recovery_step_ms: u64,
    pub commodity_sale_ms: u64,
    /// Recycler compliance certificate export.
    pub compliance_export_ms: u64,
    /// Verifying → Approved.
    pub restock_verify_ms: u64,
    /// Approved → Dispatched.
    pub restock_dispatch_ms: u64,
    pub location_scan_ms: u64,
    pub document_upload_ms: u64,
    /// Directory message to a partner node.
    pub message_send_ms: u64,
    /// NGO impact index refresh.
    pub index_refresh_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            logistics_dispatch_ms: 5000,
            biometric_auth_ms: 1800,
            sign_off_ms: 2500,
            chain_sync_ms: 2000,
            recovery_step_ms: 1200,
            commodity_sale_ms: 2500,
            compliance_export_ms: 2000,
            restock_verify_ms: 2500,
            restock_dispatch_ms: 3000,
            location_scan_ms: 2000,
            document_upload_ms: 2000,
            message_send_ms: 2000,
            index_refresh_ms: 1500,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub timing: TimingConfig,
    pub signer_id: String,
    pub starting_stats: UserStats,
    pub level_up_policy: LevelUpPolicy,
    /// Multiplier applied to every delay. `0.0` resolves timers immediately.
    pub time_scale: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            signer_id: DEFAULT_SIGNER_ID.to_string(),
            starting_stats: UserStats {
                points: 1850,
                level: 4,
                rank: "Eco-Protector".to_string(),
                next_level_at: 2000,
            },
            level_up_policy: LevelUpPolicy::Single,
            time_scale: 1.0,
        }
    }
}

impl SimConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        Ok(())
    }

    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Scaled delay for a configured millisecond value.
    pub fn delay(&self, ms: u64) -> Duration {
        // Saturating float-to-int cast: NaN and negatives become 0.
        let scaled = (ms as f64 * self.time_scale).round() as u64;
        Duration::from_millis(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboards() {
        let c = SimConfig::default();
        assert_eq!(c.timing.logistics_dispatch_ms, 5000);
        assert_eq!(c.timing.recovery_step_ms, 1200);
        assert_eq!(c.signer_id, "TECH-NODE-HYD-042");
        assert_eq!(c.starting_stats.points, 1850);
        assert_eq!(c.starting_stats.next_level_at, 2000);
        assert_eq!(c.delay(2500), Duration::from_millis(2500));
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(SimConfig::from_yaml_str("{}").unwrap(), SimConfig::default());
    }

    #[test]
    fn partial_yaml_overrides() {
        let c = SimConfig::from_yaml_str(
            "time_scale: 0.5\nlevel_up_policy: cascade\ntiming:\n  sign_off_ms: 1000\n",
        )
        .unwrap();
        assert_eq!(c.level_up_policy, LevelUpPolicy::Cascade);
        assert_eq!(c.timing.sign_off_ms, 1000);
        assert_eq!(c.timing.biometric_auth_ms, 1800);
        assert_eq!(c.delay(c.timing.sign_off_ms), Duration::from_millis(500));
    }

    #[test]
    fn negative_time_scale_rejected() {
        assert!(matches!(
            SimConfig::from_yaml_str("time_scale: -1.0"),
            Err(ConfigError::InvalidTimeScale(_))
        ));
    }

    #[test]
    fn delay_is_total() {
        let c = SimConfig::default().with_time_scale(f64::NAN);
        assert_eq!(c.delay(1000), Duration::ZERO);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SimConfig::from_yaml_file(Path::new("/nonexistent/greenlink.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/greenlink.yaml"));
    }
}
