//! # Machine Registry Configuration
//!
//! Registration lifetime policy and the overlay address range.

use chrono::Duration;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Configuration loading and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse registry config: {0}")]
    Parse(String),

    /// The values are inconsistent.
    #[error("invalid registry config: {0}")]
    Invalid(String),
}

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Upper bound on a registration lifetime, counted from the clamp time.
    pub max_machine_registration_secs: u64,

    /// Lifetime granted when the client asks for none.
    pub default_machine_registration_secs: u64,

    /// Range overlay addresses are allocated from.
    pub ip_prefix: IpNet,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_machine_registration_secs: 180 * DAY_SECS,
            default_machine_registration_secs: DAY_SECS,
            ip_prefix: IpNet::V4(ipnet::Ipv4Net::new_assert([100, 64, 0, 0].into(), 10)),
        }
    }
}

impl RegistryConfig {
    /// Create a config for testing (a small address range).
    pub fn for_testing() -> Self {
        Self {
            ip_prefix: IpNet::V4(ipnet::Ipv4Net::new_assert([100, 64, 0, 0].into(), 29)),
            ..Self::default()
        }
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    ///
    /// ```toml
    /// max_machine_registration_secs = 15552000
    /// default_machine_registration_secs = 86400
    /// ip_prefix = "100.64.0.0/10"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_machine_registration_secs > self.max_machine_registration_secs {
            return Err(ConfigError::Invalid(format!(
                "default registration ({}s) exceeds maximum ({}s)",
                self.default_machine_registration_secs, self.max_machine_registration_secs
            )));
        }
        if !matches!(self.ip_prefix, IpNet::V4(_)) {
            return Err(ConfigError::Invalid(format!(
                "prefix {} is not IPv4",
                self.ip_prefix
            )));
        }
        Ok(())
    }

    /// Maximum registration lifetime.
    pub fn max_registration(&self) -> Duration {
        secs_to_duration(self.max_machine_registration_secs)
    }

    /// Default registration lifetime.
    pub fn default_registration(&self) -> Duration {
        secs_to_duration(self.default_machine_registration_secs)
    }
}

fn secs_to_duration(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX).min(i64::MAX / 1000))
}
