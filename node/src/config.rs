//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use restake_engine::RestakingConfig;
use restake_nullables::DEFAULT_UNBONDING_SECS;
use restake_types::Denom;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for a restake node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// The single denomination eligible for staking.
    #[serde(default = "default_bond_denom")]
    pub bond_denom: String,

    /// Seconds between an undelegation and the release of its tokens.
    #[serde(default = "default_unbonding_time")]
    pub unbonding_time_secs: u64,

    /// Restaking module settings.
    #[serde(default)]
    pub restaking: RestakingConfig,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to print Prometheus metrics after a run.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bond_denom() -> String {
    "ulbt".to_string()
}

fn default_unbonding_time() -> u64 {
    DEFAULT_UNBONDING_SECS
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn bond_denom(&self) -> Result<Denom, NodeError> {
        Ok(Denom::parse(self.bond_denom.as_str())?)
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bond_denom: default_bond_denom(),
            unbonding_time_secs: default_unbonding_time(),
            restaking: RestakingConfig::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.bond_denom, "ulbt");
        assert_eq!(config.unbonding_time_secs, DEFAULT_UNBONDING_SECS);
        assert_eq!(config.restaking.default_auto_restake_ratio.to_string(), "0.25");
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            bond_denom = "uatom"
            unbonding_time_secs = 60

            [restaking]
            authority = "rsk1council01"
            default_auto_restake_ratio = "0.5"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.bond_denom().unwrap().as_str(), "uatom");
        assert_eq!(config.unbonding_time_secs, 60);
        assert_eq!(config.restaking.authority, "rsk1council01");
        assert_eq!(config.restaking.default_auto_restake_ratio.to_string(), "0.5");
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn malformed_ratio_is_a_config_error() {
        let toml = r#"
            [restaking]
            default_auto_restake_ratio = "a quarter"
        "#;
        assert!(matches!(
            NodeConfig::from_toml_str(toml),
            Err(NodeError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_format = \"json\"").unwrap();
        let config = NodeConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.log_format().unwrap(), LogFormat::Json);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/restake.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
