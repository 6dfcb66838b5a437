//! Engine configuration.
//!
//! Loaded by the CLI from the `[engine]` table of its TOML file; every field
//! has a default so an empty table is valid.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Default number of change-log entries kept per entity
pub const DEFAULT_MAX_CHANGE_HISTORY: usize = 100;

/// How absent and empty metric values compare.
///
/// The source sometimes omits a metric and sometimes renders it as an empty
/// string. `Strict` treats these as different values (a transition between
/// them counts as a metrics change); `AbsentEqualsEmpty` treats them as equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsPolicy {
    #[default]
    Strict,
    AbsentEqualsEmpty,
}

impl MetricsPolicy {
    /// Compare one metric under this policy
    pub fn equal(&self, old: Option<&str>, new: Option<&str>) -> bool {
        match self {
            MetricsPolicy::Strict => old == new,
            MetricsPolicy::AbsentEqualsEmpty => old.unwrap_or("") == new.unwrap_or(""),
        }
    }
}

impl FromStr for MetricsPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(MetricsPolicy::Strict),
            "absent_equals_empty" => Ok(MetricsPolicy::AbsentEqualsEmpty),
            other => Err(ConfigError::UnknownMetricsPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Root of the `current/`, `history/` and `changes/` namespaces
    pub data_dir: PathBuf,
    /// Change-log retention cap per entity
    pub max_change_history: usize,
    pub metrics_policy: MetricsPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            max_change_history: DEFAULT_MAX_CHANGE_HISTORY,
            metrics_policy: MetricsPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// # Errors
    ///
    /// `ZeroRetention` if `max_change_history` is 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_change_history == 0 {
            return Err(ConfigError::ZeroRetention(self.max_change_history));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_change_history, 100);
        assert_eq!(config.metrics_policy, MetricsPolicy::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let config = EngineConfig {
            max_change_history: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroRetention(0)));
    }

    #[test]
    fn test_metrics_policy_comparison() {
        assert!(!MetricsPolicy::Strict.equal(None, Some("")));
        assert!(MetricsPolicy::Strict.equal(Some("1"), Some("1")));
        assert!(MetricsPolicy::AbsentEqualsEmpty.equal(None, Some("")));
        assert!(!MetricsPolicy::AbsentEqualsEmpty.equal(None, Some("1")));
    }

    #[test]
    fn test_metrics_policy_parse() {
        assert_eq!("strict".parse::<MetricsPolicy>(), Ok(MetricsPolicy::Strict));
        assert_eq!(
            "absent_equals_empty".parse::<MetricsPolicy>(),
            Ok(MetricsPolicy::AbsentEqualsEmpty)
        );
        assert!("loose".parse::<MetricsPolicy>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"metrics_policy": "absent_equals_empty"}"#).unwrap();
        assert_eq!(config.metrics_policy, MetricsPolicy::AbsentEqualsEmpty);
        assert_eq!(config.max_change_history, 100);
    }
}
