//! CLI configuration file
//!
//! ```toml
//! [engine]
//! data_dir = "data"
//! max_change_history = 100
//! metrics_policy = "strict"
//!
//! [[companies]]
//! slug = "afry-ab"
//! name = "AFRY AB"
//! url = "https://example.test/en/company/afry-ab"
//! ```
//!
//! Precedence for the data directory: file, then `INSIDERTRACK_DATA_DIR`,
//! then `--data-dir`.

use insidertrack_core::errors::ConfigError;
use insidertrack_core::{EngineConfig, EntityKey};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "insidertrack.toml";
pub const DATA_DIR_ENV: &str = "INSIDERTRACK_DATA_DIR";

/// One tracked company
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyConfig {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub companies: Vec<CompanyConfig>,
}

impl CliConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load `path`. A missing file yields defaults unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Parse(format!("{}: {}", path.display(), e))),
        }
    }

    /// Apply environment and command-line overrides
    pub fn apply_overrides(&mut self, env_data_dir: Option<String>, flag_data_dir: Option<PathBuf>) {
        if let Some(dir) = env_data_dir.filter(|d| !d.trim().is_empty()) {
            self.engine.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = flag_data_dir {
            self.engine.data_dir = dir;
        }
    }

    /// # Errors
    ///
    /// Engine settings are out of range, or a company slug is invalid or
    /// listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        let mut seen = HashSet::new();
        for company in &self.companies {
            if let Err(e) = EntityKey::new(company.slug.as_str()) {
                return Err(ConfigError::InvalidSlug {
                    slug: company.slug.clone(),
                    reason: e.message().to_string(),
                });
            }
            if !seen.insert(company.slug.as_str()) {
                return Err(ConfigError::DuplicateCompany(company.slug.clone()));
            }
        }
        Ok(())
    }

    pub fn company(&self, slug: &str) -> Option<&CompanyConfig> {
        self.companies.iter().find(|c| c.slug == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insidertrack_core::MetricsPolicy;

    #[test]
    fn test_full_file_parses() {
        let config = CliConfig::from_toml_str(
            r#"
            [engine]
            data_dir = "/var/lib/insidertrack"
            max_change_history = 50
            metrics_policy = "absent_equals_empty"

            [[companies]]
            slug = "afry-ab"
            name = "AFRY AB"
            url = "https://example.test/en/company/afry-ab"

            [[companies]]
            slug = "bouvet-asa"
            name = "Bouvet ASA"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.data_dir, PathBuf::from("/var/lib/insidertrack"));
        assert_eq!(config.engine.max_change_history, 50);
        assert_eq!(config.engine.metrics_policy, MetricsPolicy::AbsentEqualsEmpty);
        assert_eq!(config.companies.len(), 2);
        assert_eq!(config.companies[1].url, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.engine.max_change_history, 100);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = CliConfig::from_toml_str("[engine]\nretention = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let config = CliConfig::from_toml_str(
            r#"
            [[companies]]
            slug = "afry-ab"
            name = "AFRY"
            [[companies]]
            slug = "afry-ab"
            name = "AFRY again"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCompany("afry-ab".to_string()))
        );
    }

    #[test]
    fn test_invalid_slug_rejected() {
        let config = CliConfig::from_toml_str(
            "[[companies]]\nslug = \"../etc\"\nname = \"x\"\n",
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSlug { .. })
        ));
    }

    #[test]
    fn test_zero_retention_rejected() {
        let config = CliConfig::from_toml_str("[engine]\nmax_change_history = 0\n").unwrap();
        assert_eq!(config.validate(), Err(ConfigError::ZeroRetention(0)));
    }

    #[test]
    fn test_flag_overrides_env_overrides_file() {
        let mut config = CliConfig::from_toml_str("[engine]\ndata_dir = \"from-file\"\n").unwrap();

        config.apply_overrides(Some("from-env".to_string()), None);
        assert_eq!(config.engine.data_dir, PathBuf::from("from-env"));

        config.apply_overrides(Some("from-env".to_string()), Some(PathBuf::from("from-flag")));
        assert_eq!(config.engine.data_dir, PathBuf::from("from-flag"));
    }

    #[test]
    fn test_missing_optional_file_is_defaults() {
        let config = CliConfig::load(Path::new("/nonexistent/insidertrack.toml"), false).unwrap();
        assert!(config.companies.is_empty());
        assert!(CliConfig::load(Path::new("/nonexistent/insidertrack.toml"), true).is_err());
    }
}
