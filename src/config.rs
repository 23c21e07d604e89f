//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-validator.toml` in current directory
//! 4. `~/.config/sql-validator/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [analysis]
//! command_type = "System.Data.SqlClient.SqlCommand"
//! parameters_member = "Parameters"
//! add_parameter_methods = ["AddWithValue"]
//! placeholder_marker = "@"
//! placeholder_matching = "exact"   # exact, ignore_case
//! unmapped_types = "lenient"       # lenient, strict
//!
//! [probe]
//! connection = "file:schema.sql"   # or http(s)://host/validate
//! dialect = "mssql"
//! timeout_ms = 5000
//!
//! [retry]
//! max_retries = 3
//! initial_delay_ms = 1000
//! max_delay_ms = 30000
//! backoff_factor = 2.0
//!
//! [rules]
//! disabled = ["SQLV002"]
//!
//! [rules.severity]
//! SQLV001 = "error"
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_VALIDATOR_CONNECTION` | Schema probe connection target |
//! | `SQL_VALIDATOR_UNMAPPED_TYPES` | `lenient` or `strict` |

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    analysis::UnmappedTypePolicy,
    error::{AppResult, config_error},
    query::SqlDialect
};

/// Environment variable holding the probe connection target
pub const CONNECTION_ENV: &str = "SQL_VALIDATOR_CONNECTION";
/// Environment variable holding the unmapped type policy
pub const UNMAPPED_TYPES_ENV: &str = "SQL_VALIDATOR_UNMAPPED_TYPES";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub probe:    ProbeConfig,
    #[serde(default)]
    pub retry:    RetryConfig,
    #[serde(default)]
    pub rules:    RulesConfig
}

/// How placeholders in command text are compared with binding names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderMatching {
    #[default]
    Exact,
    IgnoreCase
}

/// What counts as a command construction and a parameter registration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fully qualified type whose constructions are analyzed
    pub command_type:          String,
    /// Member on the command holding its parameter collection
    pub parameters_member:     String,
    /// Collection methods that register a parameter
    pub add_parameter_methods: Vec<String>,
    /// Prefix of placeholders in command text
    pub placeholder_marker:    String,
    pub placeholder_matching:  PlaceholderMatching,
    pub unmapped_types:        UnmappedTypePolicy
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            command_type:          String::from("System.Data.SqlClient.SqlCommand"),
            parameters_member:     String::from("Parameters"),
            add_parameter_methods: vec![String::from("AddWithValue")],
            placeholder_marker:    String::from("@"),
            placeholder_matching:  PlaceholderMatching::Exact,
            unmapped_types:        UnmappedTypePolicy::Lenient
        }
    }
}

/// Schema probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Connection target; the probe is off when absent
    pub connection: Option<String>,
    /// Dialect used to parse schema files
    pub dialect:    SqlDialect,
    /// Per-site probe timeout
    pub timeout_ms: u64
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            connection: None,
            dialect:    SqlDialect::MsSql,
            timeout_ms: 5000
        }
    }
}

/// Rules configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RulesConfig {
    /// Disabled rule IDs
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Severity overrides (rule_id -> severity)
    #[serde(default)]
    pub severity: HashMap<String, String>
}

/// Retry configuration for HTTP probe requests
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries:      u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms:     u64,
    pub backoff_factor:   f64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries:      3,
            initial_delay_ms: 1000,
            max_delay_ms:     30000,
            backoff_factor:   2.0
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-validator.toml)
    /// 3. Config file in home directory (~/.config/sql-validator/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-validator")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Local config replaces the home config entirely
        let local_config = PathBuf::from(".sql-validator.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|name| env::var(name).ok())?;
        Ok(config)
    }

    /// Read a single TOML config file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    /// Override file values with environment variables read through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(connection) = lookup(CONNECTION_ENV)
            && !connection.trim().is_empty()
        {
            self.probe.connection = Some(connection);
        }

        if let Some(policy) = lookup(UNMAPPED_TYPES_ENV) {
            self.analysis.unmapped_types = UnmappedTypePolicy::parse(&policy).ok_or_else(|| {
                config_error(format!(
                    "{} must be 'lenient' or 'strict', got '{}'",
                    UNMAPPED_TYPES_ENV, policy
                ))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.analysis.command_type, "System.Data.SqlClient.SqlCommand");
        assert_eq!(config.analysis.add_parameter_methods, vec!["AddWithValue"]);
        assert_eq!(config.probe.timeout_ms, 5000);
        assert!(config.probe.connection.is_none());
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_toml_str(
            r#"
            [analysis]
            placeholder_matching = "ignore_case"

            [probe]
            dialect = "postgresql"
            "#
        )
        .unwrap();
        assert_eq!(config.analysis.placeholder_matching, PlaceholderMatching::IgnoreCase);
        assert_eq!(config.analysis.parameters_member, "Parameters");
        assert_eq!(config.probe.dialect, SqlDialect::PostgreSQL);
        assert_eq!(config.probe.timeout_ms, 5000);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml_str("[probe]\nconnection = \"file:a.sql\"").unwrap();
        config
            .apply_env(|name| match name {
                CONNECTION_ENV => Some("https://db.local/validate".into()),
                UNMAPPED_TYPES_ENV => Some("Strict".into()),
                _ => None
            })
            .unwrap();
        assert_eq!(config.probe.connection.as_deref(), Some("https://db.local/validate"));
        assert_eq!(config.analysis.unmapped_types, UnmappedTypePolicy::Strict);
    }

    #[test]
    fn test_invalid_env_policy() {
        let mut config = Config::default();
        let result = config.apply_env(|name| (name == UNMAPPED_TYPES_ENV).then(|| "loose".into()));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[probe\n").is_err());
    }
}
