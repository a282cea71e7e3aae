//! Database configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codec::EmptyCollapse;
use crate::error::{DbError, Result};

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Storage engine name (default: "inmemory")
    pub engine: String,
    /// Initial capacity of each table in records (default: 64)
    pub initial_table_capacity: usize,
    /// Decode-time collapse rule for empty-looking sequences and maps
    pub empty_collapse: EmptyCollapse,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            engine: "inmemory".to_string(),
            initial_table_capacity: 64,
            empty_collapse: EmptyCollapse::Reference,
        }
    }
}

impl DbConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DbError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string. Missing keys keep defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| DbError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Applies environment variable overrides.
    /// Environment variables are prefixed with `RECORD_STORE_`.
    /// Example: `RECORD_STORE_ENGINE=inmemory` overrides `engine`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = env::var("RECORD_STORE_ENGINE") {
            self.engine = val;
        }
        if let Ok(val) = env::var("RECORD_STORE_INITIAL_TABLE_CAPACITY") {
            self.initial_table_capacity = val.parse().map_err(|_| {
                DbError::Config(format!("Invalid initial_table_capacity: {}", val))
            })?;
        }
        if let Ok(val) = env::var("RECORD_STORE_EMPTY_COLLAPSE") {
            self.empty_collapse = match val.as_str() {
                "reference" => EmptyCollapse::Reference,
                "empty-only" => EmptyCollapse::EmptyOnly,
                _ => {
                    return Err(DbError::Config(format!("Invalid empty_collapse: {}", val)));
                }
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.engine, "inmemory");
        assert_eq!(config.initial_table_capacity, 64);
        assert_eq!(config.empty_collapse, EmptyCollapse::Reference);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            engine = "custom"
            initial_table_capacity = 8
            empty_collapse = "empty-only"
        "#;
        let config = DbConfig::from_toml(toml).unwrap();
        assert_eq!(config.engine, "custom");
        assert_eq!(config.initial_table_capacity, 8);
        assert_eq!(config.empty_collapse, EmptyCollapse::EmptyOnly);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DbConfig::from_toml("initial_table_capacity = 2").unwrap();
        assert_eq!(config.engine, "inmemory");
        assert_eq!(config.initial_table_capacity, 2);
    }

    #[test]
    fn test_invalid_toml() {
        let err = DbConfig::from_toml("empty_collapse = \"sometimes\"").unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    // Sole test that sets RECORD_STORE_* variables; the environment is
    // process-wide.
    #[test]
    fn test_env_overrides() {
        const VARS: [&str; 3] = [
            "RECORD_STORE_ENGINE",
            "RECORD_STORE_INITIAL_TABLE_CAPACITY",
            "RECORD_STORE_EMPTY_COLLAPSE",
        ];
        env::set_var(VARS[0], "archive");
        env::set_var(VARS[1], "8");
        env::set_var(VARS[2], "empty-only");
        let mut config = DbConfig::default();
        let applied = config.apply_env_overrides();

        env::set_var(VARS[1], "many");
        let bad_capacity = DbConfig::default().apply_env_overrides();

        env::set_var(VARS[1], "8");
        env::set_var(VARS[2], "sometimes");
        let bad_collapse = DbConfig::default().apply_env_overrides();

        for var in VARS {
            env::remove_var(var);
        }

        assert_eq!(applied, Ok(()));
        assert_eq!(config.engine, "archive");
        assert_eq!(config.initial_table_capacity, 8);
        assert_eq!(config.empty_collapse, EmptyCollapse::EmptyOnly);
        assert_eq!(
            bad_capacity,
            Err(DbError::Config("Invalid initial_table_capacity: many".to_string()))
        );
        assert_eq!(
            bad_collapse,
            Err(DbError::Config("Invalid empty_collapse: sometimes".to_string()))
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine = \"inmemory\"").unwrap();
        writeln!(file, "initial_table_capacity = 16").unwrap();
        let config = DbConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_table_capacity, 16);

        let missing = DbConfig::from_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(DbError::Config(_))));
    }
}
