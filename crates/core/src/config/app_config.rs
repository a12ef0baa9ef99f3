use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default short type name of the generic, unspecialized table type
pub const DEFAULT_GENERIC_TABLE_TYPE: &str = "Table";

/// Default suffix stripped from table type names when deriving controller names
pub const DEFAULT_TABLE_SUFFIX: &str = "Table";

/// Configuration trait for environment-driven configuration
pub trait ConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Configuration source information for debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    EnvVar(String),
    Default(String),
}

/// Settings that steer association filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Short type names treated as the generic table type. Self-referencing
    /// associations are kept on these tables and dropped on all others.
    pub generic_table_types: Vec<String>,
    /// Suffix stripped from a target's short type name to build its controller name
    pub table_suffix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            generic_table_types: vec![DEFAULT_GENERIC_TABLE_TYPE.to_string()],
            table_suffix: DEFAULT_TABLE_SUFFIX.to_string(),
        }
    }
}

impl FilterConfig {
    /// The type name given to tables that declare none
    pub fn default_type_name(&self) -> &str {
        self.generic_table_types
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_GENERIC_TABLE_TYPE)
    }

    /// Check whether a short type name is one of the generic table types
    pub fn is_generic_type_name(&self, short_name: &str) -> bool {
        self.generic_table_types.iter().any(|t| t == short_name)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl ConfigTrait for FilterConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let types = get_env_or_default("SCAFFOLD_GENERIC_TABLE_TYPES", DEFAULT_GENERIC_TABLE_TYPE);
        let generic_table_types = types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        let table_suffix = get_env_or_default("SCAFFOLD_TABLE_SUFFIX", DEFAULT_TABLE_SUFFIX);

        let config = FilterConfig {
            generic_table_types,
            table_suffix,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.generic_table_types.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "generic_table_types".to_string(),
                reason: "At least one generic table type is required".to_string(),
            });
        }

        if self.table_suffix.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "table_suffix".to_string(),
                reason: "Table suffix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert(
            "generic_table_types".to_string(),
            source_of("SCAFFOLD_GENERIC_TABLE_TYPES", DEFAULT_GENERIC_TABLE_TYPE),
        );
        sources.insert(
            "table_suffix".to_string(),
            source_of("SCAFFOLD_TABLE_SUFFIX", DEFAULT_TABLE_SUFFIX),
        );
        sources
    }
}

impl ConfigTrait for LoggingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let level = get_env_or_default("SCAFFOLD_LOG_LEVEL", "warn");
        let format = get_env_or_default("SCAFFOLD_LOG_FORMAT", "compact");

        let config = LoggingConfig { level, format };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "level".to_string(),
                value: self.level.clone(),
                expected: "trace, debug, info, warn, or error".to_string(),
            });
        }

        let valid_formats = ["compact", "pretty", "json"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "format".to_string(),
                value: self.format.clone(),
                expected: "compact, pretty, or json".to_string(),
            });
        }

        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = HashMap::new();
        sources.insert("level".to_string(), source_of("SCAFFOLD_LOG_LEVEL", "warn"));
        sources.insert(
            "format".to_string(),
            source_of("SCAFFOLD_LOG_FORMAT", "compact"),
        );
        sources
    }
}

// Helper functions for environment variable handling
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn source_of(key: &str, default: &str) -> ConfigSource {
    if env::var(key).is_ok() {
        ConfigSource::EnvVar(key.to_string())
    } else {
        ConfigSource::Default(default.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationFailed { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_test_env() {
        env::remove_var("SCAFFOLD_GENERIC_TABLE_TYPES");
        env::remove_var("SCAFFOLD_TABLE_SUFFIX");
        env::remove_var("SCAFFOLD_LOG_LEVEL");
        env::remove_var("SCAFFOLD_LOG_FORMAT");
    }

    #[test]
    #[serial]
    fn test_filter_config_defaults() {
        clean_test_env();

        let config = FilterConfig::from_env().unwrap();
        assert_eq!(config, FilterConfig::default());
        assert_eq!(config.default_type_name(), "Table");
        assert!(config.is_generic_type_name("Table"));
        assert!(!config.is_generic_type_name("ArticlesTable"));

        let sources = config.config_sources();
        assert_eq!(
            sources.get("table_suffix"),
            Some(&ConfigSource::Default("Table".to_string()))
        );
    }

    #[test]
    #[serial]
    fn test_filter_config_from_env() {
        clean_test_env();
        env::set_var("SCAFFOLD_GENERIC_TABLE_TYPES", "Table, GenericTable ,");
        env::set_var("SCAFFOLD_TABLE_SUFFIX", "Repository");

        let config = FilterConfig::from_env().unwrap();
        assert_eq!(config.generic_table_types, vec!["Table", "GenericTable"]);
        assert_eq!(config.table_suffix, "Repository");
        assert_eq!(
            config.config_sources().get("table_suffix"),
            Some(&ConfigSource::EnvVar("SCAFFOLD_TABLE_SUFFIX".to_string()))
        );

        clean_test_env();
    }

    #[test]
    #[serial]
    fn test_filter_config_rejects_empty_type_list() {
        clean_test_env();
        env::set_var("SCAFFOLD_GENERIC_TABLE_TYPES", " , ");

        let result = FilterConfig::from_env();
        assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));

        clean_test_env();
    }

    #[test]
    #[serial]
    fn test_logging_config_validation() {
        clean_test_env();
        env::set_var("SCAFFOLD_LOG_LEVEL", "debug");
        env::set_var("SCAFFOLD_LOG_FORMAT", "json");

        let config = LoggingConfig::from_env().unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "json");

        env::set_var("SCAFFOLD_LOG_FORMAT", "xml");
        assert!(matches!(
            LoggingConfig::from_env(),
            Err(ConfigError::InvalidValue { .. })
        ));

        clean_test_env();
    }
}
