use thiserror::Error;

/// Core error type for the scaffold toolchain
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Table not found: {alias}")]
    TableNotFound { alias: String },

    #[error("Template error: {message}")]
    Template { message: String },
}

impl CoreError {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new table not found error
    pub fn table_not_found(alias: impl Into<String>) -> Self {
        Self::TableNotFound {
            alias: alias.into(),
        }
    }

    /// Create a new template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Check if the error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if the error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

impl From<crate::config::ConfigError> for CoreError {
    fn from(error: crate::config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

/// Result alias used across the scaffold crates
pub type CoreResult<T> = Result<T, CoreError>;

/// Short alias used by the generator crates
pub type ScaffoldError = CoreError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = CoreError::validation("duplicate alias");
        assert!(err.is_validation());
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "Validation error: duplicate alias");

        let err = CoreError::table_not_found("Tags");
        assert_eq!(err.to_string(), "Table not found: Tags");
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CoreError = crate::config::ConfigError::InvalidValue {
            field: "level".to_string(),
            value: "loud".to_string(),
            expected: "trace, debug, info, warn, or error".to_string(),
        }
        .into();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("loud"));
    }
}
