use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unexpected catalog response: {message}")]
    CatalogFormatError { message: String },

    #[error("Storage error for key '{key}': {message}")]
    StorageError { key: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ShopError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ShopError::ApiError(_) | ShopError::CatalogFormatError { .. } => ErrorSeverity::Medium,
            ShopError::ConfigError { .. }
            | ShopError::InvalidConfigValueError { .. }
            | ShopError::TomlError(_) => ErrorSeverity::High,
            ShopError::SerializationError(_) => ErrorSeverity::High,
            ShopError::IoError(_) | ShopError::StorageError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ShopError::ApiError(_) | ShopError::CatalogFormatError { .. } => {
                "Could not load the product catalog".to_string()
            }
            ShopError::IoError(_) | ShopError::StorageError { .. } => {
                "Could not save the shopping cart".to_string()
            }
            ShopError::SerializationError(_) => "The saved cart could not be encoded".to_string(),
            ShopError::TomlError(e) => format!("The configuration file is not valid TOML: {}", e),
            ShopError::ConfigError { message } => format!("Configuration problem: {}", message),
            ShopError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ShopError::ApiError(_) | ShopError::CatalogFormatError { .. } => {
                "Check the network connection and the --api-endpoint setting"
            }
            ShopError::IoError(_) | ShopError::StorageError { .. } => {
                "Make sure --storage-path points to a writable directory"
            }
            ShopError::SerializationError(_) => "Delete the saved cart file and try again",
            ShopError::TomlError(_)
            | ShopError::ConfigError { .. }
            | ShopError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command line flags"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = ShopError::InvalidConfigValueError {
            field: "source.limit".to_string(),
            value: "0".to_string(),
            reason: "Value must be between 1 and 50".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("source.limit"));
    }

    #[test]
    fn test_storage_errors_are_critical() {
        let err = ShopError::StorageError {
            key: "cart".to_string(),
            message: "lock poisoned".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.to_string(), "Storage error for key 'cart': lock poisoned");
    }
}
