//! Centralized error types for the wxdash application.
//!
//! Provides a typed hierarchy that enables precise handling in the code and
//! user-friendly messages on the terminal, while preserving full error
//! context for logging.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Service-level errors mapped in from the domain crates.
    #[error("Service error: {0}")]
    Service(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for terminal display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Service(msg) => format!("Weather service error: {}", msg),
        }
    }
}

/// Configuration load/save errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No platform configuration directory available")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::NoConfigDir => {
                "Could not locate a configuration directory for this platform.".to_string()
            }
            ConfigError::Io(_) => "Could not read the configuration file.".to_string(),
            ConfigError::Parse(_) => "The configuration file is not valid TOML.".to_string(),
            ConfigError::Serialize(_) => "Could not write the configuration file.".to_string(),
            ConfigError::Validation(msg) => format!("Invalid configuration: {}", msg),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status}")]
    ServerError { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response from the weather service."
            }
        }
    }
}

impl From<&reqwest::Error> for NetworkError {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            return NetworkError::Timeout;
        }
        if e.is_connect() {
            return NetworkError::ConnectionFailed(e.to_string());
        }
        if let Some(status) = e.status() {
            return NetworkError::ServerError {
                status: status.as_u16(),
            };
        }
        if e.is_decode() {
            return NetworkError::InvalidResponse(e.to_string());
        }
        NetworkError::ConnectionFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_user_messages() {
        let err = NetworkError::Timeout;
        assert!(err.user_message().contains("timed out"));

        let err = NetworkError::ServerError { status: 503 };
        assert!(err.user_message().contains("try again later"));

        let err = NetworkError::ServerError { status: 404 };
        assert!(!err.user_message().contains("later"));
    }

    #[test]
    fn test_config_validation_message_carries_summary() {
        let err = ConfigError::Validation("history.max_samples: must be > 0".to_string());
        assert!(err.user_message().contains("history.max_samples"));
    }

    #[test]
    fn test_app_error_wraps_config() {
        let err = AppError::from(ConfigError::NoConfigDir);
        assert!(err.user_message().contains("configuration directory"));
    }

    #[test]
    fn test_app_error_service_message() {
        let err = AppError::Service("no response".to_string());
        assert!(err.user_message().contains("no response"));
    }
}
