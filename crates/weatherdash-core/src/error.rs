//! Centralized error types for the Weatherdash application.
//!
//! Errors carry full context for logging, and `user_message()` gives the
//! short placeholder text the dashboard shows instead of the raw error.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather data error: {0}")]
    Data(#[from] DataError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Data(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather data and location search errors as seen by the dashboard.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Weather source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Weather data invalid: {0}")]
    InvalidData(String),

    #[error("Location search failed: {0}")]
    SearchFailed(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl DataError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DataError::SourceUnavailable(_) => "No data. Weather service unavailable.",
            DataError::InvalidData(_) => "No chart data available",
            DataError::SearchFailed(_) => "No locations found",
            DataError::Cancelled => "Update cancelled.",
        }
    }
}
