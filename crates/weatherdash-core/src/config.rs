use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Location shown before the user has searched for anything
pub const DEFAULT_LOCATION: &str = "Telluride, CO, USA";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Polling, caching and retry behaviour of the weather query
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Location search box
    #[serde(default)]
    pub search: SearchConfig,

    /// Mock data source
    #[serde(default)]
    pub mock: MockConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Location loaded on startup
    #[serde(default = "default_location")]
    pub default_location: String,

    /// Background refetch interval in minutes
    #[serde(default = "default_refresh_minutes")]
    pub refresh_interval_minutes: u32,

    /// Age in minutes after which cached data is refetched
    #[serde(default = "default_stale_minutes")]
    pub stale_after_minutes: u32,

    /// Retries after the first failed fetch
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,

    /// How long the "Location Updated" notification stays visible
    #[serde(default = "default_notification_secs")]
    pub notification_secs: u64,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_refresh_minutes() -> u32 {
    60
}

fn default_stale_minutes() -> u32 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_initial_delay_ms() -> u64 {
    1000
}

fn default_retry_max_delay_ms() -> u64 {
    30_000
}

fn default_notification_secs() -> u64 {
    3
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            refresh_interval_minutes: default_refresh_minutes(),
            stale_after_minutes: default_stale_minutes(),
            max_retries: default_max_retries(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            notification_secs: default_notification_secs(),
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.refresh_interval_minutes) * 60)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(u64::from(self.stale_after_minutes) * 60)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shorter queries clear the results instead of searching
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    2
}

fn default_max_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            max_results: default_max_results(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Simulated latency of a weather fetch
    #[serde(default = "default_fetch_delay_ms")]
    pub fetch_delay_ms: u64,

    /// Simulated latency of a location search
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,

    /// Fixed RNG seed for reproducible mock data
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_fetch_delay_ms() -> u64 {
    800
}

fn default_search_delay_ms() -> u64 {
    200
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay_ms(),
            search_delay_ms: default_search_delay_ms(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Errors fail the load; warnings are returned for the caller to report
    /// once logging is set up.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let dashboard = &self.dashboard;

        if dashboard.default_location.trim().is_empty() {
            result.add_error("dashboard.default_location", "Default location cannot be empty");
        }

        if dashboard.refresh_interval_minutes == 0 {
            result.add_error(
                "dashboard.refresh_interval_minutes",
                "Refresh interval must be greater than 0",
            );
        } else if dashboard.refresh_interval_minutes > 1440 {
            result.add_warning(
                "dashboard.refresh_interval_minutes",
                "Refresh interval is more than 24 hours",
            );
        }

        if dashboard.stale_after_minutes > dashboard.refresh_interval_minutes {
            result.add_warning(
                "dashboard.stale_after_minutes",
                "Data goes stale after the next scheduled refresh",
            );
        }

        if dashboard.max_retries > 10 {
            result.add_warning("dashboard.max_retries", "More than 10 retries per fetch");
        }

        if dashboard.retry_initial_delay_ms > dashboard.retry_max_delay_ms {
            result.add_error(
                "dashboard.retry_initial_delay_ms",
                "Initial retry delay exceeds the maximum retry delay",
            );
        }

        if self.search.min_query_len == 0 {
            result.add_warning(
                "search.min_query_len",
                "Empty queries will be searched",
            );
        }

        if self.search.max_results == 0 {
            result.add_error("search.max_results", "At least one search result must be shown");
        }

        if self.search.debounce_ms > 5000 {
            result.add_warning("search.debounce_ms", "Search debounce is unusually long (>5s)");
        }

        result
    }

    /// Save configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weatherdash");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_default_durations() {
        let dashboard = DashboardConfig::default();
        assert_eq!(dashboard.refresh_interval(), Duration::from_secs(3600));
        assert_eq!(dashboard.stale_after(), Duration::from_secs(1800));
        assert_eq!(SearchConfig::default().debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_refresh_interval() {
        let mut config = Config::default();
        config.dashboard.refresh_interval_minutes = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "dashboard.refresh_interval_minutes"));
    }

    #[test]
    fn test_empty_location() {
        let mut config = Config::default();
        config.dashboard.default_location = "   ".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_stale_window_longer_than_refresh_is_warning() {
        let mut config = Config::default();
        config.dashboard.stale_after_minutes = 120;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "dashboard.stale_after_minutes"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[dashboard]\ndefault_location = \"Seattle, WA, USA\"\n\n[search]\ndebounce_ms = 250\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dashboard.default_location, "Seattle, WA, USA");
        assert_eq!(config.dashboard.refresh_interval_minutes, 60);
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.mock.fetch_delay_ms, 800);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.mock.seed = Some(42);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mock.seed, Some(42));
        assert_eq!(loaded.dashboard.default_location, DEFAULT_LOCATION);
    }

    #[test]
    fn test_load_validated_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nmax_results = 0\n").unwrap();

        let err = Config::load_validated(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("search.max_results"));
    }

    #[test]
    fn test_load_validated_returns_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[dashboard]\nstale_after_minutes = 90\n").unwrap();

        let (config, validation) = Config::load_validated(Some(&path)).unwrap();
        assert_eq!(config.dashboard.stale_after_minutes, 90);
        assert_eq!(validation.warnings.len(), 1);
        assert_eq!(validation.warnings[0].field, "dashboard.stale_after_minutes");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
