//! Application configuration.

use std::path::Path;

use crypts_core::{parse_delay_secs, parse_row_limit, ViewState, MAX_DELAY_SECS};
use crypts_feed::{ExtractorLayout, FetcherConfig};
use crypts_telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "CRYPTS_CONFIG";

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Redraw interval in milliseconds; keeps the status clock moving.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Show the ASCII banner above the panels.
    #[serde(default = "default_show_banner")]
    pub show_banner: bool,
}

fn default_tick_ms() -> u64 {
    250
}

fn default_show_banner() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            show_banner: default_show_banner(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    /// Table layout of the market page.
    #[serde(default)]
    pub layout: ExtractorLayout,
    /// Startup filters and refresh cadence.
    #[serde(default)]
    pub view: ViewState,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Command-line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub delay: Option<String>,
    pub rows: Option<String>,
    pub auto_refresh: bool,
    pub log_file: Option<String>,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Path order: explicit path, then `CRYPTS_CONFIG`, then
    /// `config/default.toml`. An explicit or env path must exist; a missing
    /// default file falls back to built-in defaults.
    pub fn load(explicit: Option<&str>) -> AppResult<Self> {
        let named = explicit
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_ENV).ok());

        match named {
            Some(path) => Self::from_file(&path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                tracing::warn!(path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides, validating them like UI input.
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> AppResult<()> {
        if let Some(url) = &overrides.url {
            self.fetcher.url = url.clone();
        }
        if let Some(delay) = &overrides.delay {
            self.view.refresh.delay_secs = parse_delay_secs(delay)?;
        }
        if let Some(rows) = &overrides.rows {
            self.view.filter.row_limit = parse_row_limit(rows)?;
        }
        if overrides.auto_refresh {
            self.view.refresh.enabled = true;
        }
        if let Some(file) = &overrides.log_file {
            self.logging.file = file.into();
        }
        Ok(())
    }

    /// Reject values the UI setters would refuse. Zero price bounds become unset.
    fn validate(&mut self) -> AppResult<()> {
        let delay = self.view.refresh.delay_secs;
        if delay == 0 {
            return Err(AppError::Config("view.refresh.delay_secs must be positive".to_string()));
        }
        if delay > MAX_DELAY_SECS {
            return Err(AppError::Config(format!(
                "view.refresh.delay_secs must be at most {MAX_DELAY_SECS} (got {delay})"
            )));
        }
        self.view
            .filter
            .normalize_price_bounds()
            .map_err(|e| AppError::Config(format!("view.filter.{e}")))?;
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::Config("fetcher.timeout_secs must be positive".to_string()));
        }
        if self.ui.tick_ms == 0 {
            return Err(AppError::Config("ui.tick_ms must be positive".to_string()));
        }
        if let (Some(min), Some(max)) = (self.view.filter.min_price, self.view.filter.max_price) {
            if min >= max {
                tracing::warn!(%min, %max, "Price bounds exclude every row");
            }
        }
        Ok(())
    }
}
