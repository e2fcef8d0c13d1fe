//! Structured logging initialization.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{TelemetryError, TelemetryResult};

/// Logging settings from the `[logging]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Log file used while the TUI owns the terminal.
    #[serde(default = "default_file")]
    pub file: PathBuf,
}

fn default_filter() -> String {
    "info,crypts=debug".to_string()
}

fn default_file() -> PathBuf {
    PathBuf::from("crypts.log")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: default_file(),
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to a file.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    fn make_writer(&self) -> TelemetryResult<BoxMakeWriter> {
        match self {
            Self::File(path) => {
                let file = open_append(path)?;
                Ok(BoxMakeWriter::new(Mutex::new(file)))
            }
            Self::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Stderr)
    }
}

fn open_append(path: &Path) -> TelemetryResult<std::fs::File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| TelemetryError::LogFile {
            path: path.to_path_buf(),
            source,
        })
}

/// Initialize structured logging.
///
/// JSON output when `RUST_ENV=production`, pretty output otherwise.
/// `RUST_LOG` takes precedence over the configured filter.
pub fn init_logging(config: &LoggingConfig, target: &LogTarget) -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid filter '{}': {e}", config.filter)))?;

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let writer = target.make_writer()?;
    let ansi = target.is_terminal();

    let result = if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(writer),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info,crypts=debug");
        assert_eq!(config.file, PathBuf::from("crypts.log"));

        let parsed: LoggingConfig = toml::from_str(r#"file = "/tmp/other.log""#).unwrap();
        assert_eq!(parsed.filter, "info,crypts=debug");
        assert_eq!(parsed.file, PathBuf::from("/tmp/other.log"));
    }

    #[test]
    fn test_file_target_creates_file() {
        let path = std::env::temp_dir().join(format!("crypts-log-{}.log", std::process::id()));
        let target = LogTarget::File(path.clone());

        assert_ok!(target.make_writer());
        assert!(path.exists());
        assert!(!target.is_terminal());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_file_reports_path() {
        let path = std::env::temp_dir().join("crypts-missing-dir").join("nested").join("x.log");
        let err = LogTarget::File(path.clone()).make_writer().err().unwrap();
        match err {
            TelemetryError::LogFile { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected LogFile error, got {other:?}"),
        }
    }
}
