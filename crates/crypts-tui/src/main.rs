//! crypts - terminal crypto market tracker - entry point.

use anyhow::Result;
use clap::Parser;
use crypts_telemetry::LogTarget;
use crypts_tui::{plain_table, AppConfig, Application, Overrides};
use tracing::info;

/// Live cryptocurrency prices in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via CRYPTS_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// Market page URL
    #[arg(long)]
    url: Option<String>,

    /// Seconds between automatic refreshes
    #[arg(short, long)]
    delay: Option<String>,

    /// Number of rows to show (0 = all)
    #[arg(short, long)]
    rows: Option<String>,

    /// Start with auto-refresh enabled
    #[arg(short, long)]
    auto_refresh: bool,

    /// Print the table once to stdout and exit
    #[arg(long)]
    once: bool,

    /// Log file used by the interactive UI
    #[arg(long)]
    log_file: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            delay: self.delay.clone(),
            rows: self.rows.clone(),
            auto_refresh: self.auto_refresh,
            log_file: self.log_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_overrides(&args.overrides())?;

    // The UI owns the terminal; only one-shot mode may log to stderr.
    let target = if args.once {
        LogTarget::Stderr
    } else {
        LogTarget::File(config.logging.file.clone())
    };
    crypts_telemetry::init_logging(&config.logging, &target)?;

    info!("Starting crypts v{}", env!("CARGO_PKG_VERSION"));
    info!(url = %config.fetcher.url, once = args.once, "Configuration loaded");

    let app = Application::new(config)?;

    if args.once {
        let rows = app.run_once().await?;
        print!("{}", plain_table(&rows));
        return Ok(());
    }

    app.run().await?;

    Ok(())
}
