use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{info, warn};

use windcast::{
    DateWindow, JsonPresenter, OpenMeteoClient, Presenter, RefreshLoop, TextPresenter, VERSION,
    WindcastConfig, logging,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// windcast CLI
#[derive(Parser)]
#[command(name = "windcast")]
#[command(author, version, about = "Hourly wind quality forecasts for surf and kitesurf spots", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "WINDCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Forecast date (YYYY-MM-DD, DD/MM/YYYY, today or tomorrow)
    #[arg(short, long)]
    date: Option<String>,

    /// Keep running: refresh periodically and read new dates from stdin
    #[arg(short, long)]
    watch: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Forward each stdin line as a date change until input closes.
///
/// Runs on its own OS thread: a blocking stdin read cannot be cancelled,
/// and the process must still exit on Ctrl-C while a read is pending.
fn read_dates(tx: mpsc::Sender<NaiveDate>, timezone: Tz, max_days_ahead: u32) {
    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read date input: {}", e);
                break;
            }
        };
        let window = DateWindow::starting_now(timezone, max_days_ahead);
        match window.parse(&line) {
            Ok(date) => {
                if tx.blocking_send(date).is_err() {
                    break;
                }
            }
            Err(e) => warn!("{}", e.user_message()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = WindcastConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);
    info!("Starting windcast v{}", VERSION);

    let timezone = config.timezone()?;
    let window = DateWindow::starting_now(timezone, config.forecast.max_days_ahead);
    let date = window
        .parse(cli.date.as_deref().unwrap_or("today"))
        .context("Invalid --date")?;

    let client = OpenMeteoClient::new(&config.weather).context("Failed to create HTTP client")?;
    let presenter: Box<dyn Presenter> = match cli.format {
        OutputFormat::Text => Box::new(TextPresenter::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonPresenter::new(std::io::stdout())),
    };

    let mut refresh_loop = RefreshLoop::new(
        client,
        presenter,
        config.locations.clone(),
        date,
        timezone,
        Duration::from_secs(config.refresh.interval_seconds),
    );

    if !cli.watch {
        let summary = refresh_loop.refresh_once().await?;
        if summary.succeeded == 0 {
            bail!("No location could be refreshed");
        }
        return Ok(());
    }

    let (tx, rx) = mpsc::channel(16);
    let max_days_ahead = config.forecast.max_days_ahead;
    std::thread::Builder::new()
        .name("windcast-stdin".to_string())
        .spawn(move || read_dates(tx, timezone, max_days_ahead))
        .context("Failed to start date input reader")?;

    info!(
        "Watching {} locations, refreshing every {}s",
        config.locations.len(),
        config.refresh.interval_seconds
    );
    refresh_loop
        .run(rx, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
