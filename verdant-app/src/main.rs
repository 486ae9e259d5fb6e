use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod plotting;
mod report;
mod workflow;

/// Garden dashboard: aggregate plant sensor readings into health statuses.
#[derive(Debug, Parser)]
#[command(name = "verdant", version, about)]
struct Cli {
    /// YAML configuration file (defaults to ./verdant.yaml when present).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Latest reading per sensor and the overall status.
    Status {
        /// Reading file (.json, .yaml, .yml or .csv).
        readings: String,
        /// Only consider readings of this plant.
        #[arg(long)]
        plant: Option<String>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Health overview of every plant in a plants-with-sensors payload.
    Dashboard {
        payload: String,
        /// Only show favorite plants.
        #[arg(long)]
        favorites: bool,
    },
    /// Append one reading to a CSV log.
    Record {
        #[arg(long)]
        log: String,
        #[arg(long)]
        plant: String,
        /// soil_moisture, temperature, light or humidity.
        #[arg(long)]
        kind: String,
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        /// OK, LOW or CRITICAL. Derived from thresholds when omitted.
        #[arg(long)]
        status: Option<String>,
        /// Reading time (RFC 3339). Defaults to now.
        #[arg(long)]
        at: Option<String>,
    },
    /// Chart a plant's reading history to a PNG file.
    Plot {
        readings: String,
        #[arg(long)]
        plant: String,
        #[arg(long, default_value = "sensor_history.png")]
        out: String,
    },
    /// Add or remove a plant from favorites.
    Favorite { plant: String },
    /// List favorite plants.
    Favorites,
    /// Mark a notification as read.
    MarkRead { notification: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = config::AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Status {
            readings,
            plant,
            json,
        } => workflow::run_status(&config, &readings, plant.as_deref(), json),
        Command::Dashboard { payload, favorites } => {
            workflow::run_dashboard(&config, &payload, favorites)
        }
        Command::Record {
            log,
            plant,
            kind,
            value,
            status,
            at,
        } => workflow::run_record(
            &config,
            workflow::RecordRequest {
                log_path: &log,
                plant: &plant,
                kind: &kind,
                value,
                status: status.as_deref(),
                at: at.as_deref(),
            },
        ),
        Command::Plot {
            readings,
            plant,
            out,
        } => workflow::run_plot(&config, &readings, &plant, &out),
        Command::Favorite { plant } => workflow::run_toggle_favorite(&config, &plant),
        Command::Favorites => workflow::run_list_favorites(&config),
        Command::MarkRead { notification } => workflow::run_mark_read(&config, &notification),
    }
}
