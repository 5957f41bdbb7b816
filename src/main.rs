//! Taskpulse server
//!
//! Energy-aware task management backend: task/project/team CRUD over
//! SQLite with an energy scoring engine for suggestions and insights.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::sync::Arc;
use taskpulse::api;
use taskpulse::config::Config;
use taskpulse::db::Database;
use taskpulse::db::energy::DAY_MS;
use taskpulse::db::now_ms;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Taskpulse server and CLI tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Port for the HTTP API (overrides config)
    #[arg(short, long, global = true)]
    port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    log: String,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server (default if no subcommand given)
    Serve,

    /// Delete energy logs older than the retention window
    Cleanup {
        /// Retention window in days (overrides config)
        #[arg(long)]
        retention_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Load configuration and apply CLI overrides
    let mut config = Config::load(cli.config.as_deref().map(std::path::Path::new))?;

    if let Some(db_path) = &cli.database {
        config.server.db_path = db_path.into();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    match cli.command {
        Some(Command::Cleanup { retention_days }) => {
            run_cleanup(&config, retention_days)?;
        }
        Some(Command::Serve) | None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

/// Run the HTTP API server
async fn run_server(config: Config) -> Result<()> {
    config.ensure_db_dir()?;

    info!("Starting taskpulse v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", config.server.db_path);

    let db = Database::open(&config.server.db_path)?;
    let db = Arc::new(db);

    info!("Database initialized successfully");

    api::serve(db, &config).await
}

/// Run the energy-log retention sweep
fn run_cleanup(config: &Config, retention_days: Option<u32>) -> Result<()> {
    let days = retention_days.unwrap_or(config.retention.energy_log_days);
    let cutoff = now_ms() - days as i64 * DAY_MS;

    let db = Database::open(&config.server.db_path)?;
    let deleted = db.delete_energy_logs_before(cutoff)?;

    info!(deleted, days, "Energy log cleanup complete");
    println!("Deleted {} energy logs older than {} days", deleted, days);

    Ok(())
}
