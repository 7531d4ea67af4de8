mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mcet_core::config::McetConfig;
use mcet_core::store::{JsonFileStore, Store};
use mcet_core::{CalendarDate, DateKey, YearMonth};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcet")]
#[command(about = "View and update the MCET attendance and events calendar")]
struct Cli {
    /// Use this store file instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log store reads and writes to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid with attendance and events
    Month {
        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Faculty only: show this student's attendance
        #[arg(short, long)]
        student: Option<String>,

        /// Print the cells as JSON instead of a grid
        #[arg(long)]
        json: bool,
    },
    /// Mark a student present on a day (faculty only)
    Mark {
        /// Student email
        student: String,

        /// Day (YYYY-MM-DD or "today")
        #[arg(value_parser = parse_date)]
        date: CalendarDate,
    },
    /// Add an event on a day (faculty only)
    AddEvent {
        /// Day (YYYY-MM-DD or "today")
        #[arg(value_parser = parse_date)]
        date: CalendarDate,

        /// Event title
        title: String,
    },
    /// List events, for every day or just one
    Events {
        /// Only this day (YYYY-MM-DD or "today")
        #[arg(short, long, value_parser = parse_date)]
        date: Option<CalendarDate>,
    },
    /// Show the configured identity
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = McetConfig::load()?;
    if let Some(path) = cli.store {
        config.store_path = path;
    }

    match cli.command {
        Commands::Month {
            year,
            month,
            student,
            json,
        } => {
            let month = resolve_month(year, month)?;
            commands::month::run(&config, month, student.as_deref(), json).await
        }
        Commands::Mark { student, date } => commands::mark::run(&config, &student, date).await,
        Commands::AddEvent { date, title } => commands::add_event::run(&config, date, &title).await,
        Commands::Events { date } => commands::events::run(&config, date).await,
        Commands::Whoami => commands::whoami::run(&config).await,
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "mcet_core=debug,mcet=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_date(s: &str) -> Result<CalendarDate, String> {
    if s.eq_ignore_ascii_case("today") {
        return CalendarDate::today().map_err(|e| e.to_string());
    }
    DateKey::decode(s).map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

fn resolve_month(year: Option<i32>, month: Option<u32>) -> Result<YearMonth> {
    let current = YearMonth::current()?;
    Ok(YearMonth::new(
        year.unwrap_or(current.year()),
        month.unwrap_or(current.month()),
    )?)
}

pub(crate) fn open_store(config: &McetConfig) -> Arc<dyn Store> {
    let path = config.store_file();
    tracing::debug!(path = %path.display(), "opening store");
    Arc::new(JsonFileStore::new(path))
}
