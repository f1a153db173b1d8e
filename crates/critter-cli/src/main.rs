//! `critter` CLI: render availability calendars and check model intake responses.
//!
//! ## Usage
//!
//! ```sh
//! # Month calendar from a stored submission (stdin to stdout)
//! cat submission.json | critter calendar --month 2024-03
//!
//! # Month by name, current year unless --year is given
//! critter calendar -i submission.json --month March --year 2024
//!
//! # Machine-readable grid
//! critter calendar -i submission.json --month 2024-03 --json
//!
//! # One day
//! critter day -i submission.json --date 2024-03-11
//!
//! # 24-hour to 12-hour
//! critter format-time 09:00 13:30
//!
//! # Validate and normalize a structured model response
//! critter intake -i response.json --year 2024
//!
//! # Service summary table from the offerings form
//! critter offerings -i offerings.json
//! ```

mod render;

use anyhow::{Context, Result};
use availability_engine::calendar::parse_month_name;
use availability_engine::exceptions::parse_date;
use availability_engine::{
    format_time, month_grid, parse_intake, parse_intake_now, parse_offerings_form, resolve_day,
    AvailabilityProfile, EngineConfig,
};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "critter",
    version,
    about = "Pet-care provider availability tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a month calendar for a profile or submission
    Calendar {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Month as YYYY-MM, or a month name such as "March"
        #[arg(short, long)]
        month: String,
        /// Year for a month given by name (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Emit the resolved grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve a single day as JSON
    Day {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Date as YYYY-MM-DD
        #[arg(short, long)]
        date: String,
    },
    /// Convert HH:MM times to 12-hour display form
    FormatTime {
        /// One or more HH:MM times
        #[arg(required = true)]
        times: Vec<String>,
    },
    /// Validate and normalize a structured model response
    Intake {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Year exception dates are normalized into (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Validate the service-offerings form and print its summary table
    Offerings {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit the normalized details and summary rows as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match cli.config.as_deref() {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path))?,
        None => EngineConfig::default(),
    };
    tracing::debug!(?config, "engine config");

    match cli.command {
        Commands::Calendar {
            input,
            output,
            month,
            year,
            json,
        } => {
            let profile = read_profile(input.as_deref())?;
            let (year, month) = parse_month_arg(&month, year)?;
            tracing::debug!(year, month, "rendering month");
            let grid = month_grid(&profile, year, month, &config.resolve)
                .context("Failed to build month grid")?;

            let rendered = if json {
                serde_json::to_string_pretty(&grid)?
            } else {
                render::render_month(&grid)
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Day { input, date } => {
            let profile = read_profile(input.as_deref())?;
            let date = parse_date(&date)?;
            let day = resolve_day(&profile, date, &config.resolve);
            println!("{}", serde_json::to_string_pretty(&day)?);
        }
        Commands::FormatTime { times } => {
            for time in &times {
                let formatted = format_time(time)?;
                println!("{}", formatted);
            }
        }
        Commands::Intake {
            input,
            output,
            year,
        } => {
            let raw = read_input(input.as_deref())?;
            let intake = match year {
                Some(year) => parse_intake(&raw, year),
                None => parse_intake_now(&raw),
            }
            .context("Model response rejected")?;
            let pretty = serde_json::to_string_pretty(&intake)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Offerings {
            input,
            output,
            json,
        } => {
            let raw = read_input(input.as_deref())?;
            let details = parse_offerings_form(&raw).context("Service offerings rejected")?;
            tracing::debug!(services = details.services.len(), "offerings parsed");

            let rendered = if json {
                serde_json::to_string_pretty(&serde_json::json!({
                    "details": details,
                    "summary": details.summary(),
                    "genericLogistics": details.generic_logistics(),
                }))?
            } else {
                render::render_offerings(&details)
            };
            write_output(output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Parse `--month` as `YYYY-MM` or a month name.
///
/// - `2024-03` gives (2024, 3); `--year` is ignored
/// - `March` with `--year 2024` gives (2024, 3)
/// - `March` alone uses the current year
fn parse_month_arg(month: &str, year: Option<i32>) -> Result<(i32, u32)> {
    if let Some((y, m)) = month.split_once('-') {
        let y: i32 = y
            .parse()
            .with_context(|| format!("Invalid year in month '{}'", month))?;
        let m: u32 = m
            .parse()
            .with_context(|| format!("Invalid month in '{}'", month))?;
        if !(1..=12).contains(&m) {
            anyhow::bail!("Month must be 1-12, got {} in '{}'", m, month);
        }
        return Ok((y, m));
    }
    let m = parse_month_name(month)?;
    Ok((year.unwrap_or_else(current_year), m))
}

fn read_profile(path: Option<&str>) -> Result<AvailabilityProfile> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse availability profile JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
