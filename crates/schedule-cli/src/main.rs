//! `schedule` CLI — expand weekly rules and plan recurring events from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Mondays at 18:00 through September 2024
//! schedule generate --weekday 1 --time 18:00 --start 2024-09-02 --end 2024-09-30 --period explicit
//!
//! # Six months of Saturday matches, pinned to Paris time, as JSON
//! schedule generate --weekday 6 --time 10:00 --start 2024-09-01 --period rolling \
//!     --timezone Europe/Paris --json
//!
//! # Export the rule as an RFC 5545 block
//! schedule rrule --weekday 3 --time 18:00 --start 2024-02-15 --period month
//!
//! # Plan a front-end recurrence request and print the stored rules and events
//! schedule plan -i request.json
//! ```

mod settings;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use schedule_engine::store::{EventFilter, EventRecord, EventStore, RecurringRule};
use schedule_engine::{
    generate_occurrences, ical, localize, schedule_recurrence, DstPolicy, MemoryStore,
    PeriodPolicy, RecurrenceRequest, RecurrenceSpec,
};
use serde::Serialize;
use settings::Settings;
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "schedule",
    version,
    about = "Expand weekly practice and match rules into concrete dates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ./schedule.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every occurrence of a weekly rule
    Generate {
        #[command(flatten)]
        rule: RuleArgs,
        /// IANA timezone to pin occurrences to (overrides the settings file)
        #[arg(long)]
        timezone: Option<String>,
        /// What to do with times that fall in a DST gap
        #[arg(long, value_enum)]
        dst: Option<DstArg>,
        /// Print a JSON array instead of one occurrence per line
        #[arg(long)]
        json: bool,
    },
    /// Print the rule as an RFC 5545 DTSTART/RRULE block
    Rrule {
        #[command(flatten)]
        rule: RuleArgs,
    },
    /// Plan a recurrence request (JSON) and print the resulting rules and events
    Plan {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Args)]
struct RuleArgs {
    /// Day of the week, 0 = Sunday .. 6 = Saturday
    #[arg(long, allow_negative_numbers = true)]
    weekday: i64,
    /// Time of day, HH:MM
    #[arg(long)]
    time: String,
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    start: NaiveDate,
    /// Last day of the range (YYYY-MM-DD); required for `explicit`
    #[arg(long)]
    end: Option<NaiveDate>,
    #[arg(long, value_enum)]
    period: PeriodArg,
    /// Months covered by `rolling` (overrides the settings file)
    #[arg(long)]
    horizon: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PeriodArg {
    /// The month containing the start date
    #[value(alias = "monthly")]
    Month,
    /// From --start to --end
    #[value(alias = "seasonal")]
    Explicit,
    /// From --start for a number of months
    #[value(alias = "continuous")]
    Rolling,
}

#[derive(Clone, Copy, ValueEnum)]
enum DstArg {
    Skip,
    Shift,
}

impl From<DstArg> for DstPolicy {
    fn from(arg: DstArg) -> Self {
        match arg {
            DstArg::Skip => DstPolicy::Skip,
            DstArg::Shift => DstPolicy::ShiftForward,
        }
    }
}

impl RuleArgs {
    fn spec(&self, settings: &Settings) -> Result<RecurrenceSpec> {
        let period = match self.period {
            PeriodArg::Month => PeriodPolicy::MonthOf,
            PeriodArg::Explicit => PeriodPolicy::ExplicitRange,
            PeriodArg::Rolling => PeriodPolicy::RollingWindow {
                horizon_months: Some(self.horizon.unwrap_or(settings.horizon_months)),
            },
        };
        RecurrenceSpec::parse(self.weekday, &self.time, self.start, self.end, period)
            .context("Invalid recurrence")
    }
}

/// Output of the `plan` subcommand.
#[derive(Serialize)]
struct Plan {
    rules: Vec<RecurringRule>,
    events: Vec<EventRecord>,
    events_created: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(&settings.log_level);
    debug!(?settings, "loaded settings");

    match cli.command {
        Commands::Generate {
            rule,
            timezone,
            dst,
            json,
        } => {
            let spec = rule.spec(&settings)?;
            let occurrences = generate_occurrences(&spec).context("Failed to expand recurrence")?;

            let lines: Vec<String> = match timezone.or_else(|| settings.timezone.clone()) {
                Some(tz) => {
                    let policy = dst.map_or(settings.dst_policy, DstPolicy::from);
                    localize(&occurrences, &tz, policy)
                        .context("Failed to localize occurrences")?
                        .iter()
                        .map(|dt| dt.to_rfc3339())
                        .collect()
                }
                None if json => occurrences
                    .iter()
                    .map(|o| o.at().format("%Y-%m-%dT%H:%M:%S").to_string())
                    .collect(),
                None => occurrences.iter().map(ToString::to_string).collect(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                for line in lines {
                    println!("{}", line);
                }
            }
        }
        Commands::Rrule { rule } => {
            let spec = rule.spec(&settings)?;
            match ical::to_rrule(&spec).context("Failed to render RRULE")? {
                Some(text) => println!("{}", text),
                None => eprintln!("No occurrences in range; nothing to export."),
            }
        }
        Commands::Plan { input, output } => {
            let json = read_input(input.as_deref())?;
            let mut request =
                RecurrenceRequest::from_json(&json).context("Failed to read recurrence request")?;
            request.horizon_months.get_or_insert(settings.horizon_months);

            let mut store = MemoryStore::new();
            let summary =
                schedule_recurrence(&mut store, &request).context("Failed to plan recurrence")?;
            let plan = Plan {
                events: store.query_events(&EventFilter::default())?,
                rules: summary.rules,
                events_created: summary.events_created,
            };

            write_output(output.as_deref(), &serde_json::to_string_pretty(&plan)?)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays parseable. `RUST_LOG` wins over the settings level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
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
