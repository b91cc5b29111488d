//! `stay` CLI: inspect room calendars and check stay availability.
//!
//! A room feed is a JSON document with the room inventory, its bookings and
//! its disabled dates:
//!
//! ```json
//! {"inventory": {"isPrivate": true},
//!  "bookings": [{"checkIn": "2025-03-25", "checkOut": "2025-3-28"}],
//!  "disabledDates": ["2025-04-10"]}
//! ```
//!
//! ## Usage
//!
//! ```sh
//! # Per-day statuses for a slice of the horizon
//! stay calendar -i room.json --from 2025-03-20 --to 2025-03-31
//!
//! # Can this stay be booked? (shared rooms take --single / --double)
//! stay check -i room.json --check-in 2025-03-28 --check-out 2025-03-30
//!
//! # Beds left in a shared room
//! stay beds -i hostel.json --check-in 2025-04-02 --check-out 2025-04-03
//!
//! # Drag-select a span and print the unavailable list to persist
//! stay select -i room.json --from 2025-03-12 --to 2025-03-10 --policy set-unavailable
//!
//! # Unavailable days as stored
//! stay export -i room.json
//! ```
//!
//! Set `RUST_LOG=debug` for engine logs on stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use stay_engine::{
    format_day, parse_day, AvailabilityResolver, BedCount, CommitPolicy, Day, DayStatus,
    EngineConfig, PointerEvent, RoomCalendar, RoomFeed, RoomSnapshot, StayInterval,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stay", version, about = "Room availability and calendar CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (commit_policy, instant_feedback, horizon_days, timezone)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Override today's date (YYYY-MM-DD or YYYY-M-D)
    #[arg(long, global = true)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the status of each day in the horizon
    Calendar {
        /// Room feed JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// First day to print
        #[arg(long)]
        from: Option<String>,
        /// Last day to print
        #[arg(long)]
        to: Option<String>,
    },
    /// Check whether a stay can be booked
    Check {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        check_in: String,
        #[arg(long)]
        check_out: String,
        /// Single beds requested (shared rooms)
        #[arg(long, default_value_t = 0)]
        single: u32,
        /// Double beds requested (shared rooms)
        #[arg(long, default_value_t = 0)]
        double: u32,
    },
    /// Show remaining beds of a shared room
    Beds {
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long, requires = "check_out")]
        check_in: Option<String>,
        #[arg(long, requires = "check_in")]
        check_out: Option<String>,
    },
    /// Apply a drag selection from one day to another and print the unavailable days
    Select {
        #[arg(short, long)]
        input: Option<String>,
        /// Day the drag starts on
        #[arg(long)]
        from: String,
        /// Day the drag is released on
        #[arg(long)]
        to: String,
        /// Commit policy (overrides the config file)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Print the unavailable days of the horizon as a JSON array
    Export {
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Toggle,
    SetUnavailable,
    SetAvailable,
}

impl From<PolicyArg> for CommitPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Toggle => CommitPolicy::Toggle,
            PolicyArg::SetUnavailable => CommitPolicy::SetUnavailable,
            PolicyArg::SetAvailable => CommitPolicy::SetAvailable,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    let today = match cli.today.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => config.today().context("Failed to determine today's date")?,
    };
    tracing::debug!(%today, policy = ?config.commit_policy, "resolved run settings");

    match cli.command {
        Commands::Calendar { input, from, to } => {
            let snapshot = build_snapshot(input.as_deref(), &config, today)?;
            let from = from.as_deref().map(parse_date).transpose()?;
            let to = to.as_deref().map(parse_date).transpose()?;

            if snapshot.is_degraded() {
                eprintln!("warning: room feed is incomplete; statuses are not authoritative");
            }
            for day in snapshot.store().days() {
                if from.is_some_and(|f| day.date < f) || to.is_some_and(|t| day.date > t) {
                    continue;
                }
                println!("{} {}", format_day(day.date), status_label(day.status));
            }
        }
        Commands::Check {
            input,
            check_in,
            check_out,
            single,
            double,
        } => {
            let snapshot = build_snapshot(input.as_deref(), &config, today)?;
            // Unparseable dates fall through as missing: the resolver fails closed.
            let check_in = parse_day(&check_in).ok();
            let check_out = parse_day(&check_out).ok();

            let verdict = AvailabilityResolver::new(&snapshot).can_book(
                check_in,
                check_out,
                BedCount::new(single, double),
            );
            println!("{}", serde_json::to_string(&verdict)?);
        }
        Commands::Beds {
            input,
            check_in,
            check_out,
        } => {
            let snapshot = build_snapshot(input.as_deref(), &config, today)?;
            let stay = match (check_in.as_deref(), check_out.as_deref()) {
                (Some(a), Some(b)) => Some(StayInterval::new(parse_date(a)?, parse_date(b)?)?),
                _ => None,
            };
            let remaining = AvailabilityResolver::new(&snapshot)
                .remaining_beds(stay.as_ref())
                .context("Failed to compute remaining beds")?;
            println!("{}", serde_json::to_string(&remaining)?);
        }
        Commands::Select {
            input,
            from,
            to,
            policy,
        } => {
            if let Some(policy) = policy {
                config.commit_policy = policy.into();
            }
            let feed = read_feed(input.as_deref())?;
            let mut calendar = RoomCalendar::with_today(&feed, config, today);

            let from = parse_date(&from)?;
            let to = parse_date(&to)?;
            calendar.handle(PointerEvent::Down(from));
            calendar.handle(PointerEvent::Enter(to));
            match calendar.handle(PointerEvent::Up) {
                Some(outcome) => eprintln!(
                    "{} day(s) changed to {}",
                    outcome.changed.len(),
                    status_label(outcome.target)
                ),
                None => eprintln!("selection not applied: {} is not editable", format_day(from)),
            }
            println!("{}", serde_json::to_string(&calendar.export_unavailable_iso())?);
        }
        Commands::Export { input } => {
            let snapshot = build_snapshot(input.as_deref(), &config, today)?;
            println!(
                "{}",
                serde_json::to_string(&snapshot.store().export_unavailable_iso())?
            );
        }
    }

    Ok(())
}

fn status_label(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Available => "available",
        DayStatus::Unavailable => "unavailable",
        DayStatus::Booked => "booked",
    }
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            let config: EngineConfig = toml::from_str(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?;
            config
                .validate()
                .with_context(|| format!("Invalid config file: {}", path))?;
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn parse_date(raw: &str) -> Result<Day> {
    parse_day(raw).with_context(|| format!("Invalid date: {}", raw))
}

fn read_feed(path: Option<&str>) -> Result<RoomFeed> {
    let json = read_input(path)?;
    serde_json::from_str(&json).context("Failed to parse room feed JSON")
}

fn build_snapshot(path: Option<&str>, config: &EngineConfig, today: Day) -> Result<RoomSnapshot> {
    let feed = read_feed(path)?;
    Ok(RoomSnapshot::build(&feed, today, config.horizon_days))
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
