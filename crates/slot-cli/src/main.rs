//! `slots` CLI — list bookable appointment slots and vet booking requests.
//!
//! ## Usage
//!
//! ```sh
//! # Slots for a 60-minute service on a date, using the business's hours
//! slots generate --date 2026-03-16 --duration 60 --availability hours.json
//!
//! # Look the duration up in the service catalog, minus existing bookings
//! slots generate --date 2026-03-16 --service Haircut --services services.json \
//!   --bookings appointments.json
//!
//! # Fix "now" (otherwise the current time in --timezone, or local time)
//! slots generate --date 2026-03-16 --duration 30 --now 2026-03-16T14:32:00
//! slots generate --date 2026-03-16 --duration 30 --timezone America/New_York
//!
//! # Which windows apply on a date
//! slots windows --date 2026-03-16 --availability hours.json
//!
//! # Would this booking be accepted?
//! slots check --service Haircut --services services.json \
//!   --date 2026-03-16 --time "10:30 AM" --bookings appointments.json
//! ```
//!
//! Files may be given as `-` to read from stdin. Log output goes to stderr;
//! `-v` turns on debug logs, `RUST_LOG` overrides both.

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::booking::{booked_intervals_for, validate_booking, Appointment, BookingRequest};
use slot_engine::service::find_service;
use slot_engine::time::parse_local_date;
use slot_engine::{Availability, BookedInterval, CandidateSlot, SchedulerConfig, Service, SlotGenerator};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment slot generation and booking checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Scheduler config file (JSON); defaults apply to anything it omits
    #[arg(long, global = true)]
    config: Option<String>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Where "now" comes from.
#[derive(clap::Args)]
struct ClockArgs {
    /// Current local time, e.g. 2026-03-16T14:32:00 (RFC 3339 also accepted)
    #[arg(long)]
    now: Option<String>,

    /// IANA timezone of the business, used to read the clock when --now is absent
    #[arg(long)]
    timezone: Option<String>,
}

/// The business's stored data.
#[derive(clap::Args)]
struct BusinessArgs {
    /// Availability record (JSON); without it the fallback hours apply
    #[arg(long)]
    availability: Option<String>,

    /// Existing appointments (JSON array)
    #[arg(long)]
    bookings: Option<String>,

    /// Appointment id being edited; its own booking is ignored
    #[arg(long)]
    exclude: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable start times for a service on a date
    Generate {
        /// Date to book, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Service length in minutes
        #[arg(long, conflicts_with = "service")]
        duration: Option<u32>,
        /// Service name, looked up in --services
        #[arg(long, requires = "services")]
        service: Option<String>,
        /// Service catalog (JSON array)
        #[arg(long)]
        services: Option<String>,
        /// Minutes between candidate starts (overrides the config)
        #[arg(long)]
        step: Option<u32>,
        #[command(flatten)]
        business: BusinessArgs,
        #[command(flatten)]
        clock: ClockArgs,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the open windows that apply on a date
    Windows {
        /// Date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Availability record (JSON); without it the fallback hours apply
        #[arg(long)]
        availability: Option<String>,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
    /// Check a booking request against the current bookings
    Check {
        #[arg(long)]
        service: String,
        /// Service catalog (JSON array)
        #[arg(long)]
        services: String,
        /// Date to book, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Requested start, "10:30 AM" or "10:30"
        #[arg(long)]
        time: String,
        /// Free-text note stored with the appointment
        #[arg(long)]
        note: Option<String>,
        #[command(flatten)]
        business: BusinessArgs,
        #[command(flatten)]
        clock: ClockArgs,
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotRow {
    time: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration_minutes: u32,
}

impl From<&CandidateSlot> for SlotRow {
    fn from(slot: &CandidateSlot) -> Self {
        Self {
            time: slot.label(),
            start: slot.start,
            end: slot.end(),
            duration_minutes: slot.duration_minutes,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate {
            date,
            duration,
            service,
            services,
            step,
            business,
            clock,
            format,
            output,
        } => {
            let date = parse_date(&date)?;
            let duration = match (duration, service) {
                (Some(minutes), _) => minutes,
                (None, Some(name)) => {
                    let catalog = load_services(services.as_deref())?;
                    find_service(&catalog, &name)
                        .map(|s| s.duration_minutes)
                        .with_context(|| format!("Unknown service: {}", name))?
                }
                (None, None) => anyhow::bail!("Either --duration or --service is required"),
            };

            let mut config = config;
            if let Some(step) = step {
                config.step_minutes = step;
                config.validate().context("Invalid --step")?;
            }

            let availability = load_availability(business.availability.as_deref())?;
            let booked = load_booked(&business, date)?;
            let now = resolve_now(&clock)?;

            let generator = SlotGenerator::new(config);
            let slots = generator.generate(date, duration, availability.as_ref(), &booked, now);
            info!(%date, duration, count = slots.len(), "slots generated");

            let rendered = match format {
                Format::Text => lines(slots.iter().map(CandidateSlot::label)),
                Format::Json => {
                    let rows: Vec<SlotRow> = slots.iter().map(SlotRow::from).collect();
                    pretty_json(&rows)?
                }
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Windows {
            date,
            availability,
            format,
        } => {
            let date = parse_date(&date)?;
            let availability = load_availability(availability.as_deref())?;
            let windows = slot_engine::availability::resolve_windows(
                availability.as_ref(),
                date,
                &config.fallback_window,
            );

            let rendered = match format {
                Format::Text if windows.is_empty() => "closed\n".to_string(),
                Format::Text => lines(windows.iter().map(|w| format!("{}-{}", w.start, w.end))),
                Format::Json => pretty_json(&windows)?,
            };
            write_output(None, &rendered)?;
        }
        Commands::Check {
            service,
            services,
            date,
            time,
            note,
            business,
            clock,
            format,
        } => {
            let catalog = load_services(Some(&services))?;
            let date = parse_date(&date)?;
            let availability = load_availability(business.availability.as_deref())?;
            let booked = load_booked(&business, date)?;
            let now = resolve_now(&clock)?;

            let request = BookingRequest {
                service: Some(service),
                date: Some(date),
                time: Some(time),
                note,
            };
            let generator = SlotGenerator::new(config);
            let appointment = validate_booking(
                &request,
                &catalog,
                availability.as_ref(),
                &booked,
                now,
                &generator,
            )
            .context("Booking rejected")?;

            let rendered = match format {
                Format::Text => format!(
                    "OK: {} on {} ({}, {} min)\n",
                    appointment.time,
                    appointment.date,
                    appointment.service,
                    appointment.duration_minutes.unwrap_or_default()
                ),
                Format::Json => pretty_json(&appointment)?,
            };
            write_output(None, &rendered)?;
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins; otherwise the level follows `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(path: Option<&str>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => {
            let json = read_input(Some(path))?;
            let config = SchedulerConfig::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path))?;
            debug!(path, "loaded config");
            Ok(config)
        }
        None => Ok(SchedulerConfig::default()),
    }
}

/// A missing path, or a file holding `null`, both mean "nothing configured".
fn load_availability(path: Option<&str>) -> Result<Option<Availability>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let json = read_input(Some(path))?;
    let availability: Option<Availability> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid availability JSON in {}", path))?;

    if let Some(availability) = &availability {
        for issue in availability.validate() {
            tracing::warn!(
                weekday = ?issue.weekday,
                index = issue.index,
                error = %issue.error,
                "availability has a bad window"
            );
        }
    }
    Ok(availability)
}

fn load_services(path: Option<&str>) -> Result<Vec<Service>> {
    let path = path.context("--services is required to look up a service")?;
    let json = read_input(Some(path))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid services JSON in {}", path))
}

fn load_booked(business: &BusinessArgs, date: NaiveDate) -> Result<Vec<BookedInterval>> {
    let Some(path) = business.bookings.as_deref() else {
        return Ok(Vec::new());
    };
    let json = read_input(Some(path))?;
    let appointments: Vec<Appointment> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid bookings JSON in {}", path))?;
    Ok(booked_intervals_for(
        &appointments,
        date,
        business.exclude.as_deref(),
    ))
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    parse_local_date(text).with_context(|| format!("Invalid --date: {}", text))
}

/// `--now` as given, else the wall clock in `--timezone`, else local time.
fn resolve_now(clock: &ClockArgs) -> Result<NaiveDateTime> {
    if let Some(now) = clock.now.as_deref() {
        if let Ok(dt) = DateTime::parse_from_rfc3339(now) {
            return Ok(dt.naive_local());
        }
        return now
            .parse::<NaiveDateTime>()
            .with_context(|| format!("Invalid --now: {}", now));
    }

    match clock.timezone.as_deref() {
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid --timezone '{}': {}", name, e))?;
            Ok(Utc::now().with_timezone(&tz).naive_local())
        }
        None => Ok(Local::now().naive_local()),
    }
}

fn lines<I: IntoIterator<Item = String>>(items: I) -> String {
    items.into_iter().map(|line| line + "\n").collect()
}

fn pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    json.push('\n');
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some("-") | None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
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
            print!("{}", content);
        }
    }
    Ok(())
}
