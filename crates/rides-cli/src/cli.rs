//! CLI argument definitions for the ride assigner.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use rides_model::{Event, Service};

#[derive(Parser)]
#[command(
    name = "rides",
    version,
    about = "Assign volunteer drivers to riders",
    long_about = "Assign volunteer drivers to riders for the weekly Friday and Sunday events.\n\n\
                  Reads the driver sheet and rider forms from the data directory, groups\n\
                  riders into routes by pickup location, and writes the ride sheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assign riders to drivers for one event and write the ride sheet.
    Assign(AssignArgs),

    /// List the configured location groups with their bit positions.
    Locations(LocationsArgs),
}

#[derive(Parser)]
pub struct AssignArgs {
    /// Event to assign rides for.
    #[arg(long = "event", value_enum)]
    pub event: EventArg,

    /// Rotate last week's drivers to the back before selecting drivers.
    ///
    /// Drivers named in the previous ride sheet get a fresh timestamp and the
    /// driver sheet is written back in the new order. Drivers with a standing
    /// location preference keep their place.
    #[arg(long = "rotate")]
    pub rotate: bool,

    /// Directory holding the driver sheet, rider forms, and ride sheet.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory holding rides.toml and the optional config files.
    #[arg(long = "config-dir", value_name = "DIR", default_value = "cfg")]
    pub config_dir: PathBuf,

    /// Ride sheet path (default: <DATA_DIR>/out.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Open seats a driver needs to take a rider from a neighboring location (1-9).
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<u32>,

    /// Farthest neighbor distance, in location groups (1-9).
    #[arg(long = "distance", value_name = "N")]
    pub distance: Option<u32>,

    /// Sunday service for riders whose notes do not name one (1 or 2).
    #[arg(long = "main-service", value_name = "SERVICE")]
    pub main_service: Option<Service>,

    /// Pickup location for Friday riders whose notes say they come late.
    #[arg(long = "late-location", value_name = "NAME")]
    pub late_location: Option<String>,

    /// Reserve a blank row for every open seat in a driver's group.
    #[arg(long = "pad-open-seats")]
    pub pad_open_seats: bool,

    /// Print the ride sheet instead of writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the run report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct LocationsArgs {
    /// Directory holding rides.toml and the location map.
    #[arg(long = "config-dir", value_name = "DIR", default_value = "cfg")]
    pub config_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EventArg {
    Friday,
    Sunday,
}

impl From<EventArg> for Event {
    fn from(value: EventArg) -> Self {
        match value {
            EventArg::Friday => Event::Friday,
            EventArg::Sunday => Event::Sunday,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
