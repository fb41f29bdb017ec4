//! Ride assignment core.
//!
//! Turns validated sign-up tables into driver/rider pairs:
//!
//! - [`LocationRegistry`] maps pickup names to location bits.
//! - [`validate_drivers`] and [`validate_riders`] clean the raw tables.
//! - [`rotate_drivers`], [`prioritize_preferred_drivers`] and
//!   [`select_drivers`] decide who drives.
//! - [`AssignmentEngine`] runs the tiered matcher.
//! - [`format_assignments`] lays the result out as the ride sheet.
//!
//! [`run_event`] chains all of the above for one event, driven by a
//! [`RunConfig`] built once per run.
//!
//! # Example
//!
//! ```ignore
//! use rides_core::{LocationRegistry, RunConfig, RunInput, run_event};
//! use rides_model::Event;
//!
//! let config = RunConfig::new().with_registry(LocationRegistry::from_lines(lines));
//! let report = run_event(&RunInput::new(drivers, riders, now), Event::Friday, &config)?;
//! println!("{} riders unmatched", report.unmatched);
//! ```

mod context;
mod engine;
mod error;
mod filter;
mod format;
mod pipeline;
mod registry;
mod select;
mod validate;

// === Error Types ===
pub use error::{CoreError, Result};

// === Configuration ===
pub use context::{FormatOptions, KNOB_RANGE, MatchOptions, Preference, RunConfig};
pub use registry::LocationRegistry;

// === Preprocessing ===
pub use filter::{
    ServiceGroup, driver_service, filter_event, is_late_friday, mark_late_friday_riders,
    requested_service, split_services,
};
pub use select::{drivers_needed, prioritize_preferred_drivers, rotate_drivers, select_drivers};
pub use validate::{
    clean_drivers, drop_ignored_drivers, parse_capacity, parse_timestamp, validate_drivers,
    validate_riders,
};

// === Matching ===
pub use engine::{AssignmentEngine, DriverState, MatchOutcome};

// === Output ===
pub use format::format_assignments;

// === Pipeline ===
pub use pipeline::{DriverLoad, RunInput, RunReport, run_event};
