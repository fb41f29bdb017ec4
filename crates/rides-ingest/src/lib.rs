//! Ride sign-up ingestion.
//!
//! Reads the driver sheet, merges the permanent and weekly rider forms into
//! one rider table, and loads the optional configuration files (location
//! groups, ignore lists, driver preferences, `rides.toml`).
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rides_ingest::{load_drivers, load_riders, load_location_lines};
//!
//! let drivers = load_drivers(Path::new("data/drivers.csv"))?;
//! let riders = load_riders(Path::new("data/permanent.csv"), Path::new("data/weekly.csv"))?;
//! let groups = load_location_lines(Path::new("cfg/map.txt"))?;
//! ```

mod config;
mod error;
mod settings;
mod sheets;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use table::{CsvTable, normalize_header, read_table};

// === Sheets ===
pub use sheets::{
    DRIVER_AVAILABILITY_HDR, DRIVER_CAPACITY_HDR, DRIVER_HEADERS, DRIVER_NAME_HDR,
    DRIVER_PHONE_HDR, DRIVER_TIMESTAMP_HDR, PERMANENT_FORM, RiderForm, WEEKLY_FORM,
    drivers_from_table, load_drivers, load_previous_driver_phones, load_riders,
    riders_from_table,
};

// === Config Files ===
pub use config::{
    load_driver_preferences, load_ignore_list, load_location_lines, parse_preference,
};
pub use settings::{FileNames, FilePaths, SETTINGS_FILE, Settings, load_settings, parse_settings};
