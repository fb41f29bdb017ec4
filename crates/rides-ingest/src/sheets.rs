//! Loaders for the driver sheet, the two rider forms, and the previous output.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use rides_model::{DriverRecord, OUTPUT_DRIVER_PHONE_HDR, Phone, RiderRecord, UNASSIGNED_MARKER};

use crate::error::{IngestError, Result};
use crate::table::{CsvTable, read_table};

pub const DRIVER_TIMESTAMP_HDR: &str = "Timestamp";
pub const DRIVER_NAME_HDR: &str = "Name";
pub const DRIVER_PHONE_HDR: &str = "Phone Number";
pub const DRIVER_CAPACITY_HDR: &str = "Number of Seats in Car (not including you)";
pub const DRIVER_AVAILABILITY_HDR: &str = "Availability";

/// Driver sheet columns in the order they are written back.
pub const DRIVER_HEADERS: [&str; 5] = [
    DRIVER_TIMESTAMP_HDR,
    DRIVER_NAME_HDR,
    DRIVER_PHONE_HDR,
    DRIVER_CAPACITY_HDR,
    DRIVER_AVAILABILITY_HDR,
];

/// Column layout and attendance keyword of one rider sign-up form.
#[derive(Debug, Clone, Copy)]
pub struct RiderForm {
    pub label: &'static str,
    pub timestamp: &'static str,
    pub name: &'static str,
    pub phone: &'static str,
    pub location: &'static str,
    pub friday: &'static str,
    pub sunday: &'static str,
    pub notes: &'static str,
    /// An attendance answer containing this keyword means "needs a ride there".
    pub attending_keyword: &'static str,
}

/// Semester-long sign-ups.
pub const PERMANENT_FORM: RiderForm = RiderForm {
    label: "permanent",
    timestamp: "Timestamp",
    name: "Full Name:",
    phone: "Phone Number:",
    location: "Where should we pick you up?",
    friday: "Which service(s) do you need a permanent ride for? [Friday Night Bible Study | 6:30 pm]",
    sunday: "Which service(s) do you need a permanent ride for? [Sunday Service | 8:30 am/10:45 am]",
    notes: "Other Notes",
    attending_keyword: "yes",
};

/// One-off sign-ups for the coming week.
pub const WEEKLY_FORM: RiderForm = RiderForm {
    label: "weekly",
    timestamp: "Timestamp",
    name: "Full Name",
    phone: "Phone Number",
    location: "Where should we pick you up from?",
    friday: "Friday Night Bible Study (Friday @7pm) (Rides from Campus will be provided at Peterson Loop at 6:30 pm)",
    sunday: "Sunday Service",
    notes: "Additional Comments / Questions / Concerns",
    attending_keyword: "there",
};

/// Load the driver sign-up sheet.
pub fn load_drivers(path: &Path) -> Result<Vec<DriverRecord>> {
    let table = read_table(path)?;
    let drivers = drivers_from_table(&table, path)?;
    info!(path = %path.display(), drivers = drivers.len(), "loaded driver sheet");
    Ok(drivers)
}

/// Map a driver table onto records. Every driver column is required.
pub fn drivers_from_table(table: &CsvTable, path: &Path) -> Result<Vec<DriverRecord>> {
    if table.headers.is_empty() {
        return Ok(Vec::new());
    }
    let timestamp = table.require_column(DRIVER_TIMESTAMP_HDR, path)?;
    let name = table.require_column(DRIVER_NAME_HDR, path)?;
    let phone = table.require_column(DRIVER_PHONE_HDR, path)?;
    let capacity = table.require_column(DRIVER_CAPACITY_HDR, path)?;
    let availability = table.require_column(DRIVER_AVAILABILITY_HDR, path)?;
    Ok(table
        .rows
        .iter()
        .map(|row| DriverRecord {
            timestamp: row[timestamp].clone(),
            name: row[name].clone(),
            phone: row[phone].clone(),
            capacity: row[capacity].clone(),
            availability: row[availability].clone(),
        })
        .collect())
}

/// Load and merge the permanent and weekly rider forms, permanent rows first.
///
/// A missing form file contributes no rows.
pub fn load_riders(permanent: &Path, weekly: &Path) -> Result<Vec<RiderRecord>> {
    let mut riders = load_form(permanent, &PERMANENT_FORM)?;
    riders.extend(load_form(weekly, &WEEKLY_FORM)?);
    info!(riders = riders.len(), "merged rider forms");
    Ok(riders)
}

fn load_form(path: &Path, form: &RiderForm) -> Result<Vec<RiderRecord>> {
    let table = match read_table(path) {
        Ok(table) => table,
        Err(IngestError::FileNotFound { path }) => {
            warn!(form = form.label, path = %path.display(), "rider form not found, skipping");
            return Ok(Vec::new());
        }
        Err(error) => return Err(error),
    };
    let riders = riders_from_table(&table, form, path)?;
    debug!(form = form.label, riders = riders.len(), "loaded rider form");
    Ok(riders)
}

/// Map one rider form onto the common rider record.
pub fn riders_from_table(
    table: &CsvTable,
    form: &RiderForm,
    path: &Path,
) -> Result<Vec<RiderRecord>> {
    if table.headers.is_empty() {
        return Ok(Vec::new());
    }
    let timestamp = table.require_column(form.timestamp, path)?;
    let name = table.require_column(form.name, path)?;
    let phone = table.require_column(form.phone, path)?;
    let location = table.require_column(form.location, path)?;
    let friday = table.require_column(form.friday, path)?;
    let sunday = table.require_column(form.sunday, path)?;
    // Notes are free text; older exports omit the column.
    let notes = table.column_index(form.notes);
    let attending = |answer: &str| answer.to_lowercase().contains(form.attending_keyword);
    Ok(table
        .rows
        .iter()
        .map(|row| RiderRecord {
            timestamp: row[timestamp].clone(),
            name: row[name].clone(),
            phone: row[phone].clone(),
            location: row[location].clone(),
            friday: attending(&row[friday]),
            sunday: attending(&row[sunday]),
            notes: notes.map(|idx| row[idx].clone()).unwrap_or_default(),
        })
        .collect())
}

/// Phones of every driver named in the previous run's output table.
///
/// Spacer rows, de-duplicated rows, and the unassigned marker are skipped.
/// A missing file means there was no previous run.
pub fn load_previous_driver_phones(path: &Path) -> Result<BTreeSet<Phone>> {
    let table = match read_table(path) {
        Ok(table) => table,
        Err(IngestError::FileNotFound { path }) => {
            warn!(path = %path.display(), "no previous output, nothing to rotate");
            return Ok(BTreeSet::new());
        }
        Err(error) => return Err(error),
    };
    if table.headers.is_empty() {
        return Ok(BTreeSet::new());
    }
    let column = table.require_column(OUTPUT_DRIVER_PHONE_HDR, path)?;
    let phones: BTreeSet<Phone> = table
        .rows
        .iter()
        .map(|row| row[column].as_str())
        .filter(|value| !value.is_empty() && *value != UNASSIGNED_MARKER)
        .map(Phone::canonical)
        .collect();
    debug!(drivers = phones.len(), "previous drivers loaded");
    Ok(phones)
}
