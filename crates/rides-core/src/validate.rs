//! Cleaning of the raw sign-up tables.
//!
//! Steps run in this order for both tables:
//!
//! 1. Drop rows with a blank phone.
//! 2. Keep only the latest submission per phone.
//! 3. Coerce capacity and phone to their typed forms.
//! 4. Drop phones on the role's ignore list.
//!
//! Unusable capacity or timestamp values abort the run.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use rides_model::{Driver, DriverRecord, LocationSet, Phone, Rider, RiderRecord};

use crate::context::RunConfig;
use crate::error::{CoreError, Result};

const DATETIME_FORMATS: [&str; 5] = [
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Parse a sheet timestamp. Blank means "never".
pub fn parse_timestamp(raw: &str) -> Option<Option<NaiveDateTime>> {
    let value = raw.trim();
    if value.is_empty() {
        return Some(None);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(Some(parsed.naive_utc()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Some(parsed));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(Some(date.and_time(NaiveTime::MIN)));
        }
    }
    None
}

/// Parse a seat count. Integral floats such as `3.0` are accepted.
pub fn parse_capacity(raw: &str) -> Option<u32> {
    let value = raw.trim();
    if let Ok(count) = value.parse::<u32>() {
        return Some(count);
    }
    let float = value.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= f64::from(u32::MAX)
    {
        Some(float as u32)
    } else {
        None
    }
}

fn stamp(role: &'static str, phone: &Phone, raw: &str) -> Result<Option<NaiveDateTime>> {
    parse_timestamp(raw).ok_or_else(|| CoreError::InvalidTimestamp {
        role,
        phone: phone.clone(),
        value: raw.to_string(),
    })
}

/// Keep the row with the latest timestamp per phone, in input order.
///
/// Ties go to the later row, so a resubmission with the same timestamp
/// still replaces the earlier one.
fn keep_latest<T>(
    rows: Vec<T>,
    key: impl Fn(&T) -> &Phone,
    timestamp: impl Fn(&T) -> Option<NaiveDateTime>,
) -> Vec<T> {
    let mut winners: HashMap<Phone, (Option<NaiveDateTime>, usize)> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let candidate = (timestamp(row), idx);
        winners
            .entry(key(row).clone())
            .and_modify(|best| {
                if candidate.0 >= best.0 {
                    *best = candidate;
                }
            })
            .or_insert(candidate);
    }
    rows.into_iter()
        .enumerate()
        .filter(|(idx, row)| winners.get(key(row)).is_some_and(|best| best.1 == *idx))
        .map(|(_, row)| row)
        .collect()
}

struct StampedDriver<'a> {
    record: &'a DriverRecord,
    phone: Phone,
    timestamp: Option<NaiveDateTime>,
}

/// Validate the driver sheet and attach declared preferences.
///
/// Same as [`clean_drivers`] followed by [`drop_ignored_drivers`].
pub fn validate_drivers(records: &[DriverRecord], config: &RunConfig) -> Result<Vec<Driver>> {
    let drivers = clean_drivers(records, config)?;
    Ok(drop_ignored_drivers(drivers, config))
}

/// Drivers on the ignore list sit out the run but stay on the roster.
pub fn drop_ignored_drivers(mut drivers: Vec<Driver>, config: &RunConfig) -> Vec<Driver> {
    drivers.retain(|driver| {
        let ignored = config.ignored_drivers.contains(&driver.phone);
        if ignored {
            debug!(phone = %driver.phone, "ignoring driver");
        }
        !ignored
    });
    drivers
}

/// Driver roster: blank phones dropped, latest row per phone, typed fields
/// and preferences attached. Ignored drivers are kept.
pub fn clean_drivers(records: &[DriverRecord], config: &RunConfig) -> Result<Vec<Driver>> {
    let mut stamped = Vec::with_capacity(records.len());
    for record in records {
        let phone = Phone::canonical(&record.phone);
        if phone.is_empty() {
            continue;
        }
        let timestamp = stamp("driver", &phone, &record.timestamp)?;
        stamped.push(StampedDriver {
            record,
            phone,
            timestamp,
        });
    }
    let blank = records.len() - stamped.len();
    let stamped = keep_latest(stamped, |row| &row.phone, |row| row.timestamp);

    let mut drivers = Vec::with_capacity(stamped.len());
    for row in stamped {
        let capacity =
            parse_capacity(&row.record.capacity).ok_or_else(|| CoreError::InvalidCapacity {
                phone: row.phone.clone(),
                value: row.record.capacity.clone(),
            })?;
        let (preferred_location, preferred_service) = match config.preferences.get(&row.phone) {
            Some(preference) => {
                let location = config.registry.lookup(&preference.location);
                if location.is_empty() && !preference.location.is_empty() {
                    warn!(
                        phone = %row.phone,
                        location = %preference.location,
                        "preferred location is not a known location group"
                    );
                }
                (location, preference.service)
            }
            None => (LocationSet::EMPTY, None),
        };
        drivers.push(Driver {
            phone: row.phone,
            name: row.record.name.clone(),
            capacity,
            timestamp: row.timestamp,
            availability: row.record.availability.clone(),
            preferred_location,
            preferred_service,
        });
    }
    info!(
        input = records.len(),
        blank_phone = blank,
        drivers = drivers.len(),
        "cleaned driver roster"
    );
    Ok(drivers)
}

/// Validate the merged rider table.
///
/// Riders come back ordered by submission time, oldest first; a rider who
/// resubmitted keeps only the latest row.
pub fn validate_riders(records: &[RiderRecord], config: &RunConfig) -> Result<Vec<Rider>> {
    let mut riders = Vec::with_capacity(records.len());
    for record in records {
        let phone = Phone::canonical(&record.phone);
        if phone.is_empty() {
            continue;
        }
        let timestamp = stamp("rider", &phone, &record.timestamp)?;
        riders.push(Rider {
            phone,
            name: record.name.clone(),
            location: record.location.clone(),
            friday: record.friday,
            sunday: record.sunday,
            notes: record.notes.clone(),
            timestamp,
        });
    }
    let blank = records.len() - riders.len();
    riders.sort_by_key(|rider| rider.timestamp);
    let mut riders = keep_latest(riders, |rider| &rider.phone, |rider| rider.timestamp);
    riders.retain(|rider| {
        let ignored = config.ignored_riders.contains(&rider.phone);
        if ignored {
            debug!(phone = %rider.phone, "ignoring rider");
        }
        !ignored
    });
    info!(
        input = records.len(),
        blank_phone = blank,
        riders = riders.len(),
        "validated riders"
    );
    Ok(riders)
}
