//! Driver selection and rotation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use rides_model::{Driver, LocationSet, Phone, Rider};

use crate::registry::LocationRegistry;

/// How many drivers, taken in table order, cover `riders` seats.
///
/// A driver is counted only while seats are still needed when it is
/// visited; the driver that covers the last rider is counted.
pub fn drivers_needed(drivers: &[Driver], riders: usize) -> usize {
    let mut remaining = i64::try_from(riders).unwrap_or(i64::MAX);
    let mut count = 0;
    for driver in drivers {
        if remaining <= 0 {
            break;
        }
        remaining -= i64::from(driver.capacity);
        count += 1;
    }
    count
}

/// The smallest prefix of `drivers` covering `riders`, largest cars first.
///
/// The capacity sort is stable, so equal cars keep their rotation order.
pub fn select_drivers(drivers: &[Driver], riders: usize) -> Vec<Driver> {
    let count = drivers_needed(drivers, riders);
    let mut selected = drivers[..count].to_vec();
    selected.sort_by(|a, b| b.capacity.cmp(&a.capacity));
    info!(
        available = drivers.len(),
        selected = selected.len(),
        riders,
        "selected drivers"
    );
    selected
}

/// Move drivers whose preferred location has riders waiting to the front.
///
/// Riders are counted per location. Drivers are visited in table order and
/// a preferenced driver is moved up while riders remain at their location;
/// each one moved takes their seat count off that location's demand. The
/// move is stable on both sides.
///
/// Returns the number of drivers moved up.
pub fn prioritize_preferred_drivers(
    drivers: &mut [Driver],
    riders: &[Rider],
    registry: &LocationRegistry,
) -> usize {
    let mut demand: BTreeMap<LocationSet, i64> = BTreeMap::new();
    for rider in riders {
        *demand.entry(registry.lookup(&rider.location)).or_default() += 1;
    }
    let mut prioritized = BTreeSet::new();
    for driver in drivers.iter().filter(|driver| driver.has_location_preference()) {
        let Some(waiting) = demand.get_mut(&driver.preferred_location) else {
            continue;
        };
        if *waiting > 0 {
            *waiting -= i64::from(driver.capacity);
            prioritized.insert(driver.phone.clone());
            debug!(phone = %driver.phone, "prioritizing preferenced driver");
        }
    }
    drivers.sort_by_key(|driver| !prioritized.contains(&driver.phone));
    info!(prioritized = prioritized.len(), "prioritized preferenced drivers");
    prioritized.len()
}

/// Push recently used drivers to the back of the rotation.
///
/// Drivers in `used` get a fresh timestamp, unless they hold a standing
/// location preference. The fresh stamp is never earlier than any existing
/// timestamp, so rotated drivers sort after everyone else. The table is then
/// sorted by timestamp, oldest (least recently driven) first.
///
/// Returns the number of drivers whose timestamp changed.
pub fn rotate_drivers(drivers: &mut [Driver], used: &BTreeSet<Phone>, now: NaiveDateTime) -> usize {
    let latest = drivers.iter().filter_map(|driver| driver.timestamp).max();
    let fresh = latest.map_or(now, |latest| latest.max(now));
    let mut rotated = 0;
    for driver in drivers.iter_mut() {
        if !used.contains(&driver.phone) {
            continue;
        }
        if driver.has_location_preference() {
            debug!(phone = %driver.phone, "keeping preferenced driver in place");
            continue;
        }
        driver.timestamp = Some(fresh);
        rotated += 1;
    }
    drivers.sort_by_key(|driver| driver.timestamp);
    info!(rotated, drivers = drivers.len(), "rotated drivers");
    rotated
}
