//! Per-run configuration.
//!
//! [`RunConfig`] bundles the location groups, ignore lists, driver
//! preferences, and matcher knobs for one run. It is built once and passed by
//! reference into every stage, so runs never share hidden state.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use rides_model::{DriverPreference, Phone, Service};

use crate::error::{CoreError, Result};
use crate::registry::LocationRegistry;

/// Accepted range for both matcher knobs.
pub const KNOB_RANGE: RangeInclusive<u32> = 1..=9;

/// Knobs of the tiered matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Farthest neighbor distance (in location groups) the matcher searches.
    pub max_distance: u32,
    /// Open seats a driver must still have to take a neighbor in the first sweep.
    pub vacancy_threshold: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_distance: 2,
            vacancy_threshold: 2,
        }
    }
}

impl MatchOptions {
    pub fn new(max_distance: u32, vacancy_threshold: u32) -> Result<Self> {
        check_knob("max distance", max_distance)?;
        check_knob("vacancy threshold", vacancy_threshold)?;
        Ok(Self {
            max_distance,
            vacancy_threshold,
        })
    }
}

fn check_knob(name: &'static str, value: u32) -> Result<()> {
    if KNOB_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OptionOutOfRange {
            name,
            value,
            min: *KNOB_RANGE.start(),
            max: *KNOB_RANGE.end(),
        })
    }
}

/// Layout options for the presentation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Reserve a blank row for every unfilled seat in a driver's group.
    pub pad_open_seats: bool,
}

/// A driver's declared preference, keyed by phone in [`RunConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preference {
    pub location: String,
    pub service: Option<Service>,
}

/// Everything a run needs besides the sign-up tables.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub registry: LocationRegistry,
    pub ignored_drivers: BTreeSet<Phone>,
    pub ignored_riders: BTreeSet<Phone>,
    pub preferences: BTreeMap<Phone, Preference>,
    pub matching: MatchOptions,
    /// Sunday service used when neither the rider nor the driver says otherwise.
    pub main_service: Service,
    /// Pickup location for Friday riders who come late. `None` leaves them be.
    pub late_friday_location: Option<String>,
    pub format: FormatOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            registry: LocationRegistry::new(),
            ignored_drivers: BTreeSet::new(),
            ignored_riders: BTreeSet::new(),
            preferences: BTreeMap::new(),
            matching: MatchOptions::default(),
            main_service: Service::Second,
            late_friday_location: None,
            format: FormatOptions::default(),
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(mut self, registry: LocationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_ignored_drivers(mut self, phones: BTreeSet<Phone>) -> Self {
        self.ignored_drivers = phones;
        self
    }

    pub fn with_ignored_riders(mut self, phones: BTreeSet<Phone>) -> Self {
        self.ignored_riders = phones;
        self
    }

    /// Later entries for the same phone replace earlier ones.
    pub fn with_preferences<I>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = DriverPreference>,
    {
        self.preferences = preferences
            .into_iter()
            .map(|entry| {
                (
                    entry.phone,
                    Preference {
                        location: entry.location,
                        service: entry.service,
                    },
                )
            })
            .collect();
        self
    }

    pub fn with_matching(mut self, matching: MatchOptions) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_main_service(mut self, service: Service) -> Self {
        self.main_service = service;
        self
    }

    pub fn with_late_friday_location(mut self, location: Option<String>) -> Self {
        self.late_friday_location = location;
        self
    }

    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knobs_are_bounded() {
        assert!(MatchOptions::new(1, 9).is_ok());
        let error = MatchOptions::new(0, 2).expect_err("zero distance");
        assert_eq!(
            error.to_string(),
            "max distance must be between 1 and 9, got 0"
        );
        assert!(MatchOptions::new(2, 10).is_err());
    }

    #[test]
    fn later_preferences_win() {
        let config = RunConfig::new().with_preferences([
            DriverPreference {
                phone: Phone::canonical("5550101"),
                location: "North".to_string(),
                service: None,
            },
            DriverPreference {
                phone: Phone::canonical("555-0101"),
                location: "South".to_string(),
                service: Some(Service::First),
            },
        ]);
        let preference = &config.preferences[&Phone::canonical("5550101")];
        assert_eq!(preference.location, "South");
        assert_eq!(preference.service, Some(Service::First));
    }
}
