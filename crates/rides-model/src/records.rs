//! Driver and rider records.
//!
//! `*Record` types carry the untyped cells exactly as read from a sign-up
//! sheet. Validation turns them into [`Driver`] and [`Rider`], which the
//! matching stages operate on.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::event::Service;
use crate::location::LocationSet;
use crate::phone::Phone;

/// One row of the driver sign-up sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub capacity: String,
    pub availability: String,
}

/// One row of a rider sign-up form, already normalized across forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderRecord {
    pub timestamp: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub friday: bool,
    pub sunday: bool,
    pub notes: String,
}

/// A validated driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub phone: Phone,
    pub name: String,
    /// Seats offered, not counting the driver.
    pub capacity: u32,
    /// Submission time, later rewritten by rotation. `None` sorts first.
    pub timestamp: Option<NaiveDateTime>,
    pub availability: String,
    /// Standing location preference, empty when none is declared.
    pub preferred_location: LocationSet,
    pub preferred_service: Option<Service>,
}

impl Driver {
    pub fn has_location_preference(&self) -> bool {
        !self.preferred_location.is_empty()
    }
}

/// A driver's standing preference, as declared in the preferences file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPreference {
    pub phone: Phone,
    /// Location name, resolved against the location groups during validation.
    pub location: String,
    pub service: Option<Service>,
}

/// A validated rider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub phone: Phone,
    pub name: String,
    pub location: String,
    pub friday: bool,
    pub sunday: bool,
    pub notes: String,
    pub timestamp: Option<NaiveDateTime>,
}
