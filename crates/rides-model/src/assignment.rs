use std::fmt;

use serde::{Deserialize, Serialize};

use crate::phone::Phone;
use crate::records::{Driver, Rider};

/// Column headers of the presentation table.
pub const OUTPUT_HEADERS: [&str; 7] = [
    OUTPUT_DRIVER_NAME_HDR,
    OUTPUT_DRIVER_PHONE_HDR,
    OUTPUT_DRIVER_CAPACITY_HDR,
    OUTPUT_RIDER_NAME_HDR,
    OUTPUT_RIDER_PHONE_HDR,
    OUTPUT_RIDER_LOCATION_HDR,
    OUTPUT_RIDER_NOTES_HDR,
];

pub const OUTPUT_DRIVER_NAME_HDR: &str = "Driver";
pub const OUTPUT_DRIVER_PHONE_HDR: &str = "Driver Phone #";
pub const OUTPUT_DRIVER_CAPACITY_HDR: &str = "Seats";
pub const OUTPUT_RIDER_NAME_HDR: &str = "Rider";
pub const OUTPUT_RIDER_PHONE_HDR: &str = "Rider Phone #";
pub const OUTPUT_RIDER_LOCATION_HDR: &str = "Location";
pub const OUTPUT_RIDER_NOTES_HDR: &str = "Notes";

/// Placeholder shown in the driver columns of unmatched riders.
pub const UNASSIGNED_MARKER: &str = "?";

/// Tier of the matcher that produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tier", content = "distance")]
pub enum MatchTier {
    /// Driver declared a standing preference for the rider's location.
    Preference,
    /// Driver already picks up at the rider's location.
    SameLocation,
    /// Driver picks up `d` groups away and still has the vacancy threshold free.
    NeighborWithVacancy(u32),
    /// Driver picks up `d` groups away.
    Neighbor(u32),
    /// First driver with any open seat.
    AnyOpening,
    /// Driver with the fewest route stops.
    LeastLoaded,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchTier::Preference => f.write_str("preference"),
            MatchTier::SameLocation => f.write_str("same location"),
            MatchTier::NeighborWithVacancy(d) => write!(f, "neighbor {d} (vacancy)"),
            MatchTier::Neighbor(d) => write!(f, "neighbor {d}"),
            MatchTier::AnyOpening => f.write_str("any opening"),
            MatchTier::LeastLoaded => f.write_str("least loaded"),
        }
    }
}

/// Driver fields copied onto an assignment for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRef {
    pub name: String,
    pub phone: Phone,
    pub capacity: u32,
}

impl From<&Driver> for DriverRef {
    fn from(driver: &Driver) -> Self {
        Self {
            name: driver.name.clone(),
            phone: driver.phone.clone(),
            capacity: driver.capacity,
        }
    }
}

/// A rider paired with at most one driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub rider: Rider,
    pub driver: Option<DriverRef>,
    pub tier: Option<MatchTier>,
}

impl Assignment {
    pub fn unmatched(rider: Rider) -> Self {
        Self {
            rider,
            driver: None,
            tier: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.driver.is_some()
    }
}

/// One row of the presentation table. Spacer rows are all blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRow {
    pub driver: String,
    pub driver_phone: String,
    pub seats: String,
    pub rider: String,
    pub rider_phone: String,
    pub location: String,
    pub notes: String,
}

impl PresentationRow {
    pub fn spacer() -> Self {
        Self::default()
    }

    pub fn is_spacer(&self) -> bool {
        self.cells().iter().all(|cell| cell.is_empty())
    }

    pub fn cells(&self) -> [&str; 7] {
        [
            &self.driver,
            &self.driver_phone,
            &self.seats,
            &self.rider,
            &self.rider_phone,
            &self.location,
            &self.notes,
        ]
    }
}
