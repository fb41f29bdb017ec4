pub mod assignment;
pub mod event;
pub mod location;
pub mod phone;
pub mod records;

pub use assignment::{
    Assignment, DriverRef, MatchTier, OUTPUT_DRIVER_CAPACITY_HDR, OUTPUT_DRIVER_NAME_HDR,
    OUTPUT_DRIVER_PHONE_HDR, OUTPUT_HEADERS, OUTPUT_RIDER_LOCATION_HDR, OUTPUT_RIDER_NAME_HDR,
    OUTPUT_RIDER_NOTES_HDR, OUTPUT_RIDER_PHONE_HDR, PresentationRow, UNASSIGNED_MARKER,
};
pub use event::{Event, Service, UnknownService};
pub use location::{ELSEWHERE, LocationSet, MAX_LOCATION_GROUPS};
pub use phone::Phone;
pub use records::{Driver, DriverPreference, DriverRecord, Rider, RiderRecord};

#[cfg(test)]
mod tests {
    use super::*;

    fn rider(phone: &str) -> Rider {
        Rider {
            phone: Phone::canonical(phone),
            name: "Ada".to_string(),
            location: "North".to_string(),
            friday: true,
            sunday: false,
            notes: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn unmatched_assignment_has_no_driver() {
        let assignment = Assignment::unmatched(rider("555"));
        assert!(!assignment.is_matched());
        assert!(assignment.tier.is_none());
    }

    #[test]
    fn assignment_serializes() {
        let assignment = Assignment {
            rider: rider("555"),
            driver: Some(DriverRef {
                name: "Bo".to_string(),
                phone: Phone::canonical("777"),
                capacity: 3,
            }),
            tier: Some(MatchTier::Neighbor(1)),
        };
        let json = serde_json::to_string(&assignment).expect("serialize assignment");
        let round: Assignment = serde_json::from_str(&json).expect("deserialize assignment");
        assert_eq!(round, assignment);
    }

    #[test]
    fn spacer_row_is_blank() {
        assert!(PresentationRow::spacer().is_spacer());
        let row = PresentationRow {
            rider: "Ada".to_string(),
            ..PresentationRow::default()
        };
        assert!(!row.is_spacer());
    }
}
