use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use rides_core::{CoreError, LocationRegistry, RunConfig, RunInput, run_event, validate_drivers};
use rides_model::{
    DriverPreference, DriverRecord, Event, MatchTier, Phone, RiderRecord, Service,
    UNASSIGNED_MARKER,
};

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

fn driver(phone: &str, name: &str, capacity: &str, timestamp: &str) -> DriverRecord {
    DriverRecord {
        timestamp: timestamp.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        capacity: capacity.to_string(),
        availability: "Friday, Sunday".to_string(),
    }
}

fn rider(phone: &str, name: &str, location: &str, timestamp: &str) -> RiderRecord {
    RiderRecord {
        timestamp: timestamp.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        location: location.to_string(),
        friday: true,
        sunday: true,
        notes: String::new(),
    }
}

fn config() -> RunConfig {
    RunConfig::new().with_registry(LocationRegistry::from_lines(["North, N", "Center", "South"]))
}

#[test]
fn friday_run_lays_out_the_sheet() {
    let input = RunInput::new(
        vec![driver("555-0100", "Ann", "2", "1/5/2024 9:00:00")],
        vec![
            rider("555-0200", "Bo", "North", "1/6/2024 9:00:00"),
            rider("555-0201", "Cy", "Center", "1/6/2024 9:05:00"),
            rider("555-0202", "Di", "Atlantis", "1/6/2024 9:10:00"),
        ],
        now(),
    );
    let report = run_event(&input, Event::Friday, &config()).expect("run");

    assert_eq!(report.riders, 3);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.matched(), 2);
    assert_eq!(report.drivers_used.len(), 1);
    assert_eq!(report.drivers_used[0].assigned, 2);

    let riders: Vec<&str> = report.rows.iter().map(|row| row.rider.as_str()).collect();
    assert_eq!(riders, vec!["Cy", "Bo", "", "Di", ""]);
    assert_eq!(report.rows[0].driver, "Ann");
    assert_eq!(report.rows[0].driver_phone, "5550100");
    assert!(report.rows[1].driver.is_empty());
    assert_eq!(report.rows[3].driver, UNASSIGNED_MARKER);
}

#[test]
fn resubmitted_rider_uses_latest_location() {
    let input = RunInput::new(
        vec![driver("100", "Ann", "3", "")],
        vec![
            rider("200", "Bo", "Atlantis", "1/6/2024 9:00:00"),
            rider("200", "Bo", "South", "1/7/2024 9:00:00"),
        ],
        now(),
    );
    let report = run_event(&input, Event::Friday, &config()).expect("run");
    assert_eq!(report.riders, 1);
    assert_eq!(report.unmatched, 0);
    assert_eq!(report.assignments[0].rider.location, "South");
}

#[test]
fn ignored_phones_are_dropped() {
    let ignored: BTreeSet<Phone> = [Phone::canonical("200")].into_iter().collect();
    let config = config().with_ignored_riders(ignored);
    let input = RunInput::new(
        vec![driver("100", "Ann", "3", "")],
        vec![rider("200", "Bo", "South", ""), rider("201", "Cy", "South", "")],
        now(),
    );
    let report = run_event(&input, Event::Friday, &config).expect("run");
    assert_eq!(report.riders, 1);
    assert_eq!(report.assignments[0].rider.name, "Cy");
}

#[test]
fn empty_event_aborts() {
    let mut sunday_only = rider("200", "Bo", "South", "");
    sunday_only.friday = false;
    let input = RunInput::new(vec![driver("100", "Ann", "3", "")], vec![sunday_only], now());
    let error = run_event(&input, Event::Friday, &config()).expect_err("no riders");
    assert!(matches!(error, CoreError::NoRiders { event: Event::Friday }));

    let mut friday_only = driver("100", "Ann", "3", "");
    friday_only.availability = "Friday".to_string();
    let input = RunInput::new(vec![friday_only], vec![rider("200", "Bo", "South", "")], now());
    let error = run_event(&input, Event::Sunday, &config()).expect_err("no drivers");
    assert!(matches!(error, CoreError::NoDrivers { event: Event::Sunday }));
}

#[test]
fn malformed_capacity_is_fatal() {
    let input = RunInput::new(
        vec![driver("100", "Ann", "lots", "")],
        vec![rider("200", "Bo", "South", "")],
        now(),
    );
    let error = run_event(&input, Event::Friday, &config()).expect_err("bad capacity");
    assert!(matches!(error, CoreError::InvalidCapacity { .. }));
}

#[test]
fn sunday_services_match_separately() {
    let config = config().with_preferences([DriverPreference {
        phone: Phone::canonical("100"),
        location: String::new(),
        service: Some(Service::First),
    }]);
    let mut early = rider("200", "Bo", "North", "");
    early.notes = "1st service please".to_string();
    let input = RunInput::new(
        vec![driver("100", "Ann", "2", ""), driver("101", "Eve", "2", "")],
        vec![early, rider("201", "Cy", "North", "")],
        now(),
    );
    let report = run_event(&input, Event::Sunday, &config).expect("run");

    assert_eq!(report.unmatched, 0);
    let pairs: Vec<(&str, Option<&str>)> = report
        .assignments
        .iter()
        .map(|a| {
            (
                a.rider.name.as_str(),
                a.driver.as_ref().map(|driver| driver.name.as_str()),
            )
        })
        .collect();
    assert_eq!(pairs, vec![("Bo", Some("Ann")), ("Cy", Some("Eve"))]);
    let services: Vec<Option<Service>> = report.drivers_used.iter().map(|d| d.service).collect();
    assert_eq!(services, vec![Some(Service::First), Some(Service::Second)]);

    let layout: Vec<(&str, &str)> = report
        .rows
        .iter()
        .map(|row| (row.driver.as_str(), row.rider.as_str()))
        .collect();
    assert_eq!(layout, vec![("Ann", "Bo"), ("", ""), ("Eve", "Cy")]);
    assert!(report.rows[1].is_spacer());
}

#[test]
fn later_driver_rows_replace_earlier_ones() {
    let records = vec![
        driver("555-0100", "Ann", "2", "1/1/2024 9:00:00"),
        driver("5550100", "Ann B", "3", "1/3/2024 9:00:00"),
        driver("(555) 0100", "Ann C", "1", "1/2/2024 9:00:00"),
        driver("555-0101", "Eve", "2", "1/2/2024 9:00:00"),
    ];
    let drivers = validate_drivers(&records, &config()).expect("validate");
    let summary: Vec<(&str, &str, u32)> = drivers
        .iter()
        .map(|d| (d.phone.as_str(), d.name.as_str(), d.capacity))
        .collect();
    assert_eq!(summary, vec![("5550100", "Ann B", 3), ("5550101", "Eve", 2)]);

    let input = RunInput::new(records, vec![rider("200", "Bo", "North", "")], now());
    let report = run_event(&input, Event::Friday, &config()).expect("run");
    let phones: BTreeSet<&str> = report.drivers.iter().map(|d| d.phone.as_str()).collect();
    assert_eq!(phones.len(), report.drivers.len());
    assert_eq!(report.drivers_used[0].capacity, 3);
}

#[test]
fn ignored_drivers_sit_out_but_stay_on_the_roster() {
    let ignored: BTreeSet<Phone> = [Phone::canonical("100")].into_iter().collect();
    let config = config().with_ignored_drivers(ignored);
    let records = vec![driver("100", "Ann", "4", ""), driver("101", "Eve", "2", "")];

    let drivers = validate_drivers(&records, &config).expect("validate");
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0].name, "Eve");

    let input = RunInput::new(records, vec![rider("200", "Bo", "North", "")], now())
        .with_rotation([Phone::canonical("101")].into_iter().collect());
    let report = run_event(&input, Event::Friday, &config).expect("run");
    let used: Vec<&str> = report.drivers_used.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(used, vec!["Eve"]);
    let roster: Vec<&str> = report.drivers.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(roster, vec!["Ann", "Eve"]);
}

#[test]
fn unparsable_driver_timestamp_is_fatal() {
    let input = RunInput::new(
        vec![driver("100", "Ann", "2", "next tuesday")],
        vec![rider("200", "Bo", "South", "")],
        now(),
    );
    let error = run_event(&input, Event::Friday, &config()).expect_err("bad timestamp");
    assert!(matches!(
        error,
        CoreError::InvalidTimestamp { role: "driver", ref value, .. } if value == "next tuesday"
    ));
}

#[test]
fn late_friday_riders_use_the_late_pickup() {
    let config = config().with_late_friday_location(Some("Center".to_string()));
    let mut late = rider("200", "Bo", "North", "");
    late.notes = "running late".to_string();
    let input = RunInput::new(
        vec![driver("100", "Ann", "2", "")],
        vec![late, rider("201", "Cy", "South", "")],
        now(),
    );

    let friday = run_event(&input, Event::Friday, &config).expect("friday run");
    let bo = friday
        .assignments
        .iter()
        .find(|a| a.rider.name == "Bo")
        .expect("bo assigned");
    assert_eq!(bo.rider.location, "Center");

    let sunday = run_event(&input, Event::Sunday, &config).expect("sunday run");
    let bo = sunday
        .assignments
        .iter()
        .find(|a| a.rider.name == "Bo")
        .expect("bo assigned");
    assert_eq!(bo.rider.location, "North");
}

#[test]
fn preferenced_driver_is_selected_when_riders_wait_there() {
    let config = config().with_preferences([DriverPreference {
        phone: Phone::canonical("101"),
        location: "South".to_string(),
        service: None,
    }]);
    let input = RunInput::new(
        vec![
            driver("100", "Ann", "4", "1/1/2024 9:00:00"),
            driver("101", "Eve", "2", "1/2/2024 9:00:00"),
        ],
        vec![rider("200", "Bo", "South", "")],
        now(),
    );
    let report = run_event(&input, Event::Friday, &config).expect("run");

    let used: Vec<&str> = report.drivers_used.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(used, vec!["Eve"]);
    assert_eq!(report.assignments[0].tier, Some(MatchTier::Preference));
}

#[test]
fn rotation_moves_last_weeks_drivers_back() {
    let previous: BTreeSet<Phone> = [Phone::canonical("100")].into_iter().collect();
    let input = RunInput::new(
        vec![
            driver("100", "Ann", "2", "1/1/2024 9:00:00"),
            driver("101", "Eve", "2", "1/2/2024 9:00:00"),
        ],
        vec![rider("200", "Bo", "North", "")],
        now(),
    )
    .with_rotation(previous);
    let report = run_event(&input, Event::Friday, &config()).expect("run");

    assert_eq!(report.rotated_drivers, 1);
    let order: Vec<&str> = report.drivers.iter().map(|d| d.phone.as_str()).collect();
    assert_eq!(order, vec!["101", "100"]);
    assert_eq!(report.drivers[1].timestamp, Some(now()));
    assert_eq!(report.assignments[0].driver.as_ref().map(|d| d.name.as_str()), Some("Eve"));
}
