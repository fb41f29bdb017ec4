use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use rides_core::{AssignmentEngine, LocationRegistry, MatchOptions, rotate_drivers};
use rides_model::{Driver, LocationSet, MatchTier, Phone, Rider};

const LOCATIONS: [&str; 6] = ["A", "B", "C", "D", "E", "Moon"];

fn registry() -> LocationRegistry {
    LocationRegistry::from_lines(["A, A1", "B", "C", "D", "E"])
}

fn driver(phone: &str, capacity: u32) -> Driver {
    Driver {
        phone: Phone::canonical(phone),
        name: format!("Driver {phone}"),
        capacity,
        timestamp: None,
        availability: "Friday".to_string(),
        preferred_location: LocationSet::EMPTY,
        preferred_service: None,
    }
}

fn rider(phone: &str, location: &str) -> Rider {
    Rider {
        phone: Phone::canonical(phone),
        name: format!("Rider {phone}"),
        location: location.to_string(),
        friday: true,
        sunday: false,
        notes: String::new(),
        timestamp: None,
    }
}

fn options(max_distance: u32, vacancy_threshold: u32) -> MatchOptions {
    MatchOptions::new(max_distance, vacancy_threshold).expect("valid options")
}

type Pair = (String, Option<String>, Option<MatchTier>);

/// (rider phone, driver phone, tier) in visiting order.
fn pairs(riders: &[Rider], drivers: &[Driver], options: MatchOptions) -> Vec<Pair> {
    let registry = registry();
    let outcome = AssignmentEngine::new(drivers, &registry, options)
        .assign(riders)
        .expect("assign");
    outcome
        .assignments
        .into_iter()
        .map(|assignment| {
            (
                assignment.rider.phone.to_string(),
                assignment.driver.map(|driver| driver.phone.to_string()),
                assignment.tier,
            )
        })
        .collect()
}

#[test]
fn free_driver_then_neighbor() {
    let drivers = vec![driver("1", 2)];
    let riders = vec![rider("10", "A"), rider("11", "B")];
    let registry = registry();
    let outcome = AssignmentEngine::new(&drivers, &registry, options(1, 1))
        .assign(&riders)
        .expect("assign");

    let tiers: Vec<_> = outcome.assignments.iter().map(|a| a.tier).collect();
    assert_eq!(
        tiers,
        vec![
            Some(MatchTier::AnyOpening),
            Some(MatchTier::NeighborWithVacancy(1))
        ]
    );
    assert_eq!(outcome.unmatched, 0);
    assert_eq!(outcome.states[0].openings, 0);
    assert_eq!(outcome.states[0].route, LocationSet::bit(0) | LocationSet::bit(1));
}

#[test]
fn preference_beats_table_order() {
    let mut preferring = driver("1", 1);
    preferring.preferred_location = LocationSet::bit(2);
    let drivers = vec![driver("2", 1), preferring];
    let riders = vec![rider("10", "C")];
    assert_eq!(
        pairs(&riders, &drivers, options(2, 2)),
        vec![("10".to_string(), Some("1".to_string()), Some(MatchTier::Preference))]
    );
}

#[test]
fn unrecognized_location_is_never_matched() {
    let drivers = vec![driver("1", 2)];
    let riders = vec![rider("10", "A"), rider("11", "Moon"), rider("12", "B")];
    let registry = registry();
    let outcome = AssignmentEngine::new(&drivers, &registry, options(1, 1))
        .assign(&riders)
        .expect("assign");

    assert_eq!(outcome.unmatched, 1);
    let moon = outcome
        .assignments
        .iter()
        .find(|a| a.rider.location == "Moon")
        .expect("moon rider present");
    assert!(!moon.is_matched());
    assert_eq!(outcome.states[0].openings, 0);
}

#[test]
fn same_location_wins_over_neighbors() {
    let drivers = vec![driver("1", 3), driver("2", 3)];
    // Rider 10 puts driver 1 on B, so rider 12 joins the same stop.
    let riders = vec![rider("10", "B"), rider("12", "B")];
    let result = pairs(&riders, &drivers, options(2, 2));
    assert_eq!(result[1].1.as_deref(), Some("1"));
    assert_eq!(result[1].2, Some(MatchTier::SameLocation));
}

#[test]
fn vacancy_threshold_falls_back_to_plain_neighbor() {
    let drivers = vec![driver("1", 2), driver("2", 3)];
    let riders = vec![rider("10", "A"), rider("11", "B")];
    let result = pairs(&riders, &drivers, options(1, 2));
    assert_eq!(result[0].2, Some(MatchTier::AnyOpening));
    assert_eq!(result[1].1.as_deref(), Some("1"));
    assert_eq!(result[1].2, Some(MatchTier::Neighbor(1)));
}

#[test]
fn distance_sweep_reaches_configured_maximum() {
    let drivers = vec![driver("1", 4)];
    let riders = vec![rider("10", "A"), rider("11", "C")];
    let near = pairs(&riders, &drivers, options(2, 1));
    assert_eq!(near[1].2, Some(MatchTier::NeighborWithVacancy(2)));

    let far = pairs(&riders, &drivers, options(1, 1));
    assert_eq!(far[1].2, Some(MatchTier::AnyOpening));
}

#[test]
fn riders_are_visited_in_location_order() {
    let drivers = vec![driver("1", 4)];
    let riders = vec![rider("10", "C"), rider("11", "Moon"), rider("12", "A"), rider("13", "A1")];
    let order: Vec<String> = pairs(&riders, &drivers, options(2, 2))
        .into_iter()
        .map(|(phone, _, _)| phone)
        .collect();
    assert_eq!(order, vec!["11", "12", "13", "10"]);
}

#[test]
fn full_drivers_leave_riders_unmatched() {
    let drivers = vec![driver("1", 1)];
    let riders = vec![rider("10", "A"), rider("11", "A")];
    let result = pairs(&riders, &drivers, options(2, 2));
    assert_eq!(result[0].1.as_deref(), Some("1"));
    assert_eq!(result[1].1, None);
}

#[test]
fn larger_cars_take_ties() {
    let drivers = vec![driver("big", 4), driver("small", 1)];
    let riders = vec![rider("10", "E")];
    let result = pairs(&riders, &drivers, options(2, 2));
    assert_eq!(result[0].1.as_deref(), Some("big"));
}

fn build_drivers(capacities: &[u32], preferred: &[Option<usize>]) -> Vec<Driver> {
    capacities
        .iter()
        .enumerate()
        .map(|(idx, capacity)| {
            let mut d = driver(&format!("{idx}"), *capacity);
            if let Some(Some(location)) = preferred.get(idx) {
                d.preferred_location = LocationSet::bit(*location);
            }
            d
        })
        .collect()
}

fn at(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("valid date")
}

proptest! {
    #[test]
    fn matcher_invariants_hold(
        capacities in prop::collection::vec(0u32..5, 0..6),
        preferred in prop::collection::vec(prop::option::of(0usize..5), 6),
        locations in prop::collection::vec(0usize..LOCATIONS.len(), 0..20),
        max_distance in 1u32..=9,
        vacancy_threshold in 1u32..=9,
    ) {
        let registry = registry();
        let drivers = build_drivers(&capacities, &preferred);
        let riders: Vec<Rider> = locations
            .iter()
            .enumerate()
            .map(|(idx, location)| rider(&format!("9{idx}"), LOCATIONS[*location]))
            .collect();
        let options = MatchOptions { max_distance, vacancy_threshold };

        let outcome = AssignmentEngine::new(&drivers, &registry, options)
            .assign(&riders)
            .expect("assign");

        let matched = outcome.assignments.iter().filter(|a| a.is_matched()).count();
        prop_assert_eq!(outcome.assignments.len(), riders.len());
        prop_assert_eq!(matched + outcome.unmatched, riders.len());

        let mut per_driver: BTreeMap<Phone, u32> = BTreeMap::new();
        for assignment in &outcome.assignments {
            let location = registry.lookup(&assignment.rider.location);
            if let Some(assigned) = &assignment.driver {
                *per_driver.entry(assigned.phone.clone()).or_default() += 1;
                let idx = drivers
                    .iter()
                    .position(|d| d.phone == assigned.phone)
                    .expect("assigned driver exists");
                prop_assert!(outcome.states[idx].route.contains_any(location));
            }
            if location.is_empty() {
                prop_assert!(!assignment.is_matched());
            }
        }
        for (driver, state) in drivers.iter().zip(&outcome.states) {
            let assigned = per_driver.get(&driver.phone).copied().unwrap_or(0);
            prop_assert!(assigned <= driver.capacity);
            prop_assert_eq!(assigned, driver.capacity - state.openings);
        }

        let seats: u32 = capacities.iter().sum();
        let recognized = riders
            .iter()
            .filter(|r| registry.is_recognized(&r.location))
            .count();
        if usize::try_from(seats).unwrap_or(usize::MAX) >= recognized {
            prop_assert_eq!(outcome.unmatched, riders.len() - recognized);
        }
    }

    #[test]
    fn rotated_drivers_sort_after_the_rest(
        days in prop::collection::vec(prop::option::of(1u32..28), 1..8),
        used_mask in prop::collection::vec(any::<bool>(), 8),
        now_day in 1u32..28,
    ) {
        let mut drivers: Vec<Driver> = days
            .iter()
            .enumerate()
            .map(|(idx, day)| {
                let mut d = driver(&format!("{idx}"), 2);
                d.timestamp = day.map(at);
                d
            })
            .collect();
        let used: BTreeSet<Phone> = drivers
            .iter()
            .zip(&used_mask)
            .filter(|(_, used)| **used)
            .map(|(d, _)| d.phone.clone())
            .collect();

        rotate_drivers(&mut drivers, &used, at(now_day));

        for pair in drivers.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
        }
        let latest_unused = drivers
            .iter()
            .filter(|d| !used.contains(&d.phone))
            .filter_map(|d| d.timestamp)
            .max();
        for rotated in drivers.iter().filter(|d| used.contains(&d.phone)) {
            prop_assert!(rotated.timestamp.is_some());
            prop_assert!(rotated.timestamp >= latest_unused);
        }
    }
}
