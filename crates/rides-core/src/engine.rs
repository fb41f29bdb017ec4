//! Tiered greedy matcher.
//!
//! Riders are visited in location order. Each rider goes to the first driver
//! that qualifies at the earliest tier:
//!
//! 1. Preference pass: a driver whose preferred area covers the rider.
//! 2. Main pass, for riders still unmatched:
//!    - a driver already picking up at the rider's location;
//!    - a driver picking up `d` groups away with at least the vacancy
//!      threshold of open seats, for `d` in `1..=max_distance`;
//!    - the same sweep with any open seat;
//!    - any driver with an open seat;
//!    - the driver with the fewest route stops among those with an open seat.
//!
//! Within a tier drivers are tried in table order. Riders whose location is
//! not a known group are never matched.

use tracing::{debug, info, warn};

use rides_model::{Assignment, Driver, DriverRef, LocationSet, MatchTier, Rider};

use crate::context::MatchOptions;
use crate::error::{CoreError, Result};
use crate::registry::LocationRegistry;

/// Per-run scratch state of one driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverState {
    /// Seats still free.
    pub openings: u32,
    /// Groups the driver picks up at so far.
    pub route: LocationSet,
}

impl DriverState {
    fn new(driver: &Driver) -> Self {
        Self {
            openings: driver.capacity,
            route: LocationSet::EMPTY,
        }
    }

    pub fn has_opening(&self) -> bool {
        self.openings > 0
    }

    pub fn serves(&self, location: LocationSet) -> bool {
        self.route.contains_any(location)
    }
}

/// Result of one matcher run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// One entry per rider, in the order riders were visited.
    pub assignments: Vec<Assignment>,
    /// Final state of each driver, index-aligned with the engine's drivers.
    pub states: Vec<DriverState>,
    pub unmatched: usize,
}

struct Slot<'r> {
    rider: &'r Rider,
    location: LocationSet,
    matched: Option<(usize, MatchTier)>,
}

/// Matches riders to a fixed, ordered set of drivers.
#[derive(Debug)]
pub struct AssignmentEngine<'a> {
    drivers: &'a [Driver],
    registry: &'a LocationRegistry,
    options: MatchOptions,
    states: Vec<DriverState>,
}

impl<'a> AssignmentEngine<'a> {
    /// `drivers` must already be in tie-break order (largest cars first).
    pub fn new(drivers: &'a [Driver], registry: &'a LocationRegistry, options: MatchOptions) -> Self {
        Self {
            drivers,
            registry,
            options,
            states: drivers.iter().map(DriverState::new).collect(),
        }
    }

    /// Run both passes over `riders` and consume the engine.
    pub fn assign(mut self, riders: &[Rider]) -> Result<MatchOutcome> {
        let mut slots: Vec<Slot<'_>> = riders
            .iter()
            .map(|rider| Slot {
                rider,
                location: self.registry.lookup(&rider.location),
                matched: None,
            })
            .collect();
        slots.sort_by_key(|slot| slot.location);

        for slot in slots.iter_mut().filter(|slot| !slot.location.is_empty()) {
            if let Some(idx) = self.preferred_driver(slot.location) {
                self.take(idx, slot.location)?;
                slot.matched = Some((idx, MatchTier::Preference));
                debug!(
                    rider = %slot.rider.phone,
                    driver = %self.drivers[idx].phone,
                    "matched by preference"
                );
            }
        }

        for slot in slots.iter_mut() {
            if slot.matched.is_some() {
                continue;
            }
            if slot.location.is_empty() {
                debug!(
                    rider = %slot.rider.phone,
                    location = %slot.rider.location,
                    "skipping unrecognized location"
                );
                continue;
            }
            if let Some((idx, tier)) = self.find_driver(slot.location) {
                self.take(idx, slot.location)?;
                slot.matched = Some((idx, tier));
                debug!(
                    rider = %slot.rider.phone,
                    driver = %self.drivers[idx].phone,
                    %tier,
                    "matched"
                );
            }
        }

        let mut unmatched = 0;
        let assignments: Vec<Assignment> = slots
            .into_iter()
            .map(|slot| match slot.matched {
                Some((idx, tier)) => Assignment {
                    rider: slot.rider.clone(),
                    driver: Some(DriverRef::from(&self.drivers[idx])),
                    tier: Some(tier),
                },
                None => {
                    unmatched += 1;
                    warn!(
                        rider = %slot.rider.name,
                        phone = %slot.rider.phone,
                        location = %slot.rider.location,
                        "rider could not be matched"
                    );
                    Assignment::unmatched(slot.rider.clone())
                }
            })
            .collect();

        info!(
            riders = assignments.len(),
            matched = assignments.len() - unmatched,
            unmatched,
            drivers = self.drivers.len(),
            "assignment finished"
        );
        Ok(MatchOutcome {
            assignments,
            states: self.states,
            unmatched,
        })
    }

    fn take(&mut self, idx: usize, location: LocationSet) -> Result<()> {
        let state = &mut self.states[idx];
        state.openings = state
            .openings
            .checked_sub(1)
            .ok_or_else(|| CoreError::OverCapacity {
                phone: self.drivers[idx].phone.clone(),
            })?;
        state.route.insert(location);
        Ok(())
    }

    fn first_open(&self, accept: impl Fn(&Driver, &DriverState) -> bool) -> Option<usize> {
        self.drivers
            .iter()
            .zip(&self.states)
            .position(|(driver, state)| state.has_opening() && accept(driver, state))
    }

    fn preferred_driver(&self, location: LocationSet) -> Option<usize> {
        self.first_open(|driver, _| driver.preferred_location.contains_any(location))
    }

    fn find_driver(&self, location: LocationSet) -> Option<(usize, MatchTier)> {
        if let Some(idx) = self.first_open(|_, state| state.serves(location)) {
            return Some((idx, MatchTier::SameLocation));
        }
        let threshold = self.options.vacancy_threshold;
        for distance in 1..=self.options.max_distance {
            let nearby = location.shifted(distance);
            if let Some(idx) =
                self.first_open(|_, state| state.serves(nearby) && state.openings >= threshold)
            {
                return Some((idx, MatchTier::NeighborWithVacancy(distance)));
            }
        }
        for distance in 1..=self.options.max_distance {
            let nearby = location.shifted(distance);
            if let Some(idx) = self.first_open(|_, state| state.serves(nearby)) {
                return Some((idx, MatchTier::Neighbor(distance)));
            }
        }
        if let Some(idx) = self.first_open(|_, _| true) {
            return Some((idx, MatchTier::AnyOpening));
        }
        self.least_loaded().map(|idx| (idx, MatchTier::LeastLoaded))
    }

    /// Open driver with the fewest route stops, first in table order on ties.
    fn least_loaded(&self) -> Option<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.has_opening())
            .min_by_key(|(idx, state)| (state.route.count(), *idx))
            .map(|(idx, _)| idx)
    }
}
