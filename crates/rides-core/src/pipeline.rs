//! One end-to-end assignment run for a single event.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, info_span};

use rides_model::{
    Assignment, Driver, DriverRecord, Event, LocationSet, Phone, PresentationRow, Rider,
    RiderRecord, Service,
};

use crate::context::RunConfig;
use crate::engine::AssignmentEngine;
use crate::error::{CoreError, Result};
use crate::filter::{filter_event, mark_late_friday_riders, split_services};
use crate::format::format_assignments;
use crate::select::{prioritize_preferred_drivers, rotate_drivers, select_drivers};
use crate::validate::{clean_drivers, drop_ignored_drivers, validate_riders};

/// Raw tables and run-time inputs for [`run_event`].
#[derive(Debug, Clone)]
pub struct RunInput {
    pub drivers: Vec<DriverRecord>,
    pub riders: Vec<RiderRecord>,
    /// Driver phones from the previous output. `Some` turns on rotation.
    pub previous_drivers: Option<BTreeSet<Phone>>,
    pub now: NaiveDateTime,
}

impl RunInput {
    pub fn new(drivers: Vec<DriverRecord>, riders: Vec<RiderRecord>, now: NaiveDateTime) -> Self {
        Self {
            drivers,
            riders,
            previous_drivers: None,
            now,
        }
    }

    pub fn with_rotation(mut self, previous_drivers: BTreeSet<Phone>) -> Self {
        self.previous_drivers = Some(previous_drivers);
        self
    }
}

/// How full one selected driver ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverLoad {
    pub name: String,
    pub phone: Phone,
    pub capacity: u32,
    pub assigned: u32,
    pub route: LocationSet,
    /// Sunday service driven, `None` on Friday.
    pub service: Option<Service>,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub event: Event,
    /// Presentation table, services concatenated in order.
    pub rows: Vec<PresentationRow>,
    pub assignments: Vec<Assignment>,
    /// Eligible riders after filtering.
    pub riders: usize,
    pub unmatched: usize,
    pub drivers_used: Vec<DriverLoad>,
    pub rotated_drivers: usize,
    /// Driver roster in rotation order, for writing back. Ignored drivers
    /// are kept so the sheet does not lose them.
    #[serde(skip)]
    pub drivers: Vec<Driver>,
}

impl RunReport {
    pub fn matched(&self) -> usize {
        self.riders - self.unmatched
    }
}

struct Batch {
    service: Option<Service>,
    drivers: Vec<Driver>,
    riders: Vec<Rider>,
}

/// Run one event from raw tables to the laid-out ride sheet.
pub fn run_event(input: &RunInput, event: Event, config: &RunConfig) -> Result<RunReport> {
    let _run = info_span!("run", %event).entered();

    let (mut roster, riders) = {
        let _stage = info_span!("validate").entered();
        (
            clean_drivers(&input.drivers, config)?,
            validate_riders(&input.riders, config)?,
        )
    };

    let rotated_drivers = match &input.previous_drivers {
        Some(used) => {
            let _stage = info_span!("rotate").entered();
            rotate_drivers(&mut roster, used, input.now)
        }
        None => 0,
    };
    let drivers = drop_ignored_drivers(roster.clone(), config);

    let (event_drivers, mut event_riders) = filter_event(&drivers, &riders, event);
    if event_riders.is_empty() {
        return Err(CoreError::NoRiders { event });
    }
    if event_drivers.is_empty() {
        return Err(CoreError::NoDrivers { event });
    }

    if let (Event::Friday, Some(location)) = (event, &config.late_friday_location) {
        mark_late_friday_riders(&mut event_riders, location);
    }

    let batches = match event {
        Event::Friday => vec![Batch {
            service: None,
            drivers: event_drivers,
            riders: event_riders,
        }],
        Event::Sunday => split_services(&event_drivers, &event_riders, config.main_service)
            .into_iter()
            .map(|group| Batch {
                service: Some(group.service),
                drivers: group.drivers,
                riders: group.riders,
            })
            .collect(),
    };

    let mut report = RunReport {
        event,
        rows: Vec::new(),
        assignments: Vec::new(),
        riders: 0,
        unmatched: 0,
        drivers_used: Vec::new(),
        rotated_drivers,
        drivers: Vec::new(),
    };

    for mut batch in batches {
        let _stage = match batch.service {
            Some(service) => info_span!("service", %service).entered(),
            None => info_span!("service", service = "all").entered(),
        };
        if batch.riders.is_empty() {
            info!("no riders for this service, skipping");
            continue;
        }
        prioritize_preferred_drivers(&mut batch.drivers, &batch.riders, &config.registry);
        let selected = select_drivers(&batch.drivers, batch.riders.len());
        let outcome = AssignmentEngine::new(&selected, &config.registry, config.matching)
            .assign(&batch.riders)?;

        let rows = format_assignments(&outcome.assignments, &config.format);
        if report.rows.last().is_some_and(|last| !last.is_spacer()) && !rows.is_empty() {
            report.rows.push(PresentationRow::spacer());
        }
        report.rows.extend(rows);
        report.riders += batch.riders.len();
        report.unmatched += outcome.unmatched;
        report
            .drivers_used
            .extend(selected.iter().zip(&outcome.states).map(|(driver, state)| DriverLoad {
                name: driver.name.clone(),
                phone: driver.phone.clone(),
                capacity: driver.capacity,
                assigned: driver.capacity - state.openings,
                route: state.route,
                service: batch.service,
            }));
        report.assignments.extend(outcome.assignments);
    }

    info!(
        riders = report.riders,
        matched = report.matched(),
        unmatched = report.unmatched,
        drivers = report.drivers_used.len(),
        rotated = report.rotated_drivers,
        "run finished"
    );
    report.drivers = roster;
    Ok(report)
}
