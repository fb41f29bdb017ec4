//! Event and service filtering.

use tracing::{debug, info};

use rides_model::{Driver, Event, Rider, Service};

const FIRST_SERVICE_HINTS: [&str; 3] = ["first", "1st", "8"];
const SECOND_SERVICE_HINTS: [&str; 4] = ["second", "2nd", "10", "11"];
const LATE_FRIDAY_HINTS: [&str; 3] = ["late", "6", "7"];

/// Riders attending `event` and drivers available for it.
pub fn filter_event(drivers: &[Driver], riders: &[Rider], event: Event) -> (Vec<Driver>, Vec<Rider>) {
    let keyword = event.availability_keyword();
    let drivers: Vec<Driver> = drivers
        .iter()
        .filter(|driver| driver.availability.to_lowercase().contains(keyword))
        .cloned()
        .collect();
    let riders: Vec<Rider> = riders
        .iter()
        .filter(|rider| match event {
            Event::Friday => rider.friday,
            Event::Sunday => rider.sunday,
        })
        .cloned()
        .collect();
    info!(%event, drivers = drivers.len(), riders = riders.len(), "filtered to event");
    (drivers, riders)
}

/// Whether a Friday rider's notes say they come late.
pub fn is_late_friday(notes: &str) -> bool {
    let notes = notes.to_lowercase();
    LATE_FRIDAY_HINTS.iter().any(|hint| notes.contains(hint))
}

/// Send Friday riders who come late to the late pickup location.
///
/// Returns how many riders were moved.
pub fn mark_late_friday_riders(riders: &mut [Rider], location: &str) -> usize {
    let mut moved = 0;
    for rider in riders.iter_mut().filter(|rider| is_late_friday(&rider.notes)) {
        debug!(phone = %rider.phone, from = %rider.location, to = location, "late rider");
        rider.location = location.to_string();
        moved += 1;
    }
    info!(moved, %location, "moved late friday riders");
    moved
}

/// Service a rider asked for in their notes, falling back to `main`.
pub fn requested_service(notes: &str, main: Service) -> Service {
    let notes = notes.to_lowercase();
    if FIRST_SERVICE_HINTS.iter().any(|hint| notes.contains(hint)) {
        Service::First
    } else if SECOND_SERVICE_HINTS.iter().any(|hint| notes.contains(hint)) {
        Service::Second
    } else {
        main
    }
}

/// Service a driver drives for.
pub fn driver_service(driver: &Driver, main: Service) -> Service {
    driver.preferred_service.unwrap_or(main)
}

/// Drivers and riders of one Sunday service.
#[derive(Debug, Clone)]
pub struct ServiceGroup {
    pub service: Service,
    pub drivers: Vec<Driver>,
    pub riders: Vec<Rider>,
}

/// Split Sunday drivers and riders by service, preserving table order.
pub fn split_services(drivers: &[Driver], riders: &[Rider], main: Service) -> Vec<ServiceGroup> {
    Service::ALL
        .into_iter()
        .map(|service| {
            let group = ServiceGroup {
                service,
                drivers: drivers
                    .iter()
                    .filter(|driver| driver_service(driver, main) == service)
                    .cloned()
                    .collect(),
                riders: riders
                    .iter()
                    .filter(|rider| requested_service(&rider.notes, main) == service)
                    .cloned()
                    .collect(),
            };
            info!(
                %service,
                drivers = group.drivers.len(),
                riders = group.riders.len(),
                "split service"
            );
            group
        })
        .collect()
}
