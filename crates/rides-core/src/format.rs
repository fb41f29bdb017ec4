//! Presentation table layout.

use tracing::debug;

use rides_model::{Assignment, DriverRef, PresentationRow, UNASSIGNED_MARKER};

use crate::context::FormatOptions;

fn rider_row(assignment: &Assignment) -> PresentationRow {
    PresentationRow {
        rider: assignment.rider.name.clone(),
        rider_phone: assignment.rider.phone.to_string(),
        location: assignment.rider.location.clone(),
        notes: assignment.rider.notes.clone(),
        ..PresentationRow::default()
    }
}

fn same_driver(a: &Assignment, b: &Assignment) -> bool {
    match (&a.driver, &b.driver) {
        (Some(a), Some(b)) => a.phone == b.phone,
        _ => false,
    }
}

/// Lay out assignments as the shared ride sheet.
///
/// Matched riders come first, grouped by driver and sorted by driver name
/// then rider location. Only the first row of a group shows the driver. Groups
/// are separated by a blank row. Unmatched riders follow in their own group,
/// sorted by location, with `?` in the driver columns and a blank row on
/// either side.
pub fn format_assignments(assignments: &[Assignment], options: &FormatOptions) -> Vec<PresentationRow> {
    let (mut matched, mut unmatched): (Vec<&Assignment>, Vec<&Assignment>) =
        assignments.iter().partition(|assignment| assignment.is_matched());
    matched.sort_by(|a, b| {
        let key = |assignment: &Assignment| {
            assignment
                .driver
                .as_ref()
                .map(|driver| (driver.name.clone(), driver.phone.clone()))
        };
        key(a)
            .cmp(&key(b))
            .then_with(|| a.rider.location.cmp(&b.rider.location))
    });
    unmatched.sort_by(|a, b| a.rider.location.cmp(&b.rider.location));

    let mut rows = Vec::with_capacity(assignments.len() * 2);
    let mut groups = 0;
    for group in matched.chunk_by(|a, b| same_driver(a, b)) {
        if groups > 0 {
            rows.push(PresentationRow::spacer());
        }
        groups += 1;
        let Some(driver) = group.first().and_then(|first| first.driver.as_ref()) else {
            continue;
        };
        for (idx, assignment) in group.iter().enumerate() {
            let mut row = rider_row(assignment);
            if idx == 0 {
                fill_driver(&mut row, driver);
            }
            rows.push(row);
        }
        if options.pad_open_seats {
            let open = usize::try_from(driver.capacity)
                .unwrap_or(usize::MAX)
                .saturating_sub(group.len());
            rows.extend(std::iter::repeat_n(PresentationRow::spacer(), open));
        }
    }

    if !unmatched.is_empty() {
        if !rows.is_empty() {
            rows.push(PresentationRow::spacer());
        }
        for assignment in &unmatched {
            debug!(rider = %assignment.rider.name, "rider has no driver");
            let mut row = rider_row(assignment);
            row.driver = UNASSIGNED_MARKER.to_string();
            row.driver_phone = UNASSIGNED_MARKER.to_string();
            rows.push(row);
        }
        rows.push(PresentationRow::spacer());
    }
    rows
}

fn fill_driver(row: &mut PresentationRow, driver: &DriverRef) {
    row.driver = driver.name.clone();
    row.driver_phone = driver.phone.to_string();
    row.seats = driver.capacity.to_string();
}
