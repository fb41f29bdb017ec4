use anyhow::{Context, Result};
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rides_core::DriverLoad;
use rides_output::render_table;

use crate::types::AssignResult;

pub fn print_summary(result: &AssignResult) {
    let report = &result.report;
    println!("Event: {}", report.event);
    if let Some(path) = &result.output {
        println!("Ride sheet: {}", path.display());
    }
    if let Some(path) = &result.drivers_written {
        println!("Driver sheet: {}", path.display());
    }
    if report.rotated_drivers > 0 {
        println!("Rotated drivers: {}", report.rotated_drivers);
    }
    if result.dry_run {
        println!("{}", render_table(&report.rows));
    }
    println!("{}", driver_table(&report.drivers_used, report.riders, report.unmatched));
    if report.unmatched > 0 {
        eprintln!(
            "warning: {} of {} riders could not be matched",
            report.unmatched, report.riders
        );
    }
}

pub fn print_json(result: &AssignResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("serialize run report")?;
    println!("{json}");
    Ok(())
}

fn driver_table(loads: &[DriverLoad], riders: usize, unmatched: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Driver"),
        header_cell("Phone"),
        header_cell("Service"),
        header_cell("Seats"),
        header_cell("Riders"),
        header_cell("Stops"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    let mut seats = 0;
    for load in loads {
        seats += load.capacity;
        table.add_row(vec![
            Cell::new(&load.name),
            Cell::new(&load.phone),
            match load.service {
                Some(service) => Cell::new(service),
                None => dim_cell("-"),
            },
            Cell::new(load.capacity),
            assigned_cell(load),
            Cell::new(load.route.count()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(seats).add_attribute(Attribute::Bold),
        Cell::new(riders - unmatched).add_attribute(Attribute::Bold),
        if unmatched > 0 {
            Cell::new(format!("{unmatched} unmatched"))
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        },
    ]);
    table
}

fn assigned_cell(load: &DriverLoad) -> Cell {
    match load.assigned {
        0 => dim_cell(0),
        value if value == load.capacity => Cell::new(value).fg(Color::Green),
        value => Cell::new(value),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
