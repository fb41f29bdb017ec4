use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::Table;
use tracing::{info, info_span};

use rides_core::{FormatOptions, LocationRegistry, MatchOptions, RunConfig, RunInput, run_event};
use rides_ingest::{
    FilePaths, Settings, load_driver_preferences, load_drivers, load_ignore_list,
    load_location_lines, load_previous_driver_phones, load_riders, load_settings,
};
use rides_model::{Event, Service};
use rides_output::{write_drivers_csv, write_presentation_csv};

use crate::cli::{AssignArgs, LocationsArgs};
use crate::summary::apply_table_style;
use crate::types::AssignResult;

/// Matcher knobs: flags first, then `rides.toml`, then defaults.
pub fn match_options(args: &AssignArgs, settings: &Settings) -> Result<MatchOptions> {
    let defaults = MatchOptions::default();
    let max_distance = args
        .distance
        .or(settings.max_distance)
        .unwrap_or(defaults.max_distance);
    let threshold = args
        .threshold
        .or(settings.threshold)
        .unwrap_or(defaults.vacancy_threshold);
    MatchOptions::new(max_distance, threshold).context("invalid matcher options")
}

/// Sunday main service: flag first, then `rides.toml`, then the default.
pub fn main_service(args: &AssignArgs, settings: &Settings) -> Result<Service> {
    if let Some(service) = args.main_service {
        return Ok(service);
    }
    match &settings.main_service {
        Some(raw) => raw
            .parse::<Service>()
            .with_context(|| format!("invalid main_service in settings: {raw}")),
        None => Ok(RunConfig::default().main_service),
    }
}

/// Late Friday pickup: flag first, then `rides.toml`. Unset turns it off.
pub fn late_friday_location(args: &AssignArgs, settings: &Settings) -> Option<String> {
    args.late_location
        .clone()
        .or_else(|| settings.late_friday_location.clone())
        .filter(|location| !location.trim().is_empty())
}

/// Load the optional config files and assemble the run configuration.
pub fn build_run_config(args: &AssignArgs, settings: &Settings, paths: &FilePaths) -> Result<RunConfig> {
    let registry = load_registry(&paths.map)?;
    let ignored_drivers = load_ignore_list(&paths.ignore_drivers).context("load driver ignore list")?;
    let ignored_riders = load_ignore_list(&paths.ignore_riders).context("load rider ignore list")?;
    let preferences = load_driver_preferences(&paths.driver_prefs).context("load driver preferences")?;
    Ok(RunConfig::new()
        .with_registry(registry)
        .with_ignored_drivers(ignored_drivers)
        .with_ignored_riders(ignored_riders)
        .with_preferences(preferences)
        .with_matching(match_options(args, settings)?)
        .with_main_service(main_service(args, settings)?)
        .with_late_friday_location(late_friday_location(args, settings))
        .with_format(FormatOptions {
            pad_open_seats: args.pad_open_seats,
        }))
}

fn load_registry(path: &Path) -> Result<LocationRegistry> {
    let lines = load_location_lines(path).context("load location map")?;
    Ok(LocationRegistry::from_lines(lines))
}

pub fn run_assign(args: &AssignArgs) -> Result<AssignResult> {
    let event = Event::from(args.event);
    let span = info_span!("assign", %event);
    let _guard = span.enter();

    let settings = load_settings(&args.config_dir).context("load settings")?;
    let paths = settings.files.resolve(&args.config_dir, &args.data_dir);
    let config = build_run_config(args, &settings, &paths)?;
    let output = args.output.clone().unwrap_or_else(|| paths.output.clone());

    let drivers = load_drivers(&paths.drivers).context("load driver sheet")?;
    let riders = load_riders(&paths.permanent, &paths.weekly).context("load rider forms")?;
    let mut input = RunInput::new(drivers, riders, Local::now().naive_local());
    if args.rotate {
        let previous = load_previous_driver_phones(&output).context("load previous ride sheet")?;
        input = input.with_rotation(previous);
    }

    let report = run_event(&input, event, &config).context("assign rides")?;

    let mut result = AssignResult {
        report,
        output: None,
        drivers_written: None,
        dry_run: args.dry_run,
    };
    if args.dry_run {
        info!("dry run, nothing written");
        return Ok(result);
    }
    write_presentation_csv(&output, &result.report.rows)?;
    info!(path = %output.display(), rows = result.report.rows.len(), "wrote ride sheet");
    result.output = Some(output);
    if args.rotate {
        write_drivers_csv(&paths.drivers, &result.report.drivers)?;
        info!(path = %paths.drivers.display(), "wrote rotated driver sheet");
        result.drivers_written = Some(paths.drivers);
    }
    Ok(result)
}

/// Location groups in bit order.
pub fn locations_table(registry: &LocationRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Bit", "Names"]);
    apply_table_style(&mut table);
    for (bit, names) in registry.groups().iter().enumerate() {
        table.add_row(vec![bit.to_string(), names.join(", ")]);
    }
    table
}

pub fn run_locations(args: &LocationsArgs) -> Result<()> {
    let settings = load_settings(&args.config_dir).context("load settings")?;
    let path = args.config_dir.join(&settings.files.map);
    let registry = load_registry(&path)?;
    if registry.is_empty() {
        println!("No location groups configured in {}", path.display());
        return Ok(());
    }
    println!("{}", locations_table(&registry));
    Ok(())
}
