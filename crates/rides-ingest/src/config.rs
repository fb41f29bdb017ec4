//! Optional plain-text configuration files.
//!
//! Every file here is optional. A missing file is logged and treated as
//! empty so the run continues without that refinement.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use rides_model::{DriverPreference, Phone, Service};

use crate::error::{IngestError, Result};

/// Read a text file into lines, or `None` when it does not exist.
fn read_optional(path: &Path, what: &str) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "{what} not found, continuing without it");
            Ok(None)
        }
        Err(error) => Err(IngestError::read(path, error)),
    }
}

fn content_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Location groups, one comma-separated synonym list per line.
///
/// Comment and blank lines are dropped here so they never consume a bit.
pub fn load_location_lines(path: &Path) -> Result<Vec<String>> {
    let Some(contents) = read_optional(path, "location map")? else {
        warn!("location optimizations are disabled");
        return Ok(Vec::new());
    };
    let lines: Vec<String> = content_lines(&contents).map(str::to_string).collect();
    debug!(groups = lines.len(), "loaded location map");
    Ok(lines)
}

/// Phones to leave out of matching, one per line.
pub fn load_ignore_list(path: &Path) -> Result<BTreeSet<Phone>> {
    let Some(contents) = read_optional(path, "ignore list")? else {
        return Ok(BTreeSet::new());
    };
    let phones: BTreeSet<Phone> = content_lines(&contents)
        .map(Phone::canonical)
        .filter(|phone| !phone.is_empty())
        .collect();
    debug!(path = %path.display(), ignored = phones.len(), "loaded ignore list");
    Ok(phones)
}

/// Driver preferences, one `phone, location[, service]` entry per line.
///
/// Malformed lines are skipped with a warning.
pub fn load_driver_preferences(path: &Path) -> Result<Vec<DriverPreference>> {
    let Some(contents) = read_optional(path, "driver preferences")? else {
        return Ok(Vec::new());
    };
    let mut preferences = Vec::new();
    for (line_no, line) in content_lines(&contents).enumerate() {
        match parse_preference(line) {
            Some(preference) => preferences.push(preference),
            None => warn!(path = %path.display(), line = line_no + 1, "skipping malformed preference"),
        }
    }
    debug!(preferences = preferences.len(), "loaded driver preferences");
    Ok(preferences)
}

/// Parse one preference entry. The location may be blank when only a
/// service is preferred.
pub fn parse_preference(line: &str) -> Option<DriverPreference> {
    let mut fields = line.split(',').map(str::trim);
    let phone = Phone::canonical(fields.next()?);
    if phone.is_empty() {
        return None;
    }
    let location = fields.next().unwrap_or_default().to_string();
    let service = match fields.next() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<Service>().ok()?),
    };
    if fields.next().is_some() || (location.is_empty() && service.is_none()) {
        return None;
    }
    Some(DriverPreference {
        phone,
        location,
        service,
    })
}
