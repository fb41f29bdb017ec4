//! Location groups and their bitmask lookup.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use rides_model::{LocationSet, MAX_LOCATION_GROUPS};

/// Maps pickup-location names to their group bits.
///
/// Built from an ordered list of lines, each a comma-separated list of
/// synonyms. The line's position is its bit index. A name declared on more
/// than one line belongs to every one of those groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRegistry {
    lookup: BTreeMap<String, LocationSet>,
    groups: Vec<Vec<String>>,
}

fn location_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl LocationRegistry {
    /// A registry with no groups: every name maps to the sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from synonym lines. Never fails.
    ///
    /// Blank and `#` lines are skipped without consuming a bit. Lines past
    /// [`MAX_LOCATION_GROUPS`] are ignored.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if registry.groups.len() == MAX_LOCATION_GROUPS {
                warn!(
                    line,
                    max = MAX_LOCATION_GROUPS,
                    "too many location groups, ignoring the rest"
                );
                break;
            }
            let bit = LocationSet::bit(registry.groups.len());
            let names: Vec<String> = line
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
            for name in &names {
                *registry.lookup.entry(location_key(name)).or_default() |= bit;
            }
            registry.groups.push(names);
        }
        debug!(
            groups = registry.groups.len(),
            names = registry.lookup.len(),
            "built location registry"
        );
        registry
    }

    /// Bits for `name`, or the empty sentinel when it is not declared.
    pub fn lookup(&self, name: &str) -> LocationSet {
        self.lookup
            .get(&location_key(name))
            .copied()
            .unwrap_or(LocationSet::EMPTY)
    }

    pub fn is_recognized(&self, name: &str) -> bool {
        !self.lookup(name).is_empty()
    }

    /// Synonyms of each group, in bit order.
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
