use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The recurring weekly events riders sign up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
    Friday,
    Sunday,
}

impl Event {
    /// Keyword a driver's availability answer must mention.
    pub fn availability_keyword(self) -> &'static str {
        match self {
            Event::Friday => "friday",
            Event::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.availability_keyword())
    }
}

/// Sunday service slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    First,
    Second,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::First, Service::Second];
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::First => f.write_str("first"),
            Service::Second => f.write_str("second"),
        }
    }
}

/// Error returned when a service label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown service '{0}' (expected 1, 2, first or second)")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "1" | "first" | "1st" => Ok(Service::First),
            "2" | "second" | "2nd" => Ok(Service::Second),
            other => Err(UnknownService(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_labels() {
        assert_eq!("1".parse::<Service>(), Ok(Service::First));
        assert_eq!(" Second ".parse::<Service>(), Ok(Service::Second));
        assert!("third".parse::<Service>().is_err());
    }

    #[test]
    fn unknown_service_is_a_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(UnknownService("third".to_string()));
        assert_eq!(
            error.to_string(),
            "unknown service 'third' (expected 1, 2, first or second)"
        );
    }
}
