use thiserror::Error;

use rides_model::{Event, Phone};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid seat count '{value}' for driver {phone}")]
    InvalidCapacity { phone: Phone, value: String },

    #[error("invalid timestamp '{value}' for {role} {phone}")]
    InvalidTimestamp {
        role: &'static str,
        phone: Phone,
        value: String,
    },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OptionOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("no riders need a ride for {event}")]
    NoRiders { event: Event },

    #[error("no drivers are available for {event}")]
    NoDrivers { event: Event },

    /// A tier handed a rider to a driver without an open seat.
    #[error("driver {phone} was assigned a rider with no open seat left")]
    OverCapacity { phone: Phone },
}

pub type Result<T> = std::result::Result<T, CoreError>;
