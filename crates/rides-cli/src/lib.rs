//! CLI library components for the ride assigner.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
