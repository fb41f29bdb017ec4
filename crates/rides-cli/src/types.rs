use std::path::PathBuf;

use serde::Serialize;

use rides_core::RunReport;

/// Outcome of `rides assign`.
#[derive(Debug, Serialize)]
pub struct AssignResult {
    #[serde(flatten)]
    pub report: RunReport,
    /// Ride sheet written, `None` on a dry run.
    pub output: Option<PathBuf>,
    /// Driver sheet written back after rotation.
    pub drivers_written: Option<PathBuf>,
    pub dry_run: bool,
}
