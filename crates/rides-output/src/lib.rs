//! Ride sheet output.
//!
//! - **Presentation CSV**: the assignment table shared with drivers and riders
//! - **Driver table**: the rotated driver sheet, written back for the next run
//! - **Terminal table**: the same presentation rows rendered with `comfy-table`

mod common;
mod sheet;
mod terminal;

pub use common::{TIMESTAMP_FORMAT, ensure_parent_dir, format_timestamp};
pub use sheet::{presentation_csv_string, write_drivers_csv, write_presentation_csv};
pub use terminal::render_table;
