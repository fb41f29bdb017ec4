//! Terminal rendering of the ride sheet.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rides_model::{OUTPUT_HEADERS, PresentationRow, UNASSIGNED_MARKER};

const SEATS_COLUMN: usize = 2;

/// Render presentation rows as a bordered table.
///
/// Unmatched riders are highlighted; spacer rows stay blank.
pub fn render_table(rows: &[PresentationRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140)
        .set_header(
            OUTPUT_HEADERS
                .iter()
                .map(|header| Cell::new(header).add_attribute(Attribute::Bold)),
        );
    if let Some(column) = table.column_mut(SEATS_COLUMN) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for row in rows {
        let unmatched = row.driver == UNASSIGNED_MARKER;
        table.add_row(row.cells().into_iter().map(|value| {
            let cell = Cell::new(value);
            if unmatched { cell.fg(Color::Yellow) } else { cell }
        }));
    }
    table.to_string()
}
