//! CSV writers for the ride sheet and the driver table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::WriterBuilder;

use rides_ingest::DRIVER_HEADERS;
use rides_model::{Driver, OUTPUT_HEADERS, PresentationRow};

use crate::common::{ensure_parent_dir, format_timestamp};

fn write_records<W, R, I>(writer: W, headers: &[&str], records: I) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(headers).context("write header")?;
    for record in records {
        csv.write_record(record).context("write row")?;
    }
    csv.flush().context("flush csv")?;
    csv.into_inner()
        .map_err(|error| anyhow!("flush csv: {}", error.error()))
}

fn driver_cells(driver: &Driver) -> [String; 5] {
    [
        format_timestamp(driver.timestamp),
        driver.name.clone(),
        driver.phone.to_string(),
        driver.capacity.to_string(),
        driver.availability.clone(),
    ]
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Write the presentation table, header first.
pub fn write_presentation_csv(path: &Path, rows: &[PresentationRow]) -> Result<()> {
    let writer = create(path)?;
    write_records(writer, &OUTPUT_HEADERS, rows.iter().map(PresentationRow::cells))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn presentation_csv_string(rows: &[PresentationRow]) -> Result<String> {
    let bytes = write_records(Vec::new(), &OUTPUT_HEADERS, rows.iter().map(PresentationRow::cells))?;
    String::from_utf8(bytes).context("presentation csv is not utf-8")
}

/// Write the driver table in the sign-up sheet's layout.
///
/// Rotation rewrites timestamps, so the next run reads the new order back.
pub fn write_drivers_csv(path: &Path, drivers: &[Driver]) -> Result<()> {
    let writer = create(path)?;
    write_records(writer, &DRIVER_HEADERS, drivers.iter().map(driver_cells))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
