//! Result export: CSV for the raw records, JSON for the full summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::ExportError;
use crate::stats::SimulationResults;
use crate::types::RunRecord;

#[derive(Serialize)]
struct CsvRow {
    iteration: u64,
    success: bool,
    #[serde(rename = "durationMs")]
    duration_ms: u64,
}

/// Write records as `iteration,success,durationMs` rows with a header.
pub fn write_csv<W: Write>(records: &[RunRecord], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(CsvRow {
            iteration: record.iteration,
            success: record.success,
            duration_ms: record.duration_ms,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_csv_file(records: &[RunRecord], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_csv(records, BufWriter::new(file))
}

/// Write the full results (summary and records) as pretty-printed JSON.
pub fn write_json_file(
    results: &SimulationResults,
    path: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
