//! Output of the result table.
//!
//! Two renderings of the same rows:
//! - a right-aligned text table for the terminal, with the rate rounded
//!   to a fixed number of decimals
//! - CSV with header `id,length,compared_sites,mismatches,mutation_rate`,
//!   rate kept at full precision

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::metrics::MutationResult;

/// Column headers, shared by both renderings.
pub const HEADERS: [&str; 5] = ["id", "length", "compared_sites", "mismatches", "mutation_rate"];

/// Decimal places used for the text table unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 4;

/// Errors that can occur while writing results.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// Writes the results as CSV to any writer.
pub fn write_csv<W: Write>(results: &[MutationResult], writer: W) -> ReportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if results.is_empty() {
        // serialize() only emits the header alongside the first row
        csv_writer.write_record(HEADERS)?;
    }
    for result in results {
        csv_writer.serialize(result)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the results as CSV to a file, replacing it if it exists.
pub fn write_csv_file<P: AsRef<Path>>(results: &[MutationResult], path: P) -> ReportResult<()> {
    let file = File::create(path)?;
    write_csv(results, BufWriter::new(file))
}

/// Writes the results as an aligned text table.
pub fn write_table<W: Write>(
    results: &[MutationResult],
    precision: usize,
    mut writer: W,
) -> ReportResult<()> {
    let rows: Vec<[String; 5]> = results
        .iter()
        .map(|r| {
            [
                r.identifier.clone(),
                r.length.to_string(),
                r.compared_sites.to_string(),
                r.mismatches.to_string(),
                format!("{:.*}", precision, r.mutation_rate),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    write_row(&mut writer, &HEADERS, &widths)?;
    for row in &rows {
        write_row(&mut writer, row, &widths)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(
    writer: &mut W,
    cells: &[S],
    widths: &[usize],
) -> std::io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:>width$}", cell.as_ref(), width = width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line)
}
