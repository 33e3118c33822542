//! Run orchestration.
//!
//! This module drives one run of the tool:
//! - reading and validating the alignment
//! - computing the metrics against the reference
//! - writing the result table
//!
//! Nothing is written until the whole table has been computed, so a failing
//! run never leaves a partial CSV behind.

use std::io::{self, Write};
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::fasta::{parse_fasta_file, FastaError};
use crate::metrics::{compare_to_reference, GapSet, MetricsError, MutationResult};
use crate::report::{write_csv, write_csv_file, write_table, ReportError, DEFAULT_PRECISION};

/// Where the CSV rendering of the results goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvOutput {
    /// No CSV; the text table is printed.
    None,
    /// CSV on stdout instead of the text table.
    Stdout,
    /// CSV to a file; the text table is still printed.
    File(PathBuf),
}

impl CsvOutput {
    /// Interprets an `--out` value, where "-" stands for stdout.
    pub fn from_arg(out: Option<&str>) -> Self {
        match out {
            None => CsvOutput::None,
            Some("-") => CsvOutput::Stdout,
            Some(path) => CsvOutput::File(PathBuf::from(path)),
        }
    }
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fasta_path: PathBuf,
    pub reference_id: String,
    pub csv_output: CsvOutput,
    pub gaps: GapSet,
    /// Decimal places of the rate in the text table
    pub precision: usize,
}

impl RunConfig {
    pub fn new(fasta_path: impl Into<PathBuf>, reference_id: impl Into<String>) -> Self {
        Self {
            fasta_path: fasta_path.into(),
            reference_id: reference_id.into(),
            csv_output: CsvOutput::None,
            gaps: GapSet::default(),
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Any failure of a run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] FastaError),

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Output(#[from] ReportError),
}

impl RunError {
    /// Process exit code for this failure.
    ///
    /// | Code | Condition |
    /// |---|---|
    /// | 1 | Results could not be written |
    /// | 2 | Input file missing or unreadable |
    /// | 3 | Reference identifier not found |
    /// | 4 | Malformed alignment (unequal lengths, empty, duplicate ids, bad FASTA) |
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Input(FastaError::FileAccess { .. } | FastaError::Io(_)) => 2,
            RunError::Input(_) => 4,
            RunError::Metrics(MetricsError::ReferenceNotFound(_)) => 3,
            RunError::Output(_) => 1,
        }
    }
}

/// Reads the alignment and computes the result table.
pub fn compute(config: &RunConfig) -> Result<Vec<MutationResult>, RunError> {
    let alignment = parse_fasta_file(&config.fasta_path)?;
    let results = compare_to_reference(&alignment, &config.reference_id, &config.gaps)?;
    Ok(results)
}

/// Writes the result table as configured, with `stdout` as the standard output.
pub fn write_outputs<W: Write>(
    config: &RunConfig,
    results: &[MutationResult],
    stdout: W,
) -> Result<(), RunError> {
    match &config.csv_output {
        CsvOutput::None => write_table(results, config.precision, stdout)?,
        CsvOutput::Stdout => write_csv(results, stdout)?,
        CsvOutput::File(path) => {
            write_table(results, config.precision, stdout)?;
            write_csv_file(results, path)?;
            info!("Wrote CSV: {}", path.display());
        }
    }
    Ok(())
}

/// Runs the whole pipeline, writing to the process stdout.
pub fn run(config: &RunConfig) -> Result<Vec<MutationResult>, RunError> {
    let results = compute(config)?;
    let stdout = io::stdout();
    write_outputs(config, &results, stdout.lock())?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_fasta(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("alignment.fasta");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_csv_output_from_arg() {
        assert_eq!(CsvOutput::from_arg(None), CsvOutput::None);
        assert_eq!(CsvOutput::from_arg(Some("-")), CsvOutput::Stdout);
        assert_eq!(
            CsvOutput::from_arg(Some("out.csv")),
            CsvOutput::File(PathBuf::from("out.csv"))
        );
    }

    #[test]
    fn test_compute_example() {
        let config = RunConfig::new("test_data/example_alignment.fasta", "Seq1");
        let results = compute(&config).unwrap();

        let summary: Vec<(&str, usize, usize, usize)> = results
            .iter()
            .map(|r| (r.identifier.as_str(), r.length, r.compared_sites, r.mismatches))
            .collect();
        assert_eq!(
            summary,
            vec![("Seq1", 30, 30, 0), ("Seq2", 30, 29, 3), ("Seq3", 30, 28, 4)]
        );
    }

    #[test]
    fn test_table_to_stdout() {
        let config = RunConfig::new("test_data/example_alignment.fasta", "Seq1");
        let results = compute(&config).unwrap();

        let mut stdout = Vec::new();
        write_outputs(&config, &results, &mut stdout).unwrap();
        let text = String::from_utf8(stdout).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_start().starts_with("id"));
        assert!(lines[2].trim_start().starts_with("Seq2"));
        assert!(lines[2].ends_with("0.1034"));
        assert!(lines[3].ends_with("0.1429"));
    }

    #[test]
    fn test_csv_to_stdout() {
        let mut config = RunConfig::new("test_data/example_alignment.fasta", "Seq1");
        config.csv_output = CsvOutput::Stdout;
        let results = compute(&config).unwrap();

        let mut stdout = Vec::new();
        write_outputs(&config, &results, &mut stdout).unwrap();
        let text = String::from_utf8(stdout).unwrap();
        assert!(text.starts_with("id,length,compared_sites,mismatches,mutation_rate\n"));
        assert!(text.contains("\nSeq1,30,30,0,0.0\n"));
    }

    #[test]
    fn test_csv_to_file_and_table_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let mut config = RunConfig::new("test_data/example_alignment.fasta", "Seq1");
        config.csv_output = CsvOutput::File(out.clone());
        let results = compute(&config).unwrap();

        let mut stdout = Vec::new();
        write_outputs(&config, &results, &mut stdout).unwrap();

        let table = String::from_utf8(stdout).unwrap();
        assert!(!table.contains(','));
        let csv = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,length,compared_sites,mismatches,mutation_rate");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_missing_file_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new(dir.path().join("missing.fasta"), "Seq1");
        let err = compute(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing.fasta"));
    }

    #[test]
    fn test_unequal_lengths_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let long = "ATGCGTACGTTAGCCGATCGATCGTACGAT";
        let content = format!(">Seq1\n{}\n>Seq2\n{}\n>Seq3\n{}\n", long, long, &long[..29]);
        let path = write_fasta(dir.path(), &content);

        let err = compute(&RunConfig::new(path, "Seq1")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        let message = err.to_string();
        assert!(message.contains("Seq3"));
        assert!(message.contains("29"));
        assert!(message.contains("30"));
    }

    #[test]
    fn test_structural_errors_exit_code() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_fasta(dir.path(), "\n\n");
        let err = compute(&RunConfig::new(path, "Seq1")).unwrap_err();
        assert_eq!(err.exit_code(), 4);

        let path = write_fasta(dir.path(), ">Seq1\nACGT\n>Seq1\nACGA\n");
        let err = compute(&RunConfig::new(path, "Seq1")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_missing_reference_exit_code() {
        let config = RunConfig::new("test_data/example_alignment.fasta", "Seq9");
        let err = compute(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("Seq9"));
    }

    #[test]
    fn test_failed_run_writes_no_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results.csv");
        let mut config = RunConfig::new("test_data/example_alignment.fasta", "Seq9");
        config.csv_output = CsvOutput::File(out.clone());

        assert!(run(&config).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_unwritable_output_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RunConfig::new("test_data/example_alignment.fasta", "Seq1");
        config.csv_output = CsvOutput::File(dir.path().join("no_such_dir").join("results.csv"));
        let results = compute(&config).unwrap();

        let err = write_outputs(&config, &results, io::sink()).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
