//! FASTA alignment reader.
//!
//! This module handles reading and parsing aligned FASTA files.
//! It supports both single-line and multi-line sequences.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence_identifier
//! ACGT-CGTACGT...
//! >another_sequence
//! TGCATG-ATGCA...
//! ```
//!
//! The identifier is the whole header line after `>`, trimmed. Sequence
//! lines are concatenated with whitespace removed; characters are kept
//! verbatim (no case folding, no alphabet check).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::model::{Alignment, AlignmentError, Sequence};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Cannot read FASTA file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read FASTA input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA format: {0}")]
    InvalidFormat(String),

    #[error("Sequence without header at line {0}")]
    SequenceWithoutHeader(usize),

    #[error(transparent)]
    Alignment(#[from] AlignmentError),
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Parses an aligned FASTA file and returns an Alignment.
///
/// # Arguments
///
/// * `path` - Path to the FASTA file
///
/// # Returns
///
/// An `Alignment` containing all sequences from the file, in file order.
///
/// # Examples
///
/// ```no_run
/// use mutrate::fasta::parse_fasta_file;
///
/// let alignment = parse_fasta_file("alignment.fasta").unwrap();
/// println!("Loaded {} sequences", alignment.sequence_count());
/// ```
pub fn parse_fasta_file<P: AsRef<Path>>(path: P) -> FastaResult<Alignment> {
    let path = path.as_ref();
    info!("Reading FASTA file: {}", path.display());

    let file = File::open(path).map_err(|source| FastaError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    parse_fasta(BufReader::new(file)).map_err(|err| match err {
        FastaError::Io(source) => FastaError::FileAccess {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parses FASTA content from a reader.
///
/// Blank lines are skipped. A header without sequence lines yields an empty
/// record, which then fails length validation against the other records.
pub fn parse_fasta<R: BufRead>(reader: R) -> FastaResult<Alignment> {
    let mut sequences = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_seq = String::new();

    for (line_index, line_result) in reader.lines().enumerate() {
        let line_number = line_index + 1;
        let line = line_result?;
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(id) = current_id.take() {
                sequences.push(Sequence::new(id, std::mem::take(&mut current_seq)));
            }

            let id = header.trim();
            if id.is_empty() {
                return Err(FastaError::InvalidFormat(format!(
                    "Empty sequence identifier at line {}",
                    line_number
                )));
            }

            current_id = Some(id.to_string());
        } else {
            if current_id.is_none() {
                return Err(FastaError::SequenceWithoutHeader(line_number));
            }

            if line.bytes().all(|b| !b.is_ascii_whitespace()) {
                current_seq.push_str(line);
            } else {
                current_seq.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
    }

    // Don't forget the last sequence
    if let Some(id) = current_id {
        sequences.push(Sequence::new(id, current_seq));
    }

    for seq in &sequences {
        debug!("Parsed record '{}' ({} columns)", seq.id, seq.len());
    }

    let alignment = Alignment::new(sequences)?;
    info!(
        "Parsed {} sequences, alignment width {}",
        alignment.sequence_count(),
        alignment.alignment_length()
    );
    Ok(alignment)
}

/// Parses FASTA content from a string.
///
/// Useful for testing or processing in-memory data.
pub fn parse_fasta_str(content: &str) -> FastaResult<Alignment> {
    parse_fasta(content.as_bytes())
}
