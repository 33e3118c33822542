//! Data model for aligned sequences.
//!
//! This module contains the data structures for representing:
//! - Sequences (one aligned record each)
//! - Alignments (ordered, uniquely named, equal-width records)
//!
//! An `Alignment` can only be built through [`Alignment::new`], which checks
//! the structural invariants once. Everything downstream may rely on them.

use std::collections::HashMap;

use thiserror::Error;

/// Structural problems that make a set of sequences unusable as an alignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Empty alignment: no sequences found")]
    EmptyAlignment,

    #[error("Sequences are not aligned: '{id}' has length {found}, expected {expected}")]
    LengthMismatch {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate sequence identifier '{id}'")]
    DuplicateIdentifier { id: String },
}

/// Represents a single sequence with its identifier and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence identifier (from FASTA header, without '>')
    pub id: String,
    /// The aligned sequence data, gaps included, case preserved
    pub data: String,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }

    /// Returns the length of the sequence in characters.
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    /// Returns true if the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Gets a character at a specific column.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.data.chars().nth(pos)
    }

    /// Iterates over the alignment columns of this sequence.
    pub fn columns(&self) -> std::str::Chars<'_> {
        self.data.chars()
    }
}

/// Represents an alignment of multiple sequences.
///
/// Sequences keep the order in which they were added (first-seen order in
/// the input file), identifiers are unique and all sequences share the same
/// width.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// All sequences in the alignment, in input order
    sequences: Vec<Sequence>,
    /// Position of each identifier in `sequences`
    index: HashMap<String, usize>,
    /// The common length of all sequences
    width: usize,
}

impl Alignment {
    /// Creates a new alignment from a vector of sequences.
    ///
    /// Fails if there are no sequences, if an identifier occurs twice or if
    /// any sequence differs in length from the first one.
    pub fn new(sequences: Vec<Sequence>) -> Result<Self, AlignmentError> {
        let width = Self::validate_alignment(&sequences)?;

        let mut index = HashMap::with_capacity(sequences.len());
        for (position, seq) in sequences.iter().enumerate() {
            if index.insert(seq.id.clone(), position).is_some() {
                return Err(AlignmentError::DuplicateIdentifier { id: seq.id.clone() });
            }
        }

        Ok(Self {
            sequences,
            index,
            width,
        })
    }

    /// Validates that all sequences have the length of the first one.
    fn validate_alignment(sequences: &[Sequence]) -> Result<usize, AlignmentError> {
        let first = sequences.first().ok_or(AlignmentError::EmptyAlignment)?;
        let expected = first.len();

        match sequences.iter().find(|s| s.len() != expected) {
            Some(offending) => Err(AlignmentError::LengthMismatch {
                id: offending.id.clone(),
                expected,
                found: offending.len(),
            }),
            None => Ok(expected),
        }
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the alignment width (shared by every sequence).
    pub fn alignment_length(&self) -> usize {
        self.width
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    /// Gets a sequence by identifier (case-sensitive).
    pub fn get_by_id(&self, id: &str) -> Option<&Sequence> {
        self.index.get(id).map(|&position| &self.sequences[position])
    }

    /// Returns true if an identifier is present.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterates over the sequences in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.sequences.iter()
    }
}

impl<'a> IntoIterator for &'a Alignment {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
