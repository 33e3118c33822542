//! Mutation metrics against a reference sequence.
//!
//! Every record of an alignment is compared column by column with the
//! reference record. Columns where either side holds a gap character are
//! left out entirely; the remaining columns are the comparable sites, and
//! the mutation rate is the fraction of them that differ.
//!
//! Characters are compared exactly: `a` and `A` are different bases, and
//! only the configured gap characters (by default `-`) are gaps. An
//! alignment using `.` for gaps therefore needs `.` in the [`GapSet`].

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// The gap character used when none is configured.
pub const DEFAULT_GAP: char = '-';

/// Errors raised by the calculator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("Reference id '{0}' not found in alignment")]
    ReferenceNotFound(String),
}

/// Set of characters treated as alignment gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapSet {
    chars: Vec<char>,
}

impl GapSet {
    /// Builds a gap set from every character of `chars`.
    ///
    /// An empty string yields an empty set: every column is then comparable.
    pub fn new(chars: &str) -> Self {
        let mut chars: Vec<char> = chars.chars().collect();
        chars.sort_unstable();
        chars.dedup();
        Self { chars }
    }

    pub fn is_gap(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

impl Default for GapSet {
    fn default() -> Self {
        Self {
            chars: vec![DEFAULT_GAP],
        }
    }
}

/// Comparison of one sequence against the reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationResult {
    #[serde(rename = "id")]
    pub identifier: String,
    /// Alignment width, gaps included
    pub length: usize,
    /// Columns where neither sequence has a gap
    pub compared_sites: usize,
    /// Comparable columns where the characters differ
    pub mismatches: usize,
    /// `mismatches / compared_sites`, or 0.0 without comparable sites
    pub mutation_rate: f64,
}

impl MutationResult {
    /// False when the two sequences never share a non-gap column, in which
    /// case `mutation_rate` is reported as 0.0.
    pub fn has_comparable_sites(&self) -> bool {
        self.compared_sites > 0
    }
}

/// Compares `target` with `reference`, column by column.
///
/// Both sequences are expected to come from the same alignment; if they do
/// not, only the shared prefix of columns is compared.
pub fn compare_pair(reference: &Sequence, target: &Sequence, gaps: &GapSet) -> MutationResult {
    let mut compared_sites = 0;
    let mut mismatches = 0;

    for (r, t) in reference.columns().zip(target.columns()) {
        if gaps.is_gap(r) || gaps.is_gap(t) {
            continue;
        }
        compared_sites += 1;
        if r != t {
            mismatches += 1;
        }
    }

    let mutation_rate = if compared_sites > 0 {
        mismatches as f64 / compared_sites as f64
    } else {
        0.0
    };

    MutationResult {
        identifier: target.id.clone(),
        length: target.len(),
        compared_sites,
        mismatches,
        mutation_rate,
    }
}

/// Computes one [`MutationResult`] per sequence, reference included, in
/// alignment order.
///
/// Fails without partial results if `reference_id` is not in the alignment.
pub fn compare_to_reference(
    alignment: &Alignment,
    reference_id: &str,
    gaps: &GapSet,
) -> Result<Vec<MutationResult>, MetricsError> {
    let reference = alignment
        .get_by_id(reference_id)
        .ok_or_else(|| MetricsError::ReferenceNotFound(reference_id.to_string()))?;

    info!(
        "Computing mutation rates of {} sequences against reference '{}'",
        alignment.sequence_count(),
        reference_id
    );

    let results: Vec<MutationResult> = alignment
        .iter()
        .map(|target| {
            let result = compare_pair(reference, target, gaps);
            debug!(
                "{}: {} mismatches over {} comparable sites",
                result.identifier, result.mismatches, result.compared_sites
            );
            if !result.has_comparable_sites() {
                warn!(
                    "'{}' shares no ungapped column with reference '{}'; rate reported as 0",
                    result.identifier, reference_id
                );
            }
            result
        })
        .collect();

    Ok(results)
}
