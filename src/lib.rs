//! # mutrate - Mutation rates against a reference
//!
//! Computes, for every sequence of an aligned FASTA file, how many columns
//! can be compared with a chosen reference sequence and how many of those
//! differ.
//!
//! ## Architecture
//!
//! The tool is a straight pipeline with clear separation:
//! - `model`: Data structures for sequences and alignments
//! - `fasta`: FASTA file parsing and validation
//! - `metrics`: Column-wise comparison against the reference
//! - `report`: Text table and CSV rendering of the results
//! - `controller`: Orchestration of a run and exit-code mapping

pub mod controller;
pub mod fasta;
pub mod metrics;
pub mod model;
pub mod report;
