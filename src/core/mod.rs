//! Core data types shared by the traversal and the report.
//!
//! - [`GenomicInterval`](interval::GenomicInterval): a 1-based, inclusive span on one contig
//! - [`SequenceDictionary`](dictionary::SequenceDictionary): contig names and lengths from
//!   the alignment header, defining genomic sort order
//! - [`AlignedRead`](read::AlignedRead): the parts of an alignment record that depth needs
//! - [`TargetStats`](stats::TargetStats): per-target coverage accumulator
//!
//! ## Coordinates
//!
//! Everything in this crate is 1-based with inclusive stops, as in SAM and Picard interval
//! lists. BED and refGene inputs are converted on read.

pub mod dictionary;
pub mod interval;
pub mod read;
pub mod stats;
