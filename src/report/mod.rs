//! Post-traversal report: classification, normalization and output.
//!
//! Runs once every target has been reduced. The target set is indexed against itself to
//! find freestanding targets, booster intervals (if any) are indexed to find boosted
//! targets, and the global mean coverage over targets hit at least twice is used to
//! normalize each target's average depth.
//!
//! - [`overlap`]: padded interval overlap index
//! - [`annotation`]: forward-only gene name lookup over a refGene track
//! - [`gc`]: reference GC content
//! - [`generator`]: the report pass itself
//! - [`output`]: TSV and JSON writers

pub mod annotation;
pub mod gc;
pub mod generator;
pub mod output;
pub mod overlap;
