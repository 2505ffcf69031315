//! # hybsel-stats
//!
//! Per-target coverage statistics for hybrid-selection (capture) sequencing experiments.
//!
//! A capture panel is a set of target intervals. For each target this crate walks every
//! locus, counts the reads covering it, and reduces those depths into a per-target
//! summary. Once every target is done, a report pass normalizes each target against the
//! mean coverage of the panel and classifies it.
//!
//! ## Features
//!
//! - **Depth**: mapping quality, duplicate and secondary/supplementary filtering
//! - **Thresholds**: bases at 2x, 10x, 20x and 30x per target
//! - **Freestanding targets**: targets with no neighbouring target nearby
//! - **Boosted targets**: targets near an auxiliary booster bait
//! - **Gene names**: from a UCSC refGene table
//! - **GC content**: from an indexed FASTA reference
//!
//! ## Example
//!
//! ```rust,no_run
//! use hybsel_stats::{
//!     reduce_by_interval, DepthFilter, IndexedReference, ReportConfig, ReportGenerator,
//!     TargetStats,
//! };
//! use hybsel_stats::parsing::intervals::read_interval_file;
//! use hybsel_stats::parsing::sam::open_alignments;
//! use std::path::Path;
//!
//! let source = open_alignments(Path::new("sample.bam")).unwrap();
//! let targets = read_interval_file(Path::new("targets.bed"), &source.dictionary).unwrap();
//! let filter = DepthFilter::default();
//!
//! let results = reduce_by_interval(
//!     source.reads,
//!     &targets,
//!     &source.dictionary,
//!     |pileup, stats: &mut TargetStats| stats.fold(filter.depth(pileup.reads())),
//! )
//! .unwrap();
//!
//! let reference = IndexedReference::open(Path::new("ref.fa")).unwrap();
//! let report = ReportGenerator::new(ReportConfig::default(), reference)
//!     .generate(results)
//!     .unwrap();
//!
//! for row in &report.rows {
//!     println!("{}\t{:.4}", row.location, row.avg_coverage);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Intervals, the sequence dictionary, reads and per-target stats
//! - [`coverage`]: Depth filtering, downsampling and the per-target traversal
//! - [`parsing`]: Readers for SAM/BAM, interval files, refGene tables and FASTA
//! - [`report`]: Overlap classification, gene names, GC and output
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod coverage;
pub mod parsing;
pub mod report;

// Re-export commonly used types for convenience
pub use core::interval::GenomicInterval;
pub use core::stats::TargetStats;
pub use coverage::depth::DepthFilter;
pub use coverage::traversal::reduce_by_interval;
pub use parsing::fasta::IndexedReference;
pub use report::generator::{CoverageReport, ReportConfig, ReportGenerator, TargetRow};
