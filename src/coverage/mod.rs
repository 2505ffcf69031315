//! Per-locus depth and the per-target reduction that drives it.
//!
//! - [`depth`]: read inclusion rules and depth counting at a single locus
//! - [`downsample`]: optional probabilistic thinning of the read stream
//! - [`traversal`]: reduce-by-interval walk over coordinate-sorted reads
//!
//! ## Example
//!
//! ```rust,no_run
//! use hybsel_stats::core::stats::TargetStats;
//! use hybsel_stats::coverage::depth::DepthFilter;
//! use hybsel_stats::coverage::traversal::reduce_by_interval;
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
//! ```

pub mod depth;
pub mod downsample;
pub mod traversal;
