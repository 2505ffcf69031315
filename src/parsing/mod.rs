//! Readers for the files a coverage run consumes.
//!
//! This module provides parsers for:
//!
//! - **SAM/BAM files**: Stream placed reads and the `@SQ` sequence dictionary
//! - **Interval files**: Picard interval lists, BED and `contig:start-stop` locus lists
//! - **refGene tables**: Transcript annotations with exons and gene names
//! - **Indexed FASTA**: Random access to reference bases through a `.fai` index
//!
//! ## Example
//!
//! ```rust,no_run
//! use hybsel_stats::parsing::intervals::read_interval_file;
//! use hybsel_stats::parsing::sam::open_alignments;
//! use std::path::Path;
//!
//! let source = open_alignments(Path::new("sample.bam")).unwrap();
//! let targets = read_interval_file(Path::new("targets.interval_list"), &source.dictionary).unwrap();
//! println!("{} targets on {} contigs", targets.len(), source.dictionary.len());
//! ```

pub mod fasta;
pub mod intervals;
pub mod refseq;
pub mod sam;
