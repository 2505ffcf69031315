//! Command-line interface for hybsel-stats.
//!
//! ## Usage
//!
//! ```text
//! # Per-target coverage for a capture panel
//! hybsel-stats report -I sample.bam -L targets.interval_list -R ref.fa
//!
//! # With booster baits and gene names, written to a file
//! hybsel-stats report -I sample.bam -L targets.bed -R ref.fa \
//!     --booster boosters.bed --refseq refGene.txt -o sample.targets.tsv
//!
//! # JSON output, reproducibly downsampled to 10% of reads
//! hybsel-stats --format json report -I sample.bam -L targets.bed -R ref.fa \
//!     --downsample-fraction 0.1 --seed 42
//! ```

use clap::{Parser, Subcommand};

pub mod report;

#[derive(Parser)]
#[command(name = "hybsel-stats")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Per-target coverage statistics for hybrid-selection experiments")]
#[command(
    long_about = "hybsel-stats computes depth statistics for every target of a hybrid-selection (capture) panel from a coordinate-sorted SAM/BAM file.\n\nEach target is reported with:\n- Average and normalized coverage\n- Counts of bases at 2x, 10x, 20x and 30x\n- GC content from the reference\n- Whether it is freestanding or boosted, and its overlapping gene"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "tsv")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute per-target coverage statistics
    Report(report::ReportArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Tsv,
    Json,
}
