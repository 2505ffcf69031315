use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::interval::GenomicInterval;
use crate::core::stats::TargetStats;
use crate::coverage::depth::DepthFilter;
use crate::coverage::downsample::Sampler;
use crate::coverage::traversal::reduce_by_interval;
use crate::parsing::fasta::IndexedReference;
use crate::parsing::intervals::{read_interval_file, unique_intervals};
use crate::parsing::refseq::read_refseq_file;
use crate::parsing::sam::{open_alignments, ReadStream};
use crate::report::annotation::AnnotationTrack;
use crate::report::generator::{ReportConfig, ReportGenerator};
use crate::report::output::{write_json, write_tsv};

#[derive(Args)]
pub struct ReportArgs {
    /// Coordinate-sorted SAM or BAM file
    #[arg(short = 'I', long, required = true)]
    pub input: PathBuf,

    /// Target intervals (Picard interval list, BED, or one locus per line)
    #[arg(short = 'L', long, required = true)]
    pub targets: PathBuf,

    /// Reference FASTA, indexed with a .fai alongside it
    #[arg(short = 'R', long, required = true)]
    pub reference: PathBuf,

    /// Minimum mapping quality of reads counted towards depth
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8))]
    pub min_mapq: u8,

    /// Count reads marked as duplicates
    #[arg(long)]
    pub include_duplicates: bool,

    /// A target with another target within this many bases on either side is not
    /// freestanding
    #[arg(long, default_value = "500")]
    pub free_standing_distance: u64,

    /// Booster intervals; targets near any of them are reported as boosted
    #[arg(long)]
    pub booster: Option<PathBuf>,

    /// A target within this many bases of a booster, on either side, is boosted
    #[arg(long, default_value = "100")]
    pub booster_distance: u64,

    /// UCSC refGene table used to name the gene overlapping each target
    #[arg(long)]
    pub refseq: Option<PathBuf>,

    /// Keep each read with this probability (0 < f <= 1)
    #[arg(long, value_parser = parse_fraction)]
    pub downsample_fraction: Option<f64>,

    /// Seed for downsampling, for reproducible output
    #[arg(long, requires = "downsample_fraction")]
    pub seed: Option<u64>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Every interval must lie on a reference contig and within its length
fn check_against_reference(
    reference: &IndexedReference,
    intervals: &[GenomicInterval],
    source: &Path,
) -> anyhow::Result<()> {
    for interval in intervals {
        reference.validate(interval).with_context(|| {
            format!(
                "Interval {interval} from {} does not fit the reference",
                source.display()
            )
        })?;
    }
    Ok(())
}

fn parse_fraction(value: &str) -> Result<f64, String> {
    let fraction: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if fraction > 0.0 && fraction <= 1.0 {
        Ok(fraction)
    } else {
        Err(format!("{fraction} is not in (0, 1]"))
    }
}

/// Execute report subcommand
///
/// # Errors
///
/// Returns an error if any input cannot be read, the alignments are not coordinate
/// sorted, a target or booster lies outside the sequence dictionary or the reference, or
/// the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReportArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = open_alignments(&args.input)
        .with_context(|| format!("Failed to open alignments {}", args.input.display()))?;
    let dictionary = source.dictionary;
    info!(
        contigs = dictionary.len(),
        input = %args.input.display(),
        "Opened alignments"
    );

    let targets = read_interval_file(&args.targets, &dictionary)
        .with_context(|| format!("Failed to read targets {}", args.targets.display()))?;
    info!(targets = targets.len(), "Loaded target intervals");

    // Opened before traversal so a bad reference fails fast
    let reference = IndexedReference::open(&args.reference)
        .with_context(|| format!("Failed to open reference {}", args.reference.display()))?;
    check_against_reference(&reference, &targets, &args.targets)?;

    let boosters = match &args.booster {
        Some(path) => {
            let boosters = read_interval_file(path, &dictionary)
                .with_context(|| format!("Failed to read boosters {}", path.display()))?;
            let boosters = unique_intervals(boosters, &dictionary);
            check_against_reference(&reference, &boosters, path)?;
            info!(boosters = boosters.len(), "Loaded booster intervals");
            Some(boosters)
        }
        None => None,
    };

    let config = ReportConfig {
        free_standing_distance: args.free_standing_distance,
        booster_distance: args.booster_distance,
    };
    let mut generator = ReportGenerator::new(config, reference);
    if let Some(boosters) = boosters {
        generator = generator.with_boosters(boosters);
    }

    if let Some(path) = &args.refseq {
        let records = read_refseq_file(path)
            .with_context(|| format!("Failed to read annotations {}", path.display()))?;
        let track = AnnotationTrack::new(records, &dictionary);
        info!(records = track.len(), "Loaded annotation track");
        generator = generator.with_annotations(track);
    }

    let reads: ReadStream = match args.downsample_fraction {
        Some(fraction) => {
            info!(fraction, seed = ?args.seed, "Downsampling reads");
            Box::new(Sampler::new(fraction, args.seed).downsample(source.reads))
        }
        None => source.reads,
    };

    let filter = DepthFilter {
        min_mapq: args.min_mapq,
        include_duplicates: args.include_duplicates,
    };
    let results = reduce_by_interval(
        reads,
        &targets,
        &dictionary,
        |pileup, stats: &mut TargetStats| stats.fold(filter.depth(pileup.reads())),
    )?;

    let report = generator.generate(results)?;

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    match format {
        OutputFormat::Tsv => write_tsv(&mut writer, &report)?,
        OutputFormat::Json => write_json(&mut writer, &report)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("0.5"), Ok(0.5));
        assert_eq!(parse_fraction("1"), Ok(1.0));
        assert!(parse_fraction("0").is_err());
        assert!(parse_fraction("1.5").is_err());
        assert!(parse_fraction("-0.1").is_err());
        assert!(parse_fraction("half").is_err());
    }
}
