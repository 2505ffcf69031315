use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::interval::GenomicInterval;
use crate::core::stats::TargetStats;
use crate::parsing::sam::ParseError;
use crate::report::annotation::{AnnotationError, AnnotationTrack, UNKNOWN_GENE};
use crate::report::gc::{interval_gc, ReferenceSource};
use crate::report::overlap::OverlapIndex;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to read reference bases for {interval}: {source}")]
    Reference {
        interval: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

/// Proximity settings for target classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// A target with another target within this many bases on either side is not
    /// freestanding
    pub free_standing_distance: u64,

    /// A target within this many bases of a booster, on either side, is boosted
    pub booster_distance: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            free_standing_distance: 500,
            booster_distance: 100,
        }
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRow {
    pub location: String,
    pub length: u64,
    pub gc: f64,
    pub avg_coverage: f64,

    /// `None` when no target was hit twice and the mean is undefined
    pub normalized_coverage: Option<f64>,

    pub hit_twice: bool,
    pub freestanding: bool,
    pub boosted: bool,
    pub bases_over_2x: u64,
    pub bases_over_10x: u64,
    pub bases_over_20x: u64,
    pub bases_over_30x: u64,
    pub gene_name: String,
}

/// Finished report: the global mean plus one row per target in traversal order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub mean_target_coverage: Option<f64>,
    pub rows: Vec<TargetRow>,
}

/// Mean depth over the targets that were hit twice: total depth divided by total length.
///
/// Returns `None` when no target qualifies.
#[must_use]
pub fn mean_target_coverage(results: &[(GenomicInterval, TargetStats)]) -> Option<f64> {
    let (total_depth, bases) = results
        .iter()
        .filter(|(_, stats)| stats.hit_twice)
        .fold((0u64, 0u64), |(depth, bases), (target, stats)| {
            (depth + stats.total_depth, bases + target.len())
        });

    if bases == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total_depth as f64 / bases as f64;
    Some(mean)
}

/// Builds the per-target report once every target has been reduced.
///
/// The generator owns the reference accessor for the duration of one run; it is
/// released when [`ReportGenerator::generate`] returns, whether or not it succeeds.
pub struct ReportGenerator<R> {
    config: ReportConfig,
    reference: R,
    boosters: Option<Vec<GenomicInterval>>,
    annotations: Option<AnnotationTrack>,
}

impl<R: ReferenceSource> ReportGenerator<R> {
    pub fn new(config: ReportConfig, reference: R) -> Self {
        Self {
            config,
            reference,
            boosters: None,
            annotations: None,
        }
    }

    #[must_use]
    pub fn with_boosters(mut self, boosters: Vec<GenomicInterval>) -> Self {
        self.boosters = Some(boosters);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: AnnotationTrack) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Classify and normalize every target.
    ///
    /// `results` must be in traversal (genomic) order; rows come out in the same order.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Reference` if reference bases cannot be read for a target,
    /// or `ReportError::Annotation` if targets are not in genomic order.
    pub fn generate(
        mut self,
        results: Vec<(GenomicInterval, TargetStats)>,
    ) -> Result<CoverageReport, ReportError> {
        let targets = OverlapIndex::from_intervals(
            self.config.free_standing_distance,
            results.iter().map(|(target, _)| target),
        );
        let boosters = self
            .boosters
            .as_ref()
            .map(|boosters| OverlapIndex::from_intervals(self.config.booster_distance, boosters));

        let mean = mean_target_coverage(&results);
        match mean {
            Some(mean) => info!(mean_target_coverage = mean, "Computed mean target coverage"),
            None => warn!(
                targets = results.len(),
                "No target was covered by at least two reads; normalized coverage is undefined"
            ),
        }

        let mut cursor = self.annotations.as_ref().map(AnnotationTrack::cursor);
        let mut rows = Vec::with_capacity(results.len());

        for (target, stats) in results {
            let length = target.len();
            #[allow(clippy::cast_precision_loss)]
            let avg_coverage = stats.total_depth as f64 / length as f64;

            let gc = interval_gc(&mut self.reference, &target).map_err(|source| {
                ReportError::Reference {
                    interval: target.to_string(),
                    source,
                }
            })?;

            let freestanding = targets.count(&target) == 1;
            let boosted = boosters
                .as_ref()
                .is_some_and(|index| index.count(&target) > 0);

            let gene_name = match (&self.annotations, cursor.as_mut()) {
                (Some(track), Some(cursor)) => track.resolve(cursor, &target)?.to_string(),
                _ => UNKNOWN_GENE.to_string(),
            };

            rows.push(TargetRow {
                location: target.to_string(),
                length,
                gc,
                avg_coverage,
                normalized_coverage: mean.map(|mean| avg_coverage / mean),
                hit_twice: stats.hit_twice,
                freestanding,
                boosted,
                bases_over_2x: stats.positions_over_2x,
                bases_over_10x: stats.positions_over_10x,
                bases_over_20x: stats.positions_over_20x,
                bases_over_30x: stats.positions_over_30x,
                gene_name,
            });
        }

        Ok(CoverageReport {
            mean_target_coverage: mean,
            rows,
        })
    }
}
