use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::core::dictionary::SequenceDictionary;
use crate::core::interval::GenomicInterval;
use crate::parsing::refseq::AnnotationRecord;

/// Gene name reported when no annotation overlaps a target
pub const UNKNOWN_GENE: &str = "UNKNOWN";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation queries must arrive in genomic order: {query} follows {previous}")]
    OutOfOrder { query: String, previous: String },
}

#[derive(Debug, Clone)]
struct RankedRecord {
    rank: usize,
    record: AnnotationRecord,
}

/// Annotation records sorted in dictionary order, for forward-only lookups
#[derive(Debug, Clone)]
pub struct AnnotationTrack {
    records: Vec<RankedRecord>,
    ranks: HashMap<String, usize>,
}

/// Read position within an [`AnnotationTrack`].
///
/// Owned by the caller and passed to every lookup. It only moves forward, and each
/// query must start at or after the previous one.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCursor {
    next: usize,
    last: Option<(usize, GenomicInterval)>,
}

impl AnnotationCursor {
    /// Index of the first record still eligible for future queries
    #[must_use]
    pub fn position(&self) -> usize {
        self.next
    }
}

impl AnnotationTrack {
    /// Sort records into dictionary order; records on contigs outside the dictionary
    /// are dropped
    #[must_use]
    pub fn new(records: Vec<AnnotationRecord>, dictionary: &SequenceDictionary) -> Self {
        let total = records.len();
        let mut ranked: Vec<RankedRecord> = records
            .into_iter()
            .filter_map(|record| {
                dictionary
                    .rank(&record.interval.contig)
                    .map(|rank| RankedRecord { rank, record })
            })
            .collect();
        ranked.sort_by_key(|r| (r.rank, r.record.interval.start));

        if ranked.len() < total {
            debug!(
                skipped = total - ranked.len(),
                "Dropped annotation records on contigs absent from the sequence dictionary"
            );
        }

        let ranks = (0..dictionary.len())
            .filter_map(|rank| dictionary.name(rank).map(|name| (name.to_string(), rank)))
            .collect();

        Self {
            records: ranked,
            ranks,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A cursor positioned at the start of the track
    #[must_use]
    pub fn cursor(&self) -> AnnotationCursor {
        AnnotationCursor::default()
    }

    /// Gene name of the first record (in track order) with an exon overlapping `query`,
    /// or [`UNKNOWN_GENE`].
    ///
    /// Records that end before `query` starts are passed over permanently.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::OutOfOrder` if `query` sorts before the previous query
    /// made with the same cursor.
    pub fn resolve<'a>(
        &'a self,
        cursor: &mut AnnotationCursor,
        query: &GenomicInterval,
    ) -> Result<&'a str, AnnotationError> {
        let Some(rank) = self.ranks.get(&query.contig).copied() else {
            return Ok(UNKNOWN_GENE);
        };

        if let Some((last_rank, last)) = &cursor.last {
            if (rank, query.start) < (*last_rank, last.start) {
                return Err(AnnotationError::OutOfOrder {
                    query: query.to_string(),
                    previous: last.to_string(),
                });
            }
        }
        cursor.last = Some((rank, query.clone()));

        while let Some(candidate) = self.records.get(cursor.next) {
            let behind = candidate.rank < rank
                || (candidate.rank == rank && candidate.record.interval.stop < query.start);
            if !behind {
                break;
            }
            cursor.next += 1;
        }

        for candidate in &self.records[cursor.next..] {
            if candidate.rank > rank || candidate.record.interval.start > query.stop {
                break;
            }
            if candidate.record.overlaps_exon(query) {
                return Ok(&candidate.record.gene_name);
            }
        }

        Ok(UNKNOWN_GENE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(contig: &str, start: u64, stop: u64) -> GenomicInterval {
        GenomicInterval::new(contig, start, stop).unwrap()
    }

    fn record(gene: &str, contig: &str, exons: &[(u64, u64)]) -> AnnotationRecord {
        let start = exons.iter().map(|e| e.0).min().unwrap();
        let stop = exons.iter().map(|e| e.1).max().unwrap();
        AnnotationRecord {
            interval: interval(contig, start, stop),
            exons: exons.iter().map(|&(s, e)| interval(contig, s, e)).collect(),
            transcript_id: format!("NM_{gene}"),
            gene_name: gene.to_string(),
        }
    }

    fn dict() -> SequenceDictionary {
        SequenceDictionary::new(vec![
            ("chr1".to_string(), 1_000_000),
            ("chr2".to_string(), 1_000_000),
        ])
    }

    fn track() -> AnnotationTrack {
        AnnotationTrack::new(
            vec![
                // Deliberately out of order; the track sorts them
                record("GENE_C", "chr2", &[(100, 200)]),
                record("GENE_A", "chr1", &[(1000, 2000), (5000, 6000)]),
                record("GENE_B", "chr1", &[(1500, 1600)]),
                record("LONG", "chr1", &[(10_000, 10_100), (90_000, 90_100)]),
                record("INNER", "chr1", &[(20_000, 20_100)]),
                record("ELSEWHERE", "chrUn", &[(1, 100)]),
            ],
            &dict(),
        )
    }

    #[test]
    fn test_records_outside_dictionary_are_dropped() {
        assert_eq!(track().len(), 5);
    }

    #[test]
    fn test_first_overlapping_exon_wins() {
        let track = track();
        let mut cursor = track.cursor();

        assert_eq!(
            track.resolve(&mut cursor, &interval("chr1", 1550, 1560)),
            Ok("GENE_A")
        );
        // Intron of GENE_A
        assert_eq!(
            track.resolve(&mut cursor, &interval("chr1", 3000, 3100)),
            Ok(UNKNOWN_GENE)
        );
        assert_eq!(
            track.resolve(&mut cursor, &interval("chr1", 5990, 6010)),
            Ok("GENE_A")
        );
        assert_eq!(
            track.resolve(&mut cursor, &interval("chr2", 150, 160)),
            Ok("GENE_C")
        );
    }

    #[test]
    fn test_long_transcript_stays_reachable() {
        let track = track();
        let mut cursor = track.cursor();

        assert_eq!(
            track.resolve(&mut cursor, &interval("chr1", 20_050, 20_060)),
            Ok("INNER")
        );
        assert_eq!(
            track.resolve(&mut cursor, &interval("chr1", 90_000, 90_010)),
            Ok("LONG")
        );
    }

    #[test]
    fn test_cursor_only_moves_forward() {
        let track = track();
        let mut cursor = track.cursor();
        let queries = [
            interval("chr1", 100, 200),
            interval("chr1", 1550, 1560),
            interval("chr1", 7000, 7100),
            interval("chr1", 20_000, 20_010),
            interval("chr1", 95_000, 95_010),
            interval("chr2", 150, 160),
            interval("chr2", 5000, 5010),
        ];

        let mut previous = cursor.position();
        for query in &queries {
            track.resolve(&mut cursor, query).unwrap();
            assert!(cursor.position() >= previous);
            previous = cursor.position();
        }
        assert_eq!(cursor.position(), track.len());
    }

    #[test]
    fn test_out_of_order_query_is_rejected() {
        let track = track();
        let mut cursor = track.cursor();

        track
            .resolve(&mut cursor, &interval("chr2", 150, 160))
            .unwrap();
        let result = track.resolve(&mut cursor, &interval("chr1", 1550, 1560));
        assert!(matches!(result, Err(AnnotationError::OutOfOrder { .. })));
    }

    #[test]
    fn test_unknown_contig_and_empty_track() {
        let track = track();
        let mut cursor = track.cursor();
        assert_eq!(
            track.resolve(&mut cursor, &interval("chrM", 1, 100)),
            Ok(UNKNOWN_GENE)
        );

        let empty = AnnotationTrack::new(Vec::new(), &dict());
        let mut cursor = empty.cursor();
        assert!(empty.is_empty());
        assert_eq!(
            empty.resolve(&mut cursor, &interval("chr1", 1, 100)),
            Ok(UNKNOWN_GENE)
        );
    }
}
