use std::collections::HashMap;

use rust_lapper::{Interval, Lapper};

use crate::core::interval::GenomicInterval;

/// Overlap lookup over a fixed set of intervals, padded on both sides by a slop distance.
///
/// A stored interval `[s, e]` occupies `[s - slop, e + slop]`, so a query hits it when
/// the query overlaps it or lies within `slop` bases of either end. Queries are not padded.
///
/// Each contig is a [`Lapper`] over half-open padded bounds whose values index into the
/// payload list.
#[derive(Debug)]
pub struct OverlapIndex<T> {
    slop: u64,
    contigs: HashMap<String, Lapper<u64, usize>>,
    payloads: Vec<T>,
}

impl<T> OverlapIndex<T> {
    pub fn new<I>(slop: u64, entries: I) -> Self
    where
        I: IntoIterator<Item = (GenomicInterval, T)>,
    {
        let mut by_contig: HashMap<String, Vec<Interval<u64, usize>>> = HashMap::new();
        let mut payloads = Vec::new();
        for (interval, payload) in entries {
            by_contig
                .entry(interval.contig.clone())
                .or_default()
                .push(Interval {
                    start: interval.start.saturating_sub(slop),
                    // Closed stop to half-open
                    stop: interval.stop.saturating_add(slop).saturating_add(1),
                    val: payloads.len(),
                });
            payloads.push(payload);
        }

        let contigs = by_contig
            .into_iter()
            .map(|(contig, intervals)| (contig, Lapper::new(intervals)))
            .collect();

        Self {
            slop,
            contigs,
            payloads,
        }
    }

    /// Payloads of every stored entry whose padded interval intersects `query`,
    /// in order of padded start
    #[must_use]
    pub fn overlaps(&self, query: &GenomicInterval) -> Vec<&T> {
        self.contigs
            .get(&query.contig)
            .map(|lapper| {
                lapper
                    .find(query.start, query.stop.saturating_add(1))
                    .map(|hit| &self.payloads[hit.val])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of stored entries whose padded interval intersects `query`.
    ///
    /// Cost does not depend on how long the stored intervals are.
    #[must_use]
    pub fn count(&self, query: &GenomicInterval) -> usize {
        self.contigs.get(&query.contig).map_or(0, |lapper| {
            lapper.count(query.start, query.stop.saturating_add(1))
        })
    }

    #[must_use]
    pub fn slop(&self) -> u64 {
        self.slop
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl OverlapIndex<GenomicInterval> {
    /// Index intervals using each interval as its own payload
    pub fn from_intervals<'a, I>(slop: u64, intervals: I) -> Self
    where
        I: IntoIterator<Item = &'a GenomicInterval>,
    {
        Self::new(
            slop,
            intervals
                .into_iter()
                .map(|interval| (interval.clone(), interval.clone())),
        )
    }
}
