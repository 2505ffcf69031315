use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::interval::{GenomicInterval, IntervalError};

/// Ordered contig names and lengths taken from an alignment header.
///
/// The position of a contig in the dictionary is its rank; genomic sort order is
/// (rank, start, stop).
#[derive(Debug, Clone, Default)]
pub struct SequenceDictionary {
    names: Vec<String>,
    lengths: Vec<u64>,
    ranks: HashMap<String, usize>,
}

impl SequenceDictionary {
    #[must_use]
    pub fn new(contigs: Vec<(String, u64)>) -> Self {
        let mut dict = Self::default();
        for (name, length) in contigs {
            dict.push(name, length);
        }
        dict
    }

    /// Build the dictionary from the `@SQ` lines of a SAM/BAM header
    #[must_use]
    pub fn from_header(header: &noodles::sam::Header) -> Self {
        let contigs = header
            .reference_sequences()
            .iter()
            .map(|(name, map)| (name.to_string(), map.length().get() as u64))
            .collect();
        Self::new(contigs)
    }

    fn push(&mut self, name: String, length: u64) {
        // First definition wins if a header repeats a name
        if self.ranks.contains_key(&name) {
            return;
        }
        self.ranks.insert(name.clone(), self.names.len());
        self.names.push(name);
        self.lengths.push(length);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn rank(&self, contig: &str) -> Option<usize> {
        self.ranks.get(contig).copied()
    }

    #[must_use]
    pub fn name(&self, rank: usize) -> Option<&str> {
        self.names.get(rank).map(String::as_str)
    }

    #[must_use]
    pub fn length(&self, contig: &str) -> Option<u64> {
        self.rank(contig).map(|rank| self.lengths[rank])
    }

    /// Check that an interval lies on a known contig and within its bounds
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::UnknownContig` or `IntervalError::BeyondContigEnd`.
    pub fn validate(&self, interval: &GenomicInterval) -> Result<(), IntervalError> {
        let length = self
            .length(&interval.contig)
            .ok_or_else(|| IntervalError::UnknownContig(interval.contig.clone()))?;
        if interval.stop > length {
            return Err(IntervalError::BeyondContigEnd {
                contig: interval.contig.clone(),
                start: interval.start,
                stop: interval.stop,
                length,
            });
        }
        Ok(())
    }

    /// Compare two intervals in genomic order. Contigs missing from the
    /// dictionary sort after all known contigs, by name.
    #[must_use]
    pub fn compare(&self, a: &GenomicInterval, b: &GenomicInterval) -> Ordering {
        let rank_a = self.rank(&a.contig).unwrap_or(usize::MAX);
        let rank_b = self.rank(&b.contig).unwrap_or(usize::MAX);
        rank_a
            .cmp(&rank_b)
            .then_with(|| a.contig.cmp(&b.contig))
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.stop.cmp(&b.stop))
    }

    /// Sort intervals into genomic order
    pub fn sort(&self, intervals: &mut [GenomicInterval]) {
        intervals.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict() -> SequenceDictionary {
        SequenceDictionary::new(vec![
            ("chr2".to_string(), 5000),
            ("chr1".to_string(), 10000),
        ])
    }

    #[test]
    fn test_rank_follows_header_order() {
        let dict = dict();
        assert_eq!(dict.rank("chr2"), Some(0));
        assert_eq!(dict.rank("chr1"), Some(1));
        assert_eq!(dict.rank("chrM"), None);
        assert_eq!(dict.name(1), Some("chr1"));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_validate() {
        let dict = dict();
        assert!(dict
            .validate(&GenomicInterval::new("chr1", 1, 10000).unwrap())
            .is_ok());
        assert!(matches!(
            dict.validate(&GenomicInterval::new("chr1", 9990, 10001).unwrap()),
            Err(IntervalError::BeyondContigEnd { length: 10000, .. })
        ));
        assert!(matches!(
            dict.validate(&GenomicInterval::new("chrX", 1, 10).unwrap()),
            Err(IntervalError::UnknownContig(_))
        ));
    }

    #[test]
    fn test_sort_uses_dictionary_order() {
        let dict = dict();
        let mut intervals = vec![
            GenomicInterval::new("chr1", 50, 60).unwrap(),
            GenomicInterval::new("chr2", 500, 600).unwrap(),
            GenomicInterval::new("chr1", 10, 20).unwrap(),
            GenomicInterval::new("chr2", 100, 200).unwrap(),
        ];
        dict.sort(&mut intervals);

        let locations: Vec<String> = intervals.iter().map(ToString::to_string).collect();
        assert_eq!(
            locations,
            vec!["chr2:100-200", "chr2:500-600", "chr1:10-20", "chr1:50-60"]
        );
    }
}
