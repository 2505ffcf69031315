use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid interval {contig}:{start}-{stop}: start must be >= 1 and <= stop")]
    InvalidBounds { contig: String, start: u64, stop: u64 },

    #[error("Contig '{0}' is not present in the sequence dictionary")]
    UnknownContig(String),

    #[error("Interval {contig}:{start}-{stop} extends past the end of the contig (length {length})")]
    BeyondContigEnd {
        contig: String,
        start: u64,
        stop: u64,
        length: u64,
    },
}

/// A genomic interval with 1-based, fully closed coordinates.
///
/// Build values with [`GenomicInterval::new`], which enforces `1 <= start <= stop`. The
/// fields stay public for reading and for merging neighbours in place; code that writes
/// them must keep `start <= stop`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicInterval {
    pub contig: String,
    pub start: u64,
    pub stop: u64,
}

#[allow(clippy::len_without_is_empty)] // A valid interval always covers at least one base
impl GenomicInterval {
    /// Create a new interval, rejecting `start == 0` and `start > stop`
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::InvalidBounds` if the coordinates are not a valid
    /// 1-based closed range.
    pub fn new(contig: impl Into<String>, start: u64, stop: u64) -> Result<Self, IntervalError> {
        let contig = contig.into();
        if start == 0 || start > stop {
            return Err(IntervalError::InvalidBounds {
                contig,
                start,
                stop,
            });
        }
        Ok(Self {
            contig,
            start,
            stop,
        })
    }

    /// Number of bases covered (`stop - start + 1`); an inverted literal counts as one base
    #[must_use]
    pub fn len(&self) -> u64 {
        self.stop.saturating_sub(self.start) + 1
    }

    /// True if the two intervals share at least one base on the same contig
    #[must_use]
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.contig == other.contig && self.start <= other.stop && self.stop >= other.start
    }

    /// True if `other` begins on the base immediately after this interval ends (or vice versa)
    #[must_use]
    pub fn abuts(&self, other: &GenomicInterval) -> bool {
        self.contig == other.contig
            && (self.stop + 1 == other.start || other.stop + 1 == self.start)
    }
}

impl std::fmt::Display for GenomicInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_inclusive() {
        let interval = GenomicInterval::new("chr1", 100, 199).unwrap();
        assert_eq!(interval.len(), 100);

        let single = GenomicInterval::new("chr1", 5, 5).unwrap();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn test_inverted_literal_length_does_not_underflow() {
        let inverted = GenomicInterval {
            contig: "chr1".to_string(),
            start: 200,
            stop: 100,
        };
        assert_eq!(inverted.len(), 1);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(matches!(
            GenomicInterval::new("chr1", 200, 100),
            Err(IntervalError::InvalidBounds { .. })
        ));
        assert!(GenomicInterval::new("chr1", 0, 10).is_err());
    }

    #[test]
    fn test_overlaps_requires_same_contig() {
        let a = GenomicInterval::new("chr1", 100, 200).unwrap();
        let b = GenomicInterval::new("chr1", 200, 300).unwrap();
        let c = GenomicInterval::new("chr2", 100, 200).unwrap();
        let d = GenomicInterval::new("chr1", 201, 300).unwrap();

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
        assert!(a.abuts(&d));
        assert!(d.abuts(&a));
        assert!(!a.abuts(&b));
    }

    #[test]
    fn test_display_location() {
        let interval = GenomicInterval::new("chr1", 100, 199).unwrap();
        assert_eq!(interval.to_string(), "chr1:100-199");
    }
}
