use crate::core::read::AlignedRead;

/// Read inclusion rules applied when counting depth at a locus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthFilter {
    /// Reads below this mapping quality are ignored
    pub min_mapq: u8,

    /// Count reads flagged as PCR/optical duplicates
    pub include_duplicates: bool,
}

impl Default for DepthFilter {
    fn default() -> Self {
        Self {
            min_mapq: 1,
            include_duplicates: false,
        }
    }
}

impl DepthFilter {
    /// Should this read contribute to depth
    #[must_use]
    pub fn accepts(&self, read: &AlignedRead) -> bool {
        let flags = read.flags;
        if flags.is_secondary() || flags.is_supplementary() || flags.is_unmapped() {
            return false;
        }
        if flags.is_duplicate() && !self.include_duplicates {
            return false;
        }
        read.mapq() >= self.min_mapq
    }

    /// Number of accepted reads among those covering a locus
    #[must_use]
    pub fn depth<'a, I>(&self, reads: I) -> u32
    where
        I: IntoIterator<Item = &'a AlignedRead>,
    {
        let count = reads.into_iter().filter(|read| self.accepts(read)).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }
}
