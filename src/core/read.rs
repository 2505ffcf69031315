use noodles::sam::alignment::record::{Flags, MappingQuality};

/// The parts of an alignment record needed to build pileups and apply read filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedRead {
    /// Rank of the reference sequence in the alignment header
    pub contig_id: usize,

    /// 1-based alignment start
    pub start: u64,

    /// 1-based, inclusive alignment end
    pub end: u64,

    pub flags: Flags,

    /// `None` when the mapping quality is unavailable (255)
    pub mapping_quality: Option<MappingQuality>,
}

impl AlignedRead {
    /// True if the read's aligned span includes `position`
    #[must_use]
    pub fn covers(&self, position: u64) -> bool {
        self.start <= position && position <= self.end
    }

    /// Mapping quality as a number; an unavailable quality reads as 255
    #[must_use]
    pub fn mapq(&self) -> u8 {
        self.mapping_quality.map_or(u8::MAX, |mq| mq.get())
    }
}
