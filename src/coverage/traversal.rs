use std::collections::VecDeque;
use std::io;
use std::iter::Peekable;

use thiserror::Error;
use tracing::debug;

use crate::core::dictionary::SequenceDictionary;
use crate::core::interval::{GenomicInterval, IntervalError};
use crate::core::read::AlignedRead;

#[derive(Error, Debug)]
pub enum TraversalError {
    #[error("IO error reading alignments: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error("Alignments are not coordinate sorted: read at {contig}:{position} follows {previous_contig}:{previous_position}")]
    Unsorted {
        contig: String,
        position: u64,
        previous_contig: String,
        previous_position: u64,
    },
}

/// The reads whose aligned span covers a single reference position
pub struct Pileup<'a> {
    pub contig_id: usize,
    pub position: u64,
    window: &'a [AlignedRead],
}

impl<'a> Pileup<'a> {
    pub fn reads(&self) -> impl Iterator<Item = &'a AlignedRead> + 'a {
        let position = self.position;
        self.window.iter().filter(move |read| read.covers(position))
    }
}

/// Coordinate-ordered read stream that rejects out-of-order input
struct SortedReads<'d, I: Iterator> {
    inner: Peekable<I>,
    dictionary: &'d SequenceDictionary,
    last: Option<(usize, u64)>,
}

impl<'d, I> SortedReads<'d, I>
where
    I: Iterator<Item = io::Result<AlignedRead>>,
{
    fn new(inner: I, dictionary: &'d SequenceDictionary) -> Self {
        Self {
            inner: inner.peekable(),
            dictionary,
            last: None,
        }
    }

    /// Take the next read if it satisfies `accept`; read errors are always surfaced
    fn next_if(
        &mut self,
        mut accept: impl FnMut(&AlignedRead) -> bool,
    ) -> Result<Option<AlignedRead>, TraversalError> {
        let next = self.inner.next_if(|item| match item {
            Ok(read) => accept(read),
            Err(_) => true,
        });
        let Some(read) = next.transpose()? else {
            return Ok(None);
        };

        let key = (read.contig_id, read.start);
        if let Some(last) = self.last {
            if key < last {
                return Err(TraversalError::Unsorted {
                    contig: self.contig_name(read.contig_id),
                    position: read.start,
                    previous_contig: self.contig_name(last.0),
                    previous_position: last.1,
                });
            }
        }
        self.last = Some(key);
        Ok(Some(read))
    }

    fn contig_name(&self, contig_id: usize) -> String {
        self.dictionary
            .name(contig_id)
            .map_or_else(|| format!("#{contig_id}"), str::to_string)
    }
}

/// Walk every locus of every target and reduce the per-locus pileups into one summary
/// per target.
///
/// Targets are validated against the dictionary and visited in genomic order. For each
/// locus, `on_locus` receives the pileup and the accumulator of the target being
/// traversed; each target starts from `S::default()`. The returned collection holds one
/// `(target, summary)` pair per target in traversal order, and is complete only once
/// every target has been visited.
///
/// `reads` must be coordinate sorted in dictionary order.
///
/// # Errors
///
/// Returns `TraversalError::Interval` for targets outside the dictionary,
/// `TraversalError::Unsorted` if the reads are out of order, or `TraversalError::Io`
/// if reading fails.
pub fn reduce_by_interval<S, I, F>(
    reads: I,
    targets: &[GenomicInterval],
    dictionary: &SequenceDictionary,
    mut on_locus: F,
) -> Result<Vec<(GenomicInterval, S)>, TraversalError>
where
    S: Default,
    I: IntoIterator<Item = io::Result<AlignedRead>>,
    F: FnMut(&Pileup<'_>, &mut S),
{
    let mut targets = targets.to_vec();
    for target in &targets {
        dictionary.validate(target)?;
    }
    dictionary.sort(&mut targets);

    let mut reads = SortedReads::new(reads.into_iter(), dictionary);
    let mut window: VecDeque<AlignedRead> = VecDeque::new();
    let mut window_contig = None;
    let mut results = Vec::with_capacity(targets.len());
    let mut loci = 0u64;

    for target in targets {
        let contig_id = dictionary
            .rank(&target.contig)
            .ok_or_else(|| IntervalError::UnknownContig(target.contig.clone()))?;

        if window_contig != Some(contig_id) {
            window.clear();
            window_contig = Some(contig_id);
        }

        // Pull everything that starts at or before the end of this target, discarding
        // reads on earlier contigs
        while let Some(read) = reads.next_if(|read| {
            read.contig_id < contig_id || (read.contig_id == contig_id && read.start <= target.stop)
        })? {
            if read.contig_id == contig_id {
                window.push_back(read);
            }
        }
        window.retain(|read| read.end >= target.start);

        let overlapping = window.make_contiguous();
        let mut summary = S::default();
        for position in target.start..=target.stop {
            let pileup = Pileup {
                contig_id,
                position,
                window: overlapping,
            };
            on_locus(&pileup, &mut summary);
        }

        loci += target.len();
        results.push((target, summary));
    }

    debug!(targets = results.len(), loci, "Traversal complete");
    Ok(results)
}
