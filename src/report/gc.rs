use crate::core::interval::GenomicInterval;
use crate::parsing::fasta::IndexedReference;
use crate::parsing::sam::ParseError;

/// Something that can hand out reference bases for an interval
pub trait ReferenceSource {
    /// Bases spanning `interval`, one byte per base
    ///
    /// # Errors
    ///
    /// Returns an error if the bases cannot be read.
    fn fetch(&mut self, interval: &GenomicInterval) -> Result<Vec<u8>, ParseError>;
}

impl ReferenceSource for IndexedReference {
    fn fetch(&mut self, interval: &GenomicInterval) -> Result<Vec<u8>, ParseError> {
        self.subsequence(interval)
    }
}

/// Fraction of bases that are G or C, ignoring case
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gc_fraction(bases: &[u8]) -> f64 {
    if bases.is_empty() {
        return 0.0;
    }
    let gc = bases
        .iter()
        .filter(|b| matches!(b, b'G' | b'g' | b'C' | b'c'))
        .count();
    gc as f64 / bases.len() as f64
}

/// GC fraction of the reference bases under `interval`
///
/// # Errors
///
/// Returns an error if the reference cannot supply the interval.
pub fn interval_gc<R: ReferenceSource + ?Sized>(
    reference: &mut R,
    interval: &GenomicInterval,
) -> Result<f64, ParseError> {
    let bases = reference.fetch(interval)?;
    Ok(gc_fraction(&bases))
}
