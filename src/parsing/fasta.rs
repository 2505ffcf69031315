//! Random access to an indexed FASTA reference using noodles.
//!
//! The reference must be uncompressed and have a `.fai` index next to it
//! (`reference.fa` → `reference.fa.fai`).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use noodles::core::{Position, Region};
use noodles::fasta;

use crate::core::interval::{GenomicInterval, IntervalError};
use crate::parsing::sam::ParseError;

/// An open, indexed FASTA file
pub struct IndexedReference {
    reader: fasta::io::IndexedReader<BufReader<File>>,
    lengths: HashMap<String, u64>,
}

/// Path of the `.fai` index for a FASTA file
#[must_use]
pub fn fai_path(path: &Path) -> PathBuf {
    let mut fai = path.as_os_str().to_owned();
    fai.push(".fai");
    PathBuf::from(fai)
}

impl IndexedReference {
    /// Open a FASTA file and its `.fai` index
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if either file cannot be opened,
    /// `ParseError::UnsupportedFormat` for compressed FASTA, or `ParseError::Noodles`
    /// if the index cannot be parsed.
    #[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let lowercase = path.to_string_lossy().to_lowercase();
        if lowercase.ends_with(".gz") || lowercase.ends_with(".bgz") {
            return Err(ParseError::UnsupportedFormat(format!(
                "compressed reference {} (decompress and index with samtools faidx)",
                path.display()
            )));
        }

        let index_path = fai_path(path);
        let index_reader = File::open(&index_path).map(BufReader::new).map_err(|e| {
            ParseError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {e}", index_path.display()),
            ))
        })?;
        let index = fasta::fai::io::Reader::new(index_reader)
            .read_index()
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FAI file: {e}")))?;

        let lengths = index
            .as_ref()
            .iter()
            .map(|record| {
                (
                    String::from_utf8_lossy(record.name()).to_string(),
                    record.length(),
                )
            })
            .collect();

        let reader = File::open(path)
            .map(BufReader::new)
            .map(|inner| fasta::io::IndexedReader::new(inner, index))?;

        Ok(Self { reader, lengths })
    }

    /// Length of a contig, if the reference contains it
    #[must_use]
    pub fn contig_length(&self, contig: &str) -> Option<u64> {
        self.lengths.get(contig).copied()
    }

    /// Check that an interval lies on a contig of this reference and within its length
    ///
    /// # Errors
    ///
    /// Returns `IntervalError::UnknownContig` or `IntervalError::BeyondContigEnd`.
    pub fn validate(&self, interval: &GenomicInterval) -> Result<(), IntervalError> {
        let length = self
            .contig_length(&interval.contig)
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

    /// Fetch the bases spanning an interval
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Interval` if the contig is missing or the interval runs past
    /// its end, or `ParseError::Io` on read failure.
    pub fn subsequence(&mut self, interval: &GenomicInterval) -> Result<Vec<u8>, ParseError> {
        self.validate(interval)?;

        let start = to_position(interval.start)?;
        let end = to_position(interval.stop)?;
        let region = Region::new(interval.contig.as_str(), start..=end);

        let record = self.reader.query(&region)?;
        Ok(record.sequence().as_ref().to_vec())
    }
}

fn to_position(value: u64) -> Result<Position, ParseError> {
    usize::try_from(value)
        .ok()
        .and_then(Position::new)
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid position: {value}")))
}
