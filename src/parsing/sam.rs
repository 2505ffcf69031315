use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use noodles::sam;
use thiserror::Error;

use crate::core::dictionary::SequenceDictionary;
use crate::core::interval::IntervalError;
use crate::core::read::AlignedRead;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Interval(#[from] IntervalError),
}

/// Stream of reads pulled from an alignment file
pub type ReadStream = Box<dyn Iterator<Item = io::Result<AlignedRead>>>;

/// An opened alignment file: its sequence dictionary and a stream of its placed reads
pub struct AlignmentSource {
    pub dictionary: SequenceDictionary,
    pub reads: ReadStream,
}

/// Open a SAM or BAM file for streaming.
///
/// The format is chosen by extension; anything other than `.sam` is read as BAM.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, `ParseError::Noodles` if the
/// header cannot be parsed, or `ParseError::UnsupportedFormat` for CRAM input.
pub fn open_alignments(path: &Path) -> Result<AlignmentSource, ParseError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("sam") => open_sam(path),
        Some("cram") => Err(ParseError::UnsupportedFormat(
            "CRAM input is not supported; convert to BAM first".to_string(),
        )),
        _ => open_bam(path),
    }
}

fn open_sam(path: &Path) -> Result<AlignmentSource, ParseError> {
    let mut reader = File::open(path)
        .map(BufReader::new)
        .map(sam::io::Reader::new)?;

    let header = reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))?;
    let dictionary = SequenceDictionary::from_header(&header);

    let mut record = sam::Record::default();
    let reads = std::iter::from_fn(move || loop {
        match reader.read_record(&mut record) {
            Ok(0) => return None,
            Ok(_) => match summarize(&record, &header) {
                Ok(Some(read)) => return Some(Ok(read)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            },
            Err(e) => return Some(Err(e)),
        }
    });

    Ok(AlignmentSource {
        dictionary,
        reads: Box::new(reads),
    })
}

fn open_bam(path: &Path) -> Result<AlignmentSource, ParseError> {
    use noodles::bam;

    let mut reader = File::open(path).map(bam::io::Reader::new)?;

    let header = reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))?;
    let dictionary = SequenceDictionary::from_header(&header);

    let mut record = bam::Record::default();
    let reads = std::iter::from_fn(move || loop {
        match reader.read_record(&mut record) {
            Ok(0) => return None,
            Ok(_) => match summarize(&record, &header) {
                Ok(Some(read)) => return Some(Ok(read)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            },
            Err(e) => return Some(Err(e)),
        }
    });

    Ok(AlignmentSource {
        dictionary,
        reads: Box::new(reads),
    })
}

/// Reduce an alignment record to an [`AlignedRead`].
///
/// Returns `Ok(None)` for records that are not placed on a reference sequence.
fn summarize<R>(record: &R, header: &sam::Header) -> io::Result<Option<AlignedRead>>
where
    R: sam::alignment::Record,
{
    let Some(contig_id) = record.reference_sequence_id(header).transpose()? else {
        return Ok(None);
    };
    let Some(start) = record.alignment_start().transpose()? else {
        return Ok(None);
    };

    let start = start.get() as u64;
    // Placed-but-unmapped records have no aligned span
    let end = match record.alignment_end().transpose() {
        Ok(Some(end)) => (end.get() as u64).max(start),
        Ok(None) | Err(_) => start,
    };

    Ok(Some(AlignedRead {
        contig_id,
        start,
        end,
        flags: record.flags()?,
        mapping_quality: record.mapping_quality().transpose()?,
    }))
}
