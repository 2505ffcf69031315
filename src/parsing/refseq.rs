//! Parser for UCSC refGene annotation tables.
//!
//! Columns (tab separated):
//! `bin name chrom strand txStart txEnd cdsStart cdsEnd exonCount exonStarts exonEnds score name2 ...`
//!
//! Coordinates are 0-based half-open and are converted to 1-based closed intervals.
//! The gene name is taken from `name2`.

use std::io::BufRead;
use std::path::Path;

use crate::core::interval::GenomicInterval;
use crate::parsing::intervals::open_text;
use crate::parsing::sam::ParseError;

const MIN_FIELDS: usize = 13;

/// One transcript from an annotation track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    /// Transcript span
    pub interval: GenomicInterval,
    pub exons: Vec<GenomicInterval>,
    pub transcript_id: String,
    pub gene_name: String,
}

impl AnnotationRecord {
    /// True if `query` shares at least one base with any exon of this transcript
    #[must_use]
    pub fn overlaps_exon(&self, query: &GenomicInterval) -> bool {
        self.exons.iter().any(|exon| exon.overlaps(query))
    }
}

/// Read a refGene table (optionally gzip-compressed)
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure or `ParseError::InvalidFormat` for
/// malformed lines.
pub fn read_refseq_file(path: &Path) -> Result<Vec<AnnotationRecord>, ParseError> {
    parse_refseq(open_text(path)?)
}

/// Parse refGene records from a reader
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for malformed lines.
pub fn parse_refseq<R: BufRead>(reader: R) -> Result<Vec<AnnotationRecord>, ParseError> {
    let mut records = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(parse_refseq_line(&line, i + 1)?);
    }

    Ok(records)
}

fn parse_refseq_line(line: &str, line_num: usize) -> Result<AnnotationRecord, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has {} fields, expected at least {MIN_FIELDS}",
            fields.len()
        )));
    }

    let contig = fields[2];
    let tx_start = parse_u64(fields[4], "txStart", line_num)?;
    let tx_end = parse_u64(fields[5], "txEnd", line_num)?;
    let interval = to_interval(contig, tx_start, tx_end, line_num)?;

    let exon_count: usize = fields[8].trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid exonCount on line {line_num}: '{}'",
            fields[8]
        ))
    })?;
    let exon_starts = parse_list(fields[9], "exonStarts", line_num)?;
    let exon_ends = parse_list(fields[10], "exonEnds", line_num)?;

    if exon_starts.len() != exon_count || exon_ends.len() != exon_count {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num}: exonCount is {exon_count} but found {} starts and {} ends",
            exon_starts.len(),
            exon_ends.len()
        )));
    }

    let exons = exon_starts
        .into_iter()
        .zip(exon_ends)
        .map(|(start, end)| to_interval(contig, start, end, line_num))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnnotationRecord {
        interval,
        exons,
        transcript_id: fields[1].to_string(),
        gene_name: fields[12].to_string(),
    })
}

fn parse_u64(value: &str, what: &str, line_num: usize) -> Result<u64, ParseError> {
    value.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid {what} on line {line_num}: '{value}'"))
    })
}

/// Parse a comma-separated coordinate list; UCSC lists carry a trailing comma
fn parse_list(value: &str, what: &str, line_num: usize) -> Result<Vec<u64>, ParseError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_u64(s, what, line_num))
        .collect()
}

fn to_interval(
    contig: &str,
    start: u64,
    end: u64,
    line_num: usize,
) -> Result<GenomicInterval, ParseError> {
    let start = start.checked_add(1).ok_or_else(|| {
        ParseError::InvalidFormat(format!("Line {line_num}: start {start} is out of range"))
    })?;
    GenomicInterval::new(contig, start, end)
        .map_err(|e| ParseError::InvalidFormat(format!("Line {line_num}: {e}")))
}
