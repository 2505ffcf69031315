//! Readers for target and booster interval files.
//!
//! Three layouts are recognised by extension:
//!
//! | Extension | Layout | Coordinates |
//! |-----------|--------|-------------|
//! | `.interval_list` | Picard: `@` header, then `contig start end strand name` | 1-based, closed |
//! | `.bed` | `contig start end ...` | 0-based, half-open |
//! | anything else | one `contig:start-stop` or bare `contig` per line | 1-based, closed |
//!
//! A trailing `.gz` is decompressed transparently.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::core::dictionary::SequenceDictionary;
use crate::core::interval::GenomicInterval;
use crate::parsing::sam::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalFormat {
    IntervalList,
    Bed,
    Loci,
}

impl IntervalFormat {
    #[must_use]
    #[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
    pub fn from_path(path: &Path) -> Self {
        let name = path.to_string_lossy().to_lowercase();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".interval_list") {
            Self::IntervalList
        } else if name.ends_with(".bed") {
            Self::Bed
        } else {
            Self::Loci
        }
    }
}

/// Open a possibly gzip-compressed text file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = std::fs::File::open(path)?;
    let inner: Box<dyn Read> = if path.to_string_lossy().to_lowercase().ends_with(".gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(inner)))
}

/// Read intervals from a file, choosing the layout from its extension
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure or `ParseError::InvalidFormat` for
/// malformed lines (with the 1-based line number).
pub fn read_interval_file(
    path: &Path,
    dictionary: &SequenceDictionary,
) -> Result<Vec<GenomicInterval>, ParseError> {
    let reader = open_text(path)?;
    parse_intervals(reader, IntervalFormat::from_path(path), dictionary)
}

/// Parse intervals from a reader in the given layout
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for malformed lines or intervals that fall outside
/// the dictionary.
pub fn parse_intervals<R: BufRead>(
    reader: R,
    format: IntervalFormat,
    dictionary: &SequenceDictionary,
) -> Result<Vec<GenomicInterval>, ParseError> {
    let mut intervals = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        let line_num = i + 1;

        if line.trim().is_empty() || is_comment(line, format) {
            continue;
        }

        let interval = match format {
            IntervalFormat::IntervalList => parse_interval_list_line(line, line_num)?,
            IntervalFormat::Bed => parse_bed_line(line, line_num)?,
            IntervalFormat::Loci => parse_locus(line.trim(), line_num, dictionary)?,
        };
        dictionary
            .validate(&interval)
            .map_err(|e| ParseError::InvalidFormat(format!("Line {line_num}: {e}")))?;
        intervals.push(interval);
    }

    Ok(intervals)
}

fn is_comment(line: &str, format: IntervalFormat) -> bool {
    match format {
        IntervalFormat::IntervalList => line.starts_with('@') || line.starts_with('#'),
        IntervalFormat::Bed => {
            line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
        }
        IntervalFormat::Loci => line.starts_with('#'),
    }
}

fn parse_coordinate(value: &str, what: &str, line_num: usize) -> Result<u64, ParseError> {
    value.trim().replace(',', "").parse().map_err(|_| {
        ParseError::InvalidFormat(format!("Invalid {what} on line {line_num}: '{value}'"))
    })
}

fn build_interval(
    contig: &str,
    start: u64,
    stop: u64,
    line_num: usize,
) -> Result<GenomicInterval, ParseError> {
    GenomicInterval::new(contig, start, stop)
        .map_err(|e| ParseError::InvalidFormat(format!("Line {line_num}: {e}")))
}

fn parse_interval_list_line(line: &str, line_num: usize) -> Result<GenomicInterval, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has fewer than 3 fields"
        )));
    }
    let start = parse_coordinate(fields[1], "start", line_num)?;
    let stop = parse_coordinate(fields[2], "end", line_num)?;
    build_interval(fields[0], start, stop, line_num)
}

fn parse_bed_line(line: &str, line_num: usize) -> Result<GenomicInterval, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 3 {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num} has fewer than 3 fields"
        )));
    }
    let start = parse_coordinate(fields[1], "start", line_num)?;
    let end = parse_coordinate(fields[2], "end", line_num)?;
    // BED is 0-based half-open
    let start = start.checked_add(1).ok_or_else(|| {
        ParseError::InvalidFormat(format!("Line {line_num}: start {start} is out of range"))
    })?;
    build_interval(fields[0], start, end, line_num)
}

/// Parse `contig:start-stop`, `contig:pos` or a bare `contig` (whole contig)
fn parse_locus(
    text: &str,
    line_num: usize,
    dictionary: &SequenceDictionary,
) -> Result<GenomicInterval, ParseError> {
    // Contig names may themselves contain ':' (e.g. HLA alleles), so a whole-line
    // dictionary hit takes precedence.
    if let Some(length) = dictionary.length(text) {
        return build_interval(text, 1, length, line_num);
    }

    let Some((contig, range)) = text.rsplit_once(':') else {
        return Err(ParseError::InvalidFormat(format!(
            "Line {line_num}: '{text}' is not a known contig or a contig:start-stop locus"
        )));
    };

    let (start, stop) = match range.split_once('-') {
        Some((start, stop)) => (
            parse_coordinate(start, "start", line_num)?,
            parse_coordinate(stop, "stop", line_num)?,
        ),
        None => {
            let position = parse_coordinate(range, "position", line_num)?;
            (position, position)
        }
    };
    build_interval(contig, start, stop, line_num)
}

/// Sort intervals into dictionary order and merge any that overlap or abut
#[must_use]
pub fn unique_intervals(
    mut intervals: Vec<GenomicInterval>,
    dictionary: &SequenceDictionary,
) -> Vec<GenomicInterval> {
    dictionary.sort(&mut intervals);

    let mut merged: Vec<GenomicInterval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if last.overlaps(&interval) || last.abuts(&interval) => {
                last.stop = last.stop.max(interval.stop);
            }
            _ => merged.push(interval),
        }
    }
    merged
}
