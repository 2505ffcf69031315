use std::io::{self, Write};

use crate::report::generator::{CoverageReport, TargetRow};

/// Column header of the TSV report
pub const TSV_HEADER: &str = "location\tlength\tgc\tavg_coverage\tnormalized_coverage\thit_twice\tfreestanding\tboosted\tbases_over_2x\tbases_over_10x\tbases_over_20x\tbases_over_30x\tgene_name";

fn flag(value: bool) -> u8 {
    u8::from(value)
}

fn format_row(row: &TargetRow) -> String {
    let normalized = row
        .normalized_coverage
        .map_or_else(|| "NaN".to_string(), |value| format!("{value:.4}"));

    format!(
        "{}\t{}\t{:.4}\t{:.4}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        row.location,
        row.length,
        row.gc,
        row.avg_coverage,
        normalized,
        flag(row.hit_twice),
        flag(row.freestanding),
        flag(row.boosted),
        row.bases_over_2x,
        row.bases_over_10x,
        row.bases_over_20x,
        row.bases_over_30x,
        row.gene_name,
    )
}

/// Write the header line followed by one line per target
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_tsv<W: Write>(writer: &mut W, report: &CoverageReport) -> io::Result<()> {
    writeln!(writer, "{TSV_HEADER}")?;
    for row in &report.rows {
        writeln!(writer, "{}", format_row(row))?;
    }
    writer.flush()
}

/// Write the report as pretty-printed JSON
///
/// # Errors
///
/// Returns an error if serialization or the writer fails.
pub fn write_json<W: Write>(writer: &mut W, report: &CoverageReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    writer.flush()
}
