//! End-to-end tests driving the `hybsel-stats` binary on small on-disk fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:200\n";

/// Positions 11-20 are GCGCATATAT, everything else is A
fn reference_sequence() -> String {
    format!("{}GCGCATATAT{}", "A".repeat(10), "A".repeat(180))
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let sequence = reference_sequence();
        fs::write(dir.path().join("ref.fa"), format!(">chr1\n{sequence}\n")).unwrap();
        fs::write(
            dir.path().join("ref.fa.fai"),
            format!("chr1\t{len}\t6\t{len}\t{}\n", sequence.len() + 1, len = sequence.len()),
        )
        .unwrap();
        fs::write(
            dir.path().join("targets.interval_list"),
            format!("{HEADER}chr1\t11\t20\t+\tt1\nchr1\t101\t110\t+\tt2\n"),
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a SAM file from (flag, pos, mapq) triples; every read is 10M
    fn write_sam(&self, name: &str, reads: &[(u16, u64, u8)]) -> PathBuf {
        let mut text = HEADER.to_string();
        for (i, (flag, pos, mapq)) in reads.iter().enumerate() {
            text.push_str(&format!(
                "r{i}\t{flag}\tchr1\t{pos}\t{mapq}\t10M\t*\t0\t0\tACGTACGTAC\t*\n"
            ));
        }
        let path = self.path(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn command(&self, sam: &Path) -> Command {
        let mut cmd = Command::cargo_bin("hybsel-stats").unwrap();
        cmd.arg("report")
            .arg("-I")
            .arg(sam)
            .arg("-L")
            .arg(self.path("targets.interval_list"))
            .arg("-R")
            .arg(self.path("ref.fa"));
        cmd
    }
}

fn standard_reads() -> Vec<(u16, u64, u8)> {
    vec![
        (0, 11, 60),
        (16, 11, 60),
        (0, 11, 60),
        // Duplicate, excluded by default
        (1024, 11, 60),
        // Unmapped-quality read, excluded by the default MAPQ threshold
        (0, 11, 0),
    ]
}

fn report_lines(output: &[u8]) -> Vec<String> {
    String::from_utf8(output.to_vec())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_tsv_report() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    let output = fixture.command(&sam).assert().success().get_output().stdout.clone();
    let lines = report_lines(&output);

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("location\tlength\tgc\tavg_coverage\tnormalized_coverage"));
    assert!(lines[0].ends_with("bases_over_30x\tgene_name"));
    // The targets lie within 500 bases of each other, so neither is freestanding
    assert_eq!(
        lines[1],
        "chr1:11-20\t10\t0.4000\t3.0000\t1.0000\t1\t0\t0\t10\t0\t0\t0\tUNKNOWN"
    );
    assert_eq!(
        lines[2],
        "chr1:101-110\t10\t0.0000\t0.0000\t0.0000\t0\t0\t0\t0\t0\t0\t0\tUNKNOWN"
    );
}

#[test]
fn test_filters_are_configurable() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    let output = fixture
        .command(&sam)
        .arg("--include-duplicates")
        .arg("--min-mapq")
        .arg("0")
        .arg("--free-standing-distance")
        .arg("50")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lines = report_lines(&output);

    assert_eq!(
        lines[1],
        "chr1:11-20\t10\t0.4000\t5.0000\t1.0000\t1\t1\t0\t10\t0\t0\t0\tUNKNOWN"
    );
}

#[test]
fn test_boosters_and_gene_names() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    // 0-based half-open: chr1:121-130, starting 11 bases after the second target ends
    fs::write(fixture.path("boosters.bed"), "chr1\t120\t130\n").unwrap();
    fs::write(
        fixture.path("refGene.txt"),
        "0\tNM_0001\tchr1\t+\t5\t30\t5\t30\t1\t5,\t30,\t0\tGENE1\tcmpl\tcmpl\t0,\n",
    )
    .unwrap();

    let output = fixture
        .command(&sam)
        .arg("--booster")
        .arg(fixture.path("boosters.bed"))
        .arg("--booster-distance")
        .arg("20")
        .arg("--refseq")
        .arg(fixture.path("refGene.txt"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let lines = report_lines(&output);

    let first: Vec<&str> = lines[1].split('\t').collect();
    let second: Vec<&str> = lines[2].split('\t').collect();
    assert_eq!(first[7], "0");
    assert_eq!(first[12], "GENE1");
    assert_eq!(second[7], "1");
    assert_eq!(second[12], "UNKNOWN");
}

#[test]
fn test_no_reads_reports_nan() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("empty.sam", &[]);

    fixture
        .command(&sam)
        .assert()
        .success()
        .stdout(predicate::str::contains("chr1:11-20\t10\t0.4000\t0.0000\tNaN"))
        .stderr(predicate::str::contains("normalized coverage is undefined"));
}

#[test]
fn test_json_output() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    let output = fixture
        .command(&sam)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(value["mean_target_coverage"], 3.0);
    assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    assert_eq!(value["rows"][0]["location"], "chr1:11-20");
    assert_eq!(value["rows"][0]["bases_over_2x"], 10);
}

#[test]
fn test_output_file() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());
    let out = fixture.path("report.tsv");

    fixture
        .command(&sam)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_downsampling_everything_is_reproducible() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    let run = || {
        fixture
            .command(&sam)
            .arg("--downsample-fraction")
            .arg("1.0")
            .arg("--seed")
            .arg("7")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    let first = run();
    assert_eq!(first, run());
    assert!(String::from_utf8(first)
        .unwrap()
        .contains("chr1:11-20\t10\t0.4000\t3.0000"));
}

#[test]
fn test_invalid_downsample_fraction_is_rejected() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());

    fixture
        .command(&sam)
        .arg("--downsample-fraction")
        .arg("1.5")
        .assert()
        .failure();
}

#[test]
fn test_unsorted_reads_fail() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("unsorted.sam", &[(0, 50, 60), (0, 11, 60)]);

    fixture
        .command(&sam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not coordinate sorted"));
}

#[test]
fn test_target_on_unknown_contig_fails() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());
    fs::write(
        fixture.path("targets.interval_list"),
        format!("{HEADER}chr9\t11\t20\t+\tt1\n"),
    )
    .unwrap();

    fixture
        .command(&sam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chr9"));
}

#[test]
fn test_missing_reference_index_fails() {
    let fixture = Fixture::new();
    let sam = fixture.write_sam("reads.sam", &standard_reads());
    fs::remove_file(fixture.path("ref.fa.fai")).unwrap();

    fixture
        .command(&sam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open reference"));
}

#[test]
fn test_target_missing_from_reference_fails() {
    let fixture = Fixture::new();
    // The alignments know chr2 but ref.fa only holds chr1
    let header = "@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:200\n@SQ\tSN:chr2\tLN:200\n";
    let sam = fixture.path("reads.sam");
    fs::write(
        &sam,
        format!("{header}r0\t0\tchr1\t11\t60\t10M\t*\t0\t0\tACGTACGTAC\t*\n"),
    )
    .unwrap();
    fs::write(
        fixture.path("targets.interval_list"),
        format!("{header}chr1\t11\t20\t+\tt1\nchr2\t11\t20\t+\tt2\n"),
    )
    .unwrap();

    fixture
        .command(&sam)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not fit the reference"))
        .stderr(predicate::str::contains("chr2"));
}
