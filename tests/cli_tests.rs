//! CLI smoke tests over a small record file.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

const RECORDS_TSV: &str = "\
id\ttaxonomic_unit_id\tfamily\tgenus\tspecies\tcountry\tregion\tlatitude\tlongitude\televation
R1\tBOLD:AAA0001\tFormicidae\tCamponotus\tCamponotus mirabilis\tPeru\tMadre de Dios\t-12.5\t-69.2\t310
R2\tBOLD:AAA0002\tFormicidae\t\t\tPeru\tMadre de Dios\t-12.4\t-69.1\t305
R3\tBOLD:AAA0001\t\t\t\tChile\t\t-45.0\t-72.1\t
R4\tBOLD:AAA0003\t\t\t\tChile\t\t-44.8\t-72.0\t
R5\tBOLD:AAA0004\t\t\t\tNorway\t\t65.0\t13.0\t
R6\tBOLD:AAA0005\t\t\t\t\t\t10.0\t10.0\t
";

fn records_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".tsv")
        .tempfile()
        .expect("create temp file");
    file.write_all(RECORDS_TSV.as_bytes()).expect("write records");
    file
}

#[test]
fn summary_reports_counts() {
    let file = records_file();
    Command::cargo_bin("bindiv")
        .unwrap()
        .args(["summary", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 total"))
        .stdout(predicate::str::contains("5 cleaned"))
        .stdout(predicate::str::contains("1 dropped"));
}

#[test]
fn summary_reads_stdin() {
    Command::cargo_bin("bindiv")
        .unwrap()
        .args(["summary", "-", "--format", "tsv"])
        .write_stdin(RECORDS_TSV)
        .assert()
        .success()
        .stdout(predicate::str::contains("cleaned_records\t5"));
}

#[test]
fn diversity_table_includes_zone_column() {
    let file = records_file();
    Command::cargo_bin("bindiv")
        .unwrap()
        .args([
            "diversity",
            file.path().to_str().unwrap(),
            "--min-specimens",
            "0",
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("site\tspecimen_count\trichness"))
        .stdout(predicate::str::contains("Peru"))
        .stdout(predicate::str::contains("Tropical"));
}

#[test]
fn network_counts_shared_units() {
    let file = records_file();
    // BOLD:AAA0001 occurs in both the Tropical (Peru) and Temperate
    // (Chile) zones
    Command::cargo_bin("bindiv")
        .unwrap()
        .args(["network", file.path().to_str().unwrap(), "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tropical\tTemperate\t1"));
}

#[test]
fn network_dense_keeps_zero_edges() {
    let file = records_file();
    // Three occupied zones: dense graph has 3 edges, sparse only 1
    Command::cargo_bin("bindiv")
        .unwrap()
        .args([
            "network",
            file.path().to_str().unwrap(),
            "--dense",
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tropical\tExtreme\t0"));
}

#[test]
fn accumulate_is_seed_reproducible() {
    let file = records_file();
    let run = || {
        let output = Command::cargo_bin("bindiv")
            .unwrap()
            .args([
                "accumulate",
                file.path().to_str().unwrap(),
                "--trials",
                "50",
                "--seed",
                "9",
                "--format",
                "tsv",
            ])
            .output()
            .expect("run accumulate");
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn ordinate_emits_coordinates_per_site() {
    let file = records_file();
    Command::cargo_bin("bindiv")
        .unwrap()
        .args([
            "ordinate",
            file.path().to_str().unwrap(),
            "--grouping",
            "zone",
            "--format",
            "tsv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("site\tnmds1\tnmds2"))
        .stdout(predicate::str::contains("Tropical"));
}

#[test]
fn invalid_config_is_fatal() {
    let file = records_file();
    Command::cargo_bin("bindiv")
        .unwrap()
        .args(["rarefy", file.path().to_str().unwrap(), "--points", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid point"));
}

#[test]
fn unparseable_input_is_reported() {
    let mut file = tempfile::Builder::new()
        .suffix(".tsv")
        .tempfile()
        .unwrap();
    file.write_all(b"taxonomic_unit_id\tcountry\nU1\tPeru\n")
        .unwrap();
    Command::cargo_bin("bindiv")
        .unwrap()
        .args(["summary", file.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("id"));
}
