mod common;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

use common::{SMALL_SCHEMA, TestWorkspace};

fn cmd() -> Command {
    Command::cargo_bin("xlsx-reorder").expect("binary exists")
}

#[test]
fn valid_file_passes_without_report_rows() {
    let ws = TestWorkspace::new();
    let schema = ws.write("schema.yaml", SMALL_SCHEMA);
    let input = ws.write_xlsx(
        "enero.xlsx",
        &["NOMBRE_CLIENTE", "N_MUESTRA", "ESTADO_REPORTE", "PRODUCTO"],
        &[&["ACME Mining", "S-001", "Normal", "Mobil DTE 25"]],
    );
    let reports = ws.path().join("reports");

    cmd()
        .args(["check", "-i"])
        .arg(&input)
        .arg("--schema")
        .arg(&schema)
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .success();

    assert!(!reports.join("missing.csv").exists());
    assert!(!reports.join("drift.csv").exists());
}

#[test]
fn missing_required_column_fails_and_is_itemized() {
    let ws = TestWorkspace::new();
    let schema = ws.write("schema.yaml", SMALL_SCHEMA);
    // PRODUCTO absent from the header row entirely.
    let input = ws.write_xlsx(
        "enero.xlsx",
        &["NOMBRE_CLIENTE", "N_MUESTRA", "ESTADO_REPORTE"],
        &[&["ACME Mining", "S-001", "Normal"]],
    );
    let reports = ws.path().join("reports");

    cmd()
        .args(["check", "-i"])
        .arg(&input)
        .arg("--schema")
        .arg(&schema)
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .failure()
        .stdout(contains("enero.xlsx").and(contains("PRODUCTO")))
        .stderr(contains("1 required column(s) missing"));

    let missing = std::fs::read_to_string(reports.join("missing.csv")).expect("missing.csv");
    assert_eq!(missing.lines().count(), 2, "header plus exactly one row");
    assert!(missing.contains("\"enero.xlsx\",\"PRODUCTO\""));
}

#[test]
fn misplaced_header_is_reported_but_not_fatal() {
    let ws = TestWorkspace::new();
    let schema = ws.write("schema.yaml", SMALL_SCHEMA);
    // NOMBRE_CLIENTE expected at A but sitting at B.
    let input = ws.write_xlsx(
        "enero.xlsx",
        &["N_MUESTRA", "NOMBRE_CLIENTE", "ESTADO_REPORTE", "PRODUCTO"],
        &[&["S-001", "ACME Mining", "Normal", "Mobil DTE 25"]],
    );
    let reports = ws.path().join("reports");

    cmd()
        .args(["check", "-i"])
        .arg(&input)
        .arg("--schema")
        .arg(&schema)
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .success()
        .stdout(contains("NOMBRE_CLIENTE"));

    let drift = std::fs::read_to_string(reports.join("drift.csv")).expect("drift.csv");
    assert!(drift.contains("\"NOMBRE_CLIENTE\",\"A\",\"N_MUESTRA\",\"B\""));
}

#[test]
fn unreadable_file_is_recorded_without_aborting_siblings() {
    let ws = TestWorkspace::new();
    let schema = ws.write("schema.yaml", SMALL_SCHEMA);
    let good = ws.write_xlsx(
        "bueno.xlsx",
        &["NOMBRE_CLIENTE", "N_MUESTRA", "ESTADO_REPORTE", "PRODUCTO"],
        &[&["ACME Mining", "S-001", "Normal", "Mobil DTE 25"]],
    );
    let broken = ws.write("roto.xlsx", "this is not a zip container");
    let reports = ws.path().join("reports");

    cmd()
        .args(["check", "-i"])
        .arg(&good)
        .arg("-i")
        .arg(&broken)
        .arg("--schema")
        .arg(&schema)
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .failure()
        .stderr(contains("roto.xlsx").and(contains("1 file(s) could not be read")));

    let read_errors =
        std::fs::read_to_string(reports.join("read_errors.csv")).expect("read_errors.csv");
    assert!(read_errors.contains("roto.xlsx"));
    assert!(!reports.join("missing.csv").exists());
}
