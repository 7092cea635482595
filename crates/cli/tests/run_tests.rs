// Integration tests for `serialsync run|validate|normalize|init`.
// Run with: cargo test -p serialsync-cli --test run_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{tempdir, TempDir};

fn serialsync(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_serialsync"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    serialsync(dir).args(args).output().expect("spawn serialsync")
}

/// ERP and WMS exports covering every classification.
fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("erp.csv"),
        "Serial,Location,Device\n\
         A1,Retail Floor,Handheld\n\
         A2,QUAR-BIN-3,Printer\n\
         A3,Repair,Tablet\n\
         ,Triage,Orphan\n\
         A2,Triage,Duplicate\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("wms.csv"),
        "Serial,Location,Device\n\
         A2,Quarantine Area,PR-1\n\
         A3,Triage,TB-1\n\
         A4,,Scanner\n",
    )
    .unwrap();
    dir
}

fn report_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_writes_sorted_csv_report() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "report.csv", "--no-progress"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    assert_eq!(
        report_lines(&dir.path().join("report.csv")),
        vec![
            "Device,Serial,ERP Location,WMS Location,Status",
            "Handheld,A1,Retail,,Not Synced",
            "Printer,A2,Quar,Quar,Synced",
            "Tablet,A3,Repair,Triage,Not Synced",
            "Scanner,A4,,,Synced",
        ]
    );

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("4 serials: 2 synced, 2 not synced"), "stderr: {stderr}");
}

#[test]
fn run_xlsx_report() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "Serial_Report.xlsx", "--no-progress"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let rows = serialsync_io::read_report(&dir.path().join("Serial_Report.xlsx")).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].serial, "A2");
    assert_eq!(rows[1].device, "Printer");
}

#[test]
fn run_from_config_resolves_relative_paths() {
    let dir = fixture();
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(
        dir.path().join("conf/serialsync.toml"),
        r#"
name = "Fixture"

[sources.erp]
file = "../erp.csv"

[sources.wms]
file = "../wms.csv"

[policy]
absent = "not_synced"
device = "wms"

[output]
file = "../out.csv"
"#,
    )
    .unwrap();

    let out = run_in(dir.path(), &["run", "-c", "conf/serialsync.toml", "--no-progress"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let lines = report_lines(&dir.path().join("out.csv"));
    assert_eq!(lines[2], "PR-1,A2,Quar,Quar,Synced");
    // A4 is WMS-only: strict policy flags it
    assert_eq!(lines[4], "Scanner,A4,,,Not Synced");
}

#[test]
fn run_json_to_stdout() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "r.csv", "--json", "--no-progress"],
    );
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON on stdout");
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["summary"]["erp_duplicates"], 1);
    assert_eq!(json["records"][0]["serial"], "A1");
    assert_eq!(json["meta"]["absent_policy"], "match_empty");
}

#[test]
fn run_print_lists_records() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "r.csv", "--print", "--no-progress"],
    );
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("=== Final Results ==="));
    assert!(stdout.contains("Device: Handheld | Serial: A1 | ERP: Retail | WMS:  | Status: Not Synced"));
}

#[test]
fn run_limit_truncates_sources() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "r.csv", "--limit", "1", "--no-progress"],
    );
    assert!(out.status.success());

    // ERP keeps A1, WMS keeps A2
    let lines = report_lines(&dir.path().join("r.csv"));
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "PR-1,A2,,Quar,Not Synced");
}

#[test]
fn run_fail_on_mismatch_exit_code() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "r.csv", "--fail-on-mismatch", "--no-progress"],
    );
    assert_eq!(out.status.code(), Some(6));
    // The report is still written
    assert!(dir.path().join("r.csv").exists());
}

#[test]
fn run_missing_source_aborts_before_writing() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "missing.xlsx", "--wms", "wms.csv", "-o", "r.csv", "--no-progress"],
    );
    assert_eq!(out.status.code(), Some(3));
    assert!(!dir.path().join("r.csv").exists());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ERP source"), "stderr: {stderr}");
}

#[test]
fn run_default_paths_missing() {
    let dir = tempdir().unwrap();
    let out = run_in(dir.path(), &["run", "--no-progress"]);
    assert_eq!(out.status.code(), Some(3));
    assert!(!dir.path().join("Serial_Report.xlsx").exists());
}

#[test]
fn run_unwritable_report() {
    let dir = fixture();
    let out = run_in(
        dir.path(),
        &["run", "--erp", "erp.csv", "--wms", "wms.csv", "-o", "no_such_dir/r.csv", "--no-progress"],
    );
    assert_eq!(out.status.code(), Some(4));
}

// ---------------------------------------------------------------------------
// validate / normalize / init
// ---------------------------------------------------------------------------

#[test]
fn init_then_validate() {
    let dir = tempdir().unwrap();

    let out = run_in(dir.path(), &["init"]);
    assert!(out.status.success());
    assert!(dir.path().join("serialsync.toml").exists());

    let again = run_in(dir.path(), &["init"]);
    assert_eq!(again.status.code(), Some(2));

    let out = run_in(dir.path(), &["validate", "serialsync.toml"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stderr).contains("config OK"));
}

#[test]
fn validate_rejects_bad_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("bad.toml"), "[sources.erp]\nfile = \"erp.csv\"\n").unwrap();

    let out = run_in(dir.path(), &["validate", "bad.toml"]);
    assert_eq!(out.status.code(), Some(5));
}

#[test]
fn normalize_prints_categories() {
    let dir = tempdir().unwrap();
    let out = run_in(dir.path(), &["normalize", "Retail Floor", "QUAR-BIN-3", "Dock 4", "sub retail"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Retail Floor\tRetail",
            "QUAR-BIN-3\tQuar",
            "Dock 4\tDOCK 4",
            "sub retail\tRetail",
        ]
    );
}
