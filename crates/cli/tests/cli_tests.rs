#![expect(clippy::unwrap_used, reason = "test code")]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_CSV: &str = "\
AREA,AREA_TITLE,AREA_TYPE,PRIM_STATE,NAICS,O_GROUP,OCC_CODE,OCC_TITLE,TOT_EMP,H_MEDIAN,A_MEDIAN
99,U.S.,1,US,000000,detailed,29-1141,Registered Nurses,\"3,282,010\",45.00,93600
48,Texas,2,TX,000000,detailed,29-1141,Registered Nurses,220000,40.10,83400
10180,\"Abilene, TX\",4,TX,000000,detailed,29-1141,Registered Nurses,1900,36.50,75920
10180,\"Abilene, TX\",4,TX,000000,major,29-0000,Healthcare Practitioners,8000,#,*
";

fn oews_atlas(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("oews-atlas").unwrap();
    cmd.arg("--db").arg(db).env("RUST_LOG", "warn");
    cmd
}

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("oes_national.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();
    path
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("oews-atlas").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Import BLS occupational wage tables"));
}

#[test]
fn test_cli_import_help() {
    let mut cmd = Command::cargo_bin("oews-atlas").unwrap();
    cmd.arg("import")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--batch-size"))
        .stdout(predicate::str::contains("--occ-prefix"));
}

#[test]
fn test_import_then_query() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data").join("atlas.db");
    let source = write_sample(&dir);

    oews_atlas(&db)
        .arg("import")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"national_created\": 1"))
        .stdout(predicate::str::contains("\"city_created\": 1"))
        .stdout(predicate::str::contains("\"rows_filtered\": 1"));

    oews_atlas(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"salary_rows\": 3"));

    oews_atlas(&db)
        .args(["lookup", "Registered Nurses", "--location", "abilene-tx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"annual_median\": 75920.0"));

    oews_atlas(&db)
        .args(["lookup", "registered-nurses", "--location", "nowhere-zz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Location not found: nowhere-zz"));

    oews_atlas(&db)
        .args(["locations", "--state", "tx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"slug\": \"abilene-tx\""))
        .stdout(predicate::str::contains("\"slug\": \"texas\""));
}

#[test]
fn test_second_import_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("atlas.db");
    let source = write_sample(&dir);

    oews_atlas(&db).arg("import").arg(&source).assert().success();
    oews_atlas(&db)
        .arg("import")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"duplicates_skipped\": 3"))
        .stdout(predicate::str::contains("\"salaries_inserted\": 0"));
}

#[test]
fn test_analyze_does_not_write() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("atlas.db");
    let source = write_sample(&dir);

    oews_atlas(&db)
        .arg("analyze")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"eligible_rows\": 3"));
    assert!(!db.exists());
}

#[test]
fn test_import_rejects_unknown_delimiter() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("atlas.db");
    let source = write_sample(&dir);

    oews_atlas(&db)
        .arg("import")
        .arg(&source)
        .args(["--delimiter", "pipe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --delimiter"));
}

#[test]
fn test_import_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("atlas.db");

    oews_atlas(&db)
        .arg("import")
        .arg(dir.path().join("absent.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}
