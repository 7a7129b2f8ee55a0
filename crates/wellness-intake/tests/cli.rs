use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const COMPLETE: &str = r#"{
  "name": "Asha Devi",
  "age": "42",
  "gender": "female",
  "contact": "9876543210",
  "address": "Ward 4",
  "emergency_contact": "9876500000",
  "blood_group": "B+",
  "visit_hours": ["morning", "weekend"],
  "services_needed": {"diagnostic": "1", "general-opd": "2"},
  "follow_up": "phone",
  "phone": "9876543210"
}"#;

fn write_answers(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write answers");
    path
}

fn intake(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wellness-intake").expect("binary");
    cmd.env("LC_ALL", "en_US.UTF-8")
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("INTAKE_GATEWAY_URL")
        .env_remove("INTAKE_GATEWAY_KEY")
        .env_remove("INTAKE_GATEWAY_TABLE")
        .env_remove("INTAKE_GATEWAY_FILE");
    cmd
}

#[test]
fn catalog_lists_numbered_questions() {
    let temp = TempDir::new().expect("tempdir");
    intake(temp.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q3 services_needed"))
        .stdout(predicate::str::contains("name - Name"));
}

#[test]
fn catalog_schema_is_json() {
    let temp = TempDir::new().expect("tempdir");
    let output = intake(temp.path())
        .args(["catalog", "--schema"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(schema["type"], "object");
    assert!(schema["properties"]["services_needed"].is_object());
}

#[test]
fn validate_fails_on_missing_fields() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "partial.json", r#"{"name":"Asha"}"#);
    intake(temp.path())
        .args(["validate", "--answers"])
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"))
        .stderr(predicate::str::contains("blood_group"));
}

#[test]
fn validate_accepts_complete_answers() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    intake(temp.path())
        .args(["validate", "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("All required fields are filled."));
}

#[test]
fn render_prints_text_report() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    intake(temp.path())
        .args(["render", "--answers"])
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Patient Questionnaire Response"))
        .stdout(predicate::str::contains("Asha Devi"))
        .stdout(predicate::str::contains("Phone / फोन: 9876543210"));
}

#[test]
fn render_writes_html_file() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    let out = temp.path().join("print").join("report.html");
    intake(temp.path())
        .args(["render", "--answers"])
        .arg(&answers)
        .args(["--format", "html", "--out"])
        .arg(&out)
        .assert()
        .success();
    let html = fs::read_to_string(&out).expect("html written");
    assert!(html.contains("question-group"));
    assert!(html.contains("Asha Devi"));
}

#[test]
fn fill_dry_run_submits_in_memory() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    intake(temp.path())
        .arg("fill")
        .arg("--answers")
        .arg(&answers)
        .args(["--dry-run", "--report", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("\"questions\""));
}

#[test]
fn fill_appends_to_file_gateway() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    let store = temp.path().join("responses.jsonl");
    intake(temp.path())
        .env("INTAKE_GATEWAY_FILE", &store)
        .arg("fill")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stderr(predicate::str::contains("Response saved."));
    let stored = fs::read_to_string(&store).expect("store written");
    let row: serde_json::Value =
        serde_json::from_str(stored.lines().next().expect("one row")).expect("row json");
    assert_eq!(row["name"], "Asha Devi");
    assert_eq!(row["visit_hours"], "[\"morning\",\"weekend\"]");
}

#[test]
fn fill_without_store_keeps_answers_for_retry() {
    let temp = TempDir::new().expect("tempdir");
    let answers = write_answers(temp.path(), "complete.json", COMPLETE);
    let kept = temp.path().join("kept.json");
    intake(temp.path())
        .arg("fill")
        .arg("--answers")
        .arg(&answers)
        .arg("--out")
        .arg(&kept)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Response not saved"));
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&kept).expect("kept")).expect("json");
    assert_eq!(saved["name"], "Asha Devi");
}

#[test]
fn fill_requires_answers_without_terminal() {
    let temp = TempDir::new().expect("tempdir");
    intake(temp.path())
        .args(["fill", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--answers"));
}

#[test]
fn interactive_fill_reads_stdin() {
    let temp = TempDir::new().expect("tempdir");
    // Personal details first; blank lines skip every optional question after them.
    let mut input = ["Ravi", "35", "1", "98", "Ward 2", "97", "1"].join("\n");
    input.push_str(&"\n".repeat(40));
    intake(temp.path())
        .args(["fill", "--interactive", "--dry-run", "--report-locale", "en"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ravi"));
}
