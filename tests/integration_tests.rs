//! Integration tests for the SCT CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get an sct command
fn sct() -> Command {
    Command::cargo_bin("sct").unwrap()
}

/// Sample feedback export with Japanese headers and a duplicated student
const SAMPLE_CSV: &str = "\
氏名,理解度,コメント\n\
田中太郎,85,田中太郎は集中して取り組めた\n\
山田花子,90,元気です\n\
山田花子,,頑張った\n";

fn write_sample(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("input.csv");
    fs::write(&path, SAMPLE_CSV).unwrap();
    path
}

fn session_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("session.json")
}

fn run_mask(dir: &TempDir, input: &Path) -> std::path::PathBuf {
    let masked = dir.path().join("masked.csv");
    sct()
        .current_dir(dir.path())
        .args([
            "mask",
            input.to_str().unwrap(),
            "-o",
            masked.to_str().unwrap(),
            "--session",
            session_path(dir).to_str().unwrap(),
        ])
        .assert()
        .success();
    masked
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    sct()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mask"))
        .stdout(predicate::str::contains("unmask"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_displays() {
    sct()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.2"));
}

#[test]
fn test_completions_generate() {
    sct()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sct"));
}

// ============================================================================
// Mask Command
// ============================================================================

#[test]
fn test_mask_writes_tokens_and_session() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    let masked = run_mask(&tmp, &input);

    let content = fs::read_to_string(&masked).unwrap();
    assert!(content.contains("Person_1"));
    assert!(content.contains("Person_2"));
    assert!(!content.contains("田中太郎"));
    assert!(!content.contains("山田花子"));
    // duplicate rows merged: header + 2 students
    assert_eq!(content.lines().count(), 3);
    // merged comments are space-joined
    assert!(content.contains("元気です 頑張った"));

    let session = fs::read_to_string(session_path(&tmp)).unwrap();
    assert!(session.contains("田中太郎"));
    assert!(session.contains("Person_1"));
}

#[test]
fn test_mask_reads_stdin_and_writes_stdout() {
    let tmp = TempDir::new().unwrap();
    sct()
        .current_dir(tmp.path())
        .args(["mask", "--session", session_path(&tmp).to_str().unwrap()])
        .write_stdin(SAMPLE_CSV)
        .assert()
        .success()
        .stdout(predicate::str::contains("Person_1"))
        .stdout(predicate::str::contains("名前,理解度,コメント"));
}

#[test]
fn test_mask_rejects_header_only_input() {
    let tmp = TempDir::new().unwrap();
    sct()
        .current_dir(tmp.path())
        .arg("mask")
        .write_stdin("氏名,コメント\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one data row"));
}

#[test]
fn test_mask_rejects_empty_input() {
    let tmp = TempDir::new().unwrap();
    sct()
        .current_dir(tmp.path())
        .arg("mask")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No CSV data"));
}

#[test]
fn test_mask_missing_file_errors() {
    sct()
        .args(["mask", "/nonexistent/input.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// ============================================================================
// Unmask Command
// ============================================================================

#[test]
fn test_mask_then_unmask_round_trips() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    let masked = run_mask(&tmp, &input);

    let output = sct()
        .current_dir(tmp.path())
        .args([
            "unmask",
            masked.to_str().unwrap(),
            "--session",
            session_path(&tmp).to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("田中太郎,85,田中太郎は集中して取り組めた"));
    assert!(stdout.contains("山田花子,90,元気です 頑張った"));
    assert!(!stdout.contains("Person_"));
}

#[test]
fn test_unmask_generated_output() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    run_mask(&tmp, &input);

    // Simulate LLM output that references the tokens, without spaces
    let generated = "名前,AIコメント\nPerson_1,Person_1さんは今週も優秀でした\n";
    sct()
        .current_dir(tmp.path())
        .args(["unmask", "--session", session_path(&tmp).to_str().unwrap()])
        .write_stdin(generated)
        .assert()
        .success()
        .stdout(predicate::str::contains("田中太郎,田中太郎さんは今週も優秀でした"));
}

#[test]
fn test_unmask_falls_back_to_plain_text() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    run_mask(&tmp, &input);

    // Single line: not tabular, so the text fallback applies
    sct()
        .current_dir(tmp.path())
        .args(["unmask", "--session", session_path(&tmp).to_str().unwrap()])
        .write_stdin("Person_1 は今週も優秀でした")
        .assert()
        .success()
        .stdout(predicate::str::contains("田中太郎 は今週も優秀でした"));
}

#[test]
fn test_unmask_without_session_errors() {
    let tmp = TempDir::new().unwrap();
    sct()
        .current_dir(tmp.path())
        .args(["unmask", "--session", session_path(&tmp).to_str().unwrap()])
        .write_stdin("名前,AIコメント\nPerson_1,hi\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load masking session"));
}

// ============================================================================
// Generate Command (mock provider)
// ============================================================================

#[test]
fn test_generate_mock_single_row() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    let masked = run_mask(&tmp, &input);

    let output = sct()
        .current_dir(tmp.path())
        .env("SCT_PROVIDER", "mock")
        .args(["generate", masked.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("名前,AIコメント"));
    // first data row is processed, the rest marked not-processed
    assert!(stdout.contains("Person_1"));
    assert!(stdout.contains("未実施"));
    // masked names flow into the mock template untouched
    assert!(stdout.contains("Person_1さん"));
}

#[test]
fn test_generate_mock_all_rows() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    let masked = run_mask(&tmp, &input);

    let output = sct()
        .current_dir(tmp.path())
        .env("SCT_PROVIDER", "mock")
        .args(["generate", masked.to_str().unwrap(), "--all"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("未実施"));
    assert!(stdout.contains("Person_1さん"));
    assert!(stdout.contains("Person_2さん"));
}

#[test]
fn test_generate_rejects_header_only_input() {
    sct()
        .env("SCT_PROVIDER", "mock")
        .arg("generate")
        .write_stdin("名前,理解度,コメント\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one data row"));
}

#[test]
fn test_full_pipeline_mask_generate_unmask() {
    let tmp = TempDir::new().unwrap();
    let input = write_sample(&tmp);
    let masked = run_mask(&tmp, &input);
    let generated = tmp.path().join("generated.csv");

    sct()
        .current_dir(tmp.path())
        .env("SCT_PROVIDER", "mock")
        .args([
            "generate",
            masked.to_str().unwrap(),
            "--all",
            "-o",
            generated.to_str().unwrap(),
        ])
        .assert()
        .success();

    let output = sct()
        .current_dir(tmp.path())
        .args([
            "unmask",
            generated.to_str().unwrap(),
            "--session",
            session_path(&tmp).to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("田中太郎さん"));
    assert!(stdout.contains("山田花子さん"));
    assert!(!stdout.contains("Person_"));
}

// ============================================================================
// Inspect Command
// ============================================================================

#[test]
fn test_inspect_shows_roles() {
    sct()
        .arg("inspect")
        .write_stdin(SAMPLE_CSV)
        .assert()
        .success()
        .stdout(predicate::str::contains("name"))
        .stdout(predicate::str::contains("understanding"))
        .stdout(predicate::str::contains("comment"));
}

#[test]
fn test_inspect_empty_input_errors() {
    sct()
        .arg("inspect")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No CSV data"));
}

// ============================================================================
// Memo Command
// ============================================================================

#[test]
fn test_memo_add_list_edit_delete() {
    let tmp = TempDir::new().unwrap();
    let memo = tmp.path().join("memo.json");
    let memo_arg = memo.to_str().unwrap();

    sct()
        .args(["memo", "add", "買い物リストを作る", "--file", memo_arg])
        .assert()
        .success();
    sct()
        .args(["memo", "add", "second note", "--file", memo_arg])
        .assert()
        .success();

    sct()
        .args(["memo", "list", "--file", memo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("買い物リストを作る"))
        .stdout(predicate::str::contains("#2"));

    sct()
        .args(["memo", "edit", "1", "updated note", "--file", memo_arg])
        .assert()
        .success();
    sct()
        .args(["memo", "delete", "2", "--force", "--file", memo_arg])
        .assert()
        .success();

    sct()
        .args(["memo", "list", "--file", memo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated note"))
        .stdout(predicate::str::contains("#1"))
        .stdout(predicate::str::contains("second note").not());
}

#[test]
fn test_memo_delete_out_of_range_errors() {
    let tmp = TempDir::new().unwrap();
    let memo = tmp.path().join("memo.json");

    sct()
        .args(["memo", "delete", "5", "--force", "--file", memo.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No message #5"));
}

#[test]
fn test_memo_clear() {
    let tmp = TempDir::new().unwrap();
    let memo = tmp.path().join("memo.json");
    let memo_arg = memo.to_str().unwrap();

    sct()
        .args(["memo", "add", "temp", "--file", memo_arg])
        .assert()
        .success();
    sct()
        .args(["memo", "clear", "--force", "--file", memo_arg])
        .assert()
        .success();
    sct()
        .args(["memo", "list", "--file", memo_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("No messages."));
}
