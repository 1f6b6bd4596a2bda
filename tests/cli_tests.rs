//! Integration tests for the runtime-log binary

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn runtime_log(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("runtime-log");
    cmd.current_dir(dir)
        .env_remove("RUNTIME_LOG_PATH")
        .env_remove("RUNTIME_LOG_MAX_RECORDS");
    cmd
}

#[test]
fn test_record_creates_default_file_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .args(["record", "b_spec.rb=40000", "a_spec.rb=60000"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("spec_runtime_log.tsv"));

    let log = fs::read_to_string(dir.path().join("spec_runtime_log.tsv")).unwrap();
    assert_eq!(log, "a_spec.rb\t60000\nb_spec.rb\t40000\n");
}

#[test]
fn test_record_rotates_history_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("spec_runtime_log.tsv"),
        "a_spec.rb\t30000\t40000\nc_spec.rb\tna\t60000\n",
    )
    .unwrap();

    runtime_log(dir.path())
        .args(["-n", "2", "record", "a_spec.rb=60000"])
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("spec_runtime_log.tsv")).unwrap();
    assert_eq!(log, "a_spec.rb\t60000\t30000\n");
}

#[test]
fn test_record_sums_repeated_files() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .args(["record", "a_spec.rb=60000", "a_spec.rb=40000"])
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("spec_runtime_log.tsv")).unwrap();
    assert_eq!(log, "a_spec.rb\t100000\n");
}

#[test]
fn test_explicit_output_beats_environment() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .env("RUNTIME_LOG_PATH", "from_env.tsv")
        .args(["record", "-o", "specified_log_file.tsv", "a_spec.rb=1"])
        .assert()
        .success();

    assert!(dir.path().join("specified_log_file.tsv").is_file());
    assert!(!dir.path().join("from_env.tsv").exists());
    assert!(!dir.path().join("spec_runtime_log.tsv").exists());
}

#[test]
fn test_environment_overrides() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("from_env.tsv"), "a_spec.rb\t1\t2\t3\n").unwrap();

    runtime_log(dir.path())
        .env("RUNTIME_LOG_PATH", "from_env.tsv")
        .env("RUNTIME_LOG_MAX_RECORDS", "2")
        .args(["record", "a_spec.rb=9"])
        .assert()
        .success();

    let log = fs::read_to_string(dir.path().join("from_env.tsv")).unwrap();
    assert_eq!(log, "a_spec.rb\t9\t1\n");
}

#[test]
fn test_invalid_max_records_env_fails() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .env("RUNTIME_LOG_MAX_RECORDS", "zero")
        .args(["record", "a_spec.rb=9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("RUNTIME_LOG_MAX_RECORDS"));

    assert!(!dir.path().join("spec_runtime_log.tsv").exists());
}

#[test]
fn test_corrupt_history_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec_runtime_log.tsv");
    fs::write(&path, "a_spec.rb\t10\nb_spec.rb\tslow\n").unwrap();

    runtime_log(dir.path())
        .args(["record", "a_spec.rb=9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "a_spec.rb\t10\nb_spec.rb\tslow\n"
    );
}

#[test]
fn test_reset_corrupt_overwrites_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec_runtime_log.tsv");
    fs::write(&path, "a_spec.rb\t10\nb_spec.rb\tslow\n").unwrap();

    runtime_log(dir.path())
        .args(["record", "--reset-corrupt", "a_spec.rb=9"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).unwrap(), "a_spec.rb\t9\n");
}

#[test]
fn test_show_text_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec_runtime_log.tsv");
    fs::write(&path, "b_spec.rb\tna\t5\na_spec.rb\t7\tna\n").unwrap();

    runtime_log(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout("a_spec.rb\t7\tna\nb_spec.rb\tna\t5\n");

    let output = runtime_log(dir.path())
        .args(["show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["file"], "a_spec.rb");
    assert_eq!(value[0]["slots"], serde_json::json!([7, null]));

    // show never rewrites the file
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "b_spec.rb\tna\t5\na_spec.rb\t7\tna\n"
    );
}

#[test]
fn test_show_without_history_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert!(!dir.path().join("spec_runtime_log.tsv").exists());
}

#[test]
fn test_time_runs_command_per_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_spec.rb"), "").unwrap();
    fs::write(dir.path().join("b_spec.rb"), "").unwrap();

    runtime_log(dir.path())
        .args(["time", "-c", "test -f {} && echo ran {}", "a_spec.rb", "b_spec.rb"])
        .assert()
        .success()
        .stdout("ran a_spec.rb\nran b_spec.rb\n");

    let log = fs::read_to_string(dir.path().join("spec_runtime_log.tsv")).unwrap();
    let files: Vec<_> = log
        .lines()
        .map(|line| line.split('\t').next().unwrap())
        .collect();
    assert_eq!(files, ["a_spec.rb", "b_spec.rb"]);
}

#[test]
fn test_time_failure_still_records() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .args(["time", "-c", "test -f {}", "missing_spec.rb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 commands failed"));

    let log = fs::read_to_string(dir.path().join("spec_runtime_log.tsv")).unwrap();
    assert!(log.starts_with("missing_spec.rb\t"));
}

#[test]
fn test_debug_flag_emits_tracing() {
    let dir = tempfile::tempdir().unwrap();

    runtime_log(dir.path())
        .args(["--debug", "record", "a_spec.rb=1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"))
        .stderr(predicate::str::contains("wrote runtime history"));
}
