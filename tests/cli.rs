mod common;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};
use predicates::prelude::*;
use predicates::str::contains;
use serde_json::Value;

fn cmd() -> Command {
    Command::cargo_bin("csv-dialect").expect("binary exists")
}

#[test]
fn read_prints_records_as_table() {
    let input = fixture_path("quoted.csv");
    let assert = cmd()
        .args(["read", "-i", input.to_str().unwrap(), "--skip-empty-rows"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("id"));
    assert!(lines[2].contains("Doe, John"));
    assert!(lines[3].contains("He said \"hi\""));
}

#[test]
fn read_emits_json_lines_with_ignored_columns_removed() {
    let input = fixture_path("test_01.csv");
    let assert = cmd()
        .args([
            "read",
            "-i",
            input.to_str().unwrap(),
            "--format",
            "json",
            "--ignore-columns",
            "b",
        ])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let records: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["a"], "1");
    assert_eq!(records[0]["c"], "3");
    assert!(records[0].get("b").is_none());
}

#[test]
fn read_respects_limit() {
    let input = fixture_path("test_05.csv");
    cmd()
        .args([
            "read",
            "-i",
            input.to_str().unwrap(),
            "--delimiter",
            "::",
            "--limit",
            "1",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(contains("Thread Started"))
        .stdout(contains("File not found").not());
}

#[test]
fn byte_order_mark_is_dropped_for_files_and_stdin() {
    let input = fixture_path("bom.csv");
    let from_file = cmd()
        .args([
            "read",
            "-i",
            input.to_str().unwrap(),
            "--format",
            "json",
            "--limit",
            "1",
        ])
        .assert()
        .success();
    let from_stdin = cmd()
        .args(["read", "-i", "-", "--format", "json", "--limit", "1"])
        .write_stdin(std::fs::read(&input).expect("read fixture"))
        .assert()
        .success();

    let file_out = String::from_utf8(from_file.get_output().stdout.clone()).expect("stdout");
    let stdin_out = String::from_utf8(from_stdin.get_output().stdout.clone()).expect("stdout");
    let record: Value = serde_json::from_str(file_out.trim()).expect("json line");
    assert_eq!(record["id"], "1");
    assert_eq!(file_out, stdin_out);
}

#[test]
fn shape_counts_rows_and_columns() {
    let input = fixture_path("test_03.csv");
    cmd()
        .args(["shape", "-i", input.to_str().unwrap(), "--delimiter", "::"])
        .assert()
        .success()
        .stdout("2x3\n");
}

#[test]
fn shape_reads_stdin() {
    cmd()
        .args(["shape", "-i", "-", "--no-header"])
        .write_stdin("1,2\n3,4\n5,6\n")
        .assert()
        .success()
        .stdout("3x2\n");
}

#[test]
fn tsv_extension_selects_tab_delimiter() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("data.tsv", "a\tb\n1\t2\n");
    cmd()
        .args(["shape", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout("1x2\n");
}

#[test]
fn convert_rewrites_under_output_dialect() {
    let workspace = TestWorkspace::new();
    let output = workspace.file("out.tsv");
    let input = fixture_path("test_05.csv");
    cmd()
        .args([
            "convert",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--delimiter",
            "::",
            "--output-dialect",
            "excel_tab",
            "--ignore-columns",
            "Log_Level",
        ])
        .assert()
        .success();

    assert_eq!(
        workspace.read("out.tsv"),
        "Thread_ID\tMessage\n1\tThread Started\n2\tThread Started\n3\tFile not found\n"
    );
}

#[test]
fn convert_without_header_writes_only_records() {
    let input = fixture_path("test_01.csv");
    cmd()
        .args([
            "convert",
            "-i",
            input.to_str().unwrap(),
            "--output-delimiter",
            "pipe",
            "--no-output-header",
        ])
        .assert()
        .success()
        .stdout("1|2|3\n4|5|6\n");
}

#[test]
fn dialects_file_adds_named_dialects() {
    let workspace = TestWorkspace::new();
    let dialects = workspace.write(
        "dialects.yaml",
        "dialects:\n  logs:\n    delimiter: \"::\"\n    skip_empty_rows: true\n",
    );
    let input = workspace.write("log.txt", "level::msg\n\nINFO::up\n\nWARN::slow\n");

    cmd()
        .args([
            "shape",
            "-i",
            input.to_str().unwrap(),
            "--dialects-file",
            dialects.to_str().unwrap(),
            "--dialect",
            "logs",
        ])
        .assert()
        .success()
        .stdout("2x2\n");

    cmd()
        .args(["dialects", "--dialects-file", dialects.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("logs"))
        .stdout(contains("excel*"));
}

#[test]
fn dialects_export_writes_yaml() {
    let workspace = TestWorkspace::new();
    let export = workspace.file("all.yaml");
    cmd()
        .args(["dialects", "--export", export.to_str().unwrap()])
        .assert()
        .success();

    let contents = workspace.read("all.yaml");
    assert!(contents.contains("excel_tab"));
    assert!(contents.contains("unix"));
}

#[test]
fn unknown_dialect_fails_with_message() {
    let input = fixture_path("test_01.csv");
    cmd()
        .args(["read", "-i", input.to_str().unwrap(), "--dialect", "nope"])
        .assert()
        .failure()
        .stderr(contains("Dialect 'nope' not found"));
}

#[test]
fn missing_input_fails() {
    cmd()
        .args(["read", "-i", "/definitely/not/here.csv"])
        .assert()
        .failure()
        .stderr(contains("Failed to open"));
}

#[test]
fn input_encoding_decodes_legacy_files() {
    let workspace = TestWorkspace::new();
    let input = workspace.file("latin1.csv");
    std::fs::write(&input, b"name\ncaf\xe9\n").expect("write latin1");
    cmd()
        .args([
            "read",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "windows-1252",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(contains("café"));
}
