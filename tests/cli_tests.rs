use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    Command::cargo_bin("hexcheck").unwrap()
}

fn hex_file(content: &str) -> NamedTempFile {
    let mut temp = tempfile::Builder::new().suffix(".hex").tempfile().unwrap();
    temp.write_all(content.as_bytes()).unwrap();
    temp.flush().unwrap();
    temp
}

#[test]
fn clean_file_exits_zero() {
    let file = hex_file(":0100000001FE\n:00000001FF\n");
    cmd()
        .arg("-f")
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("Checksum line 2: OK"));
}

#[test]
fn fail_fast_reports_one_error() {
    let file = hex_file(":0400000C01020304EE\n:0100010002FF\n:00000001FF\n");
    cmd()
        .arg("-f")
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(contains("Checksum line 1: failed, expected 0xE2, obtained 0xEE"))
        .stdout(contains("line 2").not());
}

#[test]
fn verbose_reports_total() {
    let file = hex_file(":0400000C01020304EE\n:0100010002FF\n");
    cmd()
        .args(["-v", "-f"])
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(contains("Total errors: 3"));
}

#[test]
fn json_output() {
    let file = hex_file("");
    cmd()
        .args(["--json", "-f"])
        .arg(file.path())
        .assert()
        .code(1)
        .stdout(contains("\"missing_eof\""));
}

#[test]
fn missing_file_exits_two() {
    cmd()
        .args(["-f", "/nonexistent/firmware.hex"])
        .assert()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn no_input_is_a_usage_error() {
    cmd().assert().failure();
}
