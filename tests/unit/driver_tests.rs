//! End-to-end tests of the `lob_feed` CLI binary against real files.

use std::io::Write as _;
use std::process::Command;

fn lob_feed_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lob_feed")
}

fn write_feed(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp feed file");
    file.write_all(contents.as_bytes()).expect("write feed contents");
    file
}

#[test]
fn well_formed_feed_exits_zero_and_prints_nan_then_mid() {
    let feed = write_feed("A,1,B,1,1000\nA,2,S,1,1010\n");
    let output = Command::new(lob_feed_bin())
        .arg(feed.path())
        .output()
        .expect("run lob_feed");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("NAN"));
    assert!(stdout.contains("1005"));
    assert!(stdout.contains("Buys:"));
    assert!(stdout.contains("Sells:"));
}

#[test]
fn malformed_line_is_counted_and_exit_code_is_nonzero() {
    let feed = write_feed("not,a,valid,line\nA,1,B,1,1000\n");
    let output = Command::new(lob_feed_bin())
        .arg(feed.path())
        .output()
        .expect("run lob_feed");
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Corrupted messages: 1") || stdout.contains("Out of bounds"));
}

#[test]
fn silent_mode_suppresses_live_output_but_still_prints_the_error_summary() {
    let feed = write_feed("A,1,B,1,1000\nA,2,S,1,1010\n");
    let output = Command::new(lob_feed_bin())
        .arg(feed.path())
        .arg("silent")
        .output()
        .expect("run lob_feed");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("NAN"));
    assert!(stdout.contains("Unexpected exception: 0"));
}

#[test]
fn unreadable_file_exits_nonzero() {
    let output = Command::new(lob_feed_bin())
        .arg("/nonexistent/path/to/a/feed/file")
        .output()
        .expect("run lob_feed");
    assert!(!output.status.success());
}

#[test]
fn json_flag_prints_the_summary_as_json() {
    let feed = write_feed("A,1,B,1,1000\nA,2,S,1,1010\n");
    let output = Command::new(lob_feed_bin())
        .arg(feed.path())
        .arg("silent")
        .arg("--json")
        .output()
        .expect("run lob_feed");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"corrupted\""));
    assert!(stdout.contains("\"unexpected_exception\": 0"));
}

#[test]
fn invalid_second_positional_argument_is_a_usage_error() {
    let feed = write_feed("A,1,B,1,1000\n");
    let output = Command::new(lob_feed_bin())
        .arg(feed.path())
        .arg("loud")
        .output()
        .expect("run lob_feed");
    assert!(!output.status.success());
}
