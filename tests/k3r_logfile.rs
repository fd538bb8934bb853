// tests/k3r_logfile.rs

use std::fs;

use k3run::k3r::logfile::{finalize, trailer};
use regex::Regex;
use tempfile::tempdir;
use time::macros::datetime;

fn trailer_re() -> Regex {
    Regex::new(r"^\d{8}T\d{6}\.999999\|exit\|(-?\d+)$").unwrap()
}

#[test]
fn trailer_format() {
    let at = datetime!(2024-01-31 23:59:58 UTC);
    assert_eq!(trailer(at, 3).unwrap(), "20240131T235958.999999|exit|3\n");
    assert_eq!(trailer(at, -1).unwrap(), "20240131T235958.999999|exit|-1\n");
}

#[tokio::test]
async fn adds_missing_newline_before_trailer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.log");
    fs::write(&path, "line one\ncut off").unwrap();

    finalize(&path, 0).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(&lines[..2], ["line one", "cut off"]);
    let caps = trailer_re().captures(lines[2]).unwrap();
    assert_eq!(&caps[1], "0");
    assert!(content.ends_with('\n'));
}

#[tokio::test]
async fn does_not_duplicate_existing_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.log");
    fs::write(&path, "complete\n").unwrap();

    finalize(&path, 2).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(!content.contains("\n\n"));
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(&trailer_re().captures(lines[1]).unwrap()[1], "2");
}

#[tokio::test]
async fn creates_missing_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never-written.log");

    finalize(&path, -1).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert_eq!(&trailer_re().captures(content.trim_end()).unwrap()[1], "-1");
}

#[tokio::test]
async fn repeated_finalize_appends_one_trailer_each() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suite.log");

    finalize(&path, 0).await.unwrap();
    finalize(&path, 1).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let codes: Vec<String> = content
        .lines()
        .map(|l| trailer_re().captures(l).unwrap()[1].to_string())
        .collect();
    assert_eq!(codes, vec!["0", "1"]);
}

#[tokio::test]
async fn fails_when_directory_is_missing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("suite.log");
    assert!(finalize(&path, 0).await.is_err());
}
