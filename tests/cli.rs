// E2E tests for the mediamover command line
use assert_fs::prelude::*;
use predicates::prelude::*;

mod common;
use common::{mediamover, setup_source_and_target};

#[test]
fn test_version_flag() {
    for flag in ["-v", "--version"] {
        mediamover()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains("mediamover"));
    }
}

#[test]
fn test_empty_date_range_is_rejected() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["copy", "image"])
        .arg(source.path())
        .arg(target.path())
        .args(["--before", "2000-01-01", "--after", "2000-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Date range is invalid"))
        .stdout(predicate::str::contains("Scanned").not());

    target.assert(predicate::path::missing());
    source.child("IMG_0001.jpg").assert(predicate::path::exists());
}

#[test]
fn test_inverted_date_range_is_rejected() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["move", "video"])
        .arg(source.path())
        .arg(target.path())
        .args(["-b", "1999-12-31", "-a", "2000-1-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Date range is invalid"));

    source.child("clip.mov").assert(predicate::path::exists());
}

#[test]
fn test_malformed_date_is_a_usage_error() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["copy", "image"])
        .arg(source.path())
        .arg(target.path())
        .args(["--after", "last tuesday"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_command_is_rejected() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["delete", "image"])
        .arg(source.path())
        .arg(target.path())
        .assert()
        .code(2);
}

#[test]
fn test_declined_cleanup_confirmation_aborts() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["copy", "image"])
        .arg(source.path())
        .arg(target.path())
        .arg("--rmcrptpic")
        .write_stdin("n\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Are you sure you want to delete corrupted files?"))
        .stderr(predicate::str::contains("Operation aborted."));

    target.assert(predicate::path::missing());
    source.child("IMG_0001.jpg").assert(predicate::path::exists());
}

#[test]
fn test_missing_source_directory_is_fatal() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let target = temp_dir.child("target");

    mediamover()
        .args(["copy", "video"])
        .arg(temp_dir.child("does_not_exist").path())
        .arg(target.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source directory not found"));

    target.assert(predicate::path::missing());
}

#[test]
fn test_source_must_be_a_directory() {
    let temp_dir = assert_fs::TempDir::new().unwrap();
    let (source, target) = setup_source_and_target(&temp_dir);

    mediamover()
        .args(["copy", "image"])
        .arg(source.child("IMG_0001.jpg").path())
        .arg(target.path())
        .arg("--dryrun")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}
