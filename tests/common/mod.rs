use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::*;

pub fn mediamover() -> Command {
    Command::cargo_bin("mediamover").unwrap()
}

/// A source folder holding a couple of files, and an empty target path.
pub fn setup_source_and_target(temp_dir: &TempDir) -> (ChildPath, ChildPath) {
    let source = temp_dir.child("source");
    source.child("IMG_0001.jpg").write_str("not really a jpeg").unwrap();
    source.child("clip.mov").write_str("not really a movie").unwrap();
    (source, temp_dir.child("target"))
}
