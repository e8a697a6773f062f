// Library-level runs of the filter and dispatch engine over real folders,
// with metadata served from memory instead of exiftool/ffprobe.
use assert_fs::TempDir;
use assert_fs::prelude::*;
use mediamover::mediamover_core::exif::EXIFTOOL_PROFILE;
use mediamover::mediamover_core::{
    Action, DispatchOptions, Engine, FieldProfile, FileError, FilterCriteria, MediaKind,
    MetadataExtractor, RawMetadata, RunStats,
};
use predicates::prelude::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::Path;
use time::macros::date;

/// Serves canned exiftool-style metadata by file name. Unknown files are unreadable.
#[derive(Default)]
struct CannedExtractor {
    files: HashMap<String, Value>,
}

impl CannedExtractor {
    fn with(mut self, name: &str, metadata: Value) -> Self {
        self.files.insert(name.to_string(), metadata);
        self
    }
}

impl MetadataExtractor for CannedExtractor {
    fn extract(&mut self, path: &Path) -> Result<RawMetadata, FileError> {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.files
            .get(&name)
            .cloned()
            .map(RawMetadata::from_value)
            .ok_or_else(|| FileError::Extraction {
                path: path.to_path_buf(),
                reason: "Unknown file type".to_string(),
            })
    }

    fn profile(&self) -> &'static FieldProfile {
        &EXIFTOOL_PROFILE
    }
}

fn mixed_source(temp_dir: &TempDir) -> (assert_fs::fixture::ChildPath, CannedExtractor) {
    let source = temp_dir.child("source");
    source.child("GOPR0001.mp4").write_str("video").unwrap();
    source.child("IMG_0001.heic").write_str("image").unwrap();
    source.child("IMG_0002.jpg").write_str("garbage").unwrap();

    let extractor = CannedExtractor::default()
        .with(
            "GOPR0001.mp4",
            json!({
                "File:MIMEType": "video/mp4",
                "QuickTime:Model": "GoPro",
                "QuickTime:CreateDate": "2021:01:01 09:00:00"
            }),
        )
        .with(
            "IMG_0001.heic",
            json!({
                "File:MIMEType": "image/heic",
                "EXIF:Model": "iPhone XS",
                "EXIF:CreateDate": "2022:06:01 14:15:16"
            }),
        );

    (source, extractor)
}

#[test]
fn test_copy_images_by_camera_and_date() {
    let temp_dir = TempDir::new().unwrap();
    let (source, extractor) = mixed_source(&temp_dir);
    let target = temp_dir.child("dest");

    let criteria = FilterCriteria::new(
        MediaKind::Image,
        Some("XS".to_string()),
        None,
        Some(date!(2022-01-01)),
    )
    .unwrap();
    let options = DispatchOptions {
        action: Action::Copy,
        target_dir: target.path().to_path_buf(),
        dry_run: false,
        remove_corrupted: false,
    };

    let stats = Engine::new(criteria, options, extractor)
        .run(source.path(), false)
        .unwrap();

    assert_eq!(stats, RunStats { scanned: 3, identified: 1, handled: 1 });
    target.child("IMG_0001.heic").assert("image");
    target.child("GOPR0001.mp4").assert(predicate::path::missing());
    target.child("IMG_0002.jpg").assert(predicate::path::missing());
    source.child("IMG_0001.heic").assert("image");
}

#[test]
fn test_move_videos() {
    let temp_dir = TempDir::new().unwrap();
    let (source, extractor) = mixed_source(&temp_dir);
    let target = temp_dir.child("dest");

    let criteria = FilterCriteria::new(MediaKind::Video, None, Some(date!(2022-01-01)), None).unwrap();
    let options = DispatchOptions {
        action: Action::Move,
        target_dir: target.path().to_path_buf(),
        dry_run: false,
        remove_corrupted: false,
    };

    let stats = Engine::new(criteria, options, extractor)
        .run(source.path(), false)
        .unwrap();

    assert_eq!(stats, RunStats { scanned: 3, identified: 1, handled: 1 });
    source.child("GOPR0001.mp4").assert(predicate::path::missing());
    target.child("GOPR0001.mp4").assert("video");
}

#[test]
fn test_dry_run_never_mutates() {
    let temp_dir = TempDir::new().unwrap();
    let (source, extractor) = mixed_source(&temp_dir);
    let target = temp_dir.child("dest");

    let criteria = FilterCriteria::new(MediaKind::Image, None, None, None).unwrap();
    let options = DispatchOptions {
        action: Action::Move,
        target_dir: target.path().to_path_buf(),
        dry_run: true,
        remove_corrupted: true,
    };

    let stats = Engine::new(criteria, options, extractor)
        .run(source.path(), true)
        .unwrap();

    assert_eq!(stats, RunStats { scanned: 3, identified: 1, handled: 0 });
    target.assert(predicate::path::missing());
    source.child("GOPR0001.mp4").assert("video");
    source.child("IMG_0001.heic").assert("image");
    source.child("IMG_0002.jpg").assert("garbage");
}

#[test]
fn test_counters_stay_ordered() {
    let temp_dir = TempDir::new().unwrap();
    let (source, extractor) = mixed_source(&temp_dir);
    let target = temp_dir.child("dest");
    // Occupy the destination so the only identified file fails to copy.
    target.child("IMG_0001.heic").write_str("older copy").unwrap();

    let criteria = FilterCriteria::new(MediaKind::Image, None, None, None).unwrap();
    let options = DispatchOptions {
        action: Action::Copy,
        target_dir: target.path().to_path_buf(),
        dry_run: false,
        remove_corrupted: false,
    };

    let stats = Engine::new(criteria, options, extractor)
        .run(source.path(), false)
        .unwrap();

    assert_eq!(stats, RunStats { scanned: 3, identified: 1, handled: 0 });
    assert!(stats.handled <= stats.identified && stats.identified <= stats.scanned);
    target.child("IMG_0001.heic").assert("older copy");
}
