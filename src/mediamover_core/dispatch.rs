use crate::mediamover_core::date::resolve_creation_date;
use crate::mediamover_core::error::{FileError, Result, RunError};
use crate::mediamover_core::filter::{FilterCriteria, camera_model, matches_model};
use crate::mediamover_core::media::{MediaKind, MediaRecord, classify};
use crate::mediamover_core::metadata::{MetadataExtractor, RawMetadata};
use clap::ValueEnum;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What to do with an identified file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Copy,
    Move,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Copy => "copy",
            Action::Move => "move",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How identified files are dispatched.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub action: Action,
    pub target_dir: PathBuf,
    pub dry_run: bool,
    /// Delete corrupted images from the source directory.
    pub remove_corrupted: bool,
}

/// Counters for a single run. `handled <= identified <= scanned`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub scanned: usize,
    pub identified: usize,
    pub handled: usize,
}

impl RunStats {
    /// The line printed once a run completes.
    pub fn summary(&self) -> String {
        format!(
            "Scanned {} files, identified {} and handled {}",
            self.scanned, self.identified, self.handled
        )
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Why a file was left alone without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoMetadata,
    KindMismatch(MediaKind),
    ModelMismatch,
    OutOfDateRange,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoMetadata => write!(f, "no metadata"),
            SkipReason::KindMismatch(kind) => write!(f, "media kind is {}", kind),
            SkipReason::ModelMismatch => write!(f, "camera model does not match"),
            SkipReason::OutOfDateRange => write!(f, "capture date out of range"),
        }
    }
}

/// Terminal state of one file.
#[derive(Debug)]
pub enum Outcome {
    Skipped(SkipReason),
    /// Not identified: metadata could not be read or interpreted.
    Failed(FileError),
    /// Corrupted source file removed (or, in a dry run, would be).
    CorruptDeleted { dry_run: bool, cause: FileError },
    DryRun { action: Action, destination: PathBuf },
    Handled { action: Action, destination: PathBuf },
    ActionFailed { action: Action, error: FileError },
}

impl Outcome {
    pub fn is_identified(&self) -> bool {
        matches!(
            self,
            Outcome::DryRun { .. } | Outcome::Handled { .. } | Outcome::ActionFailed { .. }
        )
    }

    /// Operator-facing line for this outcome. Skips are silent.
    pub fn describe(&self, path: &Path) -> Option<String> {
        let line = match self {
            Outcome::Skipped(_) => return None,
            Outcome::Failed(error) => format!("Error [{}]: {}", path.display(), error.cause()),
            Outcome::CorruptDeleted { dry_run: true, .. } => {
                format!("[Dry run]Would delete from source directory: {}", path.display())
            }
            Outcome::CorruptDeleted { dry_run: false, cause } => {
                format!("Deleted [{}] from source directory: {}", path.display(), cause)
            }
            Outcome::DryRun { action, destination } => format!(
                "[Dry run]Would {}: {} -> {}",
                action,
                path.display(),
                destination.display()
            ),
            Outcome::Handled { action, destination } => {
                let verb = match action {
                    Action::Copy => "Copying",
                    Action::Move => "Moving",
                };
                format!("{}: {}", verb, path.display())
            }
            Outcome::ActionFailed { action, error } => {
                format!("Failed to {} {}: {}", action, path.display(), error)
            }
        };
        Some(line)
    }
}

/// Result of running the filters over a file's metadata.
enum Verdict {
    Identified(MediaRecord),
    Skip(SkipReason),
}

/// Filter and dispatch engine. Owns the run's counters.
pub struct Engine<E> {
    criteria: FilterCriteria,
    options: DispatchOptions,
    extractor: E,
    stats: RunStats,
}

impl<E: MetadataExtractor> Engine<E> {
    pub fn new(criteria: FilterCriteria, options: DispatchOptions, extractor: E) -> Self {
        Engine {
            criteria,
            options,
            extractor,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Evaluate a single file and dispatch it if it passes every filter.
    pub fn process(&mut self, path: &Path) -> Outcome {
        self.stats.scanned += 1;

        let raw = match self.extractor.extract(path) {
            Ok(raw) => raw,
            Err(error) => return self.handle_unreadable(path, error),
        };

        let record = match self.evaluate(path, &raw) {
            Ok(Verdict::Identified(record)) => record,
            Ok(Verdict::Skip(reason)) => {
                log::debug!("Skipping {}: {}", path.display(), reason);
                return Outcome::Skipped(reason);
            }
            Err(error) => return Outcome::Failed(error),
        };

        log::info!(
            "Identified {} ({}, model {:?}, created {:?})",
            record.path.display(),
            record.media_kind,
            record.camera_model,
            record.created_at
        );
        self.stats.identified += 1;
        self.dispatch(&record)
    }

    fn evaluate(&self, path: &Path, raw: &RawMetadata) -> std::result::Result<Verdict, FileError> {
        if raw.is_empty() {
            return Ok(Verdict::Skip(SkipReason::NoMetadata));
        }

        let media_kind = classify(raw);
        if media_kind != self.criteria.media_kind() {
            return Ok(Verdict::Skip(SkipReason::KindMismatch(media_kind)));
        }

        let profile = self.extractor.profile();
        if !matches_model(raw, profile, self.criteria.camera_model()) {
            return Ok(Verdict::Skip(SkipReason::ModelMismatch));
        }

        let created_at = resolve_creation_date(path, raw, profile)?;
        if !self.criteria.admits_date(created_at) {
            return Ok(Verdict::Skip(SkipReason::OutOfDateRange));
        }

        Ok(Verdict::Identified(MediaRecord {
            path: path.to_path_buf(),
            media_kind,
            camera_model: camera_model(raw, profile),
            created_at,
        }))
    }

    fn handle_unreadable(&self, path: &Path, error: FileError) -> Outcome {
        if !(error.is_corrupted() && self.options.remove_corrupted) {
            return Outcome::Failed(error);
        }

        if self.options.dry_run {
            return Outcome::CorruptDeleted {
                dry_run: true,
                cause: error,
            };
        }

        match fs::remove_file(path) {
            Ok(()) => {
                log::warn!("Removed corrupted file {}", path.display());
                Outcome::CorruptDeleted {
                    dry_run: false,
                    cause: error,
                }
            }
            Err(e) => Outcome::Failed(FileError::io(path, e)),
        }
    }

    fn dispatch(&mut self, record: &MediaRecord) -> Outcome {
        let action = self.options.action;
        let Some(file_name) = record.path.file_name() else {
            return Outcome::ActionFailed {
                action,
                error: FileError::io(
                    &record.path,
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                ),
            };
        };
        let destination = self.options.target_dir.join(file_name);

        if self.options.dry_run {
            return Outcome::DryRun {
                action,
                destination,
            };
        }

        let result = match action {
            Action::Copy => copy_file(&record.path, &destination),
            Action::Move => move_file(&record.path, &destination),
        };

        match result {
            Ok(()) => {
                self.stats.handled += 1;
                Outcome::Handled {
                    action,
                    destination,
                }
            }
            Err(error) => Outcome::ActionFailed { action, error },
        }
    }

    /// Process every file under `source_dir`, one at a time.
    ///
    /// Per-file problems are printed and counted; only an unreadable source
    /// tree ends the run early.
    pub fn run(&mut self, source_dir: &Path, recursive: bool) -> Result<RunStats> {
        check_source_dir(source_dir)?;

        if !self.options.dry_run && !self.options.target_dir.exists() {
            fs::create_dir_all(&self.options.target_dir)?;
            println!("Created target directory: {}", self.options.target_dir.display());
        }
        let excluded = target_within(source_dir, &self.options.target_dir);

        let walker = if recursive {
            println!("scan recursively:");
            WalkDir::new(source_dir).min_depth(1).contents_first(true)
        } else {
            println!("scan the source folder only:");
            WalkDir::new(source_dir).min_depth(1).max_depth(1)
        };

        for entry in walker.sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            // Never re-scan what this run has already dispatched.
            if excluded.as_ref().is_some_and(|dir| entry.path().starts_with(dir)) {
                log::debug!("Skipping {}: inside the target directory", entry.path().display());
                continue;
            }

            let outcome = self.process(entry.path());
            if let Some(line) = outcome.describe(entry.path()) {
                println!("{}", line);
            }
        }

        Ok(self.stats)
    }
}

/// The target directory as it appears under `source_dir` during the walk,
/// or `None` when it lies outside the source tree.
fn target_within(source_dir: &Path, target_dir: &Path) -> Option<PathBuf> {
    let source = fs::canonicalize(source_dir).ok()?;
    let target = fs::canonicalize(target_dir).ok()?;
    let relative = target.strip_prefix(&source).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(source_dir.join(relative))
}

/// Fail fast when the source directory cannot be traversed.
pub fn check_source_dir(source_dir: &Path) -> Result<()> {
    if !source_dir.exists() {
        return Err(RunError::SourceNotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(RunError::NotADirectory(source_dir.to_path_buf()));
    }
    Ok(())
}

/// Copy contents, permissions and modification time. Never overwrites.
fn copy_file(source: &Path, destination: &Path) -> std::result::Result<(), FileError> {
    let mut reader = File::open(source).map_err(|e| FileError::io(source, e))?;
    let metadata = reader.metadata().map_err(|e| FileError::io(source, e))?;

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
        .map_err(|e| FileError::io(destination, e))?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.set_permissions(metadata.permissions()));
    if let Err(e) = copied {
        drop(writer);
        let _ = fs::remove_file(destination);
        return Err(FileError::io(destination, e));
    }

    if let Ok(modified) = metadata.modified() {
        if let Err(e) = writer.set_modified(modified) {
            log::warn!(
                "Could not preserve modification time of {}: {}",
                destination.display(),
                e
            );
        }
    }

    Ok(())
}

/// Rename into place, copying across filesystems. The source is only
/// removed once the destination is complete.
fn move_file(source: &Path, destination: &Path) -> std::result::Result<(), FileError> {
    if destination.try_exists().map_err(|e| FileError::io(destination, e))? {
        return Err(FileError::io(
            destination,
            io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "{} is on another filesystem, copying instead of renaming",
                destination.display()
            );
            copy_file(source, destination)?;
            if let Err(e) = fs::remove_file(source) {
                let _ = fs::remove_file(destination);
                return Err(FileError::io(source, e));
            }
            Ok(())
        }
        Err(e) => Err(FileError::io(source, e)),
    }
}
