use crate::mediamover_core::date::ISO_DATE_FORMAT;
use crate::mediamover_core::error::{FileError, RunError};
use crate::mediamover_core::metadata::{FieldProfile, MetadataExtractor, RawMetadata};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tags ffprobe reports for video containers, found anywhere in its output.
pub static FFPROBE_PROFILE: FieldProfile = FieldProfile {
    name: "ffprobe",
    date_fields: &["com.apple.quicktime.creationdate", "creation_time", "date"],
    date_format: ISO_DATE_FORMAT,
    model_fields: &["com.apple.quicktime.model"],
};

/// Video backend running one ffprobe process per file.
pub struct FfprobeExtractor {
    program: PathBuf,
}

impl FfprobeExtractor {
    /// Use the ffprobe shipped next to the executable in `ffmpeg/`, falling
    /// back to the one on the PATH.
    pub fn new() -> Result<Self, RunError> {
        let bundled = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().and_then(bundled_ffprobe));
        match bundled {
            Some(program) => Self::with_program(program),
            None => Self::with_program("ffprobe"),
        }
    }

    /// Use a specific ffprobe executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Result<Self, RunError> {
        let program = program.into();
        if !ffprobe_available(&program) {
            return Err(RunError::Extractor(format!(
                "{} is not installed or not in PATH",
                program.display()
            )));
        }
        log::debug!("Using {} metadata backend", program.display());
        Ok(FfprobeExtractor { program })
    }
}

/// `ffmpeg/ffprobe` under `dir`, if present.
fn bundled_ffprobe(dir: &Path) -> Option<PathBuf> {
    let candidate = dir
        .join("ffmpeg")
        .join(format!("ffprobe{}", env::consts::EXE_SUFFIX));
    candidate.is_file().then_some(candidate)
}

impl MetadataExtractor for FfprobeExtractor {
    fn extract(&mut self, path: &Path) -> Result<RawMetadata, FileError> {
        let output = Command::new(&self.program)
            .args([
                "-v", "error",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .map_err(|e| FileError::io(path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FileError::Extraction {
                path: path.to_path_buf(),
                reason: format!("ffprobe failed: {}", stderr.trim()),
            });
        }

        parse_probe_output(path, &output.stdout)
    }

    fn profile(&self) -> &'static FieldProfile {
        &FFPROBE_PROFILE
    }
}

fn parse_probe_output(path: &Path, stdout: &[u8]) -> Result<RawMetadata, FileError> {
    serde_json::from_slice(stdout).map_err(|e| FileError::Extraction {
        path: path.to_path_buf(),
        reason: format!("unreadable ffprobe output: {}", e),
    })
}

/// Check if an ffprobe executable can be run.
fn ffprobe_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
