use crate::mediamover_core::date::EXIF_DATE_FORMAT;
use crate::mediamover_core::error::{FileError, RunError};
use crate::mediamover_core::media::{MediaKind, classify};
use crate::mediamover_core::metadata::{FieldProfile, MetadataExtractor, RawMetadata};
use exiftool::ExifTool;
use std::path::Path;

/// Prefix every tag with its family 0 group (`EXIF:Model`, `File:MIMEType`).
const EXIFTOOL_ARGS: &[&str] = &["-G"];

const ERROR_FIELDS: &[&str] = &["ExifTool:Error", "Error"];
const WARNING_FIELDS: &[&str] = &["ExifTool:Warning", "Warning"];

/// Tags exiftool reports for image containers (and QuickTime-based HEIC/MOV).
pub static EXIFTOOL_PROFILE: FieldProfile = FieldProfile {
    name: "exiftool",
    date_fields: &[
        "EXIF:DateTimeOriginal",
        "EXIF:CreateDate",
        "QuickTime:CreateDate",
        "QuickTime:MediaCreateDate",
        "QuickTime:ContentCreateDate",
    ],
    date_format: EXIF_DATE_FORMAT,
    model_fields: &["EXIF:Model", "QuickTime:Model"],
};

/// Image backend driving a long-lived exiftool process.
pub struct ExifToolExtractor {
    exiftool: ExifTool,
}

impl ExifToolExtractor {
    /// Start exiftool. Fails when the executable is not on the PATH.
    pub fn new() -> Result<Self, RunError> {
        let exiftool =
            ExifTool::new().map_err(|e| RunError::Extractor(format!("exiftool: {}", e)))?;
        log::debug!("Started exiftool metadata backend");
        Ok(ExifToolExtractor { exiftool })
    }
}

impl MetadataExtractor for ExifToolExtractor {
    fn extract(&mut self, path: &Path) -> Result<RawMetadata, FileError> {
        let raw: RawMetadata = self
            .exiftool
            .read_metadata(path, EXIFTOOL_ARGS)
            .map_err(|e| FileError::Extraction {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        check_diagnostics(path, raw)
    }

    fn profile(&self) -> &'static FieldProfile {
        &EXIFTOOL_PROFILE
    }
}

/// Turn exiftool's in-band diagnostics into results.
///
/// An error on a file exiftool recognised as an image means the container
/// is damaged. Any other error (unknown file type, empty file) only means
/// the file could not be read.
fn check_diagnostics(path: &Path, raw: RawMetadata) -> Result<RawMetadata, FileError> {
    if let Some(warning) = WARNING_FIELDS.iter().find_map(|f| raw.get_str(f)) {
        log::warn!("Warnings [{}]: {}", path.display(), warning);
    }

    let Some(reason) = ERROR_FIELDS.iter().find_map(|f| raw.get_str(f)) else {
        return Ok(raw);
    };

    if classify(&raw) == MediaKind::Image {
        Err(FileError::Corrupted {
            path: path.to_path_buf(),
            reason,
        })
    } else {
        Err(FileError::Extraction {
            path: path.to_path_buf(),
            reason,
        })
    }
}
