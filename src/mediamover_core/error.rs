use std::path::PathBuf;
use thiserror::Error;

/// A failure confined to a single file. The run reports it and moves on.
#[derive(Error, Debug)]
pub enum FileError {
    // Metadata errors
    #[error("Failed to extract metadata from {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("Corrupted media file {path}: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Invalid date in {field} of {path}: {value:?} ({reason})")]
    InvalidDate {
        path: PathBuf,
        field: String,
        value: String,
        reason: String,
    },

    // I/O errors
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.into(),
            source,
        }
    }

    /// The failure without the file it happened to.
    pub fn cause(&self) -> String {
        match self {
            FileError::Extraction { reason, .. } => reason.clone(),
            FileError::Corrupted { reason, .. } => format!("corrupted media ({})", reason),
            FileError::InvalidDate { field, value, reason, .. } => {
                format!("invalid date in {}: {:?} ({})", field, value, reason)
            }
            FileError::Io { source, .. } => source.to_string(),
        }
    }

    /// Whether this failure marks the file itself as broken media.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, FileError::Corrupted { .. })
    }
}

/// A failure that stops the whole run.
#[derive(Error, Debug)]
pub enum RunError {
    // Configuration errors
    #[error("Date range is invalid: --before {before} must be later than --after {after}")]
    InvalidDateRange {
        before: time::Date,
        after: time::Date,
    },

    #[error("Operation aborted.")]
    Cancelled,

    // Filesystem errors
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Directory walker error: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Metadata backends
    #[error("Metadata extractor unavailable: {0}")]
    Extractor(String),
}

/// Result type for run-level operations.
pub type Result<T> = std::result::Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_errors_name_the_file() {
        let err = FileError::Extraction {
            path: PathBuf::from("/src/a.jpg"),
            reason: "no such tool".to_string(),
        };
        assert!(err.to_string().contains("/src/a.jpg"));
        assert!(err.to_string().contains("no such tool"));

        let err = FileError::io(
            "/src/b.mov",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/src/b.mov"));
        assert!(!err.is_corrupted());
    }

    #[test]
    fn test_corrupted_flag() {
        let err = FileError::Corrupted {
            path: PathBuf::from("x.jpg"),
            reason: "File format error".to_string(),
        };
        assert!(err.is_corrupted());
    }

    #[test]
    fn test_cause_omits_the_file() {
        let err = FileError::InvalidDate {
            path: PathBuf::from("/src/IMG_0001.jpg"),
            field: "EXIF:DateTimeOriginal".to_string(),
            value: "2022-13-45".to_string(),
            reason: "month out of range".to_string(),
        };
        assert_eq!(
            err.cause(),
            "invalid date in EXIF:DateTimeOriginal: \"2022-13-45\" (month out of range)"
        );

        let err = FileError::io(
            "/src/b.mov",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.cause(), "denied");
    }
}
