pub mod cli;
pub mod date;
pub mod dispatch;
pub mod error;
pub mod exif;
pub mod filter;
pub mod media;
pub mod metadata;
pub mod probe;

pub use cli::{Cli, confirm};
pub use dispatch::{Action, DispatchOptions, Engine, Outcome, RunStats, SkipReason, check_source_dir};
pub use error::{FileError, RunError};
pub use filter::{FilterCriteria, matches_model};
pub use media::{MediaKind, MediaRecord, classify};
pub use metadata::{FieldProfile, MetadataExtractor, RawMetadata, extractor_for};
