use crate::mediamover_core::error::FileError;
use crate::mediamover_core::metadata::{FieldProfile, RawMetadata};
use std::path::Path;
use time::format_description::FormatItem;
use time::{Date, PrimitiveDateTime};

/// Date format used in EXIF and QuickTime tags as printed by exiftool.
pub const EXIF_DATE_FORMAT: &[FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// ISO 8601 dates as printed by ffprobe.
pub const ISO_DATE_FORMAT: &[FormatItem] =
    time::macros::format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Calendar dates given on the command line. Zero padding is optional.
const BOUND_DATE_FORMAT: &[FormatItem] =
    time::macros::format_description!("[year]-[month padding:none]-[day padding:none]");

/// Length of `YYYY:MM:DD HH:MM:SS`. Sub-seconds and offsets follow it.
const SECONDS_PRECISION_LEN: usize = 19;

/// Placeholder exiftool prints for an unset QuickTime date.
const ZERO_DATE: &str = "0000:00:00 00:00:00";

/// Find the earliest creation date among the profile's candidate fields.
///
/// Missing candidates are skipped and no candidate at all yields `None`.
/// A candidate that is present but unparseable fails the whole file.
pub fn resolve_creation_date(
    path: &Path,
    raw: &RawMetadata,
    profile: &FieldProfile,
) -> Result<Option<PrimitiveDateTime>, FileError> {
    let mut earliest: Option<PrimitiveDateTime> = None;

    for field in profile.date_fields {
        let Some(text) = raw.get_str(field) else {
            continue;
        };
        let Some(candidate) = parse_candidate(&text, profile.date_format).map_err(|reason| {
            FileError::InvalidDate {
                path: path.to_path_buf(),
                field: field.to_string(),
                value: text.clone(),
                reason,
            }
        })?
        else {
            continue;
        };

        log::trace!("{}: {} = {}", path.display(), field, candidate);
        earliest = Some(match earliest {
            Some(current) => current.min(candidate),
            None => candidate,
        });
    }

    Ok(earliest)
}

/// Parse a single date candidate, truncated to second precision.
fn parse_candidate(
    text: &str,
    format: &[FormatItem],
) -> Result<Option<PrimitiveDateTime>, String> {
    let text = text.trim();
    let truncated = text
        .char_indices()
        .nth(SECONDS_PRECISION_LEN)
        .map_or(text, |(end, _)| &text[..end]);

    if truncated.is_empty() || truncated == ZERO_DATE {
        return Ok(None);
    }

    PrimitiveDateTime::parse(truncated, format)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Parse a `--before` / `--after` bound such as `2000-1-1` or `2000-01-01`.
pub fn parse_bound(text: &str) -> Result<Date, String> {
    Date::parse(text.trim(), BOUND_DATE_FORMAT)
        .map_err(|e| format!("expected a date like 2000-01-01: {}", e))
}
