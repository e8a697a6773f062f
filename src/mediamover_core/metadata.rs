use crate::mediamover_core::error::{FileError, RunError};
use crate::mediamover_core::exif::ExifToolExtractor;
use crate::mediamover_core::media::MediaKind;
use crate::mediamover_core::probe::FfprobeExtractor;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use time::format_description::FormatItem;

/// Metadata tree as reported by an extraction backend.
///
/// Keys are backend-specific (`EXIF:Model` from exiftool, `creation_time`
/// nested under `format.tags` from ffprobe, ...). Lookups search nested
/// objects and arrays so callers don't need to know where a backend puts a
/// given tag.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RawMetadata(Map<String, Value>);

impl RawMetadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        RawMetadata(fields)
    }

    /// Build from an arbitrary JSON value. Anything but an object is empty.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => RawMetadata(fields),
            _ => RawMetadata::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Find `key` at the top level, otherwise in the first nested object
    /// that has it. A key present with a null or blank value is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        deep_get(&self.0, key)
    }

    /// Like [`RawMetadata::get`] but rendered as text. Numbers and booleans
    /// are stringified, nested structures are ignored.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

fn deep_get<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = fields.get(key) {
        return if is_blank(value) { None } else { Some(value) };
    }

    fields.values().find_map(|value| match value {
        Value::Object(inner) => deep_get(inner, key),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .find_map(|inner| deep_get(inner, key)),
        _ => None,
    })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Which tags a backend uses for the fields the filters care about.
#[derive(Debug)]
pub struct FieldProfile {
    /// Backend name, for log lines.
    pub name: &'static str,
    /// Creation-date candidates. The earliest one wins.
    pub date_fields: &'static [&'static str],
    /// Text format of the date candidates, after truncation to seconds.
    pub date_format: &'static [FormatItem<'static>],
    /// Capture-device model tags, checked in order.
    pub model_fields: &'static [&'static str],
}

/// A metadata extraction backend.
pub trait MetadataExtractor {
    /// Read the metadata of a single file.
    fn extract(&mut self, path: &Path) -> Result<RawMetadata, FileError>;

    /// Tag names this backend reports.
    fn profile(&self) -> &'static FieldProfile;
}

impl<T: MetadataExtractor + ?Sized> MetadataExtractor for Box<T> {
    fn extract(&mut self, path: &Path) -> Result<RawMetadata, FileError> {
        (**self).extract(path)
    }

    fn profile(&self) -> &'static FieldProfile {
        (**self).profile()
    }
}

/// Start the backend suited to the requested media kind.
pub fn extractor_for(kind: MediaKind) -> Result<Box<dyn MetadataExtractor>, RunError> {
    match kind {
        MediaKind::Image => Ok(Box::new(ExifToolExtractor::new()?)),
        MediaKind::Video => Ok(Box::new(FfprobeExtractor::new()?)),
        MediaKind::Unknown => Err(RunError::Extractor(
            "no metadata backend for unknown media".to_string(),
        )),
    }
}
