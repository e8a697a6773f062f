use crate::mediamover_core::metadata::RawMetadata;
use clap::ValueEnum;
use std::path::PathBuf;
use time::PrimitiveDateTime;

/// Primary media category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaKind {
    Image,
    Video,
    #[value(skip)]
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        }
    }

    fn from_mime(mime: &str) -> MediaKind {
        match mime.split('/').next().map(str::trim) {
            Some(top) if top.eq_ignore_ascii_case("image") => MediaKind::Image,
            Some(top) if top.eq_ignore_ascii_case("video") => MediaKind::Video,
            _ => MediaKind::Unknown,
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the filters learned about one file.
#[derive(Debug, Clone)]
pub struct MediaRecord {
    pub path: PathBuf,
    pub media_kind: MediaKind,
    pub camera_model: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
}

/// MIME type tags, exiftool's grouped name first.
const MIME_FIELDS: &[&str] = &["File:MIMEType", "MIMEType"];

/// ffprobe demuxers that read still pictures.
const IMAGE_DEMUXERS: &[&str] = &["image2", "gif", "webp", "png", "apng", "bmp", "tiff"];

/// ISO-BMFF brands of HEIF/AVIF stills, which ffprobe opens with the mov demuxer.
const IMAGE_BRANDS: &[&str] = &["heic", "heix", "heim", "heis", "hevc", "mif1", "msf1", "avif", "avis"];

/// Determine the media kind from extracted metadata.
///
/// A MIME type decides when the backend reports one. Otherwise the ffprobe
/// container description is used: still-picture demuxers and HEIF brands
/// are images, and anything carrying a real video stream (not cover art) is
/// a video. File extensions are never consulted.
pub fn classify(raw: &RawMetadata) -> MediaKind {
    if let Some(mime) = MIME_FIELDS.iter().find_map(|field| raw.get_str(field)) {
        return MediaKind::from_mime(&mime);
    }

    if let Some(format_name) = raw.get_str("format_name") {
        let is_image_demuxer = format_name.split(',').any(|demuxer| {
            let demuxer = demuxer.trim();
            demuxer.ends_with("_pipe") || IMAGE_DEMUXERS.contains(&demuxer)
        });
        if is_image_demuxer {
            return MediaKind::Image;
        }
    }

    if let Some(brand) = raw.get_str("major_brand") {
        if IMAGE_BRANDS.contains(&brand.trim().to_ascii_lowercase().as_str()) {
            return MediaKind::Image;
        }
    }

    if has_video_stream(raw) {
        return MediaKind::Video;
    }

    MediaKind::Unknown
}

fn has_video_stream(raw: &RawMetadata) -> bool {
    raw.fields()
        .get("streams")
        .and_then(|streams| streams.as_array())
        .map(|streams| {
            streams.iter().any(|stream| {
                stream.get("codec_type").and_then(|t| t.as_str()) == Some("video")
                    && !is_attached_picture(stream)
            })
        })
        .unwrap_or(false)
}

/// Cover art and thumbnails embedded as a single-frame stream.
fn is_attached_picture(stream: &serde_json::Value) -> bool {
    stream
        .get("disposition")
        .and_then(|d| d.get("attached_pic"))
        .and_then(|flag| flag.as_i64())
        == Some(1)
}
