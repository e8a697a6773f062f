use crate::mediamover_core::error::{Result, RunError};
use crate::mediamover_core::media::MediaKind;
use crate::mediamover_core::metadata::{FieldProfile, RawMetadata};
use time::{Date, PrimitiveDateTime};

/// User-selected predicates, fixed for the whole run.
#[derive(Debug, Clone)]
pub struct FilterCriteria {
    media_kind: MediaKind,
    camera_model: Option<String>,
    before: Option<Date>,
    after: Option<Date>,
}

impl FilterCriteria {
    /// Build the criteria, rejecting an empty date range.
    pub fn new(
        media_kind: MediaKind,
        camera_model: Option<String>,
        before: Option<Date>,
        after: Option<Date>,
    ) -> Result<Self> {
        if let (Some(before), Some(after)) = (before, after) {
            if before <= after {
                return Err(RunError::InvalidDateRange { before, after });
            }
        }

        Ok(FilterCriteria {
            media_kind,
            camera_model: camera_model.filter(|m| !m.is_empty()),
            before,
            after,
        })
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn camera_model(&self) -> Option<&str> {
        self.camera_model.as_deref()
    }

    /// Date filter: `after` is inclusive, `before` exclusive, both taken at
    /// midnight. Files without a known date always pass.
    pub fn admits_date(&self, created_at: Option<PrimitiveDateTime>) -> bool {
        let Some(created_at) = created_at else {
            return true;
        };

        if let Some(after) = self.after {
            if created_at < after.midnight() {
                return false;
            }
        }

        if let Some(before) = self.before {
            if created_at >= before.midnight() {
                return false;
            }
        }

        true
    }
}

/// First non-empty model tag the backend reports.
pub fn camera_model(raw: &RawMetadata, profile: &FieldProfile) -> Option<String> {
    profile
        .model_fields
        .iter()
        .find_map(|field| raw.get_str(field))
}

/// Case-sensitive substring match of `wanted` against every model tag.
/// Without a wanted model everything matches; without a model tag nothing does.
pub fn matches_model(raw: &RawMetadata, profile: &FieldProfile, wanted: Option<&str>) -> bool {
    let Some(wanted) = wanted else {
        return true;
    };

    profile
        .model_fields
        .iter()
        .filter_map(|field| raw.get_str(field))
        .any(|model| model.contains(wanted))
}
