//! Operator input for a new field log entry

use rockscan_domain::{AnalysisResult, EntryId, FieldLogEntry};
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder thickness when the operator gives none
pub const UNMEASURED: &str = "—";

/// Overrides for a log entry; anything left `None` is taken from the result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNotes {
    /// Unit label (defaults to the rock type, upper-cased)
    pub unit: Option<String>,
    /// Bed thickness (defaults to [`UNMEASURED`])
    pub thickness: Option<String>,
    /// Lithology (defaults to the identification)
    pub lithology: Option<String>,
    /// Notes (defaults to the texture)
    pub notes: Option<String>,
}

impl FieldNotes {
    /// Notes with only a thickness
    pub fn with_thickness(thickness: impl Into<String>) -> Self {
        Self {
            thickness: Some(thickness.into()),
            ..Self::default()
        }
    }

    /// Build the entry for `result`, stamped now
    pub(crate) fn into_entry(self, result: &AnalysisResult) -> FieldLogEntry {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        FieldLogEntry::new(
            EntryId::new(),
            timestamp,
            self.unit
                .unwrap_or_else(|| result.rock_type.to_uppercase()),
            self.thickness.unwrap_or_else(|| UNMEASURED.to_string()),
            self.lithology
                .unwrap_or_else(|| result.identification.clone()),
            self.notes.unwrap_or_else(|| result.texture.clone()),
        )
    }
}
