//! Field log entries - in-memory observation records

use std::fmt;

/// Unique identifier for a field log entry based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u128);

impl EntryId {
    /// Generate a new UUIDv7-based EntryId
    ///
    /// # Examples
    ///
    /// ```
    /// use rockscan_domain::EntryId;
    ///
    /// let id = EntryId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an EntryId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Short form for tables (first 8 hex digits)
    pub fn short(&self) -> String {
        let full = self.to_string();
        full[..8].to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// One observation in the stratigraphy log
///
/// Entries live only for the session; nothing here is persisted. Two entries
/// may carry identical field values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLogEntry {
    /// Unique identifier
    pub id: EntryId,

    /// When the entry was recorded (Unix seconds)
    pub timestamp: u64,

    /// Stratigraphic unit label
    pub unit: String,

    /// Measured or estimated bed thickness
    pub thickness: String,

    /// Lithology description
    pub lithology: String,

    /// Free-form notes
    pub notes: String,
}

impl FieldLogEntry {
    /// Create a new entry
    pub fn new(
        id: EntryId,
        timestamp: u64,
        unit: String,
        thickness: String,
        lithology: String,
        notes: String,
    ) -> Self {
        Self {
            id,
            timestamp,
            unit,
            thickness,
            lithology,
            notes,
        }
    }
}
