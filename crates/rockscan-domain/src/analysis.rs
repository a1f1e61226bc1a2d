//! Analysis result - the decoded report for one captured sample

use crate::UnitScore;

/// Physical properties estimated by the model
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalProperties {
    /// Mohs hardness bucket (e.g. "6.0-7.0")
    pub hardness: String,

    /// Specific gravity estimate
    pub specific_gravity: String,

    /// Grain size description or class
    pub grain_size: String,
}

/// Sediment provenance interpretation
///
/// Only present when the model supplies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// Degree of clast rounding
    pub rounding: String,

    /// Estimated transport distance
    pub transport_distance: String,

    /// Likely source basin
    pub basin_source: String,
}

/// Validated report returned by the analysis client
///
/// Required fields are always populated. Mode, tier and basin never change
/// this shape, only the prompted content of the fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// What the sample is (free text)
    pub identification: String,

    /// Model confidence in the identification
    pub confidence: UnitScore,

    /// Rock category (Igneous, Sedimentary, Metamorphic, ...)
    pub rock_type: String,

    /// Minerals in order of abundance; never empty
    pub mineralogy: Vec<String>,

    /// Texture description
    pub texture: String,

    /// Physical properties
    pub physical_properties: PhysicalProperties,

    /// Geological age estimate
    pub geological_age: String,

    /// Whether a fossil was detected
    pub is_fossil: bool,

    /// Provenance interpretation, if supplied
    pub provenance: Option<Provenance>,

    /// Stratigraphic correlation narrative
    pub stratigraphic_context: Option<String>,

    /// Student-tier narrative
    pub educational_note: Option<String>,

    /// Researcher-tier narrative
    pub professional_insight: Option<String>,

    /// Confidence that a detected fossil is genuine; only kept when `is_fossil`
    pub fossil_authenticity: Option<UnitScore>,
}

impl AnalysisResult {
    /// Validate cross-field invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.identification.trim().is_empty() {
            return Err("identification is empty".to_string());
        }
        if self.mineralogy.is_empty() {
            return Err("mineralogy is empty".to_string());
        }
        if !self.is_fossil && self.fossil_authenticity.is_some() {
            return Err("fossilAuthenticity present but isFossil is false".to_string());
        }
        Ok(())
    }

    /// Fossil authenticity, ignored unless a fossil was detected
    pub fn fossil_authenticity(&self) -> Option<UnitScore> {
        if self.is_fossil {
            self.fossil_authenticity
        } else {
            None
        }
    }
}
