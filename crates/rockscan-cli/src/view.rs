//! View models derived from session state.
//!
//! Everything the presentation shows is decided here; `output` only draws it.

use rockscan_domain::{AccessTier, AnalysisResult, Provenance};
use rockscan_session::{SessionFailure, SessionState};

/// Fossils scoring above this are shown as authenticated.
pub const AUTHENTICITY_THRESHOLD: f64 = 0.8;

/// Verdict shown for a detected fossil.
#[derive(Debug, Clone, PartialEq)]
pub enum FossilVerdict {
    /// Authenticity above the threshold
    Authenticated {
        /// Authenticity as a percentage
        percent: f64,
    },
    /// Authenticity missing or at/below the threshold
    Unverified,
}

/// Narrative section, gated by tier.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    /// Student tier
    Educational {
        /// Educational note, if supplied
        note: Option<String>,
    },
    /// Researcher tier
    Professional {
        /// Professional insight, if supplied
        insight: Option<String>,
        /// Stratigraphic correlation, if supplied
        stratigraphy: Option<String>,
    },
}

/// Everything shown in a result report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    /// Identification headline
    pub identification: String,
    /// "CONF: xx.x%"
    pub confidence: String,
    /// "rockType | geologicalAge"
    pub subtitle: String,
    /// Physical matrix rows
    pub physical: Vec<(&'static str, String)>,
    /// Minerals in order of abundance
    pub minerals: Vec<String>,
    /// Texture description
    pub texture: String,
    /// Provenance rows (researcher tier only)
    pub provenance: Option<Vec<(&'static str, String)>>,
    /// Fossil banner (only when a fossil was detected)
    pub fossil: Option<FossilVerdict>,
    /// Narrative section
    pub summary: Summary,
}

impl ReportView {
    /// Build the report for `result` as seen at `tier`.
    pub fn new(result: &AnalysisResult, tier: AccessTier) -> Self {
        let physical = vec![
            ("Hardness", result.physical_properties.hardness.clone()),
            (
                "Specific Gravity",
                result.physical_properties.specific_gravity.clone(),
            ),
            ("Grain Size", result.physical_properties.grain_size.clone()),
        ];

        let provenance = if tier.is_researcher() {
            result.provenance.as_ref().map(provenance_rows)
        } else {
            None
        };

        let fossil = result.is_fossil.then(|| match result.fossil_authenticity() {
            Some(score) if score.exceeds(AUTHENTICITY_THRESHOLD) => FossilVerdict::Authenticated {
                percent: score.percent(),
            },
            _ => FossilVerdict::Unverified,
        });

        let summary = match tier {
            AccessTier::Student => Summary::Educational {
                note: result.educational_note.clone(),
            },
            AccessTier::Researcher => Summary::Professional {
                insight: result.professional_insight.clone(),
                stratigraphy: result.stratigraphic_context.clone(),
            },
        };

        Self {
            identification: result.identification.clone(),
            confidence: format!("CONF: {:.1}%", result.confidence.percent()),
            subtitle: format!("{} | {}", result.rock_type, result.geological_age),
            physical,
            minerals: result.mineralogy.clone(),
            texture: result.texture.clone(),
            provenance,
            fossil,
            summary,
        }
    }
}

fn provenance_rows(provenance: &Provenance) -> Vec<(&'static str, String)> {
    vec![
        ("Rounding", provenance.rounding.clone()),
        ("Transport", provenance.transport_distance.clone()),
        ("Basin Source", provenance.basin_source.clone()),
    ]
}

/// Status overlay for a session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// Short upper-case headline
    pub headline: &'static str,
    /// Detail line
    pub detail: String,
    /// Whether to offer a retry
    pub retryable: bool,
}

impl StatusView {
    /// Build the overlay for `state`.
    pub fn new(state: &SessionState) -> Self {
        match state {
            SessionState::Idle => Self::plain("STANDBY", "Camera not acquired"),
            SessionState::CaptureReady => Self::plain("SEARCHING...", "Awaiting Target Capture"),
            SessionState::Analyzing => Self::plain("TARGET LOCKED", "Quantizing Matrix..."),
            SessionState::ResultReady(result) => {
                Self::plain("TARGET LOCKED", &result.identification)
            }
            SessionState::Failed(SessionFailure::Capture(_)) => Self {
                headline: "CAPTURE FAILED",
                detail: "Camera access denied. Please enable permissions.".to_string(),
                retryable: true,
            },
            // Every analysis error reads the same; the cause goes to the log.
            SessionState::Failed(SessionFailure::Analysis(_)) => Self {
                headline: "ANALYSIS FAILED",
                detail: "Geological analysis failed. Please try again.".to_string(),
                retryable: true,
            },
        }
    }

    fn plain(headline: &'static str, detail: &str) -> Self {
        Self {
            headline,
            detail: detail.to_string(),
            retryable: false,
        }
    }
}
