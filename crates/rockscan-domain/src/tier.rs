//! Tier module - audience levels for analysis reports

/// Access tier of the person operating the scanner
///
/// The tier selects the narrative depth requested from the remote model and
/// which optional report sections the presentation layer surfaces. It never
/// changes whether a request succeeds or the shape of the decoded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessTier {
    /// Educational depth; only the educational note is surfaced
    #[default]
    Student,

    /// Research depth; provenance, professional insight and stratigraphy are surfaced
    Researcher,
}

impl AccessTier {
    /// Get the tier name as used on the wire and in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessTier::Student => "STUDENT",
            AccessTier::Researcher => "RESEARCHER",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            AccessTier::Student => "Student/Edu",
            AccessTier::Researcher => "Researcher",
        }
    }

    /// Parse a tier from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" | "edu" => Some(AccessTier::Student),
            "researcher" | "research" | "pro" => Some(AccessTier::Researcher),
            _ => None,
        }
    }

    /// Whether research-grade sections (provenance, insight) are visible
    pub fn is_researcher(&self) -> bool {
        matches!(self, AccessTier::Researcher)
    }
}

impl std::fmt::Display for AccessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccessTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}
