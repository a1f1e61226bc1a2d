//! Operating mode of the scanner

/// How the sample is being imaged
///
/// The mode only changes prompt phrasing; it never changes the result shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatingMode {
    /// Macro view of an outcrop or hand sample
    #[default]
    Field,

    /// Thin section under a microscope
    Lab,
}

impl OperatingMode {
    /// Get the mode name as used in prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Field => "FIELD",
            OperatingMode::Lab => "LAB",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            OperatingMode::Field => "Field Observation",
            OperatingMode::Lab => "Lab Analysis",
        }
    }

    /// Short description of the imaging scale
    pub fn framing(&self) -> &'static str {
        match self {
            OperatingMode::Field => "Macro view",
            OperatingMode::Lab => "Thin section",
        }
    }

    /// Parse a mode from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "field" => Some(OperatingMode::Field),
            "lab" => Some(OperatingMode::Lab),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid mode: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(OperatingMode::parse("field"), Some(OperatingMode::Field));
        assert_eq!(OperatingMode::parse("LAB"), Some(OperatingMode::Lab));
        assert_eq!(OperatingMode::parse("orbit"), None);
    }

    #[test]
    fn test_framing() {
        assert_eq!(OperatingMode::Field.framing(), "Macro view");
        assert_eq!(OperatingMode::Lab.framing(), "Thin section");
    }
}
