//! Unit-interval scores (confidence, fossil authenticity)

/// A probability-like score in `[0.0, 1.0]`
///
/// Construction fails for values outside the interval (including NaN), so a
/// `UnitScore` held anywhere in the system is always in range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct UnitScore(f64);

impl UnitScore {
    /// Create a score, rejecting values outside `[0, 1]`
    pub fn new(value: f64) -> Result<Self, String> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("score {} out of range [0.0, 1.0]", value))
        }
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Value as a percentage (0..=100)
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }

    /// Strictly greater than the given threshold
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

impl TryFrom<f64> for UnitScore {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
