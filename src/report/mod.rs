//! Reporting: correlation interpretation, the Markdown report and terminal output.
//!
//! We keep formatting code in one place so:
//! - the statistics code stays clean and testable
//! - output changes are localized

pub mod format;
pub mod markdown;

pub use format::*;
pub use markdown::*;

/// Upper bound (inclusive) of |r| for a weak correlation.
pub const WEAK_MAX: f64 = 0.3;
/// Upper bound (inclusive) of |r| for a moderate correlation.
pub const MODERATE_MAX: f64 = 0.7;

/// How strong a correlation coefficient is, by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationStrength {
    Weak,
    Moderate,
    Strong,
}

impl CorrelationStrength {
    /// weak: |r| ≤ 0.3, moderate: 0.3 < |r| ≤ 0.7, strong: |r| > 0.7
    pub fn classify(r: f64) -> Self {
        let m = r.abs();
        if m > MODERATE_MAX {
            CorrelationStrength::Strong
        } else if m > WEAK_MAX {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationStrength::Weak => "weak",
            CorrelationStrength::Moderate => "moderate",
            CorrelationStrength::Strong => "strong",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CorrelationStrength::Weak => "Weak",
            CorrelationStrength::Moderate => "Moderate",
            CorrelationStrength::Strong => "Strong",
        }
    }
}

/// Sign of a correlation coefficient. Zero reads as negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

impl CorrelationDirection {
    pub fn classify(r: f64) -> Self {
        if r > 0.0 {
            CorrelationDirection::Positive
        } else {
            CorrelationDirection::Negative
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CorrelationDirection::Positive => "positive",
            CorrelationDirection::Negative => "negative",
        }
    }
}
