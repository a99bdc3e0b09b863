//! Field mapping results and confidence classification.

use serde::{Deserialize, Serialize};

use crate::Category;

/// How a header was matched to its canonical field, in decreasing trust order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Supplied by a previously approved organization mapping profile.
    Profile,
    /// The normalized header equals the normalized canonical name.
    Exact,
    /// The normalized header equals a normalized synonym.
    Synonym,
    /// Accepted on string similarity.
    Fuzzy,
}

impl MatchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Exact => "exact",
            Self::Synonym => "synonym",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// A raw header resolved to a canonical dictionary field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Matched canonical field.
    pub canonical: String,
    /// Original raw header text.
    pub detected: String,
    /// Mapping trust in `[0, 1]`.
    pub confidence_score: f64,
    pub source: MatchSource,
    /// Copied from the dictionary entry.
    pub required: bool,
    pub category: Category,
}

impl FieldMapping {
    /// Confidence level of this mapping under the given thresholds.
    pub fn level(&self, thresholds: &ConfidenceThresholds) -> Option<ConfidenceLevel> {
        thresholds.categorize(self.confidence_score)
    }
}

/// Confidence level categories for mapping quality assessment.
///
/// - `High`: near-certain matches that can be used without review
/// - `Medium`: good matches that should be verified
/// - `Low`: weak matches requiring manual confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

/// Configurable thresholds for categorizing mapping confidence.
///
/// - Below `low`: rejected (the header stays unmapped)
/// - `low` to `medium`: [`ConfidenceLevel::Low`]
/// - `medium` to `high`: [`ConfidenceLevel::Medium`]
/// - At or above `high`: [`ConfidenceLevel::High`]
///
/// An upload whose aggregate confidence falls below `medium` needs review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for high-quality matches (default: 0.95).
    pub high: f64,
    /// Minimum aggregate confidence that skips review (default: 0.80).
    pub medium: f64,
    /// Minimum confidence to accept a fuzzy match (default: 0.60).
    pub low: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: 0.95,
            medium: 0.80,
            low: 0.60,
        }
    }
}

impl ConfidenceThresholds {
    /// Creates thresholds with strict boundaries for high-quality mapping.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            high: 0.98,
            medium: 0.90,
            low: 0.75,
        }
    }

    /// Creates thresholds with relaxed boundaries for exploratory mapping.
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            high: 0.90,
            medium: 0.70,
            low: 0.50,
        }
    }

    /// Categorizes a confidence score into a confidence level.
    ///
    /// Returns `None` if the score is below the low threshold.
    #[must_use]
    pub fn categorize(&self, confidence: f64) -> Option<ConfidenceLevel> {
        if confidence >= self.high {
            Some(ConfidenceLevel::High)
        } else if confidence >= self.medium {
            Some(ConfidenceLevel::Medium)
        } else if confidence >= self.low {
            Some(ConfidenceLevel::Low)
        } else {
            None
        }
    }

    /// Whether an aggregate confidence score requires human review.
    #[must_use]
    pub fn needs_review(&self, aggregate: f64) -> bool {
        aggregate < self.medium
    }
}
