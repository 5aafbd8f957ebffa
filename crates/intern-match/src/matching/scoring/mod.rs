mod config;
mod rules;
mod tokens;

pub use config::MatchWeights;

use super::domain::{Opportunity, Student};
use serde::{Deserialize, Serialize};

/// Stateless scorer applying a fixed weight configuration to student/opportunity pairs.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: MatchWeights,
}

impl ScoringEngine {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn score(&self, student: &Student, opportunity: &Opportunity) -> MatchScore {
        let breakdown = rules::breakdown(student, opportunity);
        let score = round_score(breakdown.weighted_sum(&self.weights));
        MatchScore { score, breakdown }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(MatchWeights::default())
    }
}

/// Unweighted sub-metrics, each in `[0, 1]`.
///
/// Serializes with the camelCase keys consumers expect in the stored explanation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub skill_overlap: f64,
    pub sector_match: f64,
    pub location_match: f64,
    pub affirmative: f64,
}

impl ScoreBreakdown {
    pub fn weighted_sum(&self, weights: &MatchWeights) -> f64 {
        weights.skill * self.skill_overlap
            + weights.sector * self.sector_match
            + weights.location * self.location_match
            + weights.affirmative * self.affirmative
    }

    /// JSON object string persisted alongside each match result.
    pub fn explanation(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Rounded score plus the raw breakdown it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Rounds to two decimals, halves away from zero.
pub fn round_score(raw: f64) -> f64 {
    (raw * 100.0).round() / 100.0
}
