use serde::{Deserialize, Serialize};

/// Weight applied to each sub-metric when summing the match score.
///
/// Weights are used as given: nothing forces them to sum to one, so a generous
/// configuration can produce scores above 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skill: f64,
    pub sector: f64,
    pub location: f64,
    pub affirmative: f64,
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skill + self.sector + self.location + self.affirmative
    }
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill: 0.5,
            sector: 0.2,
            location: 0.2,
            affirmative: 0.1,
        }
    }
}
