/*!
 * Weighted "AI-likeness" score over a metrics snapshot.
 *
 * The score is unbounded and uncalibrated; compare values of the same
 * document across iterations, never across documents.
 */

use serde::{Deserialize, Serialize};

use super::metrics::MetricsSnapshot;

/// Weights of the AI-likeness score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Variance below this value is penalised
    #[serde(default = "default_variance_threshold")]
    pub variance_threshold: f64,

    #[serde(default = "default_variance_weight")]
    pub variance_weight: f64,

    #[serde(default = "default_conjunction_weight")]
    pub conjunction_weight: f64,

    #[serde(default = "default_nominalization_weight")]
    pub nominalization_weight: f64,

    #[serde(default = "default_em_dash_weight")]
    pub em_dash_weight: f64,

    #[serde(default = "default_ai_word_weight")]
    pub ai_word_weight: f64,

    /// Starter variety below this value is penalised
    #[serde(default = "default_variety_threshold")]
    pub variety_threshold: f64,

    #[serde(default = "default_variety_weight")]
    pub variety_weight: f64,
}

fn default_variance_threshold() -> f64 {
    100.0
}

fn default_variance_weight() -> f64 {
    2.0
}

fn default_conjunction_weight() -> f64 {
    3.0
}

fn default_nominalization_weight() -> f64 {
    2.0
}

fn default_em_dash_weight() -> f64 {
    5.0
}

fn default_ai_word_weight() -> f64 {
    4.0
}

fn default_variety_threshold() -> f64 {
    0.5
}

fn default_variety_weight() -> f64 {
    2.0
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            variance_threshold: default_variance_threshold(),
            variance_weight: default_variance_weight(),
            conjunction_weight: default_conjunction_weight(),
            nominalization_weight: default_nominalization_weight(),
            em_dash_weight: default_em_dash_weight(),
            ai_word_weight: default_ai_word_weight(),
            variety_threshold: default_variety_threshold(),
            variety_weight: default_variety_weight(),
        }
    }
}

impl ScoreWeights {
    /// Weights must be non-negative for the score to stay monotone
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            ("variance_threshold", self.variance_threshold),
            ("variance_weight", self.variance_weight),
            ("conjunction_weight", self.conjunction_weight),
            ("nominalization_weight", self.nominalization_weight),
            ("em_dash_weight", self.em_dash_weight),
            ("ai_word_weight", self.ai_word_weight),
            ("variety_threshold", self.variety_threshold),
            ("variety_weight", self.variety_weight),
        ];

        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("Score weight '{}' must be a non-negative number", name));
            }
        }
        Ok(())
    }
}

/// Heuristic scorer; lower is more human-like
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, metrics: &MetricsSnapshot) -> f64 {
        let w = &self.weights;
        let mut score = 0.0;

        if metrics.sentence_length_variance < w.variance_threshold && w.variance_threshold > 0.0 {
            score += w.variance_weight * (w.variance_threshold - metrics.sentence_length_variance)
                / w.variance_threshold;
        }

        score += w.conjunction_weight * metrics.conjunction_density;
        score += w.nominalization_weight * metrics.nominalization_density;
        score += w.em_dash_weight * metrics.em_dash_density;
        score += w.ai_word_weight * metrics.ai_word_density;

        if metrics.sentence_starter_variety < w.variety_threshold {
            score += w.variety_weight * (w.variety_threshold - metrics.sentence_starter_variety);
        }

        score
    }
}
