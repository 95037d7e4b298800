/*!
 * Local detector built on the lexical scorer. Always available.
 */

use async_trait::async_trait;

use super::Detector;
use crate::errors::DetectorError;
use crate::text::{MetricsSnapshot, ScoreWeights, Scorer};

/// Maps the unbounded heuristic score `s` to `s / (1 + s)`
#[derive(Debug, Clone, Default)]
pub struct HeuristicDetector {
    scorer: Scorer,
}

impl HeuristicDetector {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            scorer: Scorer::new(weights),
        }
    }

    pub fn probability(&self, text: &str) -> f64 {
        let score = self.scorer.score(&MetricsSnapshot::from_text(text)).max(0.0);
        score / (1.0 + score)
    }
}

#[async_trait]
impl Detector for HeuristicDetector {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn probe(&self) -> Result<(), DetectorError> {
        Ok(())
    }

    async fn score_chunk(&self, chunk: &str) -> Result<f64, DetectorError> {
        Ok(self.probability(chunk))
    }
}
