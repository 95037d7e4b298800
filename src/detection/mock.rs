/*!
 * Mock detector for testing.
 *
 * - `MockDetector::fixed(p)` - Always scores `p`
 * - `MockDetector::sequence(..)` - Scores calls from a list, repeating the last
 * - `MockDetector::failing()` - Every chunk errors
 * - `MockDetector::unavailable()` - Probe fails
 * - `MockDetector::slow(ms, p)` - Sleeps before answering (for timeout tests)
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::Detector;
use crate::errors::DetectorError;

/// Behavior mode for the mock detector
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always returns the same score
    Fixed { score: f64 },
    /// Returns scores in order; the last one repeats
    Sequence { scores: Vec<f64> },
    /// Fails every Nth call, otherwise returns `score`
    Intermittent { fail_every: usize, score: f64 },
    /// Every chunk errors
    Failing,
    /// Probe fails; chunks error as well
    Unavailable,
    /// Answers `score` after a delay
    Slow { delay_ms: u64, score: f64 },
}

/// Scripted detector backend
#[derive(Debug, Clone)]
pub struct MockDetector {
    behavior: MockBehavior,
    /// Shared across clones so tests can inspect it
    call_count: Arc<AtomicUsize>,
}

impl MockDetector {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fixed(score: f64) -> Self {
        Self::new(MockBehavior::Fixed { score })
    }

    pub fn sequence(scores: Vec<f64>) -> Self {
        Self::new(MockBehavior::Sequence { scores })
    }

    pub fn intermittent(fail_every: usize, score: f64) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every, score })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn unavailable() -> Self {
        Self::new(MockBehavior::Unavailable)
    }

    pub fn slow(delay_ms: u64, score: f64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms, score })
    }

    /// Number of `score_chunk` calls so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Detector for MockDetector {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self) -> Result<(), DetectorError> {
        match self.behavior {
            MockBehavior::Unavailable => Err(DetectorError::Unavailable(
                "mock detector is unavailable".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn score_chunk(&self, _chunk: &str) -> Result<f64, DetectorError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Fixed { score } => Ok(*score),

            MockBehavior::Sequence { scores } => scores
                .get(count)
                .or_else(|| scores.last())
                .copied()
                .ok_or_else(|| DetectorError::ParseError("empty mock sequence".to_string())),

            MockBehavior::Intermittent { fail_every, score } => {
                if *fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(DetectorError::ApiError {
                        status_code: 503,
                        message: "Simulated intermittent failure".to_string(),
                    })
                } else {
                    Ok(*score)
                }
            }

            MockBehavior::Failing => Err(DetectorError::RequestFailed(
                "Simulated detector failure".to_string(),
            )),

            MockBehavior::Unavailable => Err(DetectorError::Unavailable(
                "mock detector is unavailable".to_string(),
            )),

            MockBehavior::Slow { delay_ms, score } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                Ok(*score)
            }
        }
    }
}
