/*!
 * Audit trail of a humanization run.
 */

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_config::FeedbackMode;
use crate::text::{Document, MetricsSnapshot};

/// Where an iteration score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Weighted lexical score
    Heuristic,
    /// Detector probability averaged over scored chunks
    Detector,
    /// Detector could not score any chunk; neutral 0.5
    DetectorFallback,
}

/// One scored iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Zero-based iteration index
    pub iteration: usize,
    pub score: f64,
    pub metrics: MetricsSnapshot,
    /// Intensity used for the transform round that follows this score
    pub control: f64,
    pub source: ScoreSource,
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// All transform rounds ran
    MaxIterations,
    /// Score fell below the target
    TargetReached,
    /// Score changed less than the convergence threshold
    Converged,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::MaxIterations => write!(f, "maximum iterations reached"),
            StopReason::TargetReached => write!(f, "target score reached"),
            StopReason::Converged => write!(f, "score converged"),
        }
    }
}

/// Result of a humanization run
#[derive(Debug, Clone)]
pub struct HumanizeOutcome {
    /// Final document
    pub document: Document,
    /// Scored iterations in order
    pub history: Vec<IterationRecord>,
    pub stop_reason: StopReason,
    /// Metrics of the final document
    pub final_metrics: MetricsSnapshot,
}

impl HumanizeOutcome {
    pub fn initial_score(&self) -> Option<f64> {
        self.history.first().map(|r| r.score)
    }

    pub fn last_score(&self) -> Option<f64> {
        self.history.last().map(|r| r.score)
    }

    /// Get a summary of the run.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} iteration(s)", self.history.len())];

        if let (Some(first), Some(last)) = (self.initial_score(), self.last_score()) {
            parts.push(format!("score {:.3} -> {:.3}", first, last));
        }

        parts.push(format!("stopped: {}", self.stop_reason));
        parts.join(" | ")
    }
}

/// Serializable report of a run, written with `--history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input: String,
    pub feedback: FeedbackMode,
    pub seed: u64,
    pub stop_reason: StopReason,
    pub records: Vec<IterationRecord>,
    pub final_metrics: MetricsSnapshot,
}

impl RunReport {
    pub fn new(
        input: impl Into<String>,
        feedback: FeedbackMode,
        seed: u64,
        started_at: DateTime<Utc>,
        outcome: &HumanizeOutcome,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            input: input.into(),
            feedback,
            seed,
            stop_reason: outcome.stop_reason,
            records: outcome.history.clone(),
            final_metrics: outcome.final_metrics,
        }
    }
}
