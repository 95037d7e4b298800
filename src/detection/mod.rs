/*!
 * AI-text detection behind a single adapter.
 *
 * This module contains the detector backends and the adapter that feeds
 * them text:
 * - `classifier`: remote text-classification endpoint
 * - `heuristic`: local backend built on the lexical scorer
 * - `mock`: scripted backend for tests
 *
 * The adapter splits text into word-bounded chunks, scores each chunk with a
 * timeout and averages the usable scores. When nothing can be scored it
 * reports the neutral probability 0.5 instead of failing.
 */

use std::fmt::{self, Debug};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::DetectorError;

pub mod classifier;
pub mod heuristic;
pub mod mock;

pub use classifier::ClassifierDetector;
pub use heuristic::HeuristicDetector;
pub use mock::{MockBehavior, MockDetector};

/// Score reported when no chunk could be scored
pub const FALLBACK_SCORE: f64 = 0.5;

/// Common trait for all detector backends
///
/// Backends are interchangeable behind the adapter; availability is decided
/// by `probe` rather than by type.
#[async_trait]
pub trait Detector: Send + Sync + Debug {
    /// Short backend name for logs and reports
    fn name(&self) -> &str;

    /// Check that the backend can be used
    async fn probe(&self) -> Result<(), DetectorError>;

    /// Probability in [0, 1] that the chunk is machine-generated
    async fn score_chunk(&self, chunk: &str) -> Result<f64, DetectorError>;
}

/// Split text into chunks of whole words, each at most `max_chars` long.
///
/// Words are whitespace-separated; a single word longer than `max_chars`
/// becomes its own chunk. Joining the chunks with single spaces gives the
/// whitespace-normalised input.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len + word_len + 1 > max_chars {
            if !current.is_empty() {
                chunks.push(current.join(" "));
            }
            current = vec![word];
            current_len = word_len;
        } else {
            current.push(word);
            current_len += word_len + 1;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Verdict of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "AI")]
    Ai,
    Human,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ai => write!(f, "AI"),
            Verdict::Human => write!(f, "Human"),
        }
    }
}

/// Outcome of scoring one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// Mean AI probability over the scored chunks
    pub ai_score: f64,
    pub human_score: f64,
    pub label: Verdict,
    /// Per-chunk AI probabilities, in text order
    pub chunk_scores: Vec<f64>,
    /// Chunks dropped as too short or failed
    pub chunks_skipped: usize,
    /// Backend that produced the scores
    pub backend: String,
}

impl DetectionReport {
    fn from_scores(chunk_scores: Vec<f64>, chunks_skipped: usize, backend: &str) -> Self {
        let ai_score = if chunk_scores.is_empty() {
            FALLBACK_SCORE
        } else {
            chunk_scores.iter().sum::<f64>() / chunk_scores.len() as f64
        };

        Self {
            ai_score,
            human_score: 1.0 - ai_score,
            label: if ai_score > 0.5 { Verdict::Ai } else { Verdict::Human },
            chunk_scores,
            chunks_skipped,
            backend: backend.to_string(),
        }
    }

    /// Whether the score is the neutral fallback rather than a measurement
    pub fn is_fallback(&self) -> bool {
        self.chunk_scores.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} (AI {:.1}%, Human {:.1}%) from {} chunk(s) via {}",
            self.label,
            self.ai_score * 100.0,
            self.human_score * 100.0,
            self.chunk_scores.len(),
            self.backend
        )
    }
}

/// Chunking and timeout settings of the adapter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSettings {
    pub max_chars: usize,
    /// Chunks shorter than this after trimming are not scored
    pub min_chars: usize,
    pub timeout: Duration,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            max_chars: 400,
            min_chars: 50,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Chunking front end over one selected backend
#[derive(Debug, Clone)]
pub struct DetectorAdapter {
    detector: Arc<dyn Detector>,
    settings: ChunkSettings,
}

impl DetectorAdapter {
    pub fn new(detector: Arc<dyn Detector>, settings: ChunkSettings) -> Self {
        Self { detector, settings }
    }

    /// Probe candidates in order and wrap the first available one.
    pub async fn select(
        candidates: Vec<Arc<dyn Detector>>,
        settings: ChunkSettings,
    ) -> Result<Self, DetectorError> {
        for candidate in candidates {
            match candidate.probe().await {
                Ok(()) => {
                    info!("Using detector backend '{}'", candidate.name());
                    return Ok(Self::new(candidate, settings));
                }
                Err(e) => {
                    warn!("Detector backend '{}' unavailable: {}", candidate.name(), e);
                }
            }
        }

        Err(DetectorError::Unavailable(
            "no configured detector backend is available".to_string(),
        ))
    }

    pub fn backend_name(&self) -> &str {
        self.detector.name()
    }

    pub fn settings(&self) -> &ChunkSettings {
        &self.settings
    }

    /// Score a text.
    ///
    /// Never fails: chunks that error or time out are skipped, and a text
    /// without any scored chunk reports [`FALLBACK_SCORE`].
    pub async fn detect(&self, text: &str) -> DetectionReport {
        let chunks = chunk_text(text, self.settings.max_chars);
        let timeout_ms = self.settings.timeout.as_millis() as u64;
        let mut scores = Vec::with_capacity(chunks.len());
        let mut skipped = 0usize;

        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.trim().chars().count() < self.settings.min_chars {
                debug!("Skipping short chunk {}", index);
                skipped += 1;
                continue;
            }

            let scored = tokio::time::timeout(self.settings.timeout, self.detector.score_chunk(chunk))
                .await
                .unwrap_or(Err(DetectorError::Timeout(timeout_ms)));

            match scored {
                Ok(score) if score.is_finite() => scores.push(score.clamp(0.0, 1.0)),
                Ok(score) => {
                    warn!("Chunk {} produced a non-finite score ({}), skipping", index, score);
                    skipped += 1;
                }
                Err(e) => {
                    warn!("Chunk {} could not be scored: {}", index, e);
                    skipped += 1;
                }
            }
        }

        if scores.is_empty() {
            debug!("No chunk scored, using fallback {}", FALLBACK_SCORE);
        }

        DetectionReport::from_scores(scores, skipped, self.detector.name())
    }
}
