/*!
 * Tests for the detector adapter and backends
 */

use std::sync::Arc;
use std::time::Duration;

use humanizer::detection::{
    chunk_text, ChunkSettings, Detector, DetectorAdapter, HeuristicDetector, MockDetector, Verdict,
    FALLBACK_SCORE,
};
use humanizer::text::ScoreWeights;

use crate::common;

/// Test that joining the chunks reproduces the normalised word sequence
#[test]
fn test_chunkText_shouldRoundTripWords() {
    let text = format!("{}\n\n  {}\tend", common::AI_PARAGRAPH, common::AI_PARAGRAPH);
    let normalised = text.split_whitespace().collect::<Vec<_>>().join(" ");

    for max_chars in [1, 10, 50, 400, 5_000] {
        let chunks = chunk_text(&text, max_chars);
        assert_eq!(chunks.join(" "), normalised, "round trip failed at {}", max_chars);
        for chunk in &chunks {
            let single_word = !chunk.contains(' ');
            assert!(single_word || chunk.chars().count() <= max_chars);
        }
    }
}

/// Test that an empty text scores exactly the fallback
#[tokio::test]
async fn test_detect_withEmptyText_shouldReturnHalf() {
    let adapter = DetectorAdapter::new(Arc::new(MockDetector::fixed(0.9)), ChunkSettings::default());
    let report = adapter.detect("").await;

    assert_eq!(report.ai_score, FALLBACK_SCORE);
    assert_eq!(report.human_score, 0.5);
    assert!(report.chunk_scores.is_empty());
}

/// Test that failed chunks are skipped and the rest averaged
#[tokio::test]
async fn test_detect_withIntermittentBackend_shouldSkipFailedChunks() {
    let settings = ChunkSettings {
        max_chars: 80,
        ..Default::default()
    };
    let detector = MockDetector::intermittent(2, 0.8);
    let adapter = DetectorAdapter::new(Arc::new(detector.clone()), settings);

    let text = "The committee reviewed every proposal submitted during the spring session. \
                The committee then ranked the proposals by cost and expected benefit. \
                The committee finally published the ranking for public comment online.";
    let report = adapter.detect(text).await;

    assert!(!report.chunk_scores.is_empty());
    assert!(report.chunks_skipped >= 1);
    assert!(report.chunk_scores.iter().all(|s| (*s - 0.8).abs() < 1e-9));
    assert_eq!(report.label, Verdict::Ai);
}

/// Test that a slow backend is bounded by the chunk timeout
#[tokio::test]
async fn test_detect_withSlowBackend_shouldFallBackAfterTimeout() {
    let settings = ChunkSettings {
        timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let adapter = DetectorAdapter::new(Arc::new(MockDetector::slow(1_000, 0.1)), settings);

    let report = adapter.detect(common::AI_PARAGRAPH).await;

    assert!(report.is_fallback());
    assert_eq!(report.ai_score, FALLBACK_SCORE);
}

/// Test that selection falls through unavailable backends to the heuristic one
#[tokio::test]
async fn test_select_withUnavailableFirst_shouldUseHeuristic() {
    let candidates: Vec<Arc<dyn Detector>> = vec![
        Arc::new(MockDetector::unavailable()),
        Arc::new(HeuristicDetector::new(ScoreWeights::default())),
    ];

    let adapter = DetectorAdapter::select(candidates, ChunkSettings::default())
        .await
        .unwrap();
    let report = adapter.detect(common::AI_PARAGRAPH).await;

    assert_eq!(adapter.backend_name(), "heuristic");
    assert!(report.ai_score > 0.0 && report.ai_score < 1.0);
    assert!(!report.is_fallback());
}

/// Test that the heuristic backend ranks machine-sounding prose higher
#[tokio::test]
async fn test_heuristicDetector_shouldRankAiParagraphHigher() {
    let detector = HeuristicDetector::new(ScoreWeights::default());
    let plain = "I walked to the shop. It was shut, so I went home again and made soup from what was left in the cupboard. Fine.";

    let ai = detector.score_chunk(common::AI_PARAGRAPH).await.unwrap();
    let human = detector.score_chunk(plain).await.unwrap();

    assert!(ai > human);
    assert!((0.0..1.0).contains(&ai));
}
