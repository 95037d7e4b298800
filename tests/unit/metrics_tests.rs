/*!
 * Tests for lexical metrics and the heuristic scorer
 */

use humanizer::text::{Document, MetricsSnapshot, ScoreWeights, Scorer};

use crate::common;

/// Test that raising only the em-dash density never lowers the score
#[test]
fn test_score_withMoreEmDashes_shouldNotDecrease() {
    let scorer = Scorer::default();
    let base = MetricsSnapshot::from_text(common::AI_PARAGRAPH);

    let mut previous = scorer.score(&base);
    for step in 1..=10 {
        let metrics = MetricsSnapshot {
            em_dash_density: base.em_dash_density + step as f64 * 0.25,
            ..base
        };
        let score = scorer.score(&metrics);
        assert!(score >= previous, "score fell from {} to {}", previous, score);
        previous = score;
    }
}

/// Test that em-dashes in text raise the em-dash density per sentence
#[test]
fn test_fromText_withDashes_shouldCountPerSentence() {
    let plain = MetricsSnapshot::from_text("Rates rose today. Prices fell.");
    let dashed = MetricsSnapshot::from_text("Rates rose—today. Prices--fell.");

    assert_eq!(plain.em_dash_density, 0.0);
    assert!((dashed.em_dash_density - 1.0).abs() < 1e-9);
}

/// Test that an empty document yields the zero snapshot instead of failing
#[test]
fn test_fromDocument_withEmptyDocument_shouldReturnDefault() {
    let metrics = MetricsSnapshot::from_document(&Document::parse(""));
    assert_eq!(metrics, MetricsSnapshot::default());
}

/// Test that machine-sounding prose scores above plain prose
#[test]
fn test_score_withAiParagraph_shouldExceedPlainProse() {
    let scorer = Scorer::new(ScoreWeights::default());
    let plain = "I walked to the shop. It was shut, so I went home again and made soup from what was left in the cupboard. Fine.";

    let ai_score = scorer.score(&MetricsSnapshot::from_text(common::AI_PARAGRAPH));
    let plain_score = scorer.score(&MetricsSnapshot::from_text(plain));

    assert!(ai_score > plain_score);
}

/// Test that low starter variety is penalised
#[test]
fn test_score_withRepeatedStarters_shouldAddPenalty() {
    let scorer = Scorer::default();
    let varied = MetricsSnapshot {
        sentence_length_variance: 200.0,
        sentence_starter_variety: 1.0,
        ..Default::default()
    };
    let repeated = MetricsSnapshot {
        sentence_starter_variety: 0.2,
        ..varied
    };

    assert_eq!(scorer.score(&varied), 0.0);
    assert!(scorer.score(&repeated) > 0.0);
}
