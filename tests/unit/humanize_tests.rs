/*!
 * Tests for the iteration controller
 */

use std::sync::Arc;

use anyhow::Result;
use humanizer::app_config::{FeedbackMode, HumanizeSettings};
use humanizer::detection::{ChunkSettings, DetectorAdapter, MockDetector};
use humanizer::humanize::{HumanizeConfig, Humanizer, ScoreSource, StopReason};
use humanizer::text::{Document, ScoreWeights};
use humanizer::transforms::{Pipeline, Preset};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{self, ZeroRng};

/// Test that the history never grows past the iteration budget
#[tokio::test]
async fn test_run_withAnySeed_shouldKeepHistoryWithinBudget() -> Result<()> {
    for max_iterations in [1usize, 2, 5] {
        for seed in 0..4 {
            let config = HumanizeConfig::heuristic()
                .with_max_iterations(max_iterations)
                .with_convergence_threshold(0.0)
                .with_pipeline(Pipeline::from_preset(Preset::Aggressive));
            let mut rng = StdRng::seed_from_u64(seed);

            let outcome = Humanizer::new(config)
                .run(Document::parse(&common::mixed_document()), &mut rng)
                .await?;

            assert!(outcome.history.len() <= max_iterations);
        }
    }
    Ok(())
}

/// Test that a run with an unreachable target and no convergence uses the full budget
#[tokio::test]
async fn test_run_withZeroThreshold_shouldStopAtMaxIterations() -> Result<()> {
    let config = HumanizeConfig::heuristic()
        .with_max_iterations(3)
        .with_convergence_threshold(0.0);

    let outcome = Humanizer::new(config)
        .run(Document::parse(common::AI_PARAGRAPH), &mut ZeroRng)
        .await?;

    assert_eq!(outcome.stop_reason, StopReason::MaxIterations);
    assert!(outcome.history.len() <= 3);
    assert!(outcome.history.iter().all(|r| r.source == ScoreSource::Heuristic));
    Ok(())
}

/// Test that heuristic feedback lowers the score of machine-sounding prose
#[tokio::test]
async fn test_run_withAiParagraph_shouldLowerScore() -> Result<()> {
    let config = HumanizeConfig::heuristic()
        .with_noise(1.0)
        .with_pipeline(Pipeline::from_preset(Preset::Aggressive));

    let outcome = Humanizer::new(config)
        .run(Document::parse(common::AI_PARAGRAPH), &mut ZeroRng)
        .await?;

    let first = outcome.initial_score().unwrap_or_default();
    let last = outcome.last_score().unwrap_or_default();
    assert!(last < first, "score did not improve: {} -> {}", first, last);
    assert!(outcome.document.to_text() != common::AI_PARAGRAPH);
    Ok(())
}

/// Test that the structural paragraphs survive a full run
#[tokio::test]
async fn test_run_shouldKeepStructuralParagraphs() -> Result<()> {
    let input = Document::parse(&common::mixed_document());
    let config = HumanizeConfig::heuristic().with_pipeline(Pipeline::from_preset(Preset::Aggressive));

    let outcome = Humanizer::new(config)
        .run(input.clone(), &mut StdRng::seed_from_u64(7))
        .await?;

    for (before, after) in input.paragraphs.iter().zip(&outcome.document.paragraphs) {
        if before.is_structural() {
            assert_eq!(before, after);
        }
    }
    Ok(())
}

/// Test that a detector that never scores falls back to 0.5
#[tokio::test]
async fn test_run_withFailingDetector_shouldRecordFallback() -> Result<()> {
    let adapter = DetectorAdapter::new(Arc::new(MockDetector::failing()), ChunkSettings::default());
    let config = HumanizeConfig::detector().with_max_iterations(2);

    let outcome = Humanizer::new(config)
        .with_detector(adapter)
        .run(Document::parse(common::AI_PARAGRAPH), &mut ZeroRng)
        .await?;

    assert_eq!(outcome.history.len(), 2);
    for record in &outcome.history {
        assert_eq!(record.score, 0.5);
        assert_eq!(record.source, ScoreSource::DetectorFallback);
    }
    Ok(())
}

/// Test that detector feedback stops once the score drops below target
#[tokio::test]
async fn test_run_withImprovingDetector_shouldReachTarget() -> Result<()> {
    let detector = MockDetector::sequence(vec![0.9, 0.7, 0.4]);
    // one chunk per detection so each call consumes one scripted score
    let settings = ChunkSettings {
        max_chars: 10_000,
        ..Default::default()
    };
    let adapter = DetectorAdapter::new(Arc::new(detector.clone()), settings);
    let config = HumanizeConfig::detector();
    assert_eq!(config.feedback, FeedbackMode::Detector);

    let outcome = Humanizer::new(config)
        .with_detector(adapter)
        .run(Document::parse(common::AI_PARAGRAPH), &mut ZeroRng)
        .await?;

    let scores: Vec<f64> = outcome.history.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![0.9, 0.7, 0.4]);
    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    // improving scores keep the intensity at its start value
    assert!(outcome.history.iter().all(|r| (r.control - 0.3).abs() < 1e-9));
    assert_eq!(detector.calls(), 3);
    Ok(())
}

/// Test that the aggressive preset selects its own intensity schedule
#[test]
fn test_humanizeConfig_withAggressivePreset_shouldUseAggressiveControl() {
    let config = HumanizeConfig::detector().with_preset(Preset::Aggressive);
    assert_eq!(config.noise_step, 0.15);
    assert_eq!(config.improvement_epsilon, 0.03);
    assert_eq!(config.noise_max, 0.9);
    assert_eq!(config.pipeline, Pipeline::from_preset(Preset::Aggressive));

    let settings = HumanizeSettings {
        preset: Preset::Aggressive,
        ..Default::default()
    };
    let config = HumanizeConfig::from_settings(&settings, &ScoreWeights::default());
    assert_eq!(config.noise_step, 0.15);
    assert_eq!(config.improvement_epsilon, 0.03);
    assert_eq!(config.noise_max, 0.9);

    let conservative = HumanizeConfig::from_settings(&HumanizeSettings::default(), &ScoreWeights::default());
    assert_eq!(conservative.noise_step, 0.1);
    assert_eq!(conservative.improvement_epsilon, 0.02);
    assert_eq!(conservative.noise_max, 0.8);
}

/// Test that a stuck detector raises the aggressive intensity in 0.15 steps up to 0.9
#[tokio::test]
async fn test_run_withAggressivePresetAndStuckDetector_shouldRaiseIntensityToCap() -> Result<()> {
    let adapter = DetectorAdapter::new(Arc::new(MockDetector::fixed(0.9)), ChunkSettings::default());
    let config = HumanizeConfig::detector()
        .with_preset(Preset::Aggressive)
        .with_max_iterations(7);

    let outcome = Humanizer::new(config)
        .with_detector(adapter)
        .run(Document::parse(common::AI_PARAGRAPH), &mut ZeroRng)
        .await?;

    let controls: Vec<f64> = outcome.history.iter().map(|r| r.control).collect();
    let expected = [0.3, 0.3, 0.45, 0.6, 0.75, 0.9, 0.9];
    assert_eq!(controls.len(), expected.len());
    for (actual, wanted) in controls.iter().zip(expected) {
        assert!((actual - wanted).abs() < 1e-9, "{:?}", controls);
    }
    Ok(())
}
