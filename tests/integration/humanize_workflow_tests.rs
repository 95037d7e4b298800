/*!
 * End-to-end tests for humanize runs through the controller
 */

use anyhow::Result;
use humanizer::app_config::{BackendConfig, Config, DetectorBackend, FeedbackMode};
use humanizer::app_controller::{Controller, HumanizeRequest, RunMode};
use humanizer::errors::AppError;
use humanizer::humanize::RunReport;
use humanizer::text::Document;
use std::fs;

use crate::common;

fn offline_config(seed: u64, max_iterations: usize) -> Config {
    let mut config = Config::default();
    config.humanize.seed = Some(seed);
    config.humanize.max_iterations = max_iterations;
    config.detector.available_backends = vec![BackendConfig::new(DetectorBackend::Heuristic)];
    config
}

/// Test a full run writing the output and the run report
#[tokio::test]
async fn test_run_withOutputAndHistory_shouldWriteBothFiles() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "draft.md", &common::mixed_document())?;
    let output = dir.path().join("draft.human.md");
    let history = dir.path().join("draft.history.json");

    let controller = Controller::with_config(offline_config(17, 3))?;
    let request = HumanizeRequest {
        input: input.clone(),
        output: Some(output.clone()),
        history: Some(history.clone()),
        quiet: true,
        mode: RunMode::Humanize,
    };
    controller.run(&request).await?;

    let written = fs::read_to_string(&output)?;
    let original = Document::parse(&common::mixed_document());
    let result = Document::parse(&written);
    assert_eq!(result.len(), original.len());
    assert!(written.starts_with("# Findings — Overview"));

    let report: RunReport = serde_json::from_str(&fs::read_to_string(&history)?)?;
    assert_eq!(report.seed, 17);
    assert_eq!(report.feedback, FeedbackMode::Heuristic);
    assert!(!report.records.is_empty());
    assert!(report.records.len() <= 3);
    assert_eq!(report.input, input.display().to_string());
    Ok(())
}

/// Test that a fixed seed reproduces the same output
#[test]
fn test_humanize_withSameSeed_shouldBeReproducible() -> Result<()> {
    let controller = Controller::with_config(offline_config(99, 4))?;
    let text = common::mixed_document();

    let first = tokio_test::block_on(controller.humanize(&text, 99, true))?;
    let second = tokio_test::block_on(controller.humanize(&text, 99, true))?;

    assert_eq!(first.document, second.document);
    assert_eq!(first.history.len(), second.history.len());
    Ok(())
}

/// Test that detector feedback works with only the local backend configured
#[tokio::test]
async fn test_humanize_withDetectorFeedback_shouldUseHeuristicBackend() -> Result<()> {
    let mut config = offline_config(5, 3);
    config.humanize.feedback = FeedbackMode::Detector;
    let controller = Controller::with_config(config)?;

    let outcome = controller.humanize(common::AI_PARAGRAPH, 5, true).await?;

    assert!(!outcome.history.is_empty());
    assert!(outcome.history.len() <= 3);
    assert!(outcome.history.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    Ok(())
}

/// Test the metrics-only and detect-only modes leave no output behind
#[tokio::test]
async fn test_run_withReportOnlyModes_shouldNotWriteOutput() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "draft.md", common::AI_PARAGRAPH)?;
    let output = dir.path().join("out.md");
    let controller = Controller::with_config(offline_config(1, 2))?;

    for mode in [RunMode::MetricsOnly, RunMode::DetectOnly] {
        let request = HumanizeRequest {
            input: input.clone(),
            output: Some(output.clone()),
            quiet: true,
            mode,
            ..Default::default()
        };
        controller.run(&request).await?;
        assert!(!output.exists());
    }

    let report = controller.detect(common::AI_PARAGRAPH).await?;
    assert_eq!(report.backend, "heuristic");
    Ok(())
}

/// Test that a missing input is a file error
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = Controller::with_config(offline_config(1, 2))?;
    let request = HumanizeRequest {
        input: dir.path().join("missing.md"),
        quiet: true,
        ..Default::default()
    };

    let err = controller.run(&request).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::File(_))));
    Ok(())
}

/// Test that an invalid configuration is refused up front
#[test]
fn test_withConfig_withInvalidNoise_shouldFail() {
    let mut config = offline_config(1, 2);
    config.humanize.noise = Some(2.0);

    assert!(Controller::with_config(config).is_err());
}
