/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use humanizer::app_config::{BackendConfig, Config, DetectorBackend, FeedbackMode, LogLevel};
use humanizer::app_controller::RunMode;
use humanizer::transforms::{Preset, TransformKind};

use crate::common;

/// Test that a missing config file is created with the defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("humanizer.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load_or_create(&path)?, config);
    Ok(())
}

/// Test that a partial file fills the remaining fields with defaults
#[test]
fn test_loadOrCreate_withPartialFile_shouldApplyDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "humanizer.json",
        r#"{
            "humanize": { "feedback": "detector", "max_iterations": 4, "preset": "aggressive" },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.humanize.feedback, FeedbackMode::Detector);
    assert_eq!(config.humanize.max_iterations, 4);
    assert_eq!(config.humanize.initial_noise(), 0.3);
    assert_eq!(config.humanize.effective_target(), Some(0.5));
    assert_eq!(config.humanize.transform_kinds(), Preset::Aggressive.kinds());
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.detector.max_chunk_chars, 400);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that malformed JSON is a load error
#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "humanizer.json", "{ \"humanize\": ")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test the range checks of validation
#[test]
fn test_validate_withOutOfRangeValues_shouldFail() {
    let mut config = Config::default();
    config.humanize.noise_max = Some(1.2);
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detector.max_chunk_chars = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.humanize.feedback = FeedbackMode::Detector;
    config.detector.available_backends.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detector.available_backends[0].endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// Test that backends serialize their type under the "type" key
#[test]
fn test_backendConfig_shouldSerializeTypeKey() -> Result<()> {
    let backend = BackendConfig::new(DetectorBackend::Heuristic);
    let json = serde_json::to_value(&backend)?;

    assert_eq!(json["type"], "heuristic");
    let parsed: BackendConfig = serde_json::from_value(json)?;
    assert_eq!(parsed.backend()?, DetectorBackend::Heuristic);

    let unknown = BackendConfig {
        backend_type: "oracle".to_string(),
        ..backend
    };
    assert!(unknown.backend().is_err());
    Ok(())
}

/// Test that an explicit transform list round-trips in snake case
#[test]
fn test_config_withTransformList_shouldRoundTrip() -> Result<()> {
    let mut config = Config::default();
    config.humanize.transforms = vec![TransformKind::AiVocabulary, TransformKind::SentenceStarters];
    config.humanize.seed = Some(42);

    let json = serde_json::to_string_pretty(&config)?;
    assert!(json.contains("\"ai_vocabulary\""));

    let parsed: Config = serde_json::from_str(&json)?;
    assert_eq!(parsed, config);
    Ok(())
}

/// Test that report-only runs can load settings without leaving a config file
#[test]
fn test_loadOrDefault_forReadOnlyModes_shouldNotCreateFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("humanizer.json");

    for mode in [RunMode::MetricsOnly, RunMode::DetectOnly] {
        assert!(mode.is_read_only());
        let config = Config::load_or_default(&path)?;
        assert_eq!(config, Config::default());
        assert!(!path.exists());
    }
    assert!(!RunMode::Humanize.is_read_only());

    let path = common::create_test_file(dir.path(), "humanizer.json", r#"{"log_level": "debug"}"#)?;
    assert_eq!(Config::load_or_default(&path)?.log_level, LogLevel::Debug);
    Ok(())
}
