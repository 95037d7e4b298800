use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::detection::ChunkSettings;
use crate::text::ScoreWeights;
use crate::transforms::{ControlProfile, Preset, TransformKind};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Iteration loop settings
    #[serde(default)]
    pub humanize: HumanizeSettings,

    /// Detector backends and chunking
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Weights of the heuristic score
    #[serde(default)]
    pub scoring: ScoreWeights,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where the loop takes its score from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    /// Weighted lexical score
    #[default]
    Heuristic,
    /// AI probability from the detector adapter
    Detector,
}

impl std::fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::Detector => write!(f, "detector"),
        }
    }
}

/// Settings of the humanization loop
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HumanizeSettings {
    /// Maximum number of transform rounds
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Starting intensity; defaults depend on the feedback mode
    #[serde(default)]
    pub noise: Option<f64>,

    /// Upper bound of the adaptive intensity; defaults depend on the preset
    #[serde(default)]
    pub noise_max: Option<f64>,

    /// Intensity increase after a round without improvement; defaults depend on the preset
    #[serde(default)]
    pub noise_step: Option<f64>,

    /// Minimum score drop that counts as improvement; defaults depend on the preset
    #[serde(default)]
    pub improvement_epsilon: Option<f64>,

    /// Heuristic mode stops once the score changes less than this
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,

    /// Stop once the score falls below this value
    #[serde(default)]
    pub target: Option<f64>,

    /// Feedback source
    #[serde(default)]
    pub feedback: FeedbackMode,

    /// Named transform sequence used when `transforms` is empty
    #[serde(default)]
    pub preset: Preset,

    /// Explicit transform order; overrides the preset
    #[serde(default)]
    pub transforms: Vec<TransformKind>,

    /// Seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_iterations() -> usize {
    10
}

fn default_convergence_threshold() -> f64 {
    0.1
}

/// Starting intensity with heuristic feedback
pub const DEFAULT_HEURISTIC_NOISE: f64 = 0.5;

/// Starting intensity with detector feedback
pub const DEFAULT_DETECTOR_NOISE: f64 = 0.3;

/// Target AI probability with detector feedback
pub const DEFAULT_DETECTOR_TARGET: f64 = 0.5;

impl Default for HumanizeSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            noise: None,
            noise_max: None,
            noise_step: None,
            improvement_epsilon: None,
            convergence_threshold: default_convergence_threshold(),
            target: None,
            feedback: FeedbackMode::default(),
            preset: Preset::default(),
            transforms: Vec::new(),
            seed: None,
        }
    }
}

impl HumanizeSettings {
    /// Starting intensity for the configured feedback mode
    pub fn initial_noise(&self) -> f64 {
        self.noise.unwrap_or(match self.feedback {
            FeedbackMode::Heuristic => DEFAULT_HEURISTIC_NOISE,
            FeedbackMode::Detector => DEFAULT_DETECTOR_NOISE,
        })
    }

    /// Target score for the configured feedback mode
    pub fn effective_target(&self) -> Option<f64> {
        match (self.target, self.feedback) {
            (Some(target), _) => Some(target),
            (None, FeedbackMode::Detector) => Some(DEFAULT_DETECTOR_TARGET),
            (None, FeedbackMode::Heuristic) => None,
        }
    }

    /// Intensity schedule of the preset with explicit values taking precedence
    pub fn control(&self) -> ControlProfile {
        let preset = self.preset.control();
        ControlProfile {
            noise_max: self.noise_max.unwrap_or(preset.noise_max),
            noise_step: self.noise_step.unwrap_or(preset.noise_step),
            improvement_epsilon: self.improvement_epsilon.unwrap_or(preset.improvement_epsilon),
        }
    }

    /// Transform order, from the explicit list or the preset
    pub fn transform_kinds(&self) -> Vec<TransformKind> {
        if self.transforms.is_empty() {
            self.preset.kinds()
        } else {
            self.transforms.clone()
        }
    }
}

/// Detector backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    /// Remote text-classification endpoint
    #[default]
    Classifier,
    /// Local lexical heuristic
    Heuristic,
}

impl DetectorBackend {
    pub fn display_name(&self) -> &str {
        match self {
            Self::Classifier => "Classifier",
            Self::Heuristic => "Heuristic",
        }
    }

    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Classifier => "classifier".to_string(),
            Self::Heuristic => "heuristic".to_string(),
        }
    }
}

impl std::fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for DetectorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "classifier" => Ok(Self::Classifier),
            "heuristic" => Ok(Self::Heuristic),
            _ => Err(anyhow!("Invalid detector backend: {}", s)),
        }
    }
}

/// Configuration of one detector backend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BackendConfig {
    /// Backend type identifier
    #[serde(rename = "type")]
    pub backend_type: String,

    /// Model identifier; used to build the endpoint when none is given
    #[serde(default = "String::new")]
    pub model: String,

    /// Bearer token; falls back to the `HF_TOKEN` environment variable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Labels that mean "human-written"
    #[serde(default = "default_human_labels")]
    pub human_labels: Vec<String>,

    /// Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_human_labels() -> Vec<String> {
    vec!["LABEL_0".to_string(), "Human".to_string(), "Real".to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_classifier_model() -> String {
    "openai-community/roberta-base-openai-detector".to_string()
}

const INFERENCE_API_BASE: &str = "https://api-inference.huggingface.co/models";

impl BackendConfig {
    pub fn new(backend: DetectorBackend) -> Self {
        match backend {
            DetectorBackend::Classifier => Self {
                backend_type: backend.to_lowercase_string(),
                model: default_classifier_model(),
                api_key: String::new(),
                endpoint: String::new(),
                human_labels: default_human_labels(),
                timeout_secs: default_timeout_secs(),
            },
            DetectorBackend::Heuristic => Self {
                backend_type: backend.to_lowercase_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: String::new(),
                human_labels: Vec::new(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }

    pub fn backend(&self) -> Result<DetectorBackend> {
        self.backend_type.parse()
    }

    /// Endpoint URL, derived from the model when not set explicitly
    pub fn resolved_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            format!("{}/{}", INFERENCE_API_BASE, self.model)
        } else {
            self.endpoint.clone()
        }
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        if self.api_key.is_empty() {
            std::env::var("HF_TOKEN").ok().filter(|k| !k.is_empty())
        } else {
            Some(self.api_key.clone())
        }
    }
}

/// Detector configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Backends probed in order; the first available one is used
    #[serde(default = "default_backends")]
    pub available_backends: Vec<BackendConfig>,

    /// Maximum characters per chunk
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Shorter chunks are not scored
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,

    /// Per-chunk timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub chunk_timeout_secs: u64,
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new(DetectorBackend::Classifier),
        BackendConfig::new(DetectorBackend::Heuristic),
    ]
}

fn default_max_chunk_chars() -> usize {
    400
}

fn default_min_chunk_chars() -> usize {
    50
}

impl DetectorConfig {
    /// Chunking settings for the detector adapter
    pub fn chunk_settings(&self) -> ChunkSettings {
        ChunkSettings {
            max_chars: self.max_chunk_chars,
            min_chars: self.min_chunk_chars,
            timeout: Duration::from_secs(self.chunk_timeout_secs),
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            available_backends: default_backends(),
            max_chunk_chars: default_max_chunk_chars(),
            min_chunk_chars: default_min_chunk_chars(),
            chunk_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow!("{} must be between 0 and 1, got {}", name, value));
    }
    Ok(())
}

impl Config {
    /// Load a configuration file, or write the defaults there when absent
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            log::warn!("Config file not found at '{}', creating default config.", path.display());
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Load a configuration file, falling back to the defaults without
    /// writing anything when it is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_or_create(path);
        }
        log::debug!("Config file not found at '{}', using defaults.", path.display());
        Ok(Config::default())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let h = &self.humanize;

        let control = h.control();
        check_unit("noise", h.initial_noise())?;
        check_unit("noise_max", control.noise_max)?;
        check_unit("noise_step", control.noise_step)?;

        if control.improvement_epsilon < 0.0 {
            return Err(anyhow!("improvement_epsilon must not be negative"));
        }
        if h.convergence_threshold < 0.0 {
            return Err(anyhow!("convergence_threshold must not be negative"));
        }
        if let Some(target) = h.target {
            if !target.is_finite() {
                return Err(anyhow!("target must be a finite number"));
            }
        }

        self.scoring.validate().map_err(|e| anyhow!(e))?;

        if self.detector.max_chunk_chars == 0 {
            return Err(anyhow!("max_chunk_chars must be greater than zero"));
        }
        if self.detector.chunk_timeout_secs == 0 {
            return Err(anyhow!("chunk_timeout_secs must be greater than zero"));
        }

        if h.feedback == FeedbackMode::Detector && self.detector.available_backends.is_empty() {
            return Err(anyhow!("Detector feedback requires at least one detector backend"));
        }

        for backend in &self.detector.available_backends {
            if backend.backend()? == DetectorBackend::Classifier {
                let endpoint = backend.resolved_endpoint();
                url::Url::parse(&endpoint)
                    .with_context(|| format!("Invalid classifier endpoint: {}", endpoint))?;
            }
        }

        Ok(())
    }
}
