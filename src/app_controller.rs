use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, DetectorBackend, FeedbackMode};
use crate::detection::{ClassifierDetector, DetectionReport, Detector, DetectorAdapter, HeuristicDetector};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::humanize::{HumanizeConfig, HumanizeOutcome, Humanizer, RunReport};
use crate::review::{Recommendation, ReviewStore};
use crate::text::{Document, MetricsSnapshot, Scorer};

// @module: Application controller for humanization and review runs

/// What a humanize invocation should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Run the transform loop
    #[default]
    Humanize,
    /// Print the metrics of the input and stop
    MetricsOnly,
    /// Print the detector verdict of the input and stop
    DetectOnly,
}

impl RunMode {
    /// Modes that only report on the input and leave no files behind
    pub fn is_read_only(&self) -> bool {
        matches!(self, RunMode::MetricsOnly | RunMode::DetectOnly)
    }
}

/// One humanize invocation
#[derive(Debug, Clone, Default)]
pub struct HumanizeRequest {
    pub input: PathBuf,
    /// Output file; the result goes to stdout when absent
    pub output: Option<PathBuf>,
    /// Where to write the JSON run report
    pub history: Option<PathBuf>,
    pub quiet: bool,
    pub mode: RunMode,
}

/// Review store operations
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    Init {
        purpose: Option<String>,
        audience: Option<String>,
        constraints: Vec<String>,
        non_negotiables: Vec<String>,
    },
    Status,
    /// Merge recommendations from a JSON array (inline or `@file`)
    Import(String),
    /// Apply an evaluation payload (inline or `@file`)
    ApplyEvaluation(String),
    ListApproved,
    ListUncertain,
    MarkApplied { id: String, notes: Option<String> },
    MarkFailed { id: String, notes: Option<String> },
    /// Read answers from the pending questions file
    CollectAnswers,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a humanize invocation
    pub async fn run(&self, request: &HumanizeRequest) -> Result<()> {
        let text = Self::read_input(&request.input)?;

        match request.mode {
            RunMode::MetricsOnly => {
                let metrics = MetricsSnapshot::from_text(&text);
                println!("{}", self.format_metrics(&metrics));
                Ok(())
            }
            RunMode::DetectOnly => {
                let report = self.detect(&text).await?;
                println!("AI Detection Score: {:.1}%", report.ai_score * 100.0);
                println!("Classification: {}", report.label);
                debug!("{}", report.summary());
                Ok(())
            }
            RunMode::Humanize => {
                let started_at = Utc::now();
                let seed = self.config.humanize.seed.unwrap_or_else(rand::random);
                let outcome = self.humanize(&text, seed, request.quiet).await?;

                match &request.output {
                    Some(path) => {
                        FileManager::write_atomic(path, &outcome.document.to_text())?;
                        info!("Output written to: {}", path.display());
                    }
                    None => println!("{}", outcome.document.to_text()),
                }

                if let Some(history_path) = &request.history {
                    let report = RunReport::new(
                        request.input.display().to_string(),
                        self.config.humanize.feedback,
                        seed,
                        started_at,
                        &outcome,
                    );
                    let json = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize run report")?;
                    FileManager::write_atomic(history_path, &json)?;
                    info!("Run report written to: {}", history_path.display());
                }

                info!(
                    "Completed in {}: {}",
                    Self::format_duration((Utc::now() - started_at).to_std().unwrap_or_default()),
                    outcome.summary()
                );
                Ok(())
            }
        }
    }

    /// Run the loop over `text` with a seeded generator
    pub async fn humanize(&self, text: &str, seed: u64, quiet: bool) -> Result<HumanizeOutcome> {
        let config = HumanizeConfig::from_settings(&self.config.humanize, &self.config.scoring);
        let max_iterations = config.max_iterations as u64;
        let feedback = config.feedback;

        info!(
            "Humanizing with {} feedback, {} transform(s), seed {}",
            feedback,
            config.pipeline.kinds().len(),
            seed
        );

        let mut humanizer = Humanizer::new(config);
        if feedback == FeedbackMode::Detector {
            humanizer = humanizer.with_detector(self.build_detector().await?);
        }

        let progress_bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(max_iterations)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} iterations {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        let observer_bar = progress_bar.clone();
        let humanizer = humanizer.with_observer(Box::new(move |record| {
            observer_bar.inc(1);
            observer_bar.set_message(format!("score {:.3} noise {:.2}", record.score, record.control));
        }));

        let mut rng = StdRng::seed_from_u64(seed);
        let outcome = humanizer.run(Document::parse(text), &mut rng).await;
        progress_bar.finish_and_clear();

        outcome
    }

    /// Score `text` with the first available detector backend
    pub async fn detect(&self, text: &str) -> Result<DetectionReport> {
        let adapter = self.build_detector().await?;
        Ok(adapter.detect(text).await)
    }

    /// Build the configured backends and select the first available one
    pub async fn build_detector(&self) -> Result<DetectorAdapter> {
        let settings = self.config.detector.chunk_settings();
        let mut candidates: Vec<Arc<dyn Detector>> = Vec::new();

        for backend in &self.config.detector.available_backends {
            match backend.backend()? {
                DetectorBackend::Classifier => {
                    let endpoint = backend.resolved_endpoint();
                    match ClassifierDetector::new(
                        backend.model.clone(),
                        &endpoint,
                        backend.resolved_api_key(),
                        backend.human_labels.clone(),
                        Duration::from_secs(backend.timeout_secs),
                    ) {
                        Ok(detector) => candidates.push(Arc::new(detector)),
                        Err(e) => warn!("Skipping classifier backend {}: {}", endpoint, e),
                    }
                }
                DetectorBackend::Heuristic => {
                    candidates.push(Arc::new(HeuristicDetector::new(self.config.scoring)));
                }
            }
        }

        DetectorAdapter::select(candidates, settings)
            .await
            .map_err(|e| anyhow!(AppError::from(e)))
    }

    /// Run a review store operation on `document`
    pub fn run_review(&self, document: &Path, action: ReviewAction) -> Result<()> {
        if !FileManager::file_exists(document) {
            return Err(AppError::File(format!("Document not found: {}", document.display())).into());
        }
        let store = ReviewStore::new(document);

        match action {
            ReviewAction::Init {
                purpose,
                audience,
                constraints,
                non_negotiables,
            } => {
                let context = store.init_context(
                    purpose.as_deref(),
                    audience.as_deref(),
                    &constraints,
                    &non_negotiables,
                )?;
                let answered = store.collect_answers()?;
                println!("Document: {}", context.document_path);
                println!("Purpose: {}", context.purpose);
                println!("Audience: {}", context.audience);
                println!("Iteration: {}", context.iteration);
                if answered > 0 {
                    println!("Answers collected: {}", answered);
                }
            }
            ReviewAction::Status => {
                let iteration = store.load_context()?.map_or(0, |c| c.iteration);
                println!("Document: {}", document.display());
                println!("Iteration: {}", iteration);
                println!("{}", store.summary()?);
            }
            ReviewAction::Import(payload) => {
                let payload = Self::read_payload(&payload)?;
                let incoming: Vec<Recommendation> =
                    serde_json::from_str(&payload).context("Failed to parse recommendations")?;
                let added = store.merge_recommendations(incoming)?;
                println!("Imported {} new recommendation(s)", added);
            }
            ReviewAction::ApplyEvaluation(payload) => {
                let payload = Self::read_payload(&payload)?;
                let report = store.apply_evaluation(&payload)?;
                if !report.unknown_ids.is_empty() {
                    warn!("Unknown recommendation id(s): {}", report.unknown_ids.join(", "));
                }
                println!("Evaluation applied successfully");
                println!("{}", store.summary()?);
            }
            ReviewAction::ListApproved => {
                let approved = store.approved()?;
                println!("Approved recommendations ({}):", approved.len());
                for rec in approved {
                    println!("  [{}] ({}) {}", rec.id, rec.impact, Self::truncate(&rec.description, 60));
                }
            }
            ReviewAction::ListUncertain => {
                let uncertain = store.uncertain()?;
                println!("Uncertain recommendations ({}):", uncertain.len());
                for rec in uncertain {
                    println!("  [{}] {}", rec.id, Self::truncate(&rec.description, 60));
                    if let Some(reasoning) = rec.impact.reasoning().filter(|r| !r.is_empty()) {
                        println!("    Reasoning: {}", Self::truncate(reasoning, 80));
                    }
                }
            }
            ReviewAction::MarkApplied { id, notes } => {
                store.mark_applied(&id, notes.as_deref())?;
                println!("Marked {} as applied", id);
            }
            ReviewAction::MarkFailed { id, notes } => {
                store.mark_failed(&id, notes.as_deref())?;
                println!("Marked {} as failed", id);
            }
            ReviewAction::CollectAnswers => {
                let answered = store.collect_answers()?;
                println!("Collected {} answer(s)", answered);
            }
        }

        Ok(())
    }

    fn read_input(path: &Path) -> Result<String> {
        if !FileManager::file_exists(path) {
            return Err(AppError::File(format!("File not found: {}", path.display())).into());
        }
        FileManager::read_to_string(path)
    }

    /// Inline payload, or the content of the file named after `@`
    fn read_payload(arg: &str) -> Result<String> {
        match arg.strip_prefix('@') {
            Some(path) => FileManager::read_to_string(path),
            None => Ok(arg.to_string()),
        }
    }

    /// Metrics report printed by `--metrics-only`
    pub fn format_metrics(&self, metrics: &MetricsSnapshot) -> String {
        let score = Scorer::new(self.config.scoring).score(metrics);
        [
            format!("AI Score: {:.3}", score),
            format!("Sentence length variance: {:.1}", metrics.sentence_length_variance),
            format!("Average sentence length: {:.1} words", metrics.avg_sentence_length),
            format!("Conjunction density: {:.4}", metrics.conjunction_density),
            format!("Nominalization density: {:.4}", metrics.nominalization_density),
            format!("Em-dash density: {:.3}", metrics.em_dash_density),
            format!("AI word density: {:.4}", metrics.ai_word_density),
            format!("Sentence starter variety: {:.3}", metrics.sentence_starter_variety),
            format!("Contraction density: {:.4}", metrics.contraction_density),
        ]
        .join("\n")
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            text.to_string()
        } else {
            format!("{}...", text.chars().take(max_chars).collect::<String>())
        }
    }

    fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        if total_secs >= 60 {
            format!("{}m {}s", total_secs / 60, total_secs % 60)
        } else {
            format!("{}.{:01}s", total_secs, duration.subsec_millis() / 100)
        }
    }
}
