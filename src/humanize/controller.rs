/*!
 * Iteration controller.
 *
 * Runs the state machine
 * `Init -> Score -> CheckConvergence -> (Stop | Transform -> Score)`.
 * Each `Transform` state is one round of the configured pipeline; the loop
 * runs at most `max_iterations` rounds and records one score per round, so
 * the history never exceeds `max_iterations` entries. The document produced
 * by the last round is returned without an extra score.
 */

use anyhow::{anyhow, Result};
use log::{debug, info, trace};
use rand::RngCore;

use super::history::{HumanizeOutcome, IterationRecord, ScoreSource, StopReason};
use crate::app_config::{
    FeedbackMode, HumanizeSettings, DEFAULT_DETECTOR_NOISE, DEFAULT_DETECTOR_TARGET,
    DEFAULT_HEURISTIC_NOISE,
};
use crate::detection::DetectorAdapter;
use crate::text::{Document, MetricsSnapshot, ScoreWeights, Scorer};
use crate::transforms::{Pipeline, Preset};

/// Configuration of one humanization run.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanizeConfig {
    /// Maximum number of transform rounds
    pub max_iterations: usize,

    /// Starting intensity
    pub noise: f64,

    /// Upper bound of the adaptive intensity
    pub noise_max: f64,

    /// Intensity increase after a round without improvement
    pub noise_step: f64,

    /// Minimum score drop that counts as improvement
    pub improvement_epsilon: f64,

    /// Heuristic feedback stops when the score changes less than this
    pub convergence_threshold: f64,

    /// Stop once the score falls below this value
    pub target: Option<f64>,

    pub feedback: FeedbackMode,

    /// Transforms applied in each round
    pub pipeline: Pipeline,

    pub weights: ScoreWeights,
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl HumanizeConfig {
    /// Heuristic feedback with default settings.
    pub fn heuristic() -> Self {
        let control = Preset::default().control();
        Self {
            max_iterations: 10,
            noise: DEFAULT_HEURISTIC_NOISE,
            noise_max: control.noise_max,
            noise_step: control.noise_step,
            improvement_epsilon: control.improvement_epsilon,
            convergence_threshold: 0.1,
            target: None,
            feedback: FeedbackMode::Heuristic,
            pipeline: Pipeline::default(),
            weights: ScoreWeights::default(),
        }
    }

    /// Detector feedback with default settings.
    pub fn detector() -> Self {
        Self {
            noise: DEFAULT_DETECTOR_NOISE,
            target: Some(DEFAULT_DETECTOR_TARGET),
            feedback: FeedbackMode::Detector,
            ..Self::heuristic()
        }
    }

    /// Build from the application settings.
    pub fn from_settings(settings: &HumanizeSettings, weights: &ScoreWeights) -> Self {
        let control = settings.control();
        Self {
            max_iterations: settings.max_iterations,
            noise: settings.initial_noise(),
            noise_max: control.noise_max,
            noise_step: control.noise_step,
            improvement_epsilon: control.improvement_epsilon,
            convergence_threshold: settings.convergence_threshold,
            target: settings.effective_target(),
            feedback: settings.feedback,
            pipeline: Pipeline::new(settings.transform_kinds()),
            weights: *weights,
        }
    }

    /// Set the maximum number of rounds.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the starting intensity.
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set the target score.
    pub fn with_target(mut self, target: Option<f64>) -> Self {
        self.target = target;
        self
    }

    /// Use a preset's transforms and intensity schedule.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        let control = preset.control();
        self.noise_max = control.noise_max;
        self.noise_step = control.noise_step;
        self.improvement_epsilon = control.improvement_epsilon;
        self.pipeline = Pipeline::from_preset(preset);
        self
    }

    /// Set the transform pipeline.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Set the convergence threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }
}

/// States of the iteration loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Init,
    Score,
    CheckConvergence,
    Transform,
    Stop(StopReason),
}

/// Callback invoked after every scored iteration
pub type IterationObserver = Box<dyn Fn(&IterationRecord) + Send + Sync>;

/// Drives documents through repeated transform rounds.
pub struct Humanizer {
    config: HumanizeConfig,
    scorer: Scorer,
    detector: Option<DetectorAdapter>,
    observer: Option<IterationObserver>,
}

impl Humanizer {
    pub fn new(config: HumanizeConfig) -> Self {
        let scorer = Scorer::new(config.weights);
        Self {
            config,
            scorer,
            detector: None,
            observer: None,
        }
    }

    /// Attach the detector used for detector feedback.
    pub fn with_detector(mut self, detector: DetectorAdapter) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Attach a progress observer.
    pub fn with_observer(mut self, observer: IterationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &HumanizeConfig {
        &self.config
    }

    /// Run the loop to completion.
    pub async fn run(&self, document: Document, rng: &mut dyn RngCore) -> Result<HumanizeOutcome> {
        if self.config.feedback == FeedbackMode::Detector && self.detector.is_none() {
            return Err(anyhow!("Detector feedback requested but no detector is configured"));
        }

        let mut document = document;
        let mut history: Vec<IterationRecord> = Vec::new();
        let mut control = self.config.noise;
        let mut rounds = 0usize;
        let mut state = ControlState::Init;

        let stop_reason = loop {
            trace!("Controller state: {:?}", state);

            state = match state {
                ControlState::Init => {
                    if self.config.max_iterations == 0 {
                        ControlState::Stop(StopReason::MaxIterations)
                    } else {
                        ControlState::Score
                    }
                }

                ControlState::Score => {
                    let (score, metrics, source) = self.score(&document).await;
                    let record = IterationRecord {
                        iteration: rounds,
                        score,
                        metrics,
                        control,
                        source,
                    };

                    debug!("Iteration {}: score {:.3} ({})", rounds, score, metrics.summary());
                    if let Some(observer) = &self.observer {
                        observer(&record);
                    }
                    history.push(record);

                    ControlState::CheckConvergence
                }

                ControlState::CheckConvergence => self.check_convergence(&history),

                ControlState::Transform => {
                    document = self.config.pipeline.apply(&document, control, rng);
                    rounds += 1;
                    control = self.adapt_control(control, &history);

                    if rounds >= self.config.max_iterations {
                        ControlState::Stop(StopReason::MaxIterations)
                    } else {
                        ControlState::Score
                    }
                }

                ControlState::Stop(reason) => break reason,
            };
        };

        info!("Humanization finished after {} round(s): {}", rounds, stop_reason);

        let final_metrics = MetricsSnapshot::from_document(&document);
        Ok(HumanizeOutcome {
            document,
            history,
            stop_reason,
            final_metrics,
        })
    }

    async fn score(&self, document: &Document) -> (f64, MetricsSnapshot, ScoreSource) {
        let metrics = MetricsSnapshot::from_document(document);

        match (&self.config.feedback, &self.detector) {
            (FeedbackMode::Detector, Some(detector)) => {
                let report = detector.detect(&document.to_text()).await;
                let source = if report.is_fallback() {
                    ScoreSource::DetectorFallback
                } else {
                    ScoreSource::Detector
                };
                (report.ai_score, metrics, source)
            }
            _ => (self.scorer.score(&metrics), metrics, ScoreSource::Heuristic),
        }
    }

    /// Decide whether the latest score ends the run.
    ///
    /// The target is checked first; the score-delta test only applies to
    /// heuristic feedback.
    pub fn check_convergence(&self, history: &[IterationRecord]) -> ControlState {
        let Some(latest) = history.last() else {
            return ControlState::Score;
        };

        if let Some(target) = self.config.target {
            if latest.score < target {
                return ControlState::Stop(StopReason::TargetReached);
            }
        }

        if self.config.feedback == FeedbackMode::Heuristic && history.len() >= 2 {
            let previous = history[history.len() - 2].score;
            if (previous - latest.score).abs() < self.config.convergence_threshold {
                return ControlState::Stop(StopReason::Converged);
            }
        }

        ControlState::Transform
    }

    /// Raise the intensity when detector feedback shows no improvement.
    pub fn adapt_control(&self, control: f64, history: &[IterationRecord]) -> f64 {
        if self.config.feedback != FeedbackMode::Detector || history.len() < 2 {
            return control;
        }

        let latest = history[history.len() - 1].score;
        let previous = history[history.len() - 2].score;

        if latest >= previous - self.config.improvement_epsilon {
            let raised = (control + self.config.noise_step).min(self.config.noise_max);
            if raised > control {
                debug!("No improvement ({:.3} -> {:.3}), raising intensity to {:.2}", previous, latest, raised);
            }
            raised.max(control)
        } else {
            control
        }
    }
}
