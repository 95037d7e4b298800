/*!
 * # humanizer - iterative text humanization
 *
 * A Rust library that rewrites prose in rounds of probabilistic transforms
 * and re-scores it after each round until it stops improving.
 *
 * ## Features
 *
 * - Lexical metrics and a weighted "AI-likeness" score
 * - Eighteen independent, probability-gated transforms:
 *   - vocabulary and phrase substitution
 *   - em-dash and conjunction rewriting
 *   - sentence splitting and starter variation
 *   - contractions, hedging and transition variety
 *   - asides, fillers, interjections and occasional typos
 * - Heuristic or detector feedback with an adaptive intensity
 * - Chunked detector adapter with per-chunk timeouts and backend fallback
 * - Review recommendation store with evaluation and question queue
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `text`: Document model, metrics and scoring
 * - `transforms`: Transform registry, presets and pipeline
 * - `humanize`: Iteration controller and run history
 * - `detection`: Detector trait, backends and chunking adapter
 * - `review`: Recommendation store
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod detection;
pub mod errors;
pub mod file_utils;
pub mod humanize;
pub mod review;
pub mod text;
pub mod transforms;

// Re-export main types for easier usage
pub use app_config::Config;
pub use detection::{DetectionReport, Detector, DetectorAdapter};
pub use errors::{AppError, DetectorError, ReviewError};
pub use humanize::{HumanizeConfig, HumanizeOutcome, Humanizer};
pub use text::{Document, MetricsSnapshot, Scorer};
pub use transforms::{Pipeline, Preset, TransformKind};
