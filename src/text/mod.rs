/*!
 * Text model and heuristic analysis.
 *
 * - `document`: paragraphs, structural markers and sentence segmentation
 * - `metrics`: lexical statistics of a document
 * - `scoring`: weighted AI-likeness score
 * - `vocabulary`: word lists shared with the transforms
 */

pub mod document;
pub mod metrics;
pub mod scoring;
pub mod vocabulary;

pub use document::{sentence_spans, split_sentences, Document, Paragraph};
pub use metrics::MetricsSnapshot;
pub use scoring::{ScoreWeights, Scorer};
