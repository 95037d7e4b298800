/*!
 * Review recommendation store.
 *
 * Tracks reviewer recommendations for a document, records how each one
 * affects the document's integrity, and queues the undecided ones as
 * questions for a human.
 */

pub mod evaluation;
pub mod models;
pub mod store;

pub use evaluation::{parse_evaluations, Evaluation};
pub use models::{
    DocumentContext, Impact, PendingQuestion, Recommendation, Resolution, ReviewSummary,
};
pub use store::{document_hash, EvaluationReport, ReviewStore};
