/*!
 * Iterative humanization.
 *
 * - `controller`: the score/transform loop and its stop conditions
 * - `history`: iteration records, stop reasons and the JSON run report
 */

pub mod controller;
pub mod history;

pub use controller::{ControlState, HumanizeConfig, Humanizer, IterationObserver};
pub use history::{HumanizeOutcome, IterationRecord, RunReport, ScoreSource, StopReason};
