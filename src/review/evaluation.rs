/*!
 * Parsing of evaluation payloads.
 *
 * An evaluation is a JSON array of
 * `{ "id", "impact", "reasoning", "confidence", "question_for_human" }`
 * objects, either bare or wrapped in a fenced ```json block.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::models::Impact;
use crate::errors::ReviewError;

static FENCED_ARRAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").expect("Invalid fenced JSON regex")
});

/// One evaluated recommendation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Evaluation {
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub question_for_human: Option<String>,
}

impl Evaluation {
    /// Resolve the impact; a missing label counts as uncertain.
    pub fn to_impact(&self) -> Result<Impact, ReviewError> {
        let label = self.impact.as_deref().unwrap_or("uncertain");
        let reasoning = self.reasoning.clone().unwrap_or_default();

        Impact::from_label(label, reasoning, self.question_for_human.clone()).ok_or_else(|| {
            ReviewError::InvalidEvaluation(format!(
                "unknown impact '{}' for recommendation {}",
                label, self.id
            ))
        })
    }
}

/// Parse an evaluation payload.
pub fn parse_evaluations(payload: &str) -> Result<Vec<Evaluation>, ReviewError> {
    let json = FENCED_ARRAY
        .captures(payload)
        .and_then(|caps| caps.get(1))
        .map_or(payload.trim(), |m| m.as_str());

    serde_json::from_str(json).map_err(|e| ReviewError::InvalidEvaluation(e.to_string()))
}
