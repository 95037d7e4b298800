/*!
 * File-backed review state.
 *
 * All state lives next to the reviewed document:
 *
 * - `<doc>.context.json` - purpose, audience and constraints
 * - `<doc>.recommendations.json` - recommendations with impact and resolution
 * - `<doc>.pending_questions.json` - questions awaiting a human answer
 * - `<doc>.pending_questions.md` - editable view of the unanswered questions
 * - `<doc>.changelog.md` - append-only log of applied and failed changes
 *
 * Missing files load as empty state. A file that exists but does not parse is
 * an error and the operation writes nothing. JSON files are replaced
 * atomically.
 */

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::evaluation::parse_evaluations;
use super::models::{
    DocumentContext, Impact, PendingQuestion, Recommendation, Resolution, ReviewSummary,
    DEFAULT_AUDIENCE, DEFAULT_OPTIONS, DEFAULT_PURPOSE,
};
use crate::errors::ReviewError;
use crate::file_utils::FileManager;

static ANSWER_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)## Question: (\S+).*?\*\*ANSWER:\*\*[ \t]*(.*?)(?:\n---|\z)")
        .expect("Invalid answer regex")
});

/// Outcome of applying an evaluation payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Recommendations whose impact was set
    pub updated: usize,
    /// Recommendations rejected because they decrease integrity
    pub auto_rejected: usize,
    /// Questions queued for uncertain recommendations
    pub questions_queued: usize,
    /// Evaluated ids with no matching recommendation
    pub unknown_ids: Vec<String>,
}

/// Review state of one document
#[derive(Debug, Clone)]
pub struct ReviewStore {
    document: PathBuf,
}

impl ReviewStore {
    pub fn new<P: AsRef<Path>>(document: P) -> Self {
        Self {
            document: document.as_ref().to_path_buf(),
        }
    }

    pub fn document_path(&self) -> &Path {
        &self.document
    }

    pub fn context_path(&self) -> PathBuf {
        FileManager::derived_path(&self.document, "context.json")
    }

    pub fn recommendations_path(&self) -> PathBuf {
        FileManager::derived_path(&self.document, "recommendations.json")
    }

    pub fn questions_path(&self) -> PathBuf {
        FileManager::derived_path(&self.document, "pending_questions.json")
    }

    pub fn questions_markdown_path(&self) -> PathBuf {
        FileManager::derived_path(&self.document, "pending_questions.md")
    }

    pub fn changelog_path(&self) -> PathBuf {
        FileManager::derived_path(&self.document, "changelog.md")
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !FileManager::file_exists(path) {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(ReviewError::from)?;
        match serde_json::from_str(&content) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                let err = ReviewError::MalformedJson {
                    path: path.display().to_string(),
                    message: e.to_string(),
                };
                error!("{}", err);
                Err(err.into())
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {:?}", path))?;
        FileManager::write_atomic(path, &json)
    }

    /// Load the document context, if one was created.
    pub fn load_context(&self) -> Result<Option<DocumentContext>> {
        Self::read_json(&self.context_path())
    }

    /// Create or update the document context.
    ///
    /// An existing context is reused unless a new purpose is given; constraints
    /// and non-negotiables are appended. Also starts the changelog.
    pub fn init_context(
        &self,
        purpose: Option<&str>,
        audience: Option<&str>,
        constraints: &[String],
        non_negotiables: &[String],
    ) -> Result<DocumentContext> {
        let existing = self.load_context()?;

        let mut context = match existing {
            Some(mut context) if purpose.is_none() => {
                if let Some(audience) = audience {
                    context.audience = audience.to_string();
                }
                context.iteration += 1;
                context
            }
            _ => {
                let content = FileManager::read_to_string(&self.document)?;
                DocumentContext {
                    document_path: self.document.display().to_string(),
                    purpose: purpose.unwrap_or(DEFAULT_PURPOSE).to_string(),
                    audience: audience.unwrap_or(DEFAULT_AUDIENCE).to_string(),
                    constraints: Vec::new(),
                    non_negotiables: Vec::new(),
                    iteration: 0,
                    document_hash: document_hash(&content),
                    created_at: Utc::now(),
                }
            }
        };

        context.constraints.extend(constraints.iter().cloned());
        context.non_negotiables.extend(non_negotiables.iter().cloned());
        Self::write_json(&self.context_path(), &context)?;

        let changelog = self.changelog_path();
        if !FileManager::file_exists(&changelog) {
            let header = format!(
                "# Changelog for {}\n\nStarted: {}\nPurpose: {}\nAudience: {}\n",
                self.document.display(),
                context.created_at.to_rfc3339(),
                context.purpose,
                context.audience
            );
            FileManager::write_atomic(&changelog, &header)?;
        }

        info!("Review context ready for {:?} (hash {})", self.document, context.document_hash);
        Ok(context)
    }

    pub fn load_recommendations(&self) -> Result<Vec<Recommendation>> {
        Ok(Self::read_json(&self.recommendations_path())?.unwrap_or_default())
    }

    pub fn save_recommendations(&self, recommendations: &[Recommendation]) -> Result<()> {
        Self::write_json(&self.recommendations_path(), recommendations)
    }

    /// Add recommendations whose id is not stored yet. Returns how many were added.
    pub fn merge_recommendations(&self, incoming: Vec<Recommendation>) -> Result<usize> {
        let mut recommendations = self.load_recommendations()?;
        let before = recommendations.len();

        for rec in incoming {
            if recommendations.iter().any(|r| r.id == rec.id) {
                debug!("Recommendation {} already stored, skipping", rec.id);
                continue;
            }
            recommendations.push(rec);
        }

        let added = recommendations.len() - before;
        self.save_recommendations(&recommendations)?;
        info!("Merged {} new recommendation(s), {} total", added, recommendations.len());
        Ok(added)
    }

    /// Apply an evaluation payload to the stored recommendations.
    ///
    /// `decreases` rejects a pending recommendation; `uncertain` queues a
    /// question. Nothing is written when the payload or any impact label is
    /// invalid.
    pub fn apply_evaluation(&self, payload: &str) -> Result<EvaluationReport> {
        let mut recommendations = self.load_recommendations()?;
        let mut questions = self.load_questions()?;

        let evaluations = parse_evaluations(payload)?;
        let resolved = evaluations
            .iter()
            .map(|e| e.to_impact().map(|impact| (e.id.as_str(), impact)))
            .collect::<Result<Vec<_>, ReviewError>>()?;

        let mut report = EvaluationReport::default();

        for (id, impact) in resolved {
            let Some(rec) = recommendations.iter_mut().find(|r| r.id == id) else {
                warn!("Evaluation refers to unknown recommendation {}", id);
                report.unknown_ids.push(id.to_string());
                continue;
            };

            match &impact {
                Impact::Decreases { reasoning } if rec.resolution.is_pending() => {
                    let reason = if reasoning.is_empty() {
                        "Would decrease document integrity".to_string()
                    } else {
                        reasoning.clone()
                    };
                    rec.resolution = Resolution::Rejected { reason };
                    report.auto_rejected += 1;
                }
                Impact::Uncertain { reasoning, question } => {
                    questions.retain(|q| q.recommendation_id != rec.id || q.is_answered());
                    questions.push(PendingQuestion {
                        recommendation_id: rec.id.clone(),
                        question: question
                            .clone()
                            .unwrap_or_else(|| format!("Should recommendation {} be applied?", rec.id)),
                        options: DEFAULT_OPTIONS.iter().map(|o| o.to_string()).collect(),
                        context: format!("{} ({})", rec.description, reasoning),
                        asked_at: Utc::now(),
                        answer: None,
                    });
                    report.questions_queued += 1;
                }
                _ => {}
            }

            rec.impact = impact;
            report.updated += 1;
        }

        self.save_recommendations(&recommendations)?;
        if report.questions_queued > 0 {
            self.save_questions(&questions)?;
        }

        info!(
            "Evaluation applied: {} updated, {} rejected, {} question(s) queued",
            report.updated, report.auto_rejected, report.questions_queued
        );
        Ok(report)
    }

    /// Recommendations that increase integrity or are neutral and still pending.
    pub fn approved(&self) -> Result<Vec<Recommendation>> {
        Ok(self
            .load_recommendations()?
            .into_iter()
            .filter(Recommendation::is_actionable)
            .collect())
    }

    pub fn uncertain(&self) -> Result<Vec<Recommendation>> {
        Ok(self
            .load_recommendations()?
            .into_iter()
            .filter(|r| matches!(r.impact, Impact::Uncertain { .. }))
            .collect())
    }

    /// Mark a recommendation as applied and log it.
    pub fn mark_applied(&self, id: &str, notes: Option<&str>) -> Result<()> {
        self.resolve(id, Resolution::Applied {
            notes: notes.map(str::to_string),
        }, notes)
    }

    /// Mark a recommendation as failed (rejected) and log it.
    pub fn mark_failed(&self, id: &str, notes: Option<&str>) -> Result<()> {
        self.resolve(id, Resolution::Rejected {
            reason: notes.unwrap_or("Failed to apply").to_string(),
        }, notes)
    }

    fn resolve(&self, id: &str, resolution: Resolution, notes: Option<&str>) -> Result<()> {
        let mut recommendations = self.load_recommendations()?;
        let rec = recommendations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ReviewError::UnknownRecommendation(id.to_string()))?;

        let status = match resolution {
            Resolution::Applied { .. } => "APPLIED",
            _ => "FAILED",
        };
        rec.resolution = resolution;
        self.save_recommendations(&recommendations)?;

        let mut entry = format!("\n### [{}] {}\nTime: {}\n", status, id, Utc::now().to_rfc3339());
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            let _ = writeln!(entry, "Notes: {}", notes);
        }
        FileManager::append(self.changelog_path(), &entry)?;

        info!("Marked {} as {}", id, status.to_lowercase());
        Ok(())
    }

    pub fn summary(&self) -> Result<ReviewSummary> {
        Ok(ReviewSummary::from_recommendations(&self.load_recommendations()?))
    }

    pub fn load_questions(&self) -> Result<Vec<PendingQuestion>> {
        Ok(Self::read_json(&self.questions_path())?.unwrap_or_default())
    }

    /// Save the questions and regenerate the editable Markdown view.
    pub fn save_questions(&self, questions: &[PendingQuestion]) -> Result<()> {
        Self::write_json(&self.questions_path(), questions)?;
        FileManager::write_atomic(self.questions_markdown_path(), &render_questions(questions))
    }

    /// Read answers typed into the Markdown view. Returns how many questions
    /// were newly answered.
    pub fn collect_answers(&self) -> Result<usize> {
        let markdown_path = self.questions_markdown_path();
        if !FileManager::file_exists(&markdown_path) {
            return Ok(0);
        }

        let mut questions = self.load_questions()?;
        let answers = parse_answers(&FileManager::read_to_string(&markdown_path)?);

        let mut answered = 0;
        for question in questions.iter_mut().filter(|q| !q.is_answered()) {
            if let Some(answer) = answers.get(&question.recommendation_id) {
                question.answer = Some(answer.clone());
                answered += 1;
            }
        }

        if answered > 0 {
            self.save_questions(&questions)?;
            info!("Collected {} answer(s)", answered);
        }
        Ok(answered)
    }
}

/// First 12 hex digits of the SHA-256 of `content`.
pub fn document_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().take(6).map(|b| format!("{:02x}", b)).collect()
}

fn render_questions(questions: &[PendingQuestion]) -> String {
    let mut out = String::from(
        "# Pending Questions for Human Review\n\n\
         Edit this file to answer questions, then save.\n\
         Format: Add your answer after 'ANSWER:' on each question.\n\n---\n\n",
    );

    for q in questions.iter().filter(|q| !q.is_answered()) {
        let _ = write!(out, "## Question: {}\n\n", q.recommendation_id);
        let _ = write!(out, "**Question:** {}\n\n", q.question);
        let _ = write!(out, "**Context:** {}\n\n", q.context);
        out.push_str("**Options:**\n");
        for (i, option) in q.options.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, option);
        }
        out.push_str("\n**ANSWER:** \n\n---\n\n");
    }

    out
}

fn parse_answers(markdown: &str) -> HashMap<String, String> {
    ANSWER_BLOCK
        .captures_iter(markdown)
        .filter_map(|caps| {
            let answer = caps[2].trim();
            (!answer.is_empty()).then(|| (caps[1].to_string(), answer.to_string()))
        })
        .collect()
}
