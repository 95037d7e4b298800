/*!
 * Review data model.
 *
 * Recommendations move from `Unevaluated` to an evaluated [`Impact`] and from
 * [`Resolution::Pending`] to `Applied` or `Rejected`. Every evaluated impact
 * carries the evaluator's reasoning.
 */

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Effect of a recommendation on document integrity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Impact {
    /// Not evaluated yet
    #[default]
    Unevaluated,

    /// Makes the document more accurate or rigorous
    Increases { reasoning: String },

    /// Would make the document less accurate
    Decreases { reasoning: String },

    /// Stylistic only
    Neutral { reasoning: String },

    /// Needs a human decision
    Uncertain {
        reasoning: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        question: Option<String>,
    },

    /// Contradicts another recommendation
    Conflicts { reasoning: String },
}

impl Impact {
    /// Build an evaluated impact from its label, case-insensitively.
    pub fn from_label(label: &str, reasoning: String, question: Option<String>) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "increases" => Some(Self::Increases { reasoning }),
            "decreases" => Some(Self::Decreases { reasoning }),
            "neutral" => Some(Self::Neutral { reasoning }),
            "uncertain" => Some(Self::Uncertain { reasoning, question }),
            "conflicts" => Some(Self::Conflicts { reasoning }),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unevaluated => "unevaluated",
            Self::Increases { .. } => "increases",
            Self::Decreases { .. } => "decreases",
            Self::Neutral { .. } => "neutral",
            Self::Uncertain { .. } => "uncertain",
            Self::Conflicts { .. } => "conflicts",
        }
    }

    pub fn reasoning(&self) -> Option<&str> {
        match self {
            Self::Unevaluated => None,
            Self::Increases { reasoning }
            | Self::Decreases { reasoning }
            | Self::Neutral { reasoning }
            | Self::Uncertain { reasoning, .. }
            | Self::Conflicts { reasoning } => Some(reasoning),
        }
    }

    /// Whether the change may be applied without human input
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Increases { .. } | Self::Neutral { .. })
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What happened to a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Pending,
    Applied {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
    Rejected { reason: String },
}

impl Resolution {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

fn default_source() -> String {
    "human".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_location() -> String {
    "unspecified".to_string()
}

/// A single reviewer recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Unique id, used to merge and address recommendations
    pub id: String,

    /// Review file or "human"
    #[serde(default = "default_source")]
    pub source: String,

    /// factual, structural, stylistic, methodological or general
    #[serde(default = "default_category")]
    pub category: String,

    pub description: String,

    /// Exact change requested
    #[serde(default)]
    pub specific_change: String,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default)]
    pub rationale: String,

    #[serde(default)]
    pub impact: Impact,

    #[serde(default)]
    pub resolution: Resolution,
}

impl Recommendation {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: default_source(),
            category: default_category(),
            description: description.into(),
            specific_change: String::new(),
            location: default_location(),
            rationale: String::new(),
            impact: Impact::Unevaluated,
            resolution: Resolution::Pending,
        }
    }

    /// Approved and not yet applied or rejected
    pub fn is_actionable(&self) -> bool {
        self.impact.is_approved() && self.resolution.is_pending()
    }
}

/// Purpose and constraints of the reviewed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContext {
    pub document_path: String,
    pub purpose: String,
    pub audience: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Things that must not change
    #[serde(default)]
    pub non_negotiables: Vec<String>,
    #[serde(default)]
    pub iteration: u32,
    /// First 12 hex digits of the SHA-256 of the document
    pub document_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Default document purpose
pub const DEFAULT_PURPOSE: &str = "Academic working paper";

/// Default audience
pub const DEFAULT_AUDIENCE: &str = "Academic researchers and informed public";

/// A question queued for a human decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuestion {
    pub recommendation_id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub context: String,
    pub asked_at: DateTime<Utc>,
    #[serde(default)]
    pub answer: Option<String>,
}

impl PendingQuestion {
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }
}

/// Options offered for every queued question
pub const DEFAULT_OPTIONS: [&str; 3] = [
    "Apply the change as written",
    "Reject the change",
    "Apply a modified version (describe below)",
];

/// Counts over all recommendations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub unevaluated: usize,
    pub increases: usize,
    pub decreases: usize,
    pub neutral: usize,
    pub uncertain: usize,
    pub conflicts: usize,
    pub applied: usize,
    pub rejected: usize,
}

impl ReviewSummary {
    pub fn from_recommendations(recommendations: &[Recommendation]) -> Self {
        let mut summary = Self {
            total: recommendations.len(),
            ..Default::default()
        };

        for rec in recommendations {
            match rec.impact {
                Impact::Unevaluated => summary.unevaluated += 1,
                Impact::Increases { .. } => summary.increases += 1,
                Impact::Decreases { .. } => summary.decreases += 1,
                Impact::Neutral { .. } => summary.neutral += 1,
                Impact::Uncertain { .. } => summary.uncertain += 1,
                Impact::Conflicts { .. } => summary.conflicts += 1,
            }
            match rec.resolution {
                Resolution::Pending => {}
                Resolution::Applied { .. } => summary.applied += 1,
                Resolution::Rejected { .. } => summary.rejected += 1,
            }
        }

        summary
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recommendations:")?;
        writeln!(f, "  Total:       {}", self.total)?;
        writeln!(f, "  Unevaluated: {}", self.unevaluated)?;
        writeln!(f, "  Increases:   {}", self.increases)?;
        writeln!(f, "  Decreases:   {}", self.decreases)?;
        writeln!(f, "  Neutral:     {}", self.neutral)?;
        writeln!(f, "  Uncertain:   {}", self.uncertain)?;
        writeln!(f, "  Conflicts:   {}", self.conflicts)?;
        writeln!(f, "Progress:")?;
        writeln!(f, "  Applied:     {}", self.applied)?;
        write!(f, "  Rejected:    {}", self.rejected)
    }
}
