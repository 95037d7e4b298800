/*!
 * Shallow lexical statistics that separate machine-generated prose from
 * human writing.
 */

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::vocabulary::{is_ai_word, is_nominalization, AI_PHRASES};

static CONJUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(and|but|or|yet|so|for|nor)\b").expect("conjunction regex")
});

static CONTRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+['’]\w+\b").expect("contraction regex")
});

/// Statistics of one document at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Sample variance of words per sentence; higher is more human
    pub sentence_length_variance: f64,
    pub avg_sentence_length: f64,
    /// Coordinating conjunctions per word
    pub conjunction_density: f64,
    /// Dictionary nominalizations per word
    pub nominalization_density: f64,
    /// Em-dashes per sentence
    pub em_dash_density: f64,
    /// AI-favourite words and phrases per word
    pub ai_word_density: f64,
    /// Distinct two-word starters per sentence; higher is more human
    pub sentence_starter_variety: f64,
    /// Contractions per word
    pub contraction_density: f64,
}

impl MetricsSnapshot {
    pub fn from_text(text: &str) -> Self {
        Self::from_document(&Document::parse(text))
    }

    /// Compute the snapshot for a document.
    ///
    /// A document without words or sentences yields the all-zero snapshot.
    pub fn from_document(document: &Document) -> Self {
        let sentences = document.sentences();
        let text = document.to_text();
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        if sentences.is_empty() || words.is_empty() {
            return Self::default();
        }

        let word_count = words.len() as f64;
        let sentence_count = sentences.len() as f64;

        let lengths: Vec<f64> = sentences
            .iter()
            .map(|s| s.split_whitespace().count() as f64)
            .collect();
        let avg_sentence_length = lengths.iter().sum::<f64>() / sentence_count;
        let sentence_length_variance = sample_variance(&lengths, avg_sentence_length);

        let conjunctions = CONJUNCTION_RE.find_iter(&lowered).count() as f64;

        let tokens: Vec<&str> = words.iter().map(|w| trim_token(w)).collect();
        let nominalizations = tokens.iter().filter(|t| is_nominalization(t)).count() as f64;

        let em_dashes = (text.matches('—').count() + text.matches("--").count()) as f64;

        let ai_words = tokens.iter().filter(|t| is_ai_word(t)).count();
        let ai_phrases: usize = AI_PHRASES
            .iter()
            .map(|re| re.find_iter(&lowered).count())
            .sum();

        let starters: HashSet<String> = sentences
            .iter()
            .map(|s| {
                s.split_whitespace()
                    .take(2)
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase()
            })
            .collect();

        let contractions = CONTRACTION_RE.find_iter(&text).count() as f64;

        Self {
            sentence_length_variance,
            avg_sentence_length,
            conjunction_density: conjunctions / word_count,
            nominalization_density: nominalizations / word_count,
            em_dash_density: em_dashes / sentence_count,
            ai_word_density: (ai_words + ai_phrases) as f64 / word_count,
            sentence_starter_variety: starters.len() as f64 / sentence_count,
            contraction_density: contractions / word_count,
        }
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "variance={:.1} conj={:.4} em-dash={:.3} ai-words={:.4} starters={:.3}",
            self.sentence_length_variance,
            self.conjunction_density,
            self.em_dash_density,
            self.ai_word_density,
            self.sentence_starter_variety
        )
    }
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sentence length variance: {:.1}", self.sentence_length_variance)?;
        writeln!(f, "Average sentence length:  {:.1}", self.avg_sentence_length)?;
        writeln!(f, "Conjunction density:      {:.4}", self.conjunction_density)?;
        writeln!(f, "Nominalization density:   {:.4}", self.nominalization_density)?;
        writeln!(f, "Em-dash density:          {:.3}", self.em_dash_density)?;
        writeln!(f, "AI word density:          {:.4}", self.ai_word_density)?;
        writeln!(f, "Starter variety:          {:.3}", self.sentence_starter_variety)?;
        write!(f, "Contraction density:      {:.4}", self.contraction_density)
    }
}

/// Strip leading and trailing punctuation, keeping inner hyphens and apostrophes
fn trim_token(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn sample_variance(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}
