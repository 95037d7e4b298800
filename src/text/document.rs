/*!
 * Document model for humanization.
 *
 * A document is an ordered list of paragraphs separated by blank lines.
 * Paragraphs that open with heading, list or table markup are structural
 * and pass through every transform untouched.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Blank-line paragraph separator
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").expect("paragraph separator regex")
});

/// First characters that mark a paragraph as structural markup
const STRUCTURAL_MARKERS: [char; 5] = ['#', '|', '*', '-', '+'];

/// A single paragraph of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Trimmed paragraph text
    pub text: String,
}

impl Paragraph {
    /// Create a paragraph from text, trimming surrounding whitespace
    pub fn new(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self {
            text: text.trim().to_string(),
        }
    }

    /// Whether this paragraph is heading, list or table markup
    pub fn is_structural(&self) -> bool {
        self.text
            .chars()
            .next()
            .is_some_and(|c| STRUCTURAL_MARKERS.contains(&c))
    }

    /// Split the paragraph into sentences
    pub fn sentences(&self) -> Vec<&str> {
        split_sentences(&self.text)
    }
}

/// An ordered sequence of paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

impl Document {
    /// Parse raw text into paragraphs, dropping empty ones
    pub fn parse(text: &str) -> Self {
        let paragraphs = PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Paragraph::new)
            .collect();

        Self { paragraphs }
    }

    /// Build a document from already separated paragraphs
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: paragraphs
                .into_iter()
                .map(Paragraph::new)
                .filter(|p| !p.text.is_empty())
                .collect(),
        }
    }

    /// Render the document back to text, paragraphs joined by a blank line
    pub fn to_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// All sentences of the document, segmented paragraph by paragraph
    pub fn sentences(&self) -> Vec<&str> {
        self.paragraphs.iter().flat_map(|p| p.sentences()).collect()
    }

    /// Whitespace-separated words across the whole document
    pub fn words(&self) -> Vec<&str> {
        self.paragraphs
            .iter()
            .flat_map(|p| p.text.split_whitespace())
            .collect()
    }

    /// Produce a new document by rewriting every prose paragraph.
    ///
    /// Structural paragraphs are copied verbatim; the closure never sees them.
    pub fn map_prose<F>(&self, mut rewrite: F) -> Document
    where
        F: FnMut(&str) -> String,
    {
        self.map_prose_indexed(|_, text| rewrite(text))
    }

    /// Like [`Document::map_prose`], also passing the paragraph position.
    pub fn map_prose_indexed<F>(&self, mut rewrite: F) -> Document
    where
        F: FnMut(usize, &str) -> String,
    {
        let paragraphs = self
            .paragraphs
            .iter()
            .enumerate()
            .map(|(index, paragraph)| {
                if paragraph.is_structural() {
                    paragraph.clone()
                } else {
                    Paragraph::new(rewrite(index, &paragraph.text))
                }
            })
            .collect();

        Document { paragraphs }
    }
}

/// Split text into sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace and an uppercase
/// letter. Abbreviations followed by capitalised words are split too; the
/// segmentation only has to be deterministic.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_spans(text)
        .into_iter()
        .map(|(start, end)| &text[start..end])
        .collect()
}

/// Byte ranges of the trimmed sentences of `text`, in order.
///
/// The text between two consecutive ranges is the original separator.
pub fn sentence_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let end = idx + c.len_utf8();
        let rest = &text[end..];
        let trimmed = rest.trim_start();
        let whitespace_len = rest.len() - trimmed.len();

        if whitespace_len > 0 && trimmed.chars().next().is_some_and(char::is_uppercase) {
            push_trimmed_span(text, start, end, &mut spans);
            start = end + whitespace_len;
            while chars.peek().is_some_and(|(i, _)| *i < start) {
                chars.next();
            }
        }
    }

    push_trimmed_span(text, start, text.len(), &mut spans);
    spans
}

fn push_trimmed_span(text: &str, start: usize, end: usize, spans: &mut Vec<(usize, usize)>) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        let offset = start + (raw.len() - raw.trim_start().len());
        spans.push((offset, offset + trimmed.len()));
    }
}
