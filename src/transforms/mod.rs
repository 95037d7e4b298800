/*!
 * Probabilistically gated text rewrites.
 *
 * Every transform is a pure function over a [`Document`]. It rewrites prose
 * paragraphs only and draws one random number per replacement opportunity;
 * the opportunity is taken when the draw falls below
 * `intensity * trigger_factor`.
 *
 * Transforms live in a static registry keyed by [`TransformKind`]; a
 * [`Pipeline`] applies a configured sequence of them in order.
 */

use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::{Rng, RngCore};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::text::{sentence_spans, Document};

pub mod informal;
pub mod lexical;
pub mod punctuation;
pub mod structure;

/// Identifier of a registered transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    AiVocabulary,
    FormalWords,
    EmDashes,
    Conjunctions,
    Nominalizations,
    SentenceSplit,
    Contractions,
    SentenceStarters,
    Hedging,
    ParagraphStarts,
    TransitionVariety,
    PersonalTouches,
    InformalPhrases,
    Parentheticals,
    Interjections,
    FillerWords,
    FillerPhrases,
    Typos,
}

impl TransformKind {
    pub const ALL: [TransformKind; 18] = [
        TransformKind::AiVocabulary,
        TransformKind::FormalWords,
        TransformKind::EmDashes,
        TransformKind::Conjunctions,
        TransformKind::Nominalizations,
        TransformKind::SentenceSplit,
        TransformKind::Contractions,
        TransformKind::SentenceStarters,
        TransformKind::Hedging,
        TransformKind::ParagraphStarts,
        TransformKind::TransitionVariety,
        TransformKind::PersonalTouches,
        TransformKind::InformalPhrases,
        TransformKind::Parentheticals,
        TransformKind::Interjections,
        TransformKind::FillerWords,
        TransformKind::FillerPhrases,
        TransformKind::Typos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::AiVocabulary => "ai_vocabulary",
            TransformKind::FormalWords => "formal_words",
            TransformKind::EmDashes => "em_dashes",
            TransformKind::Conjunctions => "conjunctions",
            TransformKind::Nominalizations => "nominalizations",
            TransformKind::SentenceSplit => "sentence_split",
            TransformKind::Contractions => "contractions",
            TransformKind::SentenceStarters => "sentence_starters",
            TransformKind::Hedging => "hedging",
            TransformKind::ParagraphStarts => "paragraph_starts",
            TransformKind::TransitionVariety => "transition_variety",
            TransformKind::PersonalTouches => "personal_touches",
            TransformKind::InformalPhrases => "informal_phrases",
            TransformKind::Parentheticals => "parentheticals",
            TransformKind::Interjections => "interjections",
            TransformKind::FillerWords => "filler_words",
            TransformKind::FillerPhrases => "filler_phrases",
            TransformKind::Typos => "typos",
        }
    }

    /// Registry entry for this kind
    pub fn entry(&self) -> &'static TransformEntry {
        &REGISTRY[*self as usize]
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        TransformKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("Unknown transform: {}", s))
    }
}

/// Per-opportunity firing probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    probability: f64,
}

impl Gate {
    pub fn new(intensity: f64, trigger_factor: f64) -> Self {
        Self {
            probability: (intensity * trigger_factor).clamp(0.0, 1.0),
        }
    }

    /// Gate that always fires
    pub fn always() -> Self {
        Self { probability: 1.0 }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draw once and report whether the opportunity is taken
    pub fn fire(&self, rng: &mut dyn RngCore) -> bool {
        rng.random::<f64>() < self.probability
    }
}

/// Signature shared by every transform
pub type TransformFn = fn(&Document, Gate, &mut dyn RngCore) -> Document;

/// A registered transform and its fixed trigger factor
pub struct TransformEntry {
    pub kind: TransformKind,
    pub trigger_factor: f64,
    pub description: &'static str,
    run: TransformFn,
}

impl TransformEntry {
    /// Apply the transform at the given intensity
    pub fn apply(&self, document: &Document, intensity: f64, rng: &mut dyn RngCore) -> Document {
        (self.run)(document, Gate::new(intensity, self.trigger_factor), rng)
    }
}

impl fmt::Debug for TransformEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformEntry")
            .field("kind", &self.kind)
            .field("trigger_factor", &self.trigger_factor)
            .finish()
    }
}

/// Registry, indexed by `TransformKind as usize`
static REGISTRY: [TransformEntry; 18] = [
    TransformEntry {
        kind: TransformKind::AiVocabulary,
        trigger_factor: 0.5,
        description: "Replace AI-favourite words with plain ones",
        run: lexical::replace_ai_vocabulary,
    },
    TransformEntry {
        kind: TransformKind::FormalWords,
        trigger_factor: 1.0,
        description: "Swap formal words for informal equivalents",
        run: lexical::replace_formal_words,
    },
    TransformEntry {
        kind: TransformKind::EmDashes,
        trigger_factor: 0.5,
        description: "Turn em-dashes into commas, periods or parentheses",
        run: punctuation::replace_em_dashes,
    },
    TransformEntry {
        kind: TransformKind::Conjunctions,
        trigger_factor: 0.3,
        description: "Break '; and' clauses into sentences",
        run: punctuation::reduce_conjunctions,
    },
    TransformEntry {
        kind: TransformKind::Nominalizations,
        trigger_factor: 0.3,
        description: "Turn 'the X of' nominalizations into gerunds",
        run: lexical::replace_nominalizations,
    },
    TransformEntry {
        kind: TransformKind::SentenceSplit,
        trigger_factor: 0.3,
        description: "Split long sentences near their midpoint",
        run: structure::split_long_sentences,
    },
    TransformEntry {
        kind: TransformKind::Contractions,
        trigger_factor: 0.5,
        description: "Contract common auxiliary phrases",
        run: lexical::insert_contractions,
    },
    TransformEntry {
        kind: TransformKind::SentenceStarters,
        trigger_factor: 0.3,
        description: "Drop repeated leading 'The' before proper nouns",
        run: structure::vary_sentence_starters,
    },
    TransformEntry {
        kind: TransformKind::Hedging,
        trigger_factor: 0.2,
        description: "Soften absolute claims",
        run: lexical::hedge_absolutes,
    },
    TransformEntry {
        kind: TransformKind::ParagraphStarts,
        trigger_factor: 0.25,
        description: "Vary formulaic paragraph openings",
        run: structure::vary_paragraph_starts,
    },
    TransformEntry {
        kind: TransformKind::TransitionVariety,
        trigger_factor: 0.5,
        description: "Vary transition words that repeat",
        run: lexical::vary_transitions,
    },
    TransformEntry {
        kind: TransformKind::PersonalTouches,
        trigger_factor: 0.3,
        description: "Give impersonal report phrases a first-person voice",
        run: informal::add_personal_touches,
    },
    TransformEntry {
        kind: TransformKind::InformalPhrases,
        trigger_factor: 0.3,
        description: "Swap stock connectives for conversational ones",
        run: informal::inject_informal_phrases,
    },
    TransformEntry {
        kind: TransformKind::Parentheticals,
        trigger_factor: 0.15,
        description: "Insert a parenthetical aside in long paragraphs",
        run: informal::add_parentheticals,
    },
    TransformEntry {
        kind: TransformKind::Interjections,
        trigger_factor: 0.15,
        description: "Open later paragraphs with a spoken interjection",
        run: informal::inject_interjections,
    },
    TransformEntry {
        kind: TransformKind::FillerWords,
        trigger_factor: 0.1,
        description: "Start a few sentences with a filler word",
        run: informal::add_filler_words,
    },
    TransformEntry {
        kind: TransformKind::FillerPhrases,
        trigger_factor: 0.15,
        description: "Insert hedging filler phrases after a comma",
        run: informal::add_filler_phrases,
    },
    TransformEntry {
        kind: TransformKind::Typos,
        trigger_factor: 0.02,
        description: "Swap two letters in a few common words",
        run: informal::inject_typos,
    },
];

/// All registered transforms in registry order
pub fn registry() -> &'static [TransformEntry] {
    &REGISTRY
}

/// Named transform sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Conservative rewrites suited to formal prose
    #[default]
    Conservative,
    /// Every registered transform
    Aggressive,
}

/// Adaptive-intensity constants that travel with a preset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlProfile {
    /// Upper bound of the adaptive intensity
    pub noise_max: f64,
    /// Intensity increase after a round without improvement
    pub noise_step: f64,
    /// Minimum score drop that counts as improvement
    pub improvement_epsilon: f64,
}

impl Preset {
    pub fn control(&self) -> ControlProfile {
        match self {
            Preset::Conservative => ControlProfile {
                noise_max: 0.8,
                noise_step: 0.1,
                improvement_epsilon: 0.02,
            },
            Preset::Aggressive => ControlProfile {
                noise_max: 0.9,
                noise_step: 0.15,
                improvement_epsilon: 0.03,
            },
        }
    }

    pub fn kinds(&self) -> Vec<TransformKind> {
        match self {
            Preset::Conservative => vec![
                TransformKind::AiVocabulary,
                TransformKind::EmDashes,
                TransformKind::Conjunctions,
                TransformKind::Nominalizations,
                TransformKind::SentenceSplit,
                TransformKind::SentenceStarters,
            ],
            Preset::Aggressive => vec![
                TransformKind::PersonalTouches,
                TransformKind::InformalPhrases,
                TransformKind::AiVocabulary,
                TransformKind::FormalWords,
                TransformKind::EmDashes,
                TransformKind::Conjunctions,
                TransformKind::Nominalizations,
                TransformKind::Contractions,
                TransformKind::Hedging,
                TransformKind::SentenceSplit,
                TransformKind::SentenceStarters,
                TransformKind::ParagraphStarts,
                TransformKind::TransitionVariety,
                TransformKind::Parentheticals,
                TransformKind::FillerPhrases,
                TransformKind::Interjections,
                TransformKind::FillerWords,
                TransformKind::Typos,
            ],
        }
    }
}

/// Ordered sequence of transforms applied once per iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    kinds: Vec<TransformKind>,
}

impl Pipeline {
    pub fn new(kinds: Vec<TransformKind>) -> Self {
        Self { kinds }
    }

    pub fn from_preset(preset: Preset) -> Self {
        Self::new(preset.kinds())
    }

    pub fn kinds(&self) -> &[TransformKind] {
        &self.kinds
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Run every transform in order, threading the document through
    pub fn apply(&self, document: &Document, intensity: f64, rng: &mut dyn RngCore) -> Document {
        self.kinds.iter().fold(document.clone(), |current, kind| {
            let next = kind.entry().apply(&current, intensity, rng);
            if next != current {
                debug!("Transform '{}' changed the document", kind);
            }
            next
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

/// Apply the capitalisation pattern of `original` to `replacement`
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    let has_cased = original.chars().any(char::is_alphabetic);
    if has_cased && original.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

/// Uppercase the first character, leaving the rest untouched
pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive whole-phrase pattern; spaces match any whitespace run.
///
/// Word boundaries are only required at ends that are word characters, so
/// "In fact," still matches before a space.
pub(crate) fn phrase_regex(phrase: &str) -> Regex {
    let body = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let leading = if phrase.trim_start().starts_with(is_word_char) { r"\b" } else { "" };
    let trailing = if phrase.trim_end().ends_with(is_word_char) { r"\b" } else { "" };
    Regex::new(&format!(r"(?i){}{}{}", leading, body, trailing))
        .expect("escaped phrase is a valid regex")
}

/// Rewrite each sentence of a paragraph, returning the paragraph untouched
/// when no sentence changed.
///
/// The separators between sentences are kept as they were; the pieces of a
/// sentence rewritten into several are joined by a space.
pub(crate) fn rewrite_sentences<F>(paragraph: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> Vec<String>,
{
    let mut changed = false;
    let mut out = String::with_capacity(paragraph.len());
    let mut cursor = 0;

    for (start, end) in sentence_spans(paragraph) {
        out.push_str(&paragraph[cursor..start]);

        let sentence = &paragraph[start..end];
        let rewritten = rewrite(sentence);
        if rewritten.len() != 1 || rewritten[0] != sentence {
            changed = true;
        }
        out.push_str(&rewritten.join(" "));
        cursor = end;
    }
    out.push_str(&paragraph[cursor..]);

    if changed {
        out
    } else {
        paragraph.to_string()
    }
}

/// Replace every match whose gate fires, keeping the matched casing
pub(crate) fn replace_gated(
    text: &str,
    pattern: &Regex,
    replacement: &str,
    gate: Gate,
    rng: &mut dyn RngCore,
) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            if gate.fire(rng) {
                match_case(&caps[0], replacement)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Deterministic generators, shared with the integration tests through the
/// `test-support` feature
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use rand::RngCore;

    /// Generator that always yields zero: every gate with a positive
    /// probability fires and every choice takes the first option.
    pub struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0);
        }
    }
}
