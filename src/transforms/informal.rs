/*!
 * Conversational register: first-person voice, asides, fillers and typos.
 *
 * Insertions look for an earlier one first, so repeated rounds do not
 * stack them.
 */

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use regex::{Captures, Regex};

use super::{match_case, phrase_regex, rewrite_sentences, Gate};
use crate::text::vocabulary::{
    CASE_KEEPING_WORDS, FILLER_PHRASES, FILLER_WORDS, INFORMAL_PHRASES, INTERJECTIONS,
    PARENTHETICALS, PERSONAL_TOUCHES, TYPO_TARGETS,
};
use crate::text::Document;

/// Paragraphs with at most this many words get no aside
const PARENTHETICAL_MIN_WORDS: usize = 30;

/// Words kept clear of an aside at either end of the paragraph
const PARENTHETICAL_MARGIN: usize = 10;

/// Chance that a chosen aside is actually inserted
const PARENTHETICAL_CHANCE: f64 = 0.3;

/// Paragraphs at or before this position keep their opening
const INTERJECTION_MIN_INDEX: usize = 2;

/// Filler words added per document and round
const MAX_FILLER_WORDS: usize = 3;

/// Chance per sentence of a filler phrase once the paragraph is chosen
const FILLER_PHRASE_CHANCE: f64 = 0.2;

/// A filler phrase needs its comma past this byte offset
const FILLER_PHRASE_MIN_OFFSET: usize = 10;

/// Typo budget per prose word, relative to the firing probability
const TYPO_BUDGET_RATIO: f64 = 0.15;

type SubstitutionTable = Vec<(Regex, &'static str)>;

static PERSONAL_TOUCH_TABLE: Lazy<SubstitutionTable> = Lazy::new(|| {
    PERSONAL_TOUCHES
        .iter()
        .map(|(from, to)| (phrase_regex(from), *to))
        .collect()
});

static INFORMAL_PHRASE_TABLE: Lazy<SubstitutionTable> = Lazy::new(|| {
    INFORMAL_PHRASES
        .iter()
        .map(|(from, to)| (phrase_regex(from), *to))
        .collect()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("word regex"));

static LETTERS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("letters regex"));

/// A full stop, the following space and the next capitalised word
static SENTENCE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(\s+)([A-Z]\w*)").expect("sentence break regex"));

/// Replace the first prose occurrence of `pattern` with one draw of the gate.
fn replace_first(
    document: &Document,
    pattern: &Regex,
    replacement: &str,
    gate: Gate,
    rng: &mut dyn RngCore,
) -> Document {
    let target = document
        .paragraphs
        .iter()
        .position(|p| !p.is_structural() && pattern.is_match(&p.text));

    let Some(target) = target else {
        return document.clone();
    };
    if !gate.fire(rng) {
        return document.clone();
    }

    document.map_prose_indexed(|index, text| {
        if index == target {
            pattern
                .replacen(text, 1, |caps: &Captures| match_case(&caps[0], replacement))
                .into_owned()
        } else {
            text.to_string()
        }
    })
}

fn substitute_once(
    document: &Document,
    table: &SubstitutionTable,
    gate: Gate,
    rng: &mut dyn RngCore,
) -> Document {
    table.iter().fold(document.clone(), |current, (pattern, replacement)| {
        replace_first(&current, pattern, replacement, gate, rng)
    })
}

/// Whether an opening word keeps its capital after an inserted opener
fn keeps_case(word: &str) -> bool {
    let bare = word.trim_end_matches(|c: char| !c.is_alphanumeric());
    CASE_KEEPING_WORDS.contains(&bare)
        || (bare.chars().count() > 1 && !bare.chars().any(char::is_lowercase))
}

/// Lowercase the first word of `text` unless it is a name or an acronym
fn soften_opening(text: &str) -> String {
    let first_word = text.split_whitespace().next().unwrap_or_default();
    if keeps_case(first_word) {
        return text.to_string();
    }

    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn is_filler_word(word: &str) -> bool {
    FILLER_WORDS
        .iter()
        .chain(INTERJECTIONS)
        .filter(|filler| !filler.is_empty())
        .any(|filler| filler.trim_end_matches([',', ':']) == word)
}

/// "The data shows" -> "Our data shows", first occurrence of each phrase
pub fn add_personal_touches(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute_once(document, &PERSONAL_TOUCH_TABLE, gate, rng)
}

/// "Furthermore," -> "What's more,", first occurrence of each phrase
pub fn inject_informal_phrases(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute_once(document, &INFORMAL_PHRASE_TABLE, gate, rng)
}

/// Put a parenthetical aside after a comma in the middle of a long paragraph.
///
/// Only words more than ten positions from either end qualify, and a
/// paragraph carries at most one aside.
pub fn add_parentheticals(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        let words: Vec<_> = WORD_RE.find_iter(paragraph).collect();
        let has_aside = PARENTHETICALS.iter().any(|aside| paragraph.contains(aside));
        if words.len() <= PARENTHETICAL_MIN_WORDS || has_aside || !gate.fire(rng) {
            return paragraph.to_string();
        }

        let candidates: Vec<_> = words
            .iter()
            .enumerate()
            .filter(|(i, word)| {
                *i > PARENTHETICAL_MARGIN
                    && *i < words.len() - PARENTHETICAL_MARGIN
                    && word.as_str().ends_with(',')
            })
            .map(|(_, word)| word)
            .collect();

        let Some(word) = candidates.choose(&mut *rng) else {
            return paragraph.to_string();
        };
        if rng.random::<f64>() >= PARENTHETICAL_CHANCE {
            return paragraph.to_string();
        }
        let Some(aside) = PARENTHETICALS.choose(&mut *rng) else {
            return paragraph.to_string();
        };

        let comma = word.end() - 1;
        format!("{} {}{}", &paragraph[..comma], aside, &paragraph[comma..])
    })
}

/// Open paragraphs after the third with an interjection such as "Look,".
pub fn inject_interjections(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose_indexed(|index, paragraph| {
        let opened = INTERJECTIONS.iter().any(|i| paragraph.starts_with(i));
        if index <= INTERJECTION_MIN_INDEX || opened || !gate.fire(rng) {
            return paragraph.to_string();
        }

        match INTERJECTIONS.choose(&mut *rng) {
            Some(interjection) => format!("{} {}", interjection, soften_opening(paragraph)),
            None => paragraph.to_string(),
        }
    })
}

/// Start up to three sentences per round with "Well,", "So," and the like.
pub fn add_filler_words(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    let mut inserted = 0usize;

    document.map_prose(|paragraph| {
        SENTENCE_BREAK_RE
            .replace_all(paragraph, |caps: &Captures| {
                let word = &caps[2];
                if inserted >= MAX_FILLER_WORDS || is_filler_word(word) || !gate.fire(rng) {
                    return caps[0].to_string();
                }
                inserted += 1;

                match FILLER_WORDS.choose(&mut *rng) {
                    Some(filler) if !filler.is_empty() => {
                        format!(".{}{} {}", &caps[1], filler, soften_opening(word))
                    }
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    })
}

/// Insert ", so to speak," style phrases after the first comma of a sentence.
///
/// The paragraph gate is drawn once; each sentence then has its own 20%
/// chance.
pub fn add_filler_phrases(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        if !gate.fire(rng) {
            return paragraph.to_string();
        }

        rewrite_sentences(paragraph, |sentence| {
            let padded = FILLER_PHRASES.iter().any(|phrase| sentence.contains(phrase));
            let comma = sentence.find(',').filter(|pos| *pos > FILLER_PHRASE_MIN_OFFSET);

            let (Some(comma), false) = (comma, padded) else {
                return vec![sentence.to_string()];
            };
            if rng.random::<f64>() >= FILLER_PHRASE_CHANCE {
                return vec![sentence.to_string()];
            }

            match FILLER_PHRASES.choose(&mut *rng) {
                Some(phrase) => vec![format!(
                    "{} {},{}",
                    &sentence[..=comma],
                    phrase,
                    &sentence[comma + 1..]
                )],
                None => vec![sentence.to_string()],
            }
        })
    })
}

/// Swap two adjacent inner letters of `word`, keeping the first and last.
fn swap_letters(word: &str, rng: &mut dyn RngCore) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    if chars.len() < 4 {
        return word.to_string();
    }

    let pos = rng.random_range(1..=chars.len() - 3);
    chars.swap(pos, pos + 1);
    chars.into_iter().collect()
}

/// Swap letters in a handful of common words.
///
/// The number of typos per call is capped at `prose words * probability *
/// 0.15`, which is zero for short documents.
pub fn inject_typos(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    let prose_words: usize = document
        .paragraphs
        .iter()
        .filter(|p| !p.is_structural())
        .map(|p| p.text.split_whitespace().count())
        .sum();
    let budget = (prose_words as f64 * gate.probability() * TYPO_BUDGET_RATIO).floor() as usize;
    if budget == 0 {
        return document.clone();
    }

    let mut made = 0usize;
    document.map_prose(|paragraph| {
        LETTERS_RE
            .replace_all(paragraph, |caps: &Captures| {
                let word = &caps[0];
                let lower = word.to_lowercase();
                if made >= budget || !TYPO_TARGETS.contains(&lower.as_str()) || !gate.fire(rng) {
                    return word.to_string();
                }
                made += 1;
                match_case(word, &swap_letters(&lower, rng))
            })
            .into_owned()
    })
}
