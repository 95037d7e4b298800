/*!
 * Word and phrase substitutions.
 */

use once_cell::sync::Lazy;
use rand::seq::IndexedRandom;
use rand::RngCore;
use regex::{Captures, Regex};

use super::{capitalize_first, phrase_regex, replace_gated, Gate};
use crate::text::vocabulary::{
    AI_WORD_REPLACEMENTS, CONTRACTIONS, FORMAL_WORD_REPLACEMENTS, HEDGES, NOMINALIZATIONS,
    TRANSITIONS,
};
use crate::text::Document;

type SubstitutionTable = Vec<(Regex, &'static str)>;

fn compile_table(pairs: &[(&str, &'static str)]) -> SubstitutionTable {
    pairs
        .iter()
        .map(|(from, to)| (phrase_regex(from), *to))
        .collect()
}

static AI_VOCABULARY_TABLE: Lazy<SubstitutionTable> =
    Lazy::new(|| compile_table(AI_WORD_REPLACEMENTS));

static FORMAL_WORD_TABLE: Lazy<SubstitutionTable> =
    Lazy::new(|| compile_table(FORMAL_WORD_REPLACEMENTS));

static CONTRACTION_TABLE: Lazy<SubstitutionTable> = Lazy::new(|| compile_table(CONTRACTIONS));

static HEDGE_TABLE: Lazy<SubstitutionTable> = Lazy::new(|| compile_table(HEDGES));

static NOMINALIZATION_TABLE: Lazy<SubstitutionTable> = Lazy::new(|| {
    NOMINALIZATIONS
        .iter()
        .map(|(nom, verb)| (phrase_regex(&format!("the {} of", nom)), *verb))
        .collect()
});

static TRANSITION_TABLE: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    TRANSITIONS
        .iter()
        .map(|(word, alternatives)| (phrase_regex(word), *alternatives))
        .collect()
});

fn substitute(
    document: &Document,
    table: &SubstitutionTable,
    gate: Gate,
    rng: &mut dyn RngCore,
) -> Document {
    document.map_prose(|paragraph| {
        table.iter().fold(paragraph.to_string(), |text, (pattern, replacement)| {
            replace_gated(&text, pattern, replacement, gate, rng)
        })
    })
}

/// utilize -> use, demonstrates -> shows, ...
pub fn replace_ai_vocabulary(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute(document, &AI_VOCABULARY_TABLE, gate, rng)
}

/// approximately -> about, however -> but, ...
pub fn replace_formal_words(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute(document, &FORMAL_WORD_TABLE, gate, rng)
}

/// "do not" -> "don't", "it is" -> "it's", ...
pub fn insert_contractions(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute(document, &CONTRACTION_TABLE, gate, rng)
}

/// always -> typically, never -> rarely, ...
pub fn hedge_absolutes(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute(document, &HEDGE_TABLE, gate, rng)
}

/// "the utilization of" -> "using"
pub fn replace_nominalizations(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    substitute(document, &NOMINALIZATION_TABLE, gate, rng)
}

/// Replace repeated transition words after their first use.
///
/// A transition is only varied when it occurs more than twice across the
/// prose of the document; the first occurrence always stays.
pub fn vary_transitions(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    TRANSITION_TABLE
        .iter()
        .fold(document.clone(), |current, (pattern, alternatives)| {
            let total: usize = current
                .paragraphs
                .iter()
                .filter(|p| !p.is_structural())
                .map(|p| pattern.find_iter(&p.text).count())
                .sum();

            if total <= 2 {
                return current;
            }

            let mut seen = 0usize;
            current.map_prose(|paragraph| {
                pattern
                    .replace_all(paragraph, |caps: &Captures| {
                        let original = &caps[0];
                        seen += 1;
                        if seen == 1 || !gate.fire(rng) {
                            return original.to_string();
                        }
                        match alternatives.choose(&mut *rng) {
                            Some(alt) if original.starts_with(char::is_uppercase) => {
                                capitalize_first(alt)
                            }
                            Some(alt) => alt.to_string(),
                            None => original.to_string(),
                        }
                    })
                    .into_owned()
            })
        })
}
