/*!
 * Punctuation rewrites: em-dashes and semicolon-joined clauses.
 */

use once_cell::sync::Lazy;
use rand::{Rng, RngCore};
use regex::{Captures, Regex};

use super::{capitalize_first, is_word_char, Gate};
use crate::text::Document;

/// An em-dash with its surrounding spaces; `--` counts as an em-dash
static EM_DASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:—|--)\s*").expect("em-dash regex"));

static SEMICOLON_AND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r";\s+and\s+([a-z])").expect("semicolon regex"));

/// Replace em-dashes between words.
///
/// A taken opportunity becomes a comma (40%), a period with a capitalised
/// continuation (20%), a parenthetical around the following word (20%) or a
/// spaced hyphen (20%). Each dash of a chain such as "a—b—c" is its own
/// opportunity.
pub fn replace_em_dashes(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        let mut out = String::with_capacity(paragraph.len());
        let mut cursor = 0;

        for dash in EM_DASH_RE.find_iter(paragraph) {
            let follows_word = paragraph[..dash.start()]
                .chars()
                .next_back()
                .is_some_and(is_word_char);
            let rest = &paragraph[dash.end()..];
            let after_len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());

            if !follows_word || after_len == 0 || !gate.fire(rng) {
                continue;
            }

            let after = &rest[..after_len];
            let choice: f64 = rng.random();
            out.push_str(&paragraph[cursor..dash.start()]);
            if choice < 0.4 {
                out.push_str(&format!(", {}", after));
            } else if choice < 0.6 {
                out.push_str(&format!(". {}", capitalize_first(after)));
            } else if choice < 0.8 {
                out.push_str(&format!(" ({})", after));
            } else {
                out.push_str(&format!(" - {}", after));
            }
            cursor = dash.end() + after_len;
        }

        out.push_str(&paragraph[cursor..]);
        out
    })
}

/// "; and x" -> ". X"
pub fn reduce_conjunctions(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        SEMICOLON_AND_RE
            .replace_all(paragraph, |caps: &Captures| {
                if gate.fire(rng) {
                    format!(". {}", caps[1].to_uppercase())
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned()
    })
}
