/*!
 * Sentence and paragraph level rewrites.
 */

use std::collections::VecDeque;

use rand::RngCore;

use super::{capitalize_first, rewrite_sentences, Gate};
use crate::text::vocabulary::{PARAGRAPH_STARTS, SPLIT_CONJUNCTIONS, STARTER_ACRONYMS};
use crate::text::Document;

/// Sentences longer than this many words may be split
const SPLIT_MIN_WORDS: usize = 25;

/// Neither half of a split sentence may be shorter than this
const SPLIT_EDGE_WORDS: usize = 8;

/// How far from the midpoint a split point may lie, in words
const SPLIT_WINDOW: usize = 3;

/// Number of recent sentence starters remembered
const STARTER_WINDOW: usize = 6;

/// Starter repetitions needed before a variation is attempted
const STARTER_REPEATS: usize = 2;

/// Pick the split position closest to the midpoint.
///
/// Returns the index of the first word of the second half and whether the
/// split happens after a semicolon.
fn find_split_point(words: &[&str]) -> Option<(usize, bool)> {
    let n = words.len();
    let mid = n / 2;
    let lo = mid.saturating_sub(SPLIT_WINDOW).max(SPLIT_EDGE_WORDS);
    let hi = (mid + SPLIT_WINDOW).min(n.saturating_sub(SPLIT_EDGE_WORDS));
    if lo > hi {
        return None;
    }

    let by_distance = |pos: &usize| pos.abs_diff(mid);

    let semicolon = (lo..=hi)
        .filter(|&pos| words[pos - 1].ends_with(';'))
        .min_by_key(by_distance);
    if let Some(pos) = semicolon {
        return Some((pos, true));
    }

    (lo..=hi)
        .filter(|&pos| {
            let candidate = words[pos].to_lowercase();
            SPLIT_CONJUNCTIONS.contains(&candidate.as_str())
                && !words[pos - 1].ends_with(['.', '!', '?'])
        })
        .min_by_key(by_distance)
        .map(|pos| (pos, false))
}

/// Split sentences longer than 25 words at a semicolon or a conjunction near
/// the midpoint. Neither half is shorter than 8 words.
pub fn split_long_sentences(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        rewrite_sentences(paragraph, |sentence| {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() <= SPLIT_MIN_WORDS || !gate.fire(rng) {
                return vec![sentence.to_string()];
            }

            let Some((pos, after_semicolon)) = find_split_point(&words) else {
                return vec![sentence.to_string()];
            };

            let mut first = words[..pos].join(" ");
            if after_semicolon {
                first.pop();
            } else {
                first = first.trim_end_matches(',').to_string();
            }
            first.push('.');

            let second = capitalize_first(&words[pos..].join(" "));
            vec![first, second]
        })
    })
}

/// Drop a leading "The" once the same starter has repeated.
///
/// Each paragraph keeps a window of the last six sentence starters (sentences
/// shorter than four words are ignored). When the current starter already
/// appears at least twice in the window, "The" is dropped if the next word is
/// capitalised or a known acronym.
pub fn vary_sentence_starters(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose(|paragraph| {
        let mut recent: VecDeque<String> = VecDeque::with_capacity(STARTER_WINDOW + 1);

        rewrite_sentences(paragraph, |sentence| {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() < 4 {
                return vec![sentence.to_string()];
            }

            let starter = words[0].to_lowercase();
            let repeats = recent.iter().filter(|s| **s == starter).count();
            let mut result = sentence.to_string();

            if repeats >= STARTER_REPEATS && gate.fire(rng) && starter == "the" && words.len() > 4
            {
                let next = words[1];
                let proper = next.starts_with(char::is_uppercase);
                let acronym = STARTER_ACRONYMS.contains(&next.to_lowercase().as_str());
                if proper || acronym {
                    result = capitalize_first(&words[1..].join(" "));
                }
            }

            recent.push_back(starter);
            if recent.len() > STARTER_WINDOW {
                recent.pop_front();
            }

            vec![result]
        })
    })
}

/// Give formulaic paragraph openings an informal variant.
///
/// The first paragraph of the document keeps its opening.
pub fn vary_paragraph_starts(document: &Document, gate: Gate, rng: &mut dyn RngCore) -> Document {
    document.map_prose_indexed(|index, paragraph| {
        if index == 0 || !gate.fire(rng) {
            return paragraph.to_string();
        }

        PARAGRAPH_STARTS
            .iter()
            .find(|(old, _)| paragraph.starts_with(old))
            .map(|(old, new)| format!("{}{}", new, &paragraph[old.len()..]))
            .unwrap_or_else(|| paragraph.to_string())
    })
}
