/*!
 * Fixed lexicons shared by the metric extractor and the transforms.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Words that machine-generated prose overuses
pub const AI_WORDS: &[&str] = &[
    "delve", "delves", "delving", "tapestry", "multifaceted", "nuanced", "nuance",
    "landscape", "leverage", "leveraging", "leveraged", "robust", "navigate",
    "navigating", "crucial", "crucially", "pivotal", "fundamental", "fundamentally",
    "comprehensive", "intricate", "facilitate", "facilitates", "facilitating",
    "utilize", "utilizes", "utilizing", "underscore", "underscores", "underscoring",
    "highlight", "highlights", "highlighting", "realm", "paradigm", "synergy",
    "holistic", "streamline", "optimize", "innovative", "cutting-edge",
    "state-of-the-art", "groundbreaking", "transformative",
];

/// Stock phrases counted alongside [`AI_WORDS`]; matched against lowercased text
pub static AI_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"it'?s (important|worth|crucial) to note",
        r"it bears (mentioning|noting)",
        r"this (is|represents) a (significant|fundamental|crucial)",
        r"at its core",
        r"in essence",
        r"a testament to",
        r"sheds light on",
        r"paves the way",
        r"the fact that",
        r"it is (clear|evident|apparent) that",
        r"this (highlights|underscores|demonstrates)",
        r"(furthermore|moreover|additionally),",
        r"interestingly,",
        r"notably,",
        r"(significantly|importantly),",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("AI phrase regex"))
    .collect()
});

/// Nominalizations and the gerund that replaces them
pub const NOMINALIZATIONS: &[(&str, &str)] = &[
    ("utilization", "using"),
    ("implementation", "implementing"),
    ("optimization", "optimizing"),
    ("transformation", "transforming"),
    ("democratization", "democratizing"),
    ("verification", "verifying"),
    ("examination", "examining"),
    ("consideration", "considering"),
    ("determination", "determining"),
    ("establishment", "establishing"),
    ("development", "developing"),
    ("improvement", "improving"),
    ("measurement", "measuring"),
    ("assessment", "assessing"),
    ("achievement", "achieving"),
    ("advancement", "advancing"),
    ("enhancement", "enhancing"),
    ("expansion", "expanding"),
    ("reduction", "reducing"),
    ("production", "producing"),
    ("distribution", "distributing"),
    ("concentration", "concentrating"),
    ("accumulation", "accumulating"),
];

/// AI-favourite words and their plain replacements
pub const AI_WORD_REPLACEMENTS: &[(&str, &str)] = &[
    ("utilize", "use"),
    ("utilizes", "uses"),
    ("utilizing", "using"),
    ("facilitate", "help"),
    ("facilitates", "helps"),
    ("robust", "strong"),
    ("significant", "large"),
    ("significantly", "much"),
    ("substantial", "large"),
    ("substantially", "much"),
    ("demonstrated", "showed"),
    ("demonstrates", "shows"),
    ("demonstrate", "show"),
    ("indicating", "showing"),
    ("subsequently", "then"),
    ("additionally", "also"),
];

/// Formal words and informal swaps
pub const FORMAL_WORD_REPLACEMENTS: &[(&str, &str)] = &[
    ("approximately", "about"),
    ("however", "but"),
    ("therefore", "so"),
    ("furthermore", "plus"),
    ("consequently", "so"),
    ("nevertheless", "still"),
    ("regarding", "about"),
    ("concerning", "about"),
    ("pertaining", "about"),
    ("subsequent", "later"),
    ("sufficient", "enough"),
    ("numerous", "many"),
    ("various", "different"),
    ("particular", "specific"),
    ("primary", "main"),
    ("additional", "more"),
    ("obtain", "get"),
    ("require", "need"),
    ("possess", "have"),
    ("commence", "start"),
    ("terminate", "end"),
    ("frequently", "often"),
    ("occasionally", "sometimes"),
    ("immediately", "right away"),
    ("previously", "before"),
    ("currently", "now"),
    ("primarily", "mainly"),
    ("essentially", "basically"),
    ("particularly", "especially"),
];

/// Two-word phrases and their contraction
pub const CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("should not", "shouldn't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("has not", "hasn't"),
    ("have not", "haven't"),
    ("had not", "hadn't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("what is", "what's"),
    ("there is", "there's"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("we have", "we've"),
    ("they have", "they've"),
];

/// Absolute claims and their hedged form
pub const HEDGES: &[(&str, &str)] = &[
    ("always", "typically"),
    ("never", "rarely"),
    ("certainly", "likely"),
    ("definitely", "probably"),
    ("obviously", "seemingly"),
    ("without doubt", "likely"),
    ("proves", "suggests"),
];

/// Paragraph openings and their informal variant
pub const PARAGRAPH_STARTS: &[(&str, &str)] = &[
    ("The ", "Now, the "),
    ("This ", "So this "),
    ("These ", "All these "),
    ("In ", "Looking at "),
    ("For ", "As for "),
    ("However", "Still"),
    ("Therefore", "So"),
    ("Additionally", "Plus"),
    ("Furthermore", "What's more"),
    ("Moreover", "On top of that"),
];

/// Transition words and the alternatives used once they repeat
pub const TRANSITIONS: &[(&str, &[&str])] = &[
    ("however", &["but", "yet", "still", "though"]),
    ("therefore", &["so", "thus", "hence", "accordingly"]),
    ("moreover", &["also", "plus", "besides", "and"]),
    ("furthermore", &["and", "also", "in addition", "as well"]),
    ("additionally", &["also", "plus", "and", "as well"]),
];

/// Lowercase acronyms that may follow a dropped leading "The"
pub const STARTER_ACRONYMS: &[&str] = &["bls", "cpi", "fed", "gdp"];

/// Words at which a long sentence may be split
pub const SPLIT_CONJUNCTIONS: &[&str] =
    &["and", "but", "which", "because", "since", "while", "so", "yet"];

/// Impersonal report phrases and a first-person rewording
pub const PERSONAL_TOUCHES: &[(&str, &str)] = &[
    ("one can see that", "we can see that"),
    ("it is clear that", "clearly"),
    ("the data shows", "our data shows"),
    ("the results indicate", "our results indicate"),
    ("the analysis reveals", "our analysis reveals"),
    ("the evidence suggests", "the evidence we gathered suggests"),
    ("this indicates", "this tells us"),
    ("this suggests", "this hints"),
    ("this demonstrates", "this shows us"),
];

/// Stock connectives and a conversational equivalent
pub const INFORMAL_PHRASES: &[(&str, &str)] = &[
    ("in fact,", "actually,"),
    ("it is clear that", "it's pretty clear"),
    ("significantly", "quite a bit"),
    ("furthermore,", "what's more,"),
    ("additionally,", "plus,"),
    ("it should be noted that", "worth noting:"),
    ("this demonstrates that", "this shows"),
    ("as a result,", "so,"),
    ("in conclusion,", "bottom line,"),
    ("consequently,", "as a result,"),
];

/// Asides placed after a mid-paragraph comma
pub const PARENTHETICALS: &[&str] = &[
    "(a point worth dwelling on)",
    "(to put it plainly)",
    "(and this bears emphasis)",
    "(lest we forget)",
    "(for what it's worth)",
    "(crucially)",
];

/// Spoken openers for later paragraphs
pub const INTERJECTIONS: &[&str] = &[
    "Look,",
    "Here's the thing:",
    "To be honest,",
    "In practice,",
    "The reality is",
    "What this means is",
    "Put simply,",
    "In other words,",
    "The bottom line:",
    "Worth noting:",
    "Interestingly enough,",
    "As it turns out,",
];

/// Sentence-initial fillers; the empty entry leaves the sentence alone
pub const FILLER_WORDS: &[&str] = &["Well,", "So,", "Now,", "OK,", "Right,", "Look,", ""];

/// Hedging phrases inserted after a comma
pub const FILLER_PHRASES: &[&str] = &[
    "so to speak",
    "as it were",
    "in a sense",
    "if you will",
    "one might say",
    "broadly speaking",
    "in practical terms",
    "at least in part",
    "to some extent",
    "more or less",
];

/// Common words where a swapped letter pair reads as an honest typo
pub const TYPO_TARGETS: &[&str] = &[
    "that", "this", "with", "from", "their", "which", "would", "there", "about", "could",
    "should", "these", "other", "were", "been", "more", "when",
];

/// Sentence openers that keep their capital after an interjection
pub const CASE_KEEPING_WORDS: &[&str] = &["I", "AI", "BLS", "CPI", "Fed", "GDP"];

pub fn is_ai_word(word: &str) -> bool {
    AI_WORDS.contains(&word)
}

pub fn is_nominalization(word: &str) -> bool {
    NOMINALIZATIONS.iter().any(|(nom, _)| *nom == word)
}
