/*!
 * Tests for the transform library
 */

use humanizer::text::Document;
use humanizer::transforms::{registry, Pipeline, Preset, TransformKind};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::{self, ZeroRng};

fn structural_paragraphs(document: &Document) -> Vec<String> {
    document
        .paragraphs
        .iter()
        .filter(|p| p.is_structural())
        .map(|p| p.text.clone())
        .collect()
}

/// Test that no transform touches heading, table or list paragraphs
#[test]
fn test_everyTransform_shouldPreserveStructuralParagraphs() {
    let document = Document::parse(&common::mixed_document());
    let expected = structural_paragraphs(&document);
    assert_eq!(expected.len(), 5);

    for kind in TransformKind::ALL {
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = kind.entry().apply(&document, 1.0, &mut rng);

            assert_eq!(out.len(), document.len(), "{} changed the paragraph count", kind);
            assert_eq!(structural_paragraphs(&out), expected, "{} altered structure", kind);
        }

        let out = kind.entry().apply(&document, 1.0, &mut ZeroRng);
        assert_eq!(structural_paragraphs(&out), expected, "{} altered structure", kind);
    }
}

/// Test that a document made only of structural paragraphs passes through
#[test]
fn test_everyTransform_withOnlyStructuralParagraphs_shouldReturnInput() {
    let document = Document::parse(
        "# However — we utilize\n\n| Furthermore | it is |\n\n- do not delve — always\n\n* The Fed; and more",
    );

    for kind in TransformKind::ALL {
        let out = kind.entry().apply(&document, 1.0, &mut ZeroRng);
        assert_eq!(out, document, "{} modified a structural-only document", kind);
    }

    let pipeline = Pipeline::from_preset(Preset::Aggressive);
    assert_eq!(pipeline.apply(&document, 1.0, &mut ZeroRng), document);
}

/// Test that zero intensity never changes the text
#[test]
fn test_everyTransform_withZeroIntensity_shouldReturnInput() {
    let document = Document::parse(&common::mixed_document());

    for kind in TransformKind::ALL {
        let out = kind.entry().apply(&document, 0.0, &mut ZeroRng);
        assert_eq!(out, document, "{} fired at zero intensity", kind);
    }
}

/// Test AI vocabulary replacement at full intensity
#[test]
fn test_aiVocabulary_atFullIntensity_shouldReplaceWholeWords() {
    let document = Document::parse("The demonstration clearly demonstrates that the results are large.");
    let out = TransformKind::AiVocabulary.entry().apply(&document, 1.0, &mut ZeroRng);

    assert_eq!(
        out.to_text(),
        "The demonstration clearly shows that the results are large."
    );
}

/// Test that repeated "The <Name>" starters never run more than three in a row
#[test]
fn test_sentenceStarters_shouldBreakLongRunsOfThe() {
    let text = "The Fed raised rates in March. The Fed held rates in April. \
                The Fed cut rates in May. The Fed held rates in June. \
                The Fed raised rates in July. The Fed cut rates in August.";
    let out = TransformKind::SentenceStarters
        .entry()
        .apply(&Document::parse(text), 1.0, &mut ZeroRng);

    let mut run = 0;
    let mut longest = 0;
    for sentence in out.sentences() {
        if sentence.starts_with("The ") {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    assert!(longest <= 3, "found {} consecutive 'The' starters", longest);
    assert!(out.sentences().iter().any(|s| s.starts_with("Fed ")));
}

/// Test that the same seed produces the same output
#[test]
fn test_pipeline_withSameSeed_shouldBeDeterministic() {
    let document = Document::parse(&common::mixed_document());
    let pipeline = Pipeline::from_preset(Preset::Aggressive);

    let first = pipeline.apply(&document, 0.7, &mut StdRng::seed_from_u64(1234));
    let second = pipeline.apply(&document, 0.7, &mut StdRng::seed_from_u64(1234));

    assert_eq!(first, second);
}

/// Test that the registry lists every kind once, in declaration order
#[test]
fn test_registry_shouldCoverEveryKind() {
    let kinds: Vec<TransformKind> = registry().iter().map(|entry| entry.kind).collect();
    assert_eq!(kinds, TransformKind::ALL.to_vec());
    assert!(registry().iter().all(|e| e.trigger_factor > 0.0 && e.trigger_factor <= 1.0));
}

/// Test that the conservative preset is a subset of the aggressive one
#[test]
fn test_presets_conservativeShouldBeSubsetOfAggressive() {
    let aggressive = Preset::Aggressive.kinds();
    for kind in Preset::Conservative.kinds() {
        assert!(aggressive.contains(&kind));
    }
    assert_eq!(aggressive.len(), TransformKind::ALL.len());
}

/// Apply one registered transform at full intensity with every gate firing
fn apply_full(kind: TransformKind, text: &str) -> String {
    kind.entry().apply(&Document::parse(text), 1.0, &mut ZeroRng).to_text()
}

/// Test the zero generator shared with the crate's own tests
#[test]
fn test_zeroRng_shouldFireEveryPositiveGate() {
    use humanizer::transforms::Gate;

    assert!(Gate::new(1.0, 0.02).fire(&mut ZeroRng));
    assert!(!Gate::new(0.0, 1.0).fire(&mut ZeroRng));
}

/// Test that personal touches reword prose and leave headings alone
#[test]
fn test_personalTouches_shouldUseFirstPersonInProseOnly() {
    let out = apply_full(
        TransformKind::PersonalTouches,
        "# The data shows\n\nThe data shows a rise. This suggests more.",
    );

    assert_eq!(out, "# The data shows\n\nOur data shows a rise. This hints more.");
}

/// Test that informal phrases replace stock connectives outside lists
#[test]
fn test_informalPhrases_shouldSkipListItems() {
    let out = apply_full(
        TransformKind::InformalPhrases,
        "- Furthermore, a list\n\nFurthermore, rates rose. In conclusion, prices held.",
    );

    assert_eq!(
        out,
        "- Furthermore, a list\n\nWhat's more, rates rose. Bottom line, prices held."
    );
}

/// Test that a long paragraph gets one aside and a table row none
#[test]
fn test_parentheticals_shouldAsideOnlyInLongProse() {
    let mut words: Vec<String> = (0..40).map(|i| format!("w{}", i)).collect();
    words[20] = "middle,".to_string();
    let prose = words.join(" ");
    let text = format!("| {} |\n\n{}", prose, prose);

    let out = apply_full(TransformKind::Parentheticals, &text);
    let document = Document::parse(&out);

    assert_eq!(document.paragraphs[0].text, format!("| {} |", prose));
    assert!(document.paragraphs[1].text.contains("middle (a point worth dwelling on), w21"));
    assert_eq!(document.paragraphs[1].text.matches('(').count(), 1);
}

/// Test that interjections open later prose paragraphs only
#[test]
fn test_interjections_shouldOpenLaterProseParagraphs() {
    let out = apply_full(
        TransformKind::Interjections,
        "# Title\n\nFirst words.\n\n| t |\n\nThe fourth paragraph.\n\n- item",
    );

    assert_eq!(
        out,
        "# Title\n\nFirst words.\n\n| t |\n\nLook, the fourth paragraph.\n\n- item"
    );
}

/// Test that filler words start sentences of prose paragraphs
#[test]
fn test_fillerWords_shouldStartProseSentences() {
    let out = apply_full(TransformKind::FillerWords, "* A. B.\n\nRates rose. Prices fell.");

    assert_eq!(out, "* A. B.\n\nRates rose. Well, prices fell.");
}

/// Test that filler phrases follow a comma placed late enough in the sentence
#[test]
fn test_fillerPhrases_shouldFollowLateComma() {
    let out = apply_full(
        TransformKind::FillerPhrases,
        "+ Output grew quickly, and more\n\nOutput grew quickly, and prices followed.",
    );

    assert_eq!(
        out,
        "+ Output grew quickly, and more\n\nOutput grew quickly, so to speak, and prices followed."
    );
}

/// Test that typos stay within their budget and never reach headings
#[test]
fn test_typos_shouldStayWithinBudget() {
    let text = format!("# that that that\n\n{}", "Rates rose that year. ".repeat(100));

    let out = apply_full(TransformKind::Typos, &text);
    let document = Document::parse(&out);

    assert_eq!(document.paragraphs[0].text, "# that that that");
    assert_eq!(document.paragraphs[1].text.matches("taht").count(), 1);
    assert_eq!(apply_full(TransformKind::Typos, SHORT_PROSE), SHORT_PROSE);
}

const SHORT_PROSE: &str = "That is all there is to say about that.";
