/*!
 * End-to-end tests for the review workflow through the controller
 */

use anyhow::Result;
use humanizer::app_controller::{Controller, ReviewAction};
use humanizer::errors::AppError;
use humanizer::review::{Impact, Resolution, ReviewStore};
use std::fs;

use crate::common;

const RECOMMENDATIONS: &str = r#"[
  {"id": "R1-01", "source": "review_1.md", "category": "factual", "description": "Correct the 2021 inflation figure", "location": "Section 2"},
  {"id": "R1-02", "source": "review_1.md", "category": "stylistic", "description": "Drop the rhetorical question in the abstract"},
  {"id": "R2-01", "description": "Soften the causal claim in the conclusion"}
]"#;

/// Test the whole cycle from init to a marked recommendation
#[test]
fn test_reviewCycle_shouldTrackRecommendationsToResolution() -> Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let document = common::create_test_file(dir.path(), "paper.md", "# Paper\n\nInflation was 7% in 2021.\n")?;
    let recommendations = common::create_test_file(dir.path(), "recs.json", RECOMMENDATIONS)?;
    let controller = Controller::new_for_test()?;

    controller.run_review(
        &document,
        ReviewAction::Init {
            purpose: Some("Central bank working paper".to_string()),
            audience: None,
            constraints: vec!["Keep the JEL codes".to_string()],
            non_negotiables: vec![],
        },
    )?;
    controller.run_review(&document, ReviewAction::Import(format!("@{}", recommendations.display())))?;
    // importing twice adds nothing
    controller.run_review(&document, ReviewAction::Import(format!("@{}", recommendations.display())))?;

    let evaluation = r#"```json
[
  {"id": "R1-01", "impact": "increases", "reasoning": "fixes a factual error"},
  {"id": "R1-02", "impact": "neutral", "reasoning": "style"},
  {"id": "R2-01", "impact": "uncertain", "reasoning": "depends on identification strategy"}
]
```"#;
    controller.run_review(&document, ReviewAction::ApplyEvaluation(evaluation.to_string()))?;
    controller.run_review(&document, ReviewAction::ListApproved)?;
    controller.run_review(&document, ReviewAction::ListUncertain)?;
    controller.run_review(
        &document,
        ReviewAction::MarkApplied {
            id: "R1-01".to_string(),
            notes: Some("Now 7.0% per CPI release".to_string()),
        },
    )?;
    controller.run_review(&document, ReviewAction::Status)?;

    let store = ReviewStore::new(&document);
    let stored = store.load_recommendations()?;
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].category, "factual");
    assert_eq!(stored[2].source, "human");
    assert!(matches!(stored[0].resolution, Resolution::Applied { .. }));
    assert!(matches!(stored[2].impact, Impact::Uncertain { .. }));

    let approved: Vec<String> = store.approved()?.into_iter().map(|r| r.id).collect();
    assert_eq!(approved, vec!["R1-02".to_string()]);

    let context = store.load_context()?.expect("context should exist");
    assert_eq!(context.purpose, "Central bank working paper");
    assert_eq!(context.constraints, vec!["Keep the JEL codes".to_string()]);

    let changelog = fs::read_to_string(store.changelog_path())?;
    assert!(changelog.contains("### [APPLIED] R1-01"));
    assert!(changelog.contains("Notes: Now 7.0% per CPI release"));
    Ok(())
}

/// Test that a second init collects answers typed since the last one
#[test]
fn test_init_shouldCollectAnswersAndBumpIteration() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let document = common::create_test_file(dir.path(), "paper.md", "# Paper\n")?;
    let controller = Controller::new_for_test()?;
    let init = ReviewAction::Init {
        purpose: None,
        audience: None,
        constraints: vec![],
        non_negotiables: vec![],
    };

    controller.run_review(&document, init.clone())?;
    controller.run_review(&document, ReviewAction::Import(r#"[{"id": "Q1", "description": "Add a robustness table"}]"#.to_string()))?;
    controller.run_review(&document, ReviewAction::ApplyEvaluation(r#"[{"id": "Q1", "impact": "uncertain"}]"#.to_string()))?;

    let store = ReviewStore::new(&document);
    let markdown = fs::read_to_string(store.questions_markdown_path())?;
    fs::write(
        store.questions_markdown_path(),
        markdown.replace("**ANSWER:** \n", "**ANSWER:** Apply it\n"),
    )?;

    controller.run_review(&document, init)?;

    assert_eq!(store.load_context()?.map(|c| c.iteration), Some(1));
    assert_eq!(store.load_questions()?[0].answer.as_deref(), Some("Apply it"));
    Ok(())
}

/// Test that review actions on a missing document fail as file errors
#[test]
fn test_runReview_withMissingDocument_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let err = controller
        .run_review(&dir.path().join("missing.md"), ReviewAction::Status)
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<AppError>(), Some(AppError::File(_))));
    Ok(())
}

/// Test that marking an unknown id surfaces the store error
#[test]
fn test_runReview_withUnknownId_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let document = common::create_test_file(dir.path(), "paper.md", "# Paper\n")?;
    let controller = Controller::new_for_test()?;

    let result = controller.run_review(
        &document,
        ReviewAction::MarkFailed {
            id: "nope".to_string(),
            notes: None,
        },
    );

    assert!(result.is_err());
    Ok(())
}
