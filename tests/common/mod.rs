/*!
 * Common test utilities for the humanizer test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use humanizer::transforms::test_support::ZeroRng;

/// Paragraph packed with the patterns the scorer penalises
pub const AI_PARAGRAPH: &str = "It's important to note that the results demonstrate a robust effect—and \
the data utilize a comprehensive design. The analysis facilitates understanding—and the findings \
are significant; and the implementation of the model leverages a holistic paradigm. Furthermore, \
the utilization of the framework is crucial. Furthermore, the outcome is pivotal. Furthermore, \
the evidence is compelling.";

/// Document mixing prose with every kind of structural paragraph
pub fn mixed_document() -> String {
    format!(
        "# Findings — Overview\n\n{}\n\n| Metric | Value — note |\n\n- Item one utilize\n\n* Item two — leverage\n\n+ Item three\n\n{}",
        AI_PARAGRAPH, AI_PARAGRAPH
    )
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Route library logs to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
