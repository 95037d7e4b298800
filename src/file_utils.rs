use anyhow::{Context, Result};
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Directory holding the file, "." for bare file names
    fn parent_dir(path: &Path) -> &Path {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    // @generates: Sibling path sharing the file stem, e.g. paper.md -> paper.changelog.md
    pub fn derived_path<P: AsRef<Path>>(path: P, suffix: &str) -> PathBuf {
        path.as_ref().with_extension(suffix)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a file atomically: the content goes to a temporary file in the
    /// same directory, which then replaces the target.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = Self::parent_dir(path);
        Self::ensure_dir(dir)?;

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.flush()?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace file: {:?}", path))?;

        Ok(())
    }

    /// Append raw text to a file, creating it when missing
    pub fn append<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        Self::ensure_dir(Self::parent_dir(path.as_ref()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", path.as_ref()))?;

        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
