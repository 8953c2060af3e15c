use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::issue::CanonicalIssue;
use crate::util::slug::slugify;

/// Writes rendered issues under `output_dir/{project}/{key}-{slug}.md`.
pub struct MarkdownWriter {
    output_dir: PathBuf,
    overwrite: bool,
}

/// Result of a batch write.
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Written paths, in input order.
    pub written: Vec<PathBuf>,
    pub failures: Vec<(String, Error)>,
}

impl MarkdownWriter {
    pub fn new(output_dir: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite,
        }
    }

    /// Path the issue would be written to, ignoring collisions.
    pub fn file_path(&self, issue: &CanonicalIssue) -> PathBuf {
        let file_name = format!("{}-{}.md", issue.key, slugify(&issue.summary));
        self.output_dir.join(&issue.project_key).join(file_name)
    }

    /// Write one rendered issue and return where it landed.
    ///
    /// With overwrite disabled an existing file is kept and the content goes
    /// to the first free `__vN` sibling instead.
    pub fn write(&self, issue: &CanonicalIssue, content: &str) -> Result<PathBuf> {
        let mut path = self.file_path(issue);
        if !self.overwrite && path.exists() {
            path = versioned_path(&path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
        }
        std::fs::write(&path, content).map_err(|e| Error::persistence(&path, e))?;

        info!(key = %issue.key, path = %path.display(), "Wrote issue");
        Ok(path)
    }

    /// Write every `(issue, content)` pair, skipping the ones that fail.
    pub fn write_batch(&self, items: &[(CanonicalIssue, String)]) -> WriteOutcome {
        let mut outcome = WriteOutcome::default();
        for (issue, content) in items {
            match self.write(issue, content) {
                Ok(path) => outcome.written.push(path),
                Err(e) => {
                    warn!(key = %issue.key, error = %e, "Failed to write issue");
                    outcome.failures.push((issue.key.clone(), e));
                }
            }
        }
        outcome
    }
}

/// First `{stem}__v{N}{ext}` next to `path` that does not exist, from N = 2.
pub fn versioned_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));

    let mut version = 2;
    loop {
        let candidate = parent.join(format!("{stem}__v{version}{suffix}"));
        if !candidate.exists() {
            return candidate;
        }
        version += 1;
    }
}
