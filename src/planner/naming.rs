//! Output naming templates
//!
//! A template carries run-scoped tokens (`{title}`, `{date}`) resolved once
//! per run, and a segment-scoped `{index}` token rendered per segment. The
//! original configuration dialect spelled the index token `{index:02d}`;
//! both spellings are accepted and render as zero-padded two digits.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{SplitError, SplitResult};
use crate::utils::{sanitize_filename, DEFAULT_MAX_FILENAME_LEN};

const INDEX_TOKENS: [&str; 2] = ["{index:02d}", "{index}"];

/// A naming template with run-scoped tokens already substituted.
#[derive(Debug, Clone)]
pub struct NamingTemplate {
    resolved: String,
}

impl NamingTemplate {
    /// Resolve `{title}` and `{date}` against the input file and run date.
    ///
    /// The title is the sanitized stem of the input path. Fails when the
    /// pattern has no index token, since every rendered segment name would
    /// collide.
    pub fn resolve(pattern: &str, input_path: &Path, run_date: NaiveDate) -> SplitResult<Self> {
        if !INDEX_TOKENS.iter().any(|t| pattern.contains(t)) {
            return Err(SplitError::config(format!(
                "naming pattern {:?} must contain an {{index}} token",
                pattern
            )));
        }

        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = sanitize_filename(&stem, DEFAULT_MAX_FILENAME_LEN);
        let date = run_date.format("%Y%m%d").to_string();

        let resolved = pattern.replace("{title}", &title).replace("{date}", &date);

        Ok(Self { resolved })
    }

    /// Render the filename for one segment index (1-based, zero-padded).
    pub fn render(&self, index: usize) -> String {
        let formatted = format!("{:02}", index);
        let mut name = self.resolved.clone();
        for token in INDEX_TOKENS {
            name = name.replace(token, &formatted);
        }
        name
    }

    /// Render the full output path for one segment.
    pub fn render_path(&self, directory: &Path, index: usize, extension: &str) -> PathBuf {
        directory.join(format!("{}.{}", self.render(index), extension))
    }
}
