//! Bounded per-file diff context for the prompt.

use tracing::{debug, warn};

use crate::error::GitError;
use crate::git::VcsGateway;

/// Maximum number of staged files considered for the prompt.
pub const MAX_FILES: usize = 50;

/// Files whose diff is longer than this are left out entirely.
pub const MAX_FILE_DIFF_LINES: usize = 10_000;

/// Diff lines kept per included file.
pub const MAX_LINES_PER_FILE: usize = 200;

/// Diff of one staged file after the size policy was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    /// Kept diff lines (at most [`MAX_LINES_PER_FILE`]); empty when not included.
    pub diff_lines: Vec<String>,
    /// Length of the diff before truncation.
    pub total_lines: usize,
    pub included: bool,
}

impl FileDiff {
    /// Apply the per-file size policy to a raw diff.
    pub fn from_lines(path: impl Into<String>, mut lines: Vec<String>) -> Self {
        let path = path.into();
        let total_lines = lines.len();

        if total_lines > MAX_FILE_DIFF_LINES {
            warn!(
                path = %path,
                lines = total_lines,
                "Diff exceeds {MAX_FILE_DIFF_LINES} lines, leaving file out of the prompt"
            );
            return Self {
                path,
                diff_lines: Vec::new(),
                total_lines,
                included: false,
            };
        }

        if total_lines == 0 {
            debug!(path = %path, "Staged file has an empty diff");
            return Self {
                path,
                diff_lines: Vec::new(),
                total_lines,
                included: false,
            };
        }

        lines.truncate(MAX_LINES_PER_FILE);
        Self {
            path,
            diff_lines: lines,
            total_lines,
            included: true,
        }
    }

    /// Whether lines were cut from an included diff.
    pub fn is_truncated(&self) -> bool {
        self.included && self.total_lines > self.diff_lines.len()
    }
}

/// Diff context for one generation, in staged-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffContext {
    pub files: Vec<FileDiff>,
    /// Staged files beyond [`MAX_FILES`] that were never looked at.
    pub omitted_files: usize,
}

impl DiffContext {
    pub fn included(&self) -> impl Iterator<Item = &FileDiff> {
        self.files.iter().filter(|f| f.included)
    }

    pub fn included_count(&self) -> usize {
        self.included().count()
    }

    /// Whether at least one file has diff content worth describing.
    pub fn has_usable_content(&self) -> bool {
        self.included().next().is_some()
    }

    /// Paths of every considered file, included or not.
    pub fn considered_paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Fetch diffs for the first [`MAX_FILES`] staged paths and apply the size policy.
pub fn collect_diff_context<V>(vcs: &V, staged: &[String]) -> Result<DiffContext, GitError>
where
    V: VcsGateway + ?Sized,
{
    let considered = staged.len().min(MAX_FILES);
    let omitted_files = staged.len() - considered;
    if omitted_files > 0 {
        warn!(
            staged = staged.len(),
            omitted = omitted_files,
            "Too many staged files, only the first {MAX_FILES} are described"
        );
    }

    let files = staged[..considered]
        .iter()
        .map(|path| Ok(FileDiff::from_lines(path.clone(), vcs.diff_for(path)?)))
        .collect::<Result<Vec<_>, GitError>>()?;

    debug!(
        considered = files.len(),
        included = files.iter().filter(|f| f.included).count(),
        "Built diff context"
    );

    Ok(DiffContext {
        files,
        omitted_files,
    })
}
