//! Staged file enumeration and per-file diffs (index against HEAD).

use git2::{DiffFormat, DiffOptions, ErrorCode, Repository, Tree};

use crate::error::GitError;

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// so everything in the index counts as staged.
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, git2::Error> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    head_ref.peel_to_tree().map(Some)
}

/// List the paths of all staged files, in the order git reports them.
pub fn list_staged_files(repo: &Repository) -> Result<Vec<String>, GitError> {
    let head_tree = resolve_head_tree(repo).map_err(GitError::StagedFilesFailed)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::StagedFilesFailed)?;

    let paths = diff
        .deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
        })
        .filter(|p| !p.is_empty())
        .collect();

    Ok(paths)
}

/// Unified diff lines of the staged change to a single path.
///
/// Header lines (`diff --git`, `---`, `+++`, `@@`) are kept so the model sees
/// which file and hunk each change belongs to.
pub fn diff_for(repo: &Repository, path: &str) -> Result<Vec<String>, GitError> {
    let diff_err = |source| GitError::DiffFailed {
        path: path.to_string(),
        source,
    };

    let head_tree = resolve_head_tree(repo).map_err(diff_err)?;

    let mut opts = DiffOptions::new();
    opts.pathspec(path).disable_pathspec_match(true);
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, Some(&mut opts))
        .map_err(diff_err)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .map_err(diff_err)?;

    Ok(text.lines().map(str::to_string).collect())
}
