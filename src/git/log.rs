//! Recent commit subjects for a path.

use git2::{Commit, DiffOptions, ErrorCode, Repository, Sort};

use crate::error::GitError;

/// Subject lines of the last `limit` commits that touched `path`, newest first.
///
/// A repository without commits has no history, which is not an error.
pub fn recent_subjects(repo: &Repository, path: &str, limit: usize) -> Result<Vec<String>, GitError> {
    collect_subjects(repo, path, limit).map_err(|source| GitError::LogFailed {
        path: path.to_string(),
        source,
    })
}

fn collect_subjects(repo: &Repository, path: &str, limit: usize) -> Result<Vec<String>, git2::Error> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let head = match repo.head() {
        Ok(head) => head.peel_to_commit()?,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let mut revwalk = repo.revwalk()?;
    revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    revwalk.push(head.id())?;

    let mut subjects = Vec::new();
    for oid in revwalk {
        let commit = repo.find_commit(oid?)?;
        if !touches_path(repo, &commit, path)? {
            continue;
        }

        let subject = commit.summary().unwrap_or("").trim();
        if subject.is_empty() {
            continue;
        }

        subjects.push(subject.to_string());
        if subjects.len() == limit {
            break;
        }
    }

    Ok(subjects)
}

/// Whether `commit` changed `path` relative to its first parent.
fn touches_path(repo: &Repository, commit: &Commit<'_>, path: &str) -> Result<bool, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let mut opts = DiffOptions::new();
    opts.pathspec(path).disable_pathspec_match(true);
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

    Ok(diff.deltas().len() > 0)
}
