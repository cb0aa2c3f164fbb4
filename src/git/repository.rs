//! The version-control gateway used by the commit message generator.

use std::path::Path;

use git2::{Oid, Repository};

use crate::error::GitError;

use super::commit::commit_index;
use super::log::recent_subjects;
use super::staged::{diff_for, list_staged_files};

/// Operations the generator needs from version control.
///
/// This abstraction allows replacing the repository with a test double.
#[cfg_attr(test, mockall::automock)]
pub trait VcsGateway {
    /// Paths of all staged files, in repository order.
    fn list_staged_files(&self) -> Result<Vec<String>, GitError>;

    /// Unified diff lines of the staged change to `path`.
    fn diff_for(&self, path: &str) -> Result<Vec<String>, GitError>;

    /// Up to `limit` commit subjects that touched `path`, newest first.
    fn recent_subjects(&self, path: &str, limit: usize) -> Result<Vec<String>, GitError>;

    /// Commit the staged index with `message`.
    fn commit(&self, message: &str) -> Result<Oid, GitError>;
}

/// [`VcsGateway`] backed by a git2 repository.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the repository containing `path`, searching parent directories.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}

impl VcsGateway for GitRepository {
    fn list_staged_files(&self) -> Result<Vec<String>, GitError> {
        list_staged_files(&self.repo)
    }

    fn diff_for(&self, path: &str) -> Result<Vec<String>, GitError> {
        diff_for(&self.repo, path)
    }

    fn recent_subjects(&self, path: &str, limit: usize) -> Result<Vec<String>, GitError> {
        recent_subjects(&self.repo, path, limit)
    }

    fn commit(&self, message: &str) -> Result<Oid, GitError> {
        commit_index(&self.repo, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = GitRepository::discover(dir.path());
        assert!(matches!(result, Err(GitError::OpenRepository(_))));
    }

    #[test]
    fn test_discover_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        let repo = GitRepository::discover(&nested).unwrap();
        assert!(repo.list_staged_files().unwrap().is_empty());
    }
}
