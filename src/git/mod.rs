//! Git operations using git2-rs.

pub mod commit;
pub mod log;
pub mod repository;
pub mod staged;

pub use commit::commit_index;
pub use log::recent_subjects;
pub use repository::{GitRepository, VcsGateway};
pub use staged::{diff_for, list_staged_files};
