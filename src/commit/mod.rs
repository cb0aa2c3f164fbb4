//! AI-generated commit messages from staged changes.

pub mod diff;
pub mod history;
pub mod message;
pub mod prompt;
pub mod sanitize;

pub use diff::{DiffContext, FileDiff, collect_diff_context};
pub use history::{HistoryContext, collect_history};
pub use message::CommitMessageGenerator;
pub use prompt::build_commit_prompt;
pub use sanitize::sanitize_response;
