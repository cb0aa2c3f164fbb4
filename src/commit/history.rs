//! Recent commit subjects per staged file, used as style context.

use tracing::{debug, warn};

use crate::git::VcsGateway;

/// Ordered mapping from staged path to its recent commit subjects (newest first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryContext {
    entries: Vec<(String, Vec<String>)>,
}

impl HistoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the messages for `path`, keeping its original position if already present.
    pub fn insert(&mut self, path: impl Into<String>, messages: Vec<String>) {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some((_, existing)) => *existing = messages,
            None => self.entries.push((path, messages)),
        }
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, m)| m.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(p, m)| (p.as_str(), m.as_slice()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any file has at least one message.
    pub fn has_messages(&self) -> bool {
        self.entries.iter().any(|(_, m)| !m.is_empty())
    }
}

impl FromIterator<(String, Vec<String>)> for HistoryContext {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut history = HistoryContext::new();
        for (path, messages) in iter {
            history.insert(path, messages);
        }
        history
    }
}

/// Look up recent subjects for every path.
///
/// A failed lookup is logged and leaves that file with no messages; it never
/// fails the whole run.
pub fn collect_history<V>(vcs: &V, paths: &[String], limit: usize) -> HistoryContext
where
    V: VcsGateway + ?Sized,
{
    let mut history = HistoryContext::new();

    for path in paths {
        let messages = match vcs.recent_subjects(path, limit) {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Could not read commit history for {path}: {e}. Continuing without it.");
                Vec::new()
            }
        };
        history.insert(path.clone(), messages);
    }

    debug!(
        files = history.len(),
        with_messages = history.iter().filter(|(_, m)| !m.is_empty()).count(),
        "Collected commit history"
    );

    history
}
