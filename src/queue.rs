//! Ordered, deduplicated queue of images waiting for bulk processing.
//!
//! Entries are appended in selection order and never removed individually;
//! [`ImageQueue::clear`] empties the whole queue. Each entry carries an
//! explicit [`EntryState`]; the rendered result lives inside
//! [`EntryState::Processed`], so an entry has a result exactly when it is
//! processed.
//!
//! ## Deduplication
//!
//! Path sources are keyed by their resolved (canonical) path, so `./a.jpg`
//! and `/abs/a.jpg` collapse into one entry. Blob sources are keyed by their
//! original file name. The two key spaces are separate: a blob called
//! `a.jpg` does not collide with the file `/photos/a.jpg`.

use crate::imaging::{BorderedResult, ImageSource};
use std::path::PathBuf;

/// Identity used to reject duplicate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Path(PathBuf),
    Name(String),
}

impl DedupKey {
    pub fn for_source(source: &ImageSource) -> Self {
        match source {
            ImageSource::Path(path) => {
                Self::Path(std::fs::canonicalize(path).unwrap_or_else(|_| path.clone()))
            }
            ImageSource::Blob { name, .. } => Self::Name(name.clone()),
        }
    }
}

/// Processing state of a queue entry.
///
/// `Pending → Processing → Processed | Failed`. Terminal states are never left.
#[derive(Debug, Clone)]
pub enum EntryState {
    Pending,
    Processing,
    Processed(BorderedResult),
    /// Failure message, already formatted for display.
    Failed(String),
}

impl EntryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed(_) | Self::Failed(_))
    }
}

#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub source: ImageSource,
    pub display_name: String,
    key: DedupKey,
    state: EntryState,
}

impl QueueEntry {
    fn new(source: ImageSource, key: DedupKey) -> Self {
        Self {
            display_name: source.display_name(),
            source,
            key,
            state: EntryState::Pending,
        }
    }

    pub fn key(&self) -> &DedupKey {
        &self.key
    }

    pub fn state(&self) -> &EntryState {
        &self.state
    }

    pub fn result(&self) -> Option<&BorderedResult> {
        match &self.state {
            EntryState::Processed(result) => Some(result),
            _ => None,
        }
    }

    /// Pending → Processing. Returns `false` (and changes nothing) otherwise.
    pub(crate) fn start(&mut self) -> bool {
        if matches!(self.state, EntryState::Pending) {
            self.state = EntryState::Processing;
            true
        } else {
            false
        }
    }

    /// Processing → Processed or Failed. Terminal states are left untouched.
    pub(crate) fn finish(&mut self, outcome: Result<BorderedResult, String>) {
        if !matches!(self.state, EntryState::Processing) {
            return;
        }
        self.state = match outcome {
            Ok(result) => EntryState::Processed(result),
            Err(message) => EntryState::Failed(message),
        };
    }
}

/// Insertion-ordered queue of unique image sources.
#[derive(Debug, Default)]
pub struct ImageQueue {
    entries: Vec<QueueEntry>,
}

impl ImageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source as `Pending`. Returns `false` if its key is already queued.
    pub fn add(&mut self, source: ImageSource) -> bool {
        let key = DedupKey::for_source(&source);
        if self.entries.iter().any(|e| e.key == key) {
            return false;
        }
        self.entries.push(QueueEntry::new(source, key));
        true
    }

    /// Add many sources, returning how many were new.
    pub fn extend(&mut self, sources: impl IntoIterator<Item = ImageSource>) -> usize {
        let mut added = 0;
        for source in sources {
            if self.add(source) {
                added += 1;
            }
        }
        added
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [QueueEntry] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that finished successfully, in queue order.
    pub fn processed(&self) -> impl Iterator<Item = (&QueueEntry, &BorderedResult)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result().map(|result| (entry, result)))
    }
}
