use chrono::{DateTime, Utc};

/// Bounded, newest-first list of human-readable mutation notes.
///
/// Purely observational: nothing reads it back to rebuild state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLog {
    capacity: usize,
    entries: Vec<String>,
}

impl UpdateLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::new(),
        }
    }

    /// Builds a log from stored entries (newest first), dropping any past capacity.
    pub fn from_entries(capacity: usize, mut entries: Vec<String>) -> Self {
        entries.truncate(capacity);
        Self { capacity, entries }
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.insert(0, entry.into());
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Prefixes a log line with the UTC time it happened.
pub fn stamp(now: DateTime<Utc>, text: &str) -> String {
    format!("{} — {}", now.format("%Y-%m-%d %H:%M:%S"), text)
}
