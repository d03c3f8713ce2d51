//! Ordered registry of schedule entries.
//!
//! The registry mirrors the delay queue for display and persistence: every
//! queued action's key has exactly one entry here, and vice versa, except
//! transiently while a fired action is being decided (re-arm or retire).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::types::Category;

/// A scheduled update as displayed and persisted.
///
/// `title` is the unique key shared with the delay queue. `content` is the
/// human time description ("at HH:MM" / "in N seconds") the delay is
/// re-derived from on reload, so its format must stay exactly as produced
/// by [`crate::core::clock::TimeSpec::content`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub title: String,
    pub content: String,
    pub name: String,
    pub category: Category,
    pub repeat: bool,
}

/// Ordered collection of schedule entries.
#[derive(Debug, Default)]
pub struct ScheduleRegistry {
    entries: Vec<ScheduleEntry>,
}

impl ScheduleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn add(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Remove the entry with the given title, returning it if present.
    pub fn remove(&mut self, title: &str) -> Option<ScheduleEntry> {
        let index = self.entries.iter().position(|e| e.title == title)?;
        Some(self.entries.remove(index))
    }

    /// Look up an entry by title.
    pub fn get(&self, title: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.title == title)
    }

    /// Whether an entry with the given title exists.
    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// The set of titles currently in use, for label allocation.
    pub fn titles(&self) -> HashSet<String> {
        self.entries.iter().map(|e| e.title.clone()).collect()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
