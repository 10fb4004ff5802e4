//! HUD log feed: a short, most-recent-first list of human-readable events.
//!
//! Purely observational. The feed is owned by the engine and bounded; pushing
//! past capacity evicts the oldest entry. Every entry is also forwarded to the
//! `log` facade.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use std::collections::VecDeque;

use serde::Serialize;
use uuid::Uuid;

/// One HUD log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub message: String,
    /// Scene clock time at which the event happened.
    pub timestamp_ms: f64,
}

/// Bounded most-recent-first feed.
#[derive(Debug, Clone)]
pub struct LogFeed {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogFeed {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Record an event and return the stored entry.
    pub fn push(&mut self, message: impl Into<String>, now_ms: f64) -> LogEntry {
        let entry = LogEntry { id: Uuid::new_v4(), message: message.into(), timestamp_ms: now_ms };
        log::info!("{}", entry.message);
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        entry
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
