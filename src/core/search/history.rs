//! Recent-search history and the last committed search context.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::FilterHints;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub query: String,
    pub searched_at: DateTime<Utc>,
}

/// Bounded, most-recent-first list of searched queries.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl SearchHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a query. A repeat moves to the front instead of duplicating.
    pub fn record(&mut self, query: &str) {
        self.record_at(query, Utc::now());
    }

    fn record_at(&mut self, query: &str, at: DateTime<Utc>) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }
        self.entries
            .retain(|e| !e.query.eq_ignore_ascii_case(query));
        self.entries.push_front(HistoryEntry {
            query: query.to_string(),
            searched_at: at,
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The last committed search, used as the base for edit-and-re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    pub natural_query: String,
    pub grammar_query: String,
    pub hints: FilterHints,
}
