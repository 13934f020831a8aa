//! Filter predicates for querying and observing captured entries.
//!
//! This module provides:
//! - [`LogFilter`] — Criteria for application log entries
//! - [`NetworkLogFilter`] — Criteria for network log entries
//! - [`TimeRange`] — Inclusive time bounds shared by time-based criteria
//!
//! Matching is conjunctive: an entry matches iff every *present* criterion
//! is satisfied. An absent (`None`) criterion imposes no constraint. A
//! present-but-empty set matches nothing on that dimension, which is a
//! distinct state from absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::{LogEntry, LogLevel, NetworkLogEntry};

/// Inclusive time range for filtering entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive)
    pub from: Option<DateTime<Utc>>,
    /// End of the range (inclusive)
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Creates a new time range with the given bounds.
    #[must_use]
    pub const fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    /// Creates a time range open at the end.
    #[must_use]
    pub const fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// Checks if a timestamp falls within this range.
    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if timestamp > to {
                return false;
            }
        }
        true
    }
}

/// Filter criteria for application log entries.
///
/// The default filter matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Restrict to these levels; empty set matches nothing
    pub levels: Option<HashSet<LogLevel>>,
    /// Restrict to these exact tags; empty set matches nothing
    pub tags: Option<HashSet<String>>,
    /// Case-insensitive substring search over tag, message and throwable
    pub search_text: Option<String>,
    /// Restrict to this time range (both bounds inclusive)
    #[serde(default)]
    pub time_range: TimeRange,
}

impl LogFilter {
    /// Creates an empty filter that matches all entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a level to the level criterion.
    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.levels.get_or_insert_with(HashSet::new).insert(level);
        self
    }

    /// Replaces the level criterion wholesale.
    #[must_use]
    pub fn with_levels(mut self, levels: HashSet<LogLevel>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Adds a tag to the tag criterion (exact match, not substring).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(HashSet::new).insert(tag.into());
        self
    }

    /// Sets the search text criterion.
    #[must_use]
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Sets the time range criterion.
    #[must_use]
    pub const fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Checks if an entry satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(ref levels) = self.levels {
            if !levels.contains(&entry.level) {
                return false;
            }
        }

        if let Some(ref tags) = self.tags {
            if !tags.contains(&entry.tag) {
                return false;
            }
        }

        if let Some(ref search) = self.search_text {
            let needle = search.to_lowercase();
            let haystack = format!(
                "{} {} {}",
                entry.tag,
                entry.message,
                entry.throwable.as_deref().unwrap_or("")
            )
            .to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }

        self.time_range.contains(entry.timestamp)
    }
}

/// Filter criteria for network log entries.
///
/// The default filter matches every entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLogFilter {
    /// Restrict to these HTTP methods; empty set matches nothing
    pub methods: Option<HashSet<String>>,
    /// Case-insensitive substring match against the URL
    pub url_pattern: Option<String>,
    /// Restrict to these response codes; empty set matches nothing.
    /// An entry without a response code never satisfies a present criterion.
    pub status_codes: Option<HashSet<u16>>,
    /// Only entries that took at least this long, in milliseconds
    pub min_duration_ms: Option<u64>,
    /// Only failed requests
    #[serde(default)]
    pub only_errors: bool,
    /// Restrict to this time range (both bounds inclusive)
    #[serde(default)]
    pub time_range: TimeRange,
}

impl NetworkLogFilter {
    /// Creates an empty filter that matches all entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an HTTP method to the method criterion.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.methods
            .get_or_insert_with(HashSet::new)
            .insert(method.into());
        self
    }

    /// Sets the URL substring criterion.
    #[must_use]
    pub fn with_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.url_pattern = Some(pattern.into());
        self
    }

    /// Adds a status code to the status criterion.
    #[must_use]
    pub fn with_status_code(mut self, code: u16) -> Self {
        self.status_codes
            .get_or_insert_with(HashSet::new)
            .insert(code);
        self
    }

    /// Sets the minimum duration criterion.
    #[must_use]
    pub const fn with_min_duration_ms(mut self, min: u64) -> Self {
        self.min_duration_ms = Some(min);
        self
    }

    /// Restricts matching to failed requests only.
    #[must_use]
    pub const fn only_errors(mut self) -> Self {
        self.only_errors = true;
        self
    }

    /// Sets the time range criterion.
    #[must_use]
    pub const fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    /// Checks if an entry satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, entry: &NetworkLogEntry) -> bool {
        if let Some(ref methods) = self.methods {
            if !methods.contains(&entry.method) {
                return false;
            }
        }

        if let Some(ref pattern) = self.url_pattern {
            if !entry
                .url
                .to_lowercase()
                .contains(&pattern.to_lowercase())
            {
                return false;
            }
        }

        if let Some(ref codes) = self.status_codes {
            match entry.response_code {
                Some(code) if codes.contains(&code) => {}
                _ => return false,
            }
        }

        if let Some(min) = self.min_duration_ms {
            if entry.duration_ms < min {
                return false;
            }
        }

        if self.only_errors && !entry.is_failed() {
            return false;
        }

        self.time_range.contains(entry.timestamp)
    }
}
