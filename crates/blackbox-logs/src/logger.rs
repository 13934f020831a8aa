//! Logger orchestration over a log store.
//!
//! The logger is a thin layer: it gates on a minimum severity, constructs
//! the entry (id and timestamp included) and hands it to its storage.
//! Storage failures propagate to the caller untouched; there are no
//! retries at this layer.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::error::Result;
use crate::filter::LogFilter;
use crate::memory::MemoryStore;
use crate::store::{RecordStream, Store};
use crate::types::{LogEntry, LogLevel, NetworkLogEntry};

/// Leveled logger bound to one storage backend.
pub struct Logger<S> {
    storage: Arc<S>,
    min_level: LogLevel,
}

impl Logger<MemoryStore<LogEntry>> {
    /// Builds a logger and its companion network store from one config.
    ///
    /// The config is validated as a whole before either store is created.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogError::Config`] if any nested bound is invalid.
    pub fn from_config(
        config: &LoggerConfig,
    ) -> Result<(Self, Arc<MemoryStore<NetworkLogEntry>>)> {
        config.validate()?;
        let storage = Arc::new(MemoryStore::new(config.log_store.clone())?);
        let network = Arc::new(MemoryStore::new(config.network_store.clone())?);
        Ok((Self::new(storage, config.min_level), network))
    }
}

impl<S: Store<LogEntry>> Logger<S> {
    /// Creates a logger accepting entries at or above `min_level`.
    #[must_use]
    pub const fn new(storage: Arc<S>, min_level: LogLevel) -> Self {
        Self { storage, min_level }
    }

    /// Returns the minimum accepted severity.
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Returns the bound storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Records a log call.
    ///
    /// Calls below the minimum severity are dropped silently; that is not
    /// an error. Accepted calls construct an entry and store it.
    pub fn log(
        &self,
        level: LogLevel,
        tag: impl Into<String>,
        message: impl Into<String>,
        throwable: Option<String>,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<()> {
        if level.priority() < self.min_level.priority() {
            return Ok(());
        }

        let mut entry = LogEntry::new(level, tag, message);
        entry.throwable = throwable;
        entry.metadata = metadata.unwrap_or_default();
        self.storage.add(entry)
    }

    /// Records a verbose message.
    pub fn verbose(&self, tag: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Verbose, tag, message, None, None)
    }

    /// Records a debug message.
    pub fn debug(&self, tag: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, tag, message, None, None)
    }

    /// Records an info message.
    pub fn info(&self, tag: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, tag, message, None, None)
    }

    /// Records a warning message.
    pub fn warn(&self, tag: impl Into<String>, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warning, tag, message, None, None)
    }

    /// Records an error message with optional rendered error details.
    pub fn error(
        &self,
        tag: impl Into<String>,
        message: impl Into<String>,
        throwable: Option<String>,
    ) -> Result<()> {
        self.log(LogLevel::Error, tag, message, throwable, None)
    }

    /// Records a fatal message with optional rendered error details.
    pub fn fatal(
        &self,
        tag: impl Into<String>,
        message: impl Into<String>,
        throwable: Option<String>,
    ) -> Result<()> {
        self.log(LogLevel::Fatal, tag, message, throwable, None)
    }

    /// Queries stored entries; delegates to storage.
    pub fn query(&self, filter: &LogFilter, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        self.storage.query(filter, limit)
    }

    /// Observes new entries; delegates to storage.
    #[must_use]
    pub fn observe(&self, filter: LogFilter) -> RecordStream<LogEntry> {
        self.storage.observe(filter)
    }

    /// Current stored entry count; delegates to storage.
    pub fn count(&self) -> Result<usize> {
        self.storage.count()
    }

    /// Drops all stored entries; delegates to storage.
    pub fn clear(&self) -> Result<()> {
        self.storage.clear()
    }
}
