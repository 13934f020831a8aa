//! Core entry types for captured data.
//!
//! This module provides:
//! - [`LogLevel`] — Severity levels for application log entries
//! - [`LogEntry`] — A single captured log line
//! - [`NetworkLogEntry`] — A single captured HTTP request/response
//!
//! Entries are immutable values: they are constructed once, at capture time,
//! and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{LogError, Result};

/// Default cap on stored request/response body length, in characters.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10_000;

/// Log severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, fine-grained tracing
    Verbose = 0,
    /// Debugging information
    Debug = 1,
    /// General information
    Info = 2,
    /// Warning conditions
    Warning = 3,
    /// Error conditions
    Error = 4,
    /// Unrecoverable failures
    Fatal = 5,
}

impl LogLevel {
    /// Returns the integer priority of this level.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        *self as u8
    }

    /// Looks up a level by its integer priority.
    #[must_use]
    pub const fn from_priority(priority: u8) -> Option<Self> {
        match priority {
            0 => Some(Self::Verbose),
            1 => Some(Self::Debug),
            2 => Some(Self::Info),
            3 => Some(Self::Warning),
            4 => Some(Self::Error),
            5 => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Returns true if this level is at least as severe as the given level.
    #[must_use]
    pub fn is_at_least(&self, level: Self) -> bool {
        *self >= level
    }

    /// Returns the string representation of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }
}

/// A single captured application log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique identifier, generated at capture time
    pub id: String,
    /// When the log call happened
    pub timestamp: DateTime<Utc>,
    /// Severity level
    pub level: LogLevel,
    /// Category or source of the log
    pub tag: String,
    /// The log message
    pub message: String,
    /// Rendered error/backtrace details, if any
    pub throwable: Option<String>,
    /// Additional key-value context
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl LogEntry {
    /// Creates a new entry with a generated id and the current timestamp.
    #[must_use]
    pub fn new(level: LogLevel, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            tag: tag.into(),
            message: message.into(),
            throwable: None,
            metadata: HashMap::new(),
        }
    }

    /// Creates a new log entry builder.
    #[must_use]
    pub fn builder() -> LogEntryBuilder {
        LogEntryBuilder::default()
    }
}

/// Builder for [`LogEntry`].
///
/// `id` and `timestamp` default to a fresh UUID and the current time when
/// not set explicitly; `level`, `tag` and `message` are required.
#[derive(Debug, Default)]
pub struct LogEntryBuilder {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    level: Option<LogLevel>,
    tag: Option<String>,
    message: Option<String>,
    throwable: Option<String>,
    metadata: HashMap<String, String>,
}

impl LogEntryBuilder {
    /// Sets the entry id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub const fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the rendered error details.
    #[must_use]
    pub fn throwable(mut self, throwable: impl Into<String>) -> Self {
        self.throwable = Some(throwable.into());
        self
    }

    /// Adds a metadata key-value pair.
    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Builds the entry.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MissingField`] if `level`, `tag` or `message`
    /// is not set.
    pub fn build(self) -> Result<LogEntry> {
        let level = self.level.ok_or(LogError::MissingField("level"))?;
        let tag = self.tag.ok_or(LogError::MissingField("tag"))?;
        let message = self.message.ok_or(LogError::MissingField("message"))?;

        Ok(LogEntry {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            level,
            tag,
            message,
            throwable: self.throwable,
            metadata: self.metadata,
        })
    }
}

/// A single captured HTTP request/response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkLogEntry {
    /// Unique identifier, generated at capture time
    pub id: String,
    /// When the request was initiated
    pub timestamp: DateTime<Utc>,
    /// Request URL
    pub url: String,
    /// HTTP method (GET, POST, ...)
    pub method: String,
    /// Request headers
    #[serde(default)]
    pub request_headers: HashMap<String, String>,
    /// Request body, truncated at construction time
    pub request_body: Option<String>,
    /// Response status code, absent if the request never completed
    pub response_code: Option<u16>,
    /// Response headers
    #[serde(default)]
    pub response_headers: HashMap<String, String>,
    /// Response body, truncated at construction time
    pub response_body: Option<String>,
    /// Request duration in milliseconds
    pub duration_ms: u64,
    /// Error message if the request failed
    pub error: Option<String>,
}

impl NetworkLogEntry {
    /// Creates a new network log entry builder.
    #[must_use]
    pub fn builder() -> NetworkLogEntryBuilder {
        NetworkLogEntryBuilder::default()
    }

    /// Returns true if the response code is in `[200, 400)` and no error
    /// was recorded.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.error.is_none()
            && self
                .response_code
                .is_some_and(|code| (200..400).contains(&code))
    }

    /// Returns true if the request was not successful.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !self.is_successful()
    }

    /// Caps a body at `max` characters.
    ///
    /// Truncation is lossy and one-directional; a body at or under the cap
    /// is returned unchanged, so applying this twice is a no-op.
    #[must_use]
    pub fn truncate_body(body: String, max: usize) -> String {
        match body.char_indices().nth(max) {
            Some((idx, _)) => body[..idx].to_string(),
            None => body,
        }
    }
}

/// Builder for [`NetworkLogEntry`].
///
/// `id` and `timestamp` default to a fresh UUID and the current time;
/// `url` and `method` are required. Bodies are truncated to the configured
/// cap when the entry is built.
#[derive(Debug)]
pub struct NetworkLogEntryBuilder {
    id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    url: Option<String>,
    method: Option<String>,
    request_headers: HashMap<String, String>,
    request_body: Option<String>,
    response_code: Option<u16>,
    response_headers: HashMap<String, String>,
    response_body: Option<String>,
    duration_ms: u64,
    error: Option<String>,
    max_body_size: usize,
}

impl Default for NetworkLogEntryBuilder {
    fn default() -> Self {
        Self {
            id: None,
            timestamp: None,
            url: None,
            method: None,
            request_headers: HashMap::new(),
            request_body: None,
            response_code: None,
            response_headers: HashMap::new(),
            response_body: None,
            duration_ms: 0,
            error: None,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl NetworkLogEntryBuilder {
    /// Sets the entry id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the request URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn request_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(key.into(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn request_body(mut self, body: impl Into<String>) -> Self {
        self.request_body = Some(body.into());
        self
    }

    /// Sets the response status code.
    #[must_use]
    pub const fn response_code(mut self, code: u16) -> Self {
        self.response_code = Some(code);
        self
    }

    /// Adds a response header.
    #[must_use]
    pub fn response_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.insert(key.into(), value.into());
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn response_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Sets the request duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets the failure message.
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Overrides the body size cap for this entry.
    #[must_use]
    pub const fn max_body_size(mut self, max: usize) -> Self {
        self.max_body_size = max;
        self
    }

    /// Builds the entry, truncating bodies to the configured cap.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::MissingField`] if `url` or `method` is not set.
    pub fn build(self) -> Result<NetworkLogEntry> {
        let url = self.url.ok_or(LogError::MissingField("url"))?;
        let method = self.method.ok_or(LogError::MissingField("method"))?;
        let max = self.max_body_size;

        Ok(NetworkLogEntry {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            url,
            method,
            request_headers: self.request_headers,
            request_body: self
                .request_body
                .map(|b| NetworkLogEntry::truncate_body(b, max)),
            response_code: self.response_code,
            response_headers: self.response_headers,
            response_body: self
                .response_body
                .map(|b| NetworkLogEntry::truncate_body(b, max)),
            duration_ms: self.duration_ms,
            error: self.error,
        })
    }
}
