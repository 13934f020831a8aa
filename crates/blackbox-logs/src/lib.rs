//! # blackbox-logs
//!
//! Embeddable capture of application logs and HTTP traffic, with bounded
//! in-memory and file-backed storage.
//!
//! This crate provides:
//!
//! - [`LogEntry`] / [`NetworkLogEntry`] — Structured records for log calls
//!   and HTTP exchanges
//! - [`LogLevel`] — Severity levels (Verbose through Fatal)
//! - [`LogFilter`] / [`NetworkLogFilter`] — Criteria for queries, live
//!   streams, and exports
//! - [`Store`] — Abstract storage contract over any record kind
//! - [`MemoryStore`] — Bounded in-memory ring storage
//! - [`FileStore`] — Rotating JSON-lines storage over a [`FileSystem`]
//! - [`Logger`] — Leveled logging front end bound to a store
//! - [`export`] / [`curl`] — Rendering captured entries for humans and
//!   for replay
//!
//! ## Example
//!
//! ```rust
//! use blackbox_logs::{LogFilter, LogLevel, Logger, MemoryStore, StoreConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> blackbox_logs::Result<()> {
//! let store = Arc::new(MemoryStore::new(StoreConfig::default())?);
//! let logger = Logger::new(store, LogLevel::Debug);
//!
//! logger.info("app", "started")?;
//! logger.error("db", "connection refused", Some("io error".to_string()))?;
//!
//! let errors = logger.query(&LogFilter::new().with_level(LogLevel::Error), None)?;
//! assert_eq!(errors.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod curl;
pub mod error;
pub mod export;
pub mod file;
pub mod filter;
pub mod fs;
pub mod logger;
pub mod memory;
pub mod store;
pub mod types;

// Re-export main types
pub use config::{
    FileStoreConfig, LoggerConfig, StoreConfig, DEFAULT_LOG_CAPACITY, DEFAULT_NETWORK_CAPACITY,
    DEFAULT_STREAM_BUFFER,
};
pub use error::{LogError, Result};
pub use export::{export_logs, export_network_logs, ExportFormat};
pub use file::FileStore;
pub use filter::{LogFilter, NetworkLogFilter, TimeRange};
pub use fs::{FileSystem, StdFileSystem};
pub use logger::Logger;
pub use memory::{shared_store, MemoryStore, SharedMemoryStore};
pub use store::{Record, RecordStream, Store};
pub use types::{
    LogEntry, LogEntryBuilder, LogLevel, NetworkLogEntry, NetworkLogEntryBuilder,
    DEFAULT_MAX_BODY_SIZE,
};
