//! Storage and logger configuration.
//!
//! All numeric bounds are validated when a configuration is constructed, so
//! misconfiguration surfaces at startup rather than at call time.

use crate::error::{LogError, Result};
use crate::types::{DEFAULT_MAX_BODY_SIZE, LogLevel};

/// Default retained-entry bound for application log stores.
pub const DEFAULT_LOG_CAPACITY: usize = 10_000;

/// Default retained-entry bound for network log stores.
pub const DEFAULT_NETWORK_CAPACITY: usize = 1_000;

/// Default per-subscriber buffer for live observation.
pub const DEFAULT_STREAM_BUFFER: usize = 64;

/// Configuration for a bounded in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Maximum number of retained entries; oldest are evicted beyond this.
    pub max_capacity: usize,
    /// Per-subscriber broadcast buffer; a lagging subscriber loses its
    /// oldest undelivered entries beyond this.
    pub stream_buffer: usize,
    /// Whether the host should compose a file-backed store instead of a
    /// purely in-memory one. Backend selection happens at composition time;
    /// the stores themselves never consult this flag.
    pub enable_persistence: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_LOG_CAPACITY,
            stream_buffer: DEFAULT_STREAM_BUFFER,
            enable_persistence: false,
        }
    }
}

impl StoreConfig {
    /// Creates a config with the given capacity and default buffering.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if `max_capacity` is zero.
    pub fn new(max_capacity: usize) -> Result<Self> {
        let config = Self {
            max_capacity,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the per-subscriber stream buffer.
    #[must_use]
    pub const fn with_stream_buffer(mut self, stream_buffer: usize) -> Self {
        self.stream_buffer = stream_buffer;
        self
    }

    /// Marks this store as wanting file-backed persistence.
    #[must_use]
    pub const fn with_persistence(mut self, enable: bool) -> Self {
        self.enable_persistence = enable;
        self
    }

    /// Validates all bounds.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] on a zero capacity or buffer.
    pub fn validate(&self) -> Result<()> {
        if self.max_capacity == 0 {
            return Err(LogError::Config("max_capacity must be > 0".to_string()));
        }
        if self.stream_buffer == 0 {
            return Err(LogError::Config("stream_buffer must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Configuration for a file-backed rotating store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStoreConfig {
    /// Prefix for generation file names (`{prefix}-{index}.jsonl`).
    pub file_prefix: String,
    /// Maximum size of one generation file in bytes before rotation.
    pub max_file_size: u64,
    /// Maximum number of generation files kept; oldest evicted first.
    pub max_files: usize,
    /// Per-subscriber broadcast buffer for live observation.
    pub stream_buffer: usize,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            file_prefix: "logs".to_string(),
            max_file_size: 1024 * 1024, // 1 MiB
            max_files: 5,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl FileStoreConfig {
    /// Creates a config with the given file prefix and default bounds.
    #[must_use]
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
            ..Self::default()
        }
    }

    /// Sets the rotation size bound.
    #[must_use]
    pub const fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Sets the generation count bound.
    #[must_use]
    pub const fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Validates all bounds.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] on a zero size, file count or buffer.
    pub fn validate(&self) -> Result<()> {
        if self.max_file_size == 0 {
            return Err(LogError::Config("max_file_size must be > 0".to_string()));
        }
        if self.max_files == 0 {
            return Err(LogError::Config("max_files must be > 0".to_string()));
        }
        if self.stream_buffer == 0 {
            return Err(LogError::Config("stream_buffer must be > 0".to_string()));
        }
        if self.file_prefix.is_empty() {
            return Err(LogError::Config("file_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Top-level configuration a host hands to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum severity accepted by the logger.
    pub min_level: LogLevel,
    /// Storage bounds for application logs.
    pub log_store: StoreConfig,
    /// Storage bounds for network logs.
    pub network_store: StoreConfig,
    /// Cap on stored request/response body length, in characters.
    pub max_body_size: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Verbose,
            log_store: StoreConfig::default(),
            network_store: StoreConfig {
                max_capacity: DEFAULT_NETWORK_CAPACITY,
                ..StoreConfig::default()
            },
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl LoggerConfig {
    /// Sets the minimum accepted severity.
    #[must_use]
    pub const fn with_min_level(mut self, min_level: LogLevel) -> Self {
        self.min_level = min_level;
        self
    }

    /// Sets the application log storage bounds.
    #[must_use]
    pub fn with_log_store(mut self, log_store: StoreConfig) -> Self {
        self.log_store = log_store;
        self
    }

    /// Sets the network log storage bounds.
    #[must_use]
    pub fn with_network_store(mut self, network_store: StoreConfig) -> Self {
        self.network_store = network_store;
        self
    }

    /// Sets the body size cap.
    #[must_use]
    pub const fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Validates the nested storage configurations.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Config`] if any nested bound is invalid.
    pub fn validate(&self) -> Result<()> {
        self.log_store.validate()?;
        self.network_store.validate()?;
        if self.max_body_size == 0 {
            return Err(LogError::Config("max_body_size must be > 0".to_string()));
        }
        Ok(())
    }
}
