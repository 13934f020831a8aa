//! File-backed storage with generation rotation.
//!
//! This module provides:
//! - [`FileStore`] — Persistent storage for one entry kind over a
//!   [`FileSystem`] collaborator
//! - Rotation by file size with a bounded generation count
//! - JSON-lines format, one record per line
//!
//! Generation files are named `{prefix}-{index}.jsonl`. The index only
//! grows; when the retained window exceeds `max_files`, the oldest
//! generation is deleted. Writes are serialized behind a single writer
//! lock; queries snapshot the generation window and read without blocking
//! writers. Malformed lines are skipped during scans, never fatal.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::FileStoreConfig;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::store::{Record, RecordStream, Store};

/// Mutable bookkeeping behind the writer lock.
struct FileState {
    /// Index of the generation currently being appended to.
    current_index: u64,
    /// Size in bytes of the current generation file.
    current_size: u64,
    /// Entry count across retained generations; `None` after an eviction
    /// until the next full scan.
    cached_count: Option<usize>,
}

/// Persistent rotating store for one entry kind.
pub struct FileStore<R: Record> {
    fs: Arc<dyn FileSystem>,
    config: FileStoreConfig,
    state: RwLock<FileState>,
    sender: broadcast::Sender<R>,
}

impl<R: Record> FileStore<R> {
    /// Opens the store, resuming from any generation files already present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogError::Config`] for invalid bounds and
    /// [`crate::LogError::Io`] if the file system cannot be listed.
    pub fn open(fs: Arc<dyn FileSystem>, config: FileStoreConfig) -> Result<Self> {
        config.validate()?;

        let mut current_index = 0u64;
        for name in fs.list_files(".")? {
            if let Some(index) = Self::parse_index(&config.file_prefix, &name) {
                current_index = current_index.max(index);
            }
        }
        let current_size = fs.file_size(&Self::file_name(&config.file_prefix, current_index))?;

        let (sender, _) = broadcast::channel(config.stream_buffer);
        Ok(Self {
            fs,
            config,
            state: RwLock::new(FileState {
                current_index,
                current_size,
                cached_count: None,
            }),
            sender,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &FileStoreConfig {
        &self.config
    }

    /// Number of generation files currently on disk.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogError::Io`] if existence checks fail.
    pub fn file_count(&self) -> Result<usize> {
        let (oldest, current) = self.generation_window();
        let mut count = 0;
        for index in oldest..=current {
            if self.fs.exists(&self.generation_name(index))? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn file_name(prefix: &str, index: u64) -> String {
        format!("{prefix}-{index}.jsonl")
    }

    fn generation_name(&self, index: u64) -> String {
        Self::file_name(&self.config.file_prefix, index)
    }

    fn parse_index(prefix: &str, name: &str) -> Option<u64> {
        name.strip_prefix(prefix)?
            .strip_prefix('-')?
            .strip_suffix(".jsonl")?
            .parse()
            .ok()
    }

    /// Oldest retained generation index and the current one.
    fn generation_window(&self) -> (u64, u64) {
        let current = self.state.read().current_index;
        let oldest = current.saturating_sub(self.config.max_files as u64 - 1);
        (oldest, current)
    }

    /// Appends one pre-serialized line, rotating first if it would overflow
    /// the current generation. Rotation and append are one unit under the
    /// writer lock.
    fn append_locked(&self, state: &mut FileState, line: &str) -> Result<()> {
        let line_bytes = line.len() as u64;

        if state.current_size > 0 && state.current_size + line_bytes > self.config.max_file_size {
            self.rotate_locked(state)?;
        }

        self.fs
            .write_text(&self.generation_name(state.current_index), line, true)?;
        state.current_size += line_bytes;
        state.cached_count = state.cached_count.map(|c| c + 1);
        Ok(())
    }

    fn rotate_locked(&self, state: &mut FileState) -> Result<()> {
        state.current_index += 1;
        state.current_size = 0;
        debug!(index = state.current_index, "rotating to new generation file");

        if state.current_index >= self.config.max_files as u64 {
            let evicted_index = state.current_index - self.config.max_files as u64;
            if self.fs.delete(&self.generation_name(evicted_index))? {
                // Entries disappeared with the file; force a rescan
                state.cached_count = None;
            }
        }
        Ok(())
    }

    /// Parses the records in one generation file, skipping malformed lines.
    fn read_generation(&self, index: u64) -> Result<Vec<R>> {
        let name = self.generation_name(index);
        let Some(content) = self.fs.read_text(&name)? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<R>(line) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(file = %name, %error, "skipping malformed record line");
                }
            }
        }
        Ok(records)
    }
}

impl<R: Record> Store<R> for FileStore<R> {
    fn add(&self, entry: R) -> Result<()> {
        let line = format!("{}\n", serde_json::to_string(&entry)?);

        {
            let mut state = self.state.write();
            self.append_locked(&mut state, &line)?;
        }

        let _ = self.sender.send(entry);
        Ok(())
    }

    fn add_all(&self, entries: Vec<R>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // Serialize up front so an encoding failure aborts before any write
        let mut lines = Vec::with_capacity(entries.len());
        for entry in &entries {
            lines.push(format!("{}\n", serde_json::to_string(entry)?));
        }

        {
            let mut state = self.state.write();
            for line in &lines {
                self.append_locked(&mut state, line)?;
            }
        }

        for entry in entries {
            let _ = self.sender.send(entry);
        }
        Ok(())
    }

    fn query(&self, filter: &R::Filter, limit: Option<usize>) -> Result<Vec<R>> {
        let (oldest, current) = self.generation_window();
        let cap = match limit {
            Some(n) if n > 0 => n,
            _ => usize::MAX,
        };

        let mut results = Vec::new();
        // Newest generation first, newest entry first within each
        for index in (oldest..=current).rev() {
            for record in self.read_generation(index)?.into_iter().rev() {
                if record.matches(filter) {
                    results.push(record);
                    if results.len() >= cap {
                        return Ok(results);
                    }
                }
            }
        }
        Ok(results)
    }

    fn observe(&self, filter: R::Filter) -> RecordStream<R> {
        RecordStream::new(self.sender.subscribe(), filter)
    }

    fn count(&self) -> Result<usize> {
        // Writers are held off for the whole rescan; an add committing
        // mid-scan would otherwise be missing from the cached total.
        let state = self.state.upgradable_read();
        if let Some(count) = state.cached_count {
            return Ok(count);
        }

        let oldest = state
            .current_index
            .saturating_sub(self.config.max_files as u64 - 1);
        let mut count = 0;
        for index in oldest..=state.current_index {
            count += self.read_generation(index)?.len();
        }

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.cached_count = Some(count);
        Ok(count)
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.state.write();
        for index in 0..=state.current_index {
            self.fs.delete(&self.generation_name(index))?;
        }
        state.current_index = 0;
        state.current_size = 0;
        state.cached_count = Some(0);
        Ok(())
    }
}
