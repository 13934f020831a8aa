//! In-memory storage backed by a bounded ring buffer.
//!
//! This module provides:
//! - [`MemoryStore`] — Thread-safe FIFO-evicting storage for one entry kind
//! - Live fan-out to observers through a bounded broadcast channel
//!
//! One mutual-exclusion domain covers the buffer and its capacity
//! accounting, so no reader ever observes the store above its bound.
//! Observers are notified after the mutation commits, outside the lock.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::{Record, RecordStream, Store};

/// Thread-safe bounded in-memory store for one entry kind.
pub struct MemoryStore<R: Record> {
    config: StoreConfig,
    entries: Mutex<VecDeque<R>>,
    sender: broadcast::Sender<R>,
}

impl<R: Record> MemoryStore<R> {
    /// Creates a store with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogError::Config`] if the capacity or stream buffer
    /// is zero. Bounds are checked here even for hand-assembled configs, so
    /// misconfiguration never reaches the broadcast channel or eviction loop.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let (sender, _) = broadcast::channel(config.stream_buffer);
        let entries = Mutex::new(VecDeque::with_capacity(config.max_capacity.min(1024)));
        Ok(Self {
            config,
            entries,
            sender,
        })
    }

    /// Creates a store bounded at `max_capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LogError::Config`] if `max_capacity` is zero.
    pub fn with_capacity(max_capacity: usize) -> Result<Self> {
        Self::new(StoreConfig::new(max_capacity)?)
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn push_locked(&self, entries: &mut VecDeque<R>, entry: R) {
        entries.push_back(entry);
        while entries.len() > self.config.max_capacity {
            entries.pop_front();
        }
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn add(&self, entry: R) -> Result<()> {
        {
            let mut entries = self.entries.lock();
            self.push_locked(&mut entries, entry.clone());
        }

        // Fire-and-forget; no receivers is fine
        let _ = self.sender.send(entry);
        Ok(())
    }

    fn add_all(&self, batch: Vec<R>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        {
            let mut entries = self.entries.lock();
            for entry in &batch {
                self.push_locked(&mut entries, entry.clone());
            }
        }

        for entry in batch {
            let _ = self.sender.send(entry);
        }
        Ok(())
    }

    fn query(&self, filter: &R::Filter, limit: Option<usize>) -> Result<Vec<R>> {
        let entries = self.entries.lock();
        let matching = entries.iter().rev().filter(|e| e.matches(filter)).cloned();

        Ok(match limit {
            Some(n) if n > 0 => matching.take(n).collect(),
            _ => matching.collect(),
        })
    }

    fn observe(&self, filter: R::Filter) -> RecordStream<R> {
        RecordStream::new(self.sender.subscribe(), filter)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.entries.lock().len())
    }

    fn clear(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Shared handle to a memory store.
pub type SharedMemoryStore<R> = Arc<MemoryStore<R>>;

/// Creates a new shared memory store bounded at `max_capacity` entries.
///
/// # Errors
///
/// Returns [`crate::LogError::Config`] if `max_capacity` is zero.
pub fn shared_store<R: Record>(max_capacity: usize) -> Result<SharedMemoryStore<R>> {
    Ok(Arc::new(MemoryStore::with_capacity(max_capacity)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogError;
    use crate::filter::{LogFilter, NetworkLogFilter};
    use crate::types::{LogEntry, LogLevel, NetworkLogEntry};
    use futures::StreamExt;
    use proptest::prelude::*;
    use std::time::Duration;

    fn make_entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new(level, "test", message)
    }

    fn log_store(capacity: usize) -> MemoryStore<LogEntry> {
        MemoryStore::with_capacity(capacity).expect("valid capacity")
    }

    #[test]
    fn new_rejects_zero_stream_buffer() {
        let config = StoreConfig {
            stream_buffer: 0,
            ..StoreConfig::default()
        };
        let result: Result<MemoryStore<LogEntry>> = MemoryStore::new(config);
        assert!(matches!(result, Err(LogError::Config(_))));
    }

    #[test]
    fn new_rejects_zero_capacity() {
        let config = StoreConfig {
            max_capacity: 0,
            ..StoreConfig::default()
        };
        assert!(MemoryStore::<LogEntry>::new(config).is_err());
    }

    #[test]
    fn add_and_count() {
        let store = log_store(100);
        store.add(make_entry(LogLevel::Info, "one")).expect("add");
        store.add(make_entry(LogLevel::Info, "two")).expect("add");
        assert_eq!(store.count().expect("count"), 2);
    }

    #[test]
    fn query_returns_newest_first() {
        let store = log_store(100);
        for message in ["first", "second", "third"] {
            store.add(make_entry(LogLevel::Info, message)).expect("add");
        }

        let results = store.query(&LogFilter::default(), None).expect("query");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].message, "third");
        assert_eq!(results[1].message, "second");
        assert_eq!(results[2].message, "first");
    }

    #[test]
    fn query_with_limit() {
        let store = log_store(100);
        for i in 0..10 {
            store
                .add(make_entry(LogLevel::Info, &format!("message {i}")))
                .expect("add");
        }

        let results = store.query(&LogFilter::default(), Some(3)).expect("query");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].message, "message 9");

        // Zero limit means unbounded
        let all = store.query(&LogFilter::default(), Some(0)).expect("query");
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn query_with_filter() {
        let store = log_store(100);
        store.add(make_entry(LogLevel::Info, "info")).expect("add");
        store.add(make_entry(LogLevel::Error, "error")).expect("add");

        let filter = LogFilter::new()
            .with_level(LogLevel::Error)
            .with_level(LogLevel::Fatal);
        let results = store.query(&filter, None).expect("query");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].level, LogLevel::Error);
    }

    #[test]
    fn fifo_eviction_at_capacity() {
        let store = log_store(3);
        for id in 1..=4 {
            store
                .add(
                    LogEntry::builder()
                        .id(id.to_string())
                        .level(LogLevel::Info)
                        .tag("t")
                        .message(format!("entry {id}"))
                        .build()
                        .expect("build"),
                )
                .expect("add");
        }

        assert_eq!(store.count().expect("count"), 3);
        let results = store.query(&LogFilter::default(), None).expect("query");
        let ids: Vec<&str> = results.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["4", "3", "2"]);
    }

    #[test]
    fn add_all_respects_capacity_atomically() {
        let store = log_store(5);
        let batch: Vec<LogEntry> = (0..20)
            .map(|i| make_entry(LogLevel::Info, &format!("batch {i}")))
            .collect();

        store.add_all(batch).expect("add_all");
        assert_eq!(store.count().expect("count"), 5);

        let results = store.query(&LogFilter::default(), None).expect("query");
        assert_eq!(results[0].message, "batch 19");
        assert_eq!(results[4].message, "batch 15");
    }

    #[test]
    fn add_all_empty_is_noop() {
        let store = log_store(5);
        store.add_all(Vec::new()).expect("add_all");
        assert_eq!(store.count().expect("count"), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let store = log_store(100);
        store.add(make_entry(LogLevel::Info, "gone")).expect("add");
        store.clear().expect("clear");
        assert_eq!(store.count().expect("count"), 0);
        assert!(
            store
                .query(&LogFilter::default(), None)
                .expect("query")
                .is_empty()
        );
    }

    #[test]
    fn network_entries_use_the_same_backend() {
        let store: MemoryStore<NetworkLogEntry> =
            MemoryStore::with_capacity(10).expect("valid capacity");

        let entry = NetworkLogEntry::builder()
            .url("https://api.example.com/health")
            .method("GET")
            .response_code(503)
            .build()
            .expect("build");
        store.add(entry).expect("add");

        let failed = store
            .query(&NetworkLogFilter::new().only_errors(), None)
            .expect("query");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].response_code, Some(503));
    }

    #[tokio::test]
    async fn observe_delivers_matching_adds_only() {
        let store = log_store(100);
        let mut stream = store.observe(LogFilter::new().with_tag("net"));

        store.add(LogEntry::new(LogLevel::Info, "db", "skip")).expect("add");
        store.add(LogEntry::new(LogLevel::Info, "net", "take")).expect("add");

        let received = tokio::time::timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(received.message, "take");
    }

    #[tokio::test]
    async fn observe_has_no_backfill() {
        let store = log_store(100);
        store
            .add(make_entry(LogLevel::Info, "historical"))
            .expect("add");

        let mut stream = store.observe(LogFilter::default());
        store.add(make_entry(LogLevel::Info, "live")).expect("add");

        let received = tokio::time::timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(received.message, "live");
    }

    #[tokio::test]
    async fn observers_are_independent() {
        let store = log_store(100);
        let mut errors_only = store.observe(LogFilter::new().with_level(LogLevel::Error));
        let mut everything = store.observe(LogFilter::default());

        // Dropping an observer must not affect the others
        let abandoned = store.observe(LogFilter::default());
        drop(abandoned);

        store.add(make_entry(LogLevel::Info, "only for all")).expect("add");
        let received = tokio::time::timeout(Duration::from_millis(100), everything.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(received.message, "only for all");

        store.add(make_entry(LogLevel::Error, "boom")).expect("add");
        let received = tokio::time::timeout(Duration::from_millis(100), errors_only.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(received.message, "boom");
    }

    #[tokio::test]
    async fn clear_keeps_subscriptions_alive() {
        let store = log_store(100);
        let mut stream = store.observe(LogFilter::default());

        store.add(make_entry(LogLevel::Info, "before")).expect("add");
        store.clear().expect("clear");
        store.add(make_entry(LogLevel::Info, "after")).expect("add");

        // Both adds were broadcast; clear did not close the stream
        let first = tokio::time::timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(first.message, "before");
        let second = tokio::time::timeout(Duration::from_millis(100), stream.next())
            .await
            .expect("timely")
            .expect("entry");
        assert_eq!(second.message, "after");
    }

    #[test]
    fn concurrent_writers_never_exceed_capacity() {
        let store = Arc::new(log_store(50));
        let mut handles = Vec::new();

        for worker in 0..4 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    store
                        .add(make_entry(LogLevel::Info, &format!("w{worker} m{i}")))
                        .expect("add");
                    assert!(store.count().expect("count") <= 50);
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker");
        }
        assert_eq!(store.count().expect("count"), 50);
    }

    proptest! {
        #[test]
        fn capacity_invariant_holds_for_any_add_sequence(
            capacity in 1usize..20,
            batches in prop::collection::vec(prop::collection::vec(0u8..=255, 0..10), 0..10),
        ) {
            let store: MemoryStore<LogEntry> =
                MemoryStore::with_capacity(capacity).expect("valid capacity");
            let mut added = Vec::new();

            for batch in batches {
                let entries: Vec<LogEntry> = batch
                    .iter()
                    .map(|b| make_entry(LogLevel::Info, &format!("payload {b}")))
                    .collect();
                added.extend(entries.iter().map(|e| e.id.clone()));
                if entries.len() == 1 {
                    store.add(entries.into_iter().next().expect("one")).expect("add");
                } else {
                    store.add_all(entries).expect("add_all");
                }
                prop_assert!(store.count().expect("count") <= capacity);
            }

            // Retained entries are exactly the most recent ones, newest first
            let retained = store.query(&LogFilter::default(), None).expect("query");
            let expected: Vec<String> = added.iter().rev().take(capacity).cloned().collect();
            let actual: Vec<String> = retained.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
