//! Storage contract shared by all backends.
//!
//! This module provides:
//! - [`Record`] — The seam between an entry kind and its filter
//! - [`Store`] — The capability every storage backend implements
//! - [`RecordStream`] — Live observation stream of newly added entries
//!
//! Both entry kinds ([`LogEntry`], [`NetworkLogEntry`]) implement [`Record`],
//! so one generic backend implementation serves both.

use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use futures::Stream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::filter::{LogFilter, NetworkLogFilter};
use crate::types::{LogEntry, NetworkLogEntry};

/// A captured entry kind that storage backends can hold.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The filter type that selects entries of this kind.
    type Filter: Clone + Default + Send + Sync + Unpin + 'static;

    /// Unique id of this entry.
    fn id(&self) -> &str;

    /// Capture time of this entry.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Checks this entry against a filter.
    fn matches(&self, filter: &Self::Filter) -> bool;
}

impl Record for LogEntry {
    type Filter = LogFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.matches(self)
    }
}

impl Record for NetworkLogEntry {
    type Filter = NetworkLogFilter;

    fn id(&self) -> &str {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        filter.matches(self)
    }
}

/// Capability contract for a storage backend holding one entry kind.
///
/// Implementations are the single synchronization point between concurrent
/// producers and consumers; callers need no external coordination.
pub trait Store<R: Record>: Send + Sync {
    /// Adds an entry, applying the backend's capacity policy, then notifies
    /// live observers whose filter matches.
    fn add(&self, entry: R) -> Result<()>;

    /// Adds several entries. Capacity accounting is atomic: the store never
    /// exposes an intermediate state above its bound.
    fn add_all(&self, entries: Vec<R>) -> Result<()>;

    /// Returns entries matching the filter, newest first.
    ///
    /// `None` or `Some(0)` means no limit.
    fn query(&self, filter: &R::Filter, limit: Option<usize>) -> Result<Vec<R>>;

    /// Subscribes to entries added after this call. Historical entries are
    /// never delivered. Each call is an independent subscription; dropping
    /// the stream cancels it.
    fn observe(&self, filter: R::Filter) -> RecordStream<R>;

    /// Number of currently retained entries, ignoring filters.
    fn count(&self) -> Result<usize>;

    /// Drops all retained entries. Live subscriptions stay registered and
    /// simply receive nothing until new entries arrive.
    fn clear(&self) -> Result<()>;
}

/// Live stream of entries matching a filter.
///
/// Backed by a bounded broadcast buffer: a subscriber that falls behind
/// loses its oldest undelivered entries rather than blocking the producer.
pub struct RecordStream<R: Record> {
    receiver: broadcast::Receiver<R>,
    filter: R::Filter,
    closed: bool,
}

impl<R: Record> RecordStream<R> {
    pub(crate) fn new(receiver: broadcast::Receiver<R>, filter: R::Filter) -> Self {
        Self {
            receiver,
            filter,
            closed: false,
        }
    }

    /// Closes the stream; subsequent polls yield `None`.
    pub const fn close(&mut self) {
        self.closed = true;
    }

    /// Returns true if the stream is closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Receives the next matching entry asynchronously.
    async fn recv_next(&mut self) -> Option<R> {
        loop {
            match self.receiver.recv().await {
                Ok(entry) => {
                    if entry.matches(&self.filter) {
                        return Some(entry);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.closed = true;
                    return None;
                }
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    // Oldest undelivered entries were dropped; keep receiving
                }
            }
        }
    }
}

impl<R: Record> Stream for RecordStream<R> {
    type Item = R;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.closed {
            return Poll::Ready(None);
        }

        let future = self.recv_next();
        tokio::pin!(future);

        future.poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LogLevel;
    use futures::StreamExt;
    use parking_lot::Mutex;

    /// Minimal store used to exercise the trait surface.
    struct VecStore {
        entries: Mutex<Vec<LogEntry>>,
        sender: broadcast::Sender<LogEntry>,
    }

    impl VecStore {
        fn new() -> Self {
            let (sender, _) = broadcast::channel(16);
            Self {
                entries: Mutex::new(Vec::new()),
                sender,
            }
        }
    }

    impl Store<LogEntry> for VecStore {
        fn add(&self, entry: LogEntry) -> Result<()> {
            self.entries.lock().push(entry.clone());
            let _ = self.sender.send(entry);
            Ok(())
        }

        fn add_all(&self, entries: Vec<LogEntry>) -> Result<()> {
            for entry in entries {
                self.add(entry)?;
            }
            Ok(())
        }

        fn query(&self, filter: &LogFilter, limit: Option<usize>) -> Result<Vec<LogEntry>> {
            let entries = self.entries.lock();
            let matching = entries.iter().rev().filter(|e| filter.matches(e)).cloned();
            Ok(match limit {
                Some(n) if n > 0 => matching.take(n).collect(),
                _ => matching.collect(),
            })
        }

        fn observe(&self, filter: LogFilter) -> RecordStream<LogEntry> {
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

    #[test]
    fn trait_add_query_count_clear() {
        let store = VecStore::new();
        store
            .add(LogEntry::new(LogLevel::Info, "t", "first"))
            .expect("add");
        store
            .add(LogEntry::new(LogLevel::Info, "t", "second"))
            .expect("add");

        assert_eq!(store.count().expect("count"), 2);

        let results = store.query(&LogFilter::default(), None).expect("query");
        assert_eq!(results[0].message, "second");

        store.clear().expect("clear");
        assert_eq!(store.count().expect("count"), 0);
    }

    #[tokio::test]
    async fn stream_yields_matching_entries_only() {
        let store = VecStore::new();
        let mut stream = store.observe(LogFilter::new().with_level(LogLevel::Error));

        store
            .add(LogEntry::new(LogLevel::Info, "t", "ignored"))
            .expect("add");
        store
            .add(LogEntry::new(LogLevel::Error, "t", "delivered"))
            .expect("add");

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), stream.next())
            .await
            .expect("timely delivery")
            .expect("entry");
        assert_eq!(received.message, "delivered");
    }

    #[tokio::test]
    async fn closed_stream_yields_none() {
        let store = VecStore::new();
        let mut stream = store.observe(LogFilter::default());

        assert!(!stream.is_closed());
        stream.close();
        assert!(stream.is_closed());
        assert!(stream.next().await.is_none());
    }
}
