//! Connection pool keyed by target URL
//!
//! Bounded by capacity with least-recently-used eviction, and entries idle
//! past the timeout are dropped on the next lookup. The pool is owned by a
//! single actor, so no locking is involved.

use std::future::Future;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::time::Instant;

use crate::constants::{DEFAULT_POOL_CAPACITY, DEFAULT_POOL_IDLE_SECS};

#[derive(Debug)]
struct PoolEntry<C> {
    connection: C,
    last_used: Instant,
}

#[derive(Debug)]
pub struct ConnectionPool<C> {
    entries: IndexMap<String, PoolEntry<C>>,
    capacity: usize,
    idle_timeout: Duration,
}

impl<C: Clone> Default for ConnectionPool<C> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY, Duration::from_secs(DEFAULT_POOL_IDLE_SECS))
    }
}

impl<C: Clone> ConnectionPool<C> {
    pub fn new(capacity: usize, idle_timeout: Duration) -> Self {
        ConnectionPool {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
            idle_timeout,
        }
    }

    /// Return the pooled connection for `url` or open a new one.
    ///
    /// A failed connect is returned to the caller and nothing is cached.
    pub async fn get_or_connect<F, Fut, E>(&mut self, url: &str, connect: F) -> Result<C, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<C, E>>,
    {
        self.purge_stale();

        if let Some(entry) = self.entries.get_mut(url) {
            entry.last_used = Instant::now();
            tracing::trace!(url, "Reusing pooled connection");
            return Ok(entry.connection.clone());
        }

        let connection = connect().await?;

        if self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(
            url.to_string(),
            PoolEntry {
                connection: connection.clone(),
                last_used: Instant::now(),
            },
        );
        tracing::debug!(url, pooled = self.entries.len(), "Opened connection");

        Ok(connection)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn remove(&mut self, url: &str) -> Option<C> {
        self.entries.shift_remove(url).map(|e| e.connection)
    }

    /// Drop every pooled connection
    pub fn dispose(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        tracing::debug!(count, "Connection pool disposed");
    }

    fn purge_stale(&mut self) {
        let now = Instant::now();
        let idle_timeout = self.idle_timeout;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.duration_since(entry.last_used) <= idle_timeout);
        let purged = before - self.entries.len();
        if purged > 0 {
            tracing::debug!(purged, "Dropped idle connections");
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(url, _)| url.clone());

        if let Some(url) = oldest {
            self.entries.shift_remove(&url);
            tracing::debug!(url = %url, "Evicted least recently used connection");
        }
    }
}
