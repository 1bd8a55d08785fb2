use crate::domain_port::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Vec<u8>,
    expire_at: DateTime<Utc>,
}

/// Process-local cache store. Expired entries are dropped lazily on read and
/// in bulk by the sweeper.
pub struct MemoryCacheStore {
    entries: DashMap<String, MemoryEntry>,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        MemoryCacheStore {
            entries: DashMap::new(),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expire_at > now);
        before.saturating_sub(self.entries.len())
    }

    pub async fn run_sweeper(self: Arc<Self>, interval: Duration, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("cache sweeper cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    let purged = self.purge_expired();
                    if purged > 0 {
                        debug!(purged, remaining = self.len(), "purged expired cache entries");
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = self.clock.now();
        match self.entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expire_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }
        // The read guard is released above; removing while holding it would deadlock the shard.
        self.entries.remove_if(key, |_, entry| entry.expire_at <= now);
        trace!(key, "expired cache entry dropped on read");
        Ok(None)
    }

    async fn set_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        expire_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.entries
            .insert(key.to_string(), MemoryEntry { value, expire_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }
}
