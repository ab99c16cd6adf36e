use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::constants::{CACHE_SCHEMA_VERSION, STORAGE_PROBE_KEY};
use crate::error::StorageError;
use crate::storage::KeyValueStorage;
use crate::types::CacheStats;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    value: T,
    timestamp: u64,
    last_accessed: u64,
    ttl: u64,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.timestamp) > self.ttl
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheMetadata {
    version: String,
    created: u64,
    last_modified: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheBlob<T> {
    data: IndexMap<String, CacheEntry<T>>,
    metadata: CacheMetadata,
}

impl<T> CacheBlob<T> {
    fn empty(now: u64) -> Self {
        Self {
            data: IndexMap::new(),
            metadata: CacheMetadata {
                version: CACHE_SCHEMA_VERSION.to_string(),
                created: now,
                last_modified: now,
            },
        }
    }

    fn least_recently_used(&self) -> Option<String> {
        self.data
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone())
    }
}

enum Persisted {
    Written,
    /// Quota was exceeded; the blob was wiped and an empty one written instead.
    Reset,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    evictions: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Persistent search-result cache with per-entry TTL and LRU eviction.
///
/// The whole cache lives in a single JSON blob under one storage key:
///
/// ```json
/// { "data": { "<query>": { "value": ..., "timestamp": 0, "lastAccessed": 0, "ttl": 0 } },
///   "metadata": { "version": "1.0", "created": 0, "lastModified": 0 } }
/// ```
///
/// Storage failures never escape the store. An unavailable backend turns it
/// into a no-op, a full backend wipes the blob, and corrupt data is replaced
/// with an empty blob. When a write fails the in-memory blob is dropped, so
/// the next access reloads whatever storage actually holds.
#[derive(Debug)]
pub struct CacheStore<T> {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    enabled: bool,
    state: Mutex<Option<CacheBlob<T>>>,
    counters: Counters,
}

impl<T> CacheStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Probes the backend and sweeps entries that expired while the page was away.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
        mut config: CacheConfig,
    ) -> Self {
        config.max_entries = config.max_entries.max(1);
        let enabled = probe_storage(storage.as_ref());
        if !enabled {
            warn!(
                storage_key = %config.storage_key,
                "cache storage unavailable; result cache disabled"
            );
        }

        let store = Self {
            storage,
            clock,
            config,
            enabled,
            state: Mutex::new(None),
            counters: Counters::default(),
        };

        if store.enabled {
            let removed = store.cleanup();
            if removed > 0 {
                info!(removed, "swept expired cache entries");
            }
        }
        store
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }

        let now = self.clock.now_millis();
        let mut guard = self.lock_state();
        let blob = self.loaded(&mut guard);

        let expired = match blob.data.get(key) {
            None => {
                Counters::bump(&self.counters.misses);
                debug!(key, "cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            blob.data.shift_remove(key);
            Counters::bump(&self.counters.misses);
            debug!(key, "cache entry expired");
            if !self.persist_logged(blob) {
                *guard = None;
            }
            return None;
        }

        let value = blob.data.get_mut(key).map(|entry| {
            entry.last_accessed = now;
            entry.value.clone()
        });
        Counters::bump(&self.counters.hits);
        debug!(key, "cache hit");
        if !self.persist_logged(blob) {
            *guard = None;
        }
        value
    }

    pub fn set(&self, key: &str, value: T) -> bool {
        if !self.enabled {
            return false;
        }

        let now = self.clock.now_millis();
        let mut guard = self.lock_state();
        let blob = self.loaded(&mut guard);

        if !blob.data.contains_key(key) {
            while blob.data.len() >= self.config.max_entries {
                let Some(victim) = blob.least_recently_used() else {
                    break;
                };
                blob.data.shift_remove(&victim);
                Counters::bump(&self.counters.evictions);
                debug!(key = %victim, "evicted least recently used cache entry");
            }
        }

        blob.data.insert(
            key.to_string(),
            CacheEntry {
                value,
                timestamp: now,
                last_accessed: now,
                ttl: self.config.ttl_ms,
            },
        );

        match self.persist(blob) {
            Ok(Persisted::Written) => {
                Counters::bump(&self.counters.sets);
                true
            }
            Ok(Persisted::Reset) => false,
            Err(error) => {
                warn!(%error, key, "failed to persist cache entry");
                *guard = None;
                false
            }
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let mut guard = self.lock_state();
        let blob = self.loaded(&mut guard);
        if blob.data.shift_remove(key).is_none() {
            return false;
        }
        if self.persist_logged(blob) {
            true
        } else {
            *guard = None;
            false
        }
    }

    /// Removes the persisted blob for this store's key.
    pub fn clear(&self) -> bool {
        if !self.enabled {
            return false;
        }

        let mut guard = self.lock_state();
        match self.storage.remove_item(&self.config.storage_key) {
            Ok(()) => {
                *guard = None;
                info!(storage_key = %self.config.storage_key, "cache cleared");
                true
            }
            Err(error) => {
                warn!(%error, "failed to clear cache");
                false
            }
        }
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        if !self.enabled {
            return 0;
        }

        let now = self.clock.now_millis();
        let mut guard = self.lock_state();
        let blob = self.loaded(&mut guard);
        let before = blob.data.len();
        blob.data.retain(|_, entry| !entry.is_expired(now));
        let removed = before - blob.data.len();
        if removed > 0 && !self.persist_logged(blob) {
            *guard = None;
            return 0;
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let entries = if self.enabled {
            let mut guard = self.lock_state();
            self.loaded(&mut guard).data.len()
        } else {
            0
        };

        let storage_bytes_used = if self.enabled {
            self.storage
                .get_item(&self.config.storage_key)
                .ok()
                .flatten()
                .map_or(0, |blob| blob.len())
        } else {
            0
        };

        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            sets: self.counters.sets.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            entries,
            max_entries: self.config.max_entries,
            storage_bytes_used,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<CacheBlob<T>>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn loaded<'a>(&self, slot: &'a mut Option<CacheBlob<T>>) -> &'a mut CacheBlob<T> {
        slot.get_or_insert_with(|| self.load())
    }

    fn load(&self) -> CacheBlob<T> {
        let now = self.clock.now_millis();
        let raw = match self.storage.get_item(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheBlob::empty(now),
            Err(error) => {
                warn!(%error, "failed to read cache blob; starting empty");
                return CacheBlob::empty(now);
            }
        };

        match decode_blob::<T>(&raw) {
            Some(blob) => blob,
            None => {
                warn!(
                    storage_key = %self.config.storage_key,
                    "corrupt cache blob; starting empty"
                );
                CacheBlob::empty(now)
            }
        }
    }

    fn persist_logged(&self, blob: &mut CacheBlob<T>) -> bool {
        match self.persist(blob) {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "failed to persist cache blob");
                false
            }
        }
    }

    fn persist(&self, blob: &mut CacheBlob<T>) -> Result<Persisted, StorageError> {
        let now = self.clock.now_millis();
        blob.metadata.last_modified = now;
        let encoded = encode_blob(blob)?;

        match self.storage.set_item(&self.config.storage_key, &encoded) {
            Ok(()) => Ok(Persisted::Written),
            Err(StorageError::QuotaExceeded) => {
                warn!(
                    bytes = encoded.len(),
                    "cache storage quota exceeded; clearing cache"
                );
                if let Err(error) = self.storage.remove_item(&self.config.storage_key) {
                    debug!(%error, "failed to remove cache blob during quota recovery");
                }
                *blob = CacheBlob::empty(now);
                let fresh = encode_blob(blob)?;
                self.storage.set_item(&self.config.storage_key, &fresh)?;
                Ok(Persisted::Reset)
            }
            Err(error) => Err(error),
        }
    }
}

/// Parses a persisted blob, rejecting anything with the wrong shape or version.
fn decode_blob<T: DeserializeOwned>(raw: &str) -> Option<CacheBlob<T>> {
    let blob = serde_json::from_str::<CacheBlob<T>>(raw).ok()?;
    (blob.metadata.version == CACHE_SCHEMA_VERSION).then_some(blob)
}

/// Whether `raw` would be accepted as a cache blob holding `T` values.
#[must_use]
pub fn is_valid_blob<T: DeserializeOwned>(raw: &str) -> bool {
    decode_blob::<T>(raw).is_some()
}

fn encode_blob<T: Serialize>(blob: &CacheBlob<T>) -> Result<String, StorageError> {
    serde_json::to_string(blob).map_err(|error| StorageError::Encoding(error.to_string()))
}

fn probe_storage(storage: &dyn KeyValueStorage) -> bool {
    match storage.set_item(STORAGE_PROBE_KEY, STORAGE_PROBE_KEY) {
        Ok(()) => storage.remove_item(STORAGE_PROBE_KEY).is_ok(),
        // A full store still exists; the quota path will make room later.
        Err(StorageError::QuotaExceeded) => true,
        Err(_) => false,
    }
}
