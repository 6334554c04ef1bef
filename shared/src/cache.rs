//! TTL-bounded value cache over a pluggable key/value store.
//!
//! Expiry is lazy: a stale record is only removed when it is read. Storage
//! failures never escape the cache API; they are logged and treated as a miss.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

// ===== STORAGE PORT =====

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// No storage is reachable (private mode, disabled by the user, no window)
    Unavailable,
    QuotaExceeded(String),
    Backend(String),
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::QuotaExceeded(details) => write!(f, "storage quota exceeded: {details}"),
            Self::Backend(details) => write!(f, "storage backend error: {details}"),
            Self::Serialization(details) => write!(f, "cache record serialization failed: {details}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// String key/value store, e.g. browser `localStorage`.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

// ===== TIME PORT =====

pub trait Clock {
    /// Milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

// ===== CACHE =====

/// Persisted record: `{"value": ..., "expiry": <epoch ms>}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expiry: u64,
}

impl<V> CacheEntry<V> {
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms > self.expiry
    }
}

#[derive(Debug, Clone)]
enum Mirror<V> {
    /// Storage has not been consulted yet in this process
    Unloaded,
    Absent,
    Present(CacheEntry<V>),
}

/// Cached value under one storage key.
pub struct TtlCache<V, S, C = SystemClock> {
    key: String,
    initial: V,
    ttl: Duration,
    storage: S,
    clock: C,
    mirror: Mirror<V>,
}

impl<V, S> TtlCache<V, S, SystemClock>
where
    V: Clone + Serialize + DeserializeOwned,
    S: StorageBackend,
{
    pub fn new(key: impl Into<String>, initial: V, ttl: Duration, storage: S) -> Self {
        Self::with_clock(key, initial, ttl, storage, SystemClock)
    }
}

impl<V, S, C> TtlCache<V, S, C>
where
    V: Clone + Serialize + DeserializeOwned,
    S: StorageBackend,
    C: Clock,
{
    pub fn with_clock(key: impl Into<String>, initial: V, ttl: Duration, storage: S, clock: C) -> Self {
        Self {
            key: key.into(),
            initial,
            ttl,
            storage,
            clock,
            mirror: Mirror::Unloaded,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current value, or the initial value when absent or expired.
    pub fn read(&mut self) -> V {
        if matches!(self.mirror, Mirror::Unloaded) {
            self.mirror = self.load();
        }
        let now = self.clock.now_ms();
        if matches!(&self.mirror, Mirror::Present(entry) if entry.is_expired_at(now)) {
            log::debug!("cache '{}' expired, dropping record", self.key);
            self.remove_record();
            self.mirror = Mirror::Absent;
        }
        match &self.mirror {
            Mirror::Present(entry) => entry.value.clone(),
            Mirror::Absent | Mirror::Unloaded => self.initial.clone(),
        }
    }

    /// Store `value` until `now + ttl`.
    ///
    /// The in-memory value is updated even when persisting fails.
    pub fn write(&mut self, value: V) {
        let entry = CacheEntry {
            value,
            expiry: self.clock.now_ms().saturating_add(self.ttl.as_millis() as u64),
        };
        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                if let Err(error) = self.storage.set(&self.key, &serialized) {
                    log::warn!("Error writing to cache '{}': {error}", self.key);
                }
            }
            Err(error) => {
                log::warn!("Error writing to cache '{}': {}", self.key, StorageError::Serialization(error.to_string()));
            }
        }
        self.mirror = Mirror::Present(entry);
    }

    /// Delete the record and fall back to the initial value.
    pub fn clear(&mut self) {
        self.remove_record();
        self.mirror = Mirror::Absent;
    }

    /// `true` when there is no live record for this key.
    pub fn is_expired(&mut self) -> bool {
        if matches!(self.mirror, Mirror::Unloaded) {
            self.mirror = self.load();
        }
        match &self.mirror {
            Mirror::Present(entry) => entry.is_expired_at(self.clock.now_ms()),
            Mirror::Absent | Mirror::Unloaded => true,
        }
    }

    fn load(&self) -> Mirror<V> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Mirror::Absent,
            Err(error) => {
                log::warn!("Error reading from cache '{}': {error}", self.key);
                return Mirror::Absent;
            }
        };
        match serde_json::from_str::<CacheEntry<V>>(&raw) {
            Ok(entry) => Mirror::Present(entry),
            Err(error) => {
                log::warn!("Error reading from cache '{}': {}", self.key, StorageError::Serialization(error.to_string()));
                Mirror::Absent
            }
        }
    }

    fn remove_record(&self) {
        if let Err(error) = self.storage.remove(&self.key) {
            log::warn!("Error clearing cache '{}': {error}", self.key);
        }
    }
}
