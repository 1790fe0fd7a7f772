//! Result cache shared by every orchestrator of one client runtime.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use jobs_core::{CriteriaKey, SearchResultPage};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entries older than this are shown but refreshed in the background.
    #[serde(with = "secs")]
    pub stale_after: Duration,
    /// Entries older than this are dropped.
    #[serde(with = "secs")]
    pub evict_after: Duration,
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(5 * 60),
            evict_after: Duration::from_secs(30 * 60),
            max_entries: 500,
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

#[derive(Clone)]
struct Entry {
    page: Arc<SearchResultPage>,
    fetched_at: Instant,
}

#[derive(Debug, Clone)]
pub struct CachedPage {
    pub page: Arc<SearchResultPage>,
    pub freshness: Freshness,
}

/// Search results keyed by criteria key.
///
/// Cloning is cheap and clones share storage. Inserting an existing key
/// replaces the entry.
#[derive(Clone)]
pub struct SearchCache {
    entries: Cache<CriteriaKey, Entry>,
    stale_after: Duration,
}

impl SearchCache {
    pub fn new(config: &CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.evict_after)
            .build();
        Self {
            entries,
            stale_after: config.stale_after,
        }
    }

    pub fn get(&self, key: &CriteriaKey) -> Option<CachedPage> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &CriteriaKey, now: Instant) -> Option<CachedPage> {
        let entry = self.entries.get(key)?;
        let freshness = if now.saturating_duration_since(entry.fetched_at) >= self.stale_after {
            Freshness::Stale
        } else {
            Freshness::Fresh
        };
        Some(CachedPage {
            page: entry.page,
            freshness,
        })
    }

    pub fn insert(&self, key: CriteriaKey, page: SearchResultPage) -> Arc<SearchResultPage> {
        let page = Arc::new(page);
        self.entries.insert(
            key,
            Entry {
                page: Arc::clone(&page),
                fetched_at: Instant::now(),
            },
        );
        page
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
