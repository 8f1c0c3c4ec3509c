//! Category cache backed by moka

use std::hash::Hash;
use std::time::Duration;

use moka::sync::Cache;

use super::BaseCache;

/// Entries kept before moka starts evicting
const MAX_ENTRIES: u64 = 10_000;

/// `BaseCache` over a `moka::sync::Cache` with a fixed time-to-live.
/// A zero TTL disables caching.
pub struct TtlCache<K, V> {
    ttl: Duration,
    inner: Cache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .build();
        Self { ttl, inner }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> BaseCache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    fn set(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.inner.insert(key, value);
    }

    fn expire(&self, key: &K) {
        self.inner.invalidate(key);
    }
}
