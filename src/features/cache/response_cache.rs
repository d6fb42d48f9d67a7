use std::collections::BTreeMap;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::constants::cache as cache_constants;

/// Builds the canonical cache key for a URL and optional query parameters.
///
/// Parameters serialize in key order, so maps that differ only in insertion
/// order produce the same key. A request with no parameter map keys
/// differently from one carrying an empty map, so the two can never collide.
pub fn cache_key(url: &str, params: Option<&BTreeMap<String, String>>) -> String {
    match params {
        None => url.to_string(),
        Some(map) => {
            let query: Vec<String> = map.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{}?{}", url, query.join("&"))
        }
    }
}

struct CacheEntry<V> {
    value: V,
    fresh_until: Instant,
    hard_expire_at: Instant,
}

/// A cached value together with its freshness flag, as returned by
/// [`ResponseCache::get_stale`].
#[derive(Debug, Clone, PartialEq)]
pub struct StaleValue<V> {
    pub value: V,
    pub is_stale: bool,
}

/// In-memory response cache with a freshness TTL and a hard-expiry ceiling.
///
/// Entries past `fresh_until` stop serving from [`get`](Self::get) but stay
/// readable through [`get_stale`](Self::get_stale) until `hard_expire_at`,
/// after which the next matching lookup purges them. There is no background
/// sweep - expiry is only ever checked on access, so an entry nobody reads
/// again simply lingers in the map.
pub struct ResponseCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
    hard_expire_multiplier: u32,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self::with_settings(
            Duration::from_secs(cache_constants::DEFAULT_TTL_SECONDS),
            cache_constants::HARD_EXPIRE_MULTIPLIER,
        )
    }

    /// Cache with an explicit default TTL and hard-expiry multiplier. Hard
    /// expiry always sits at `multiplier x ttl` past insertion.
    pub fn with_settings(default_ttl: Duration, hard_expire_multiplier: u32) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
            hard_expire_multiplier,
        }
    }

    /// Stores `value` under the default TTL.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores `value`, fresh for `ttl` and readable as stale until
    /// `hard_expire_multiplier x ttl`. An existing entry is overwritten
    /// wholesale.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                fresh_until: now + ttl,
                hard_expire_at: now + ttl * self.hard_expire_multiplier,
            },
        );
    }

    /// Returns the value only while fresh. A stale entry is left in place;
    /// the freshness check never evicts.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if Instant::now() <= entry.fresh_until {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Returns the value until hard expiry, flagging whether it is past its
    /// freshness TTL. An entry found past hard expiry is removed here.
    pub fn get_stale(&self, key: &str) -> Option<StaleValue<V>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if now <= entry.hard_expire_at {
                return Some(StaleValue {
                    value: entry.value.clone(),
                    is_stale: now > entry.fresh_until,
                });
            }
        } else {
            return None;
        }

        self.entries.remove(key);
        None
    }

    /// Removes every entry whose key contains `pattern` as a substring.
    ///
    /// Matching is containment, not prefix: invalidating "/releases/" also
    /// sweeps "/releases/123/features". Callers lean on that blast radius
    /// after mutations, so the contract is substring on purpose.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(pattern, removed, "invalidated cache entries");
        }
        removed
    }

    /// Removes all entries unconditionally.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
