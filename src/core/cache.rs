use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CachedCountry {
    country: Option<String>,
    stored_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// Stored within the TTL. `None` means the location was looked up and
    /// did not resolve.
    Fresh(Option<String>),
    Expired,
    Miss,
}

/// Resolved countries keyed by the exact query string, with time-based expiry.
#[derive(Debug)]
pub struct CountryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedCountry>>,
}

impl CountryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CachedCountry>> {
        // entries stay consistent even if a holder panicked
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn lookup(&self, query: &str) -> CacheLookup {
        self.lookup_at(query, Instant::now())
    }

    pub fn lookup_at(&self, query: &str, now: Instant) -> CacheLookup {
        match self.entries().get(query) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < self.ttl => {
                CacheLookup::Fresh(entry.country.clone())
            }
            Some(_) => CacheLookup::Expired,
            None => CacheLookup::Miss,
        }
    }

    pub fn store(&self, query: &str, country: Option<String>) {
        self.store_at(query, country, Instant::now());
    }

    pub fn store_at(&self, query: &str, country: Option<String>, now: Instant) {
        self.entries().insert(
            query.to_string(),
            CachedCountry {
                country,
                stored_at: now,
            },
        );
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for CountryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
