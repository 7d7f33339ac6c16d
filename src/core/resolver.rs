use crate::config::ProviderErrorPolicy;
use crate::core::cache::{CacheLookup, CountryCache};
use crate::domain::ports::{ConfigProvider, Geocoder, Lookup};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Last `", "`-separated component of a formatted address, trimmed.
/// An empty last component yields `None` rather than `Some("")`, so the
/// country reads as absent everywhere downstream.
pub fn country_from_address(address: &str) -> Option<String> {
    let country = address.rsplit(", ").next().unwrap_or(address).trim();
    if country.is_empty() {
        None
    } else {
        Some(country.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub cache_hits: usize,
    pub provider_calls: usize,
    pub resolved: usize,
    pub unresolved: usize,
    pub degraded: usize,
}

#[derive(Debug, Default)]
struct Counters {
    cache_hits: AtomicUsize,
    provider_calls: AtomicUsize,
    resolved: AtomicUsize,
    unresolved: AtomicUsize,
    degraded: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> ResolutionStats {
        ResolutionStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            provider_calls: self.provider_calls.load(Ordering::Relaxed),
            resolved: self.resolved.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
            degraded: self.degraded.load(Ordering::Relaxed),
        }
    }
}

/// Turns location strings into country names through a [`Geocoder`],
/// consulting the shared [`CountryCache`] before every provider call.
pub struct CountryResolver<G: Geocoder> {
    geocoder: G,
    cache: Arc<CountryCache>,
    policy: ProviderErrorPolicy,
    concurrency: usize,
    counters: Counters,
}

impl<G: Geocoder> CountryResolver<G> {
    pub fn new(geocoder: G, cache: Arc<CountryCache>) -> Self {
        Self {
            geocoder,
            cache,
            policy: ProviderErrorPolicy::default(),
            concurrency: 1,
            counters: Counters::default(),
        }
    }

    pub fn from_config<C: ConfigProvider>(geocoder: G, cache: Arc<CountryCache>, config: &C) -> Self {
        Self::new(geocoder, cache)
            .with_policy(config.provider_error_policy())
            .with_concurrency(config.concurrent_requests())
    }

    pub fn with_policy(mut self, policy: ProviderErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    pub fn cache(&self) -> &Arc<CountryCache> {
        &self.cache
    }

    pub fn stats(&self) -> ResolutionStats {
        self.counters.snapshot()
    }

    /// Country for one location. Blank or absent input resolves to `None`
    /// without touching the provider; so do "not found" and "timed out".
    pub async fn resolve(&self, query: Option<&str>) -> Result<Option<String>> {
        let query = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => return Ok(None),
        };

        match self.cache.lookup(query) {
            CacheLookup::Fresh(country) => {
                Counters::bump(&self.counters.cache_hits);
                tracing::debug!("cache hit for '{}': {:?}", query, country);
                return Ok(country);
            }
            CacheLookup::Expired => tracing::debug!("cache entry for '{}' expired", query),
            CacheLookup::Miss => {}
        }

        Counters::bump(&self.counters.provider_calls);
        let country = match self.geocoder.geocode(query).await {
            Ok(Lookup::Found(address)) => {
                tracing::debug!("'{}' geocoded to '{}'", query, address);
                country_from_address(&address)
            }
            Ok(Lookup::NotFound) => {
                tracing::debug!("no geocoding match for '{}'", query);
                None
            }
            Ok(Lookup::TimedOut) => {
                tracing::warn!("⏱️ geocoding timed out for '{}'", query);
                None
            }
            Err(e) => match self.policy {
                ProviderErrorPolicy::Abort => return Err(e),
                ProviderErrorPolicy::Degrade => {
                    tracing::warn!("⚠️ geocoding failed for '{}', leaving country blank: {}", query, e);
                    Counters::bump(&self.counters.degraded);
                    Counters::bump(&self.counters.unresolved);
                    return Ok(None);
                }
            },
        };

        self.cache.store(query, country.clone());
        match country {
            Some(_) => Counters::bump(&self.counters.resolved),
            None => Counters::bump(&self.counters.unresolved),
        }
        Ok(country)
    }

    /// Resolves a row-aligned list of queries. Each distinct query is looked
    /// up once; the result keeps the input order.
    pub async fn resolve_all(&self, queries: &[Option<String>]) -> Result<Vec<Option<String>>> {
        let purged = self.cache.purge_expired();
        if purged > 0 {
            tracing::debug!("dropped {} expired cache entries", purged);
        }

        let mut seen = HashSet::new();
        let distinct: Vec<&str> = queries
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|query| seen.insert(*query))
            .collect();

        tracing::info!(
            "🌍 Resolving {} distinct locations across {} rows",
            distinct.len(),
            queries.len()
        );

        let lookups: Vec<_> = distinct
            .into_iter()
            .map(|query| async move {
                self.resolve(Some(query))
                    .await
                    .map(|country| (query, country))
            })
            .collect();
        let resolved: HashMap<&str, Option<String>> = stream::iter(lookups)
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        Ok(queries
            .iter()
            .map(|query| {
                query
                    .as_deref()
                    .and_then(|q| resolved.get(q).cloned().flatten())
            })
            .collect())
    }
}
