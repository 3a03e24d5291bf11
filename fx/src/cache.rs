//! Memoizing exchange rate provider.

use async_trait::async_trait;
use cambio_common::{Currency, CurrencyPair, ExchangeRate};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::FxResult;
use crate::provider::ExchangeRateProvider;

/// Caches the rates returned by another provider.
///
/// Entries are keyed by the ordered pair of currency codes and are never
/// expired or refreshed: once a pair has been resolved, the same rate is
/// returned for the lifetime of the cache. Failures are not cached.
pub struct CachedExchangeRateProvider {
    provider: Arc<dyn ExchangeRateProvider>,
    cache: DashMap<CurrencyPair, ExchangeRate>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedExchangeRateProvider {
    /// Wrap `provider` with a cache.
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a cached rate without consulting the wrapped provider.
    pub fn get_cached(&self, source: &Currency, target: &Currency) -> Option<ExchangeRate> {
        let pair = CurrencyPair::new(source.clone(), target.clone());
        self.cache.get(&pair).map(|entry| entry.value().clone())
    }

    /// Get the number of entries in cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl ExchangeRateProvider for CachedExchangeRateProvider {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn get_exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> FxResult<ExchangeRate> {
        if let Some(rate) = self.get_cached(source, target) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(source = %source, target = %target, "Cache hit");
            return Ok(rate);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(source = %source, target = %target, "Cache miss");

        let rate = self.provider.get_exchange_rate(source, target).await?;

        // A concurrent caller may have resolved the pair while we awaited;
        // keep whichever value was stored first.
        let pair = CurrencyPair::new(source.clone(), target.clone());
        let stored = self.cache.entry(pair).or_insert(rate).value().clone();
        Ok(stored)
    }
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::provider::ConfigurableProvider;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;

    /// Returns a different rate on every call and counts lookups.
    struct DriftingProvider {
        calls: AtomicUsize,
    }

    impl DriftingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for DriftingProvider {
        fn name(&self) -> &str {
            "drifting"
        }

        async fn get_exchange_rate(
            &self,
            source: &Currency,
            target: &Currency,
        ) -> FxResult<ExchangeRate> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64 + 1;
            if target.code() == "XXX" {
                return Err(FxError::RateNotAvailable(CurrencyPair::new(
                    source.clone(),
                    target.clone(),
                )));
            }
            Ok(ExchangeRate::from_integer(n).unwrap())
        }
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let inner = Arc::new(DriftingProvider::new());
        let cache = CachedExchangeRateProvider::new(inner.clone());

        let first = cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();
        let second = cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();

        assert_eq!(first, ExchangeRate::from_integer(1).unwrap());
        assert_eq!(second, first);
        assert_eq!(inner.calls(), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[tokio::test]
    async fn test_pairs_are_directional() {
        let inner = Arc::new(DriftingProvider::new());
        let cache = CachedExchangeRateProvider::new(inner.clone());

        let forward = cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();
        let backward = cache
            .get_exchange_rate(&Currency::eur(), &Currency::usd())
            .await
            .unwrap();

        assert_ne!(forward, backward);
        assert_eq!(inner.calls(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_keyed_by_code() {
        let inner = Arc::new(DriftingProvider::new());
        let cache = CachedExchangeRateProvider::new(inner.clone());

        cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();
        cache
            .get_exchange_rate(
                &Currency::with_decimal_places("usd", 4),
                &Currency::new("EUR"),
            )
            .await
            .unwrap();

        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = Arc::new(DriftingProvider::new());
        let cache = CachedExchangeRateProvider::new(inner.clone());
        let unknown = Currency::new("XXX");

        for _ in 0..2 {
            let result = cache.get_exchange_rate(&Currency::usd(), &unknown).await;
            assert!(matches!(result, Err(FxError::RateNotAvailable(_))));
        }

        assert_eq!(inner.calls(), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_never_refreshes() {
        let table = Arc::new(ConfigurableProvider::new("table").with_rate(
            Currency::usd(),
            Currency::eur(),
            ExchangeRate::from_decimal(dec!(0.9)).unwrap(),
        ));
        let cache = CachedExchangeRateProvider::new(table.clone());

        cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();
        table.set_exchange_rate(
            Currency::usd(),
            Currency::eur(),
            ExchangeRate::from_decimal(dec!(0.95)).unwrap(),
        );

        let rate = cache
            .get_exchange_rate(&Currency::usd(), &Currency::eur())
            .await
            .unwrap();
        assert_eq!(rate, ExchangeRate::from_decimal(dec!(0.9)).unwrap());
        assert_eq!(
            cache.get_cached(&Currency::usd(), &Currency::eur()),
            Some(rate)
        );
    }

    #[tokio::test]
    async fn test_concurrent_lookups_agree() {
        let inner = Arc::new(DriftingProvider::new());
        let cache = Arc::new(CachedExchangeRateProvider::new(inner.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    cache
                        .get_exchange_rate(&Currency::usd(), &Currency::eur())
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut rates = Vec::new();
        for handle in handles {
            rates.push(handle.await.unwrap());
        }

        let cached = cache.get_cached(&Currency::usd(), &Currency::eur()).unwrap();
        assert!(rates.iter().all(|r| *r == cached));
        assert_eq!(cache.len(), 1);
    }
}
