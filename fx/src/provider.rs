//! Exchange rate provider trait and implementations.

use async_trait::async_trait;
use cambio_common::{Currency, CurrencyPair, ExchangeRate};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};

/// Source of exchange rates.
///
/// Rates are directional: `get_exchange_rate(a, b)` and
/// `get_exchange_rate(b, a)` are independent and need not be reciprocals.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Get the rate converting one unit of `source` into `target`.
    ///
    /// Fails with [`FxError::RateNotAvailable`] when the pair is unknown.
    async fn get_exchange_rate(&self, source: &Currency, target: &Currency)
        -> FxResult<ExchangeRate>;
}

/// Provider backed by a fixed table of rates.
pub struct ConfigurableProvider {
    name: String,
    rates: DashMap<CurrencyPair, ExchangeRate>,
}

impl ConfigurableProvider {
    /// Create an empty provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rates: DashMap::new(),
        }
    }

    /// Build a provider from a `source -> target -> rate` table.
    pub fn from_table(
        name: impl Into<String>,
        table: HashMap<String, HashMap<String, ExchangeRate>>,
    ) -> Self {
        let provider = Self::new(name);
        for (source, targets) in table {
            for (target, rate) in targets {
                provider.set_exchange_rate(
                    Currency::new(source.as_str()),
                    Currency::new(target),
                    rate,
                );
            }
        }
        provider
    }

    /// Set the rate for an ordered pair, replacing any previous value.
    pub fn set_exchange_rate(&self, source: Currency, target: Currency, rate: ExchangeRate) {
        self.rates.insert(CurrencyPair::new(source, target), rate);
    }

    /// Builder form of [`set_exchange_rate`](Self::set_exchange_rate).
    pub fn with_rate(self, source: Currency, target: Currency, rate: ExchangeRate) -> Self {
        self.set_exchange_rate(source, target, rate);
        self
    }

    /// Number of configured pairs.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if no rates are configured.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[async_trait]
impl ExchangeRateProvider for ConfigurableProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> FxResult<ExchangeRate> {
        let pair = CurrencyPair::new(source.clone(), target.clone());
        self.rates
            .get(&pair)
            .map(|r| r.value().clone())
            .ok_or(FxError::RateNotAvailable(pair))
    }
}

/// Consults several providers in order and returns the first rate found.
pub struct ProviderChain {
    providers: Vec<Arc<dyn ExchangeRateProvider>>,
}

impl ProviderChain {
    /// Create a chain from providers in priority order.
    pub fn new(providers: Vec<Arc<dyn ExchangeRateProvider>>) -> Self {
        Self { providers }
    }

    /// Append a provider with the lowest priority.
    pub fn add_provider(&mut self, provider: Arc<dyn ExchangeRateProvider>) {
        self.providers.push(provider);
    }
}

#[async_trait]
impl ExchangeRateProvider for ProviderChain {
    fn name(&self) -> &str {
        "CHAIN"
    }

    /// Providers that do not know the pair are skipped. If none has it, the
    /// first hard failure is returned, or `RateNotAvailable` if there was none.
    async fn get_exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> FxResult<ExchangeRate> {
        let mut first_failure = None;

        for provider in &self.providers {
            match provider.get_exchange_rate(source, target).await {
                Ok(rate) => {
                    debug!(
                        provider = provider.name(),
                        source = %source,
                        target = %target,
                        rate = %rate,
                        "Got rate from provider"
                    );
                    return Ok(rate);
                }
                Err(FxError::RateNotAvailable(_)) => {
                    debug!(provider = provider.name(), source = %source, target = %target, "Pair not quoted");
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        source = %source,
                        target = %target,
                        error = %e,
                        "Provider failed to return rate"
                    );
                    first_failure.get_or_insert(e);
                }
            }
        }

        Err(first_failure.unwrap_or_else(|| {
            FxError::RateNotAvailable(CurrencyPair::new(source.clone(), target.clone()))
        }))
    }
}

/// Derives cross rates from a provider that only quotes one base currency.
///
/// The rate for `A -> B` is `rate(base -> B) / rate(base -> A)`, computed
/// exactly.
pub struct BaseCurrencyProvider {
    provider: Arc<dyn ExchangeRateProvider>,
    base: Currency,
}

impl BaseCurrencyProvider {
    /// Wrap `provider`, whose rates are all quoted from `base`.
    pub fn new(provider: Arc<dyn ExchangeRateProvider>, base: Currency) -> Self {
        Self { provider, base }
    }

    /// The base currency.
    pub fn base(&self) -> &Currency {
        &self.base
    }
}

#[async_trait]
impl ExchangeRateProvider for BaseCurrencyProvider {
    fn name(&self) -> &str {
        "BASE_CURRENCY"
    }

    async fn get_exchange_rate(
        &self,
        source: &Currency,
        target: &Currency,
    ) -> FxResult<ExchangeRate> {
        if source.is(&self.base) {
            return self.provider.get_exchange_rate(&self.base, target).await;
        }

        let base_to_source = self.provider.get_exchange_rate(&self.base, source).await?;

        if target.is(&self.base) {
            return Ok(base_to_source.inverse());
        }

        let base_to_target = self.provider.get_exchange_rate(&self.base, target).await?;
        Ok(base_to_target.divided_by(&base_to_source))
    }
}
