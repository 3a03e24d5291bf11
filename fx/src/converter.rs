//! Currency conversion and cross-currency comparison.

use std::cmp::Ordering;
use std::sync::Arc;

use cambio_common::{Currency, Money, RoundingMode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::FxResult;
use crate::provider::ExchangeRateProvider;

/// Configuration for the currency converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Rounding applied when fitting a converted amount to the target
    /// currency's decimal places.
    pub rounding_mode: RoundingMode,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            rounding_mode: RoundingMode::Floor,
        }
    }
}

/// Converts and compares money across currencies using an exchange rate
/// provider.
pub struct CurrencyConverter {
    provider: Arc<dyn ExchangeRateProvider>,
    config: ConverterConfig,
}

impl CurrencyConverter {
    /// Create a converter that rounds towards negative infinity.
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self::with_config(provider, ConverterConfig::default())
    }

    /// Create a converter with explicit configuration.
    pub fn with_config(provider: Arc<dyn ExchangeRateProvider>, config: ConverterConfig) -> Self {
        Self { provider, config }
    }

    /// Use a different rounding mode.
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.config.rounding_mode = mode;
        self
    }

    /// The configured rounding mode.
    pub fn rounding_mode(&self) -> RoundingMode {
        self.config.rounding_mode
    }

    /// Convert `money` into `currency`.
    ///
    /// Money already in `currency` is returned unchanged without a rate
    /// lookup. Otherwise the amount is multiplied by the provider's rate and
    /// rounded once to the target currency's decimal places.
    ///
    /// Fails with `RateNotAvailable` when the provider has no rate, and with
    /// `RoundingNecessary` when the rounding mode is `Unnecessary` and the
    /// result is not exact.
    #[instrument(skip(self), fields(
        from_currency = %money.currency,
        to_currency = %currency,
        amount = %money.value
    ))]
    pub async fn convert(&self, money: &Money, currency: &Currency) -> FxResult<Money> {
        if money.currency.is(currency) {
            return Ok(money.clone());
        }

        let rate = self
            .provider
            .get_exchange_rate(&money.currency, currency)
            .await?;

        let converted = money.converted_to(currency.clone(), &rate, self.config.rounding_mode)?;

        debug!(
            rate = %rate,
            rounding_mode = %self.config.rounding_mode,
            result = %converted,
            "Conversion completed"
        );

        Ok(converted)
    }

    /// Compare two amounts that may be in different currencies.
    ///
    /// `a` is converted into `b`'s currency using the rate for
    /// `a.currency -> b.currency`, never the reverse. No rounding is applied:
    /// the product is compared exactly, so near-ties are not distorted the
    /// way `convert(a, b.currency).compare_to(b)` would distort them.
    #[instrument(skip(self), fields(a = %a, b = %b))]
    pub async fn compare(&self, a: &Money, b: &Money) -> FxResult<Ordering> {
        if a.currency.is(&b.currency) {
            return Ok(a.compare_to(b)?);
        }

        let rate = self
            .provider
            .get_exchange_rate(&a.currency, &b.currency)
            .await?;

        let a_in_b = a.to_rational() * rate.as_rational();
        let ordering = a_in_b.cmp(&b.to_rational());

        debug!(rate = %rate, ordering = ?ordering, "Comparison completed");

        Ok(ordering)
    }
}
