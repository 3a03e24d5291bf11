//! Cambio FX
//!
//! Exchange rate lookup, caching and currency conversion.
//!
//! # Features
//!
//! - Pluggable exchange rate providers (fixed table, chained, base-currency)
//! - Non-expiring rate cache keyed by ordered currency pair
//! - Conversion with a configurable rounding mode
//! - Exact cross-currency comparison
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cambio_fx::{CachedExchangeRateProvider, ConfigurableProvider, CurrencyConverter};
//! use cambio_common::{Currency, ExchangeRate, Money, RoundingMode};
//!
//! let table = ConfigurableProvider::new("table")
//!     .with_rate(Currency::usd(), Currency::eur(), "0.9".parse()?);
//! let provider = Arc::new(CachedExchangeRateProvider::new(Arc::new(table)));
//! let converter = CurrencyConverter::new(provider).with_rounding_mode(RoundingMode::Down);
//!
//! let usd = Money::from_str("10.00", Currency::usd())?;
//! let eur = converter.convert(&usd, &Currency::eur()).await?;
//! ```

pub mod cache;
pub mod converter;
pub mod error;
pub mod provider;

pub use cache::{CacheStats, CachedExchangeRateProvider};
pub use converter::{ConverterConfig, CurrencyConverter};
pub use error::{FxError, FxResult};
pub use provider::{BaseCurrencyProvider, ConfigurableProvider, ExchangeRateProvider, ProviderChain};
