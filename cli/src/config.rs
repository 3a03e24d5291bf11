//! Rate table loading and provider assembly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cambio_common::{Currency, ExchangeRate};
use cambio_fx::{
    BaseCurrencyProvider, CachedExchangeRateProvider, ConfigurableProvider, ExchangeRateProvider,
};
use tracing::info;

/// Rates keyed by source code, then target code.
pub type RateTable = HashMap<String, HashMap<String, ExchangeRate>>;

/// Parse a rate table such as `{"USD": {"EUR": "0.9", "GBP": "4/5"}}`.
pub fn parse_rate_table(json: &str) -> anyhow::Result<RateTable> {
    serde_json::from_str(json).context("Invalid rate table")
}

/// Read and parse a rate table file.
pub fn load_rate_table(path: &Path) -> anyhow::Result<RateTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rate table {}", path.display()))?;
    parse_rate_table(&json).with_context(|| format!("In {}", path.display()))
}

/// Build the provider stack: table, optional base-currency derivation, cache.
pub fn build_provider(table: RateTable, base: Option<Currency>) -> Arc<dyn ExchangeRateProvider> {
    let table = ConfigurableProvider::from_table("table", table);
    info!(pairs = table.len(), "Loaded rate table");

    let provider: Arc<dyn ExchangeRateProvider> = match base {
        Some(base) => {
            info!(base = %base, "Deriving cross rates from base currency");
            Arc::new(BaseCurrencyProvider::new(Arc::new(table), base))
        }
        None => Arc::new(table),
    };

    Arc::new(CachedExchangeRateProvider::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_table() {
        let table = parse_rate_table(r#"{"USD": {"EUR": "0.9", "GBP": "4/5"}}"#).unwrap();
        assert_eq!(
            table["USD"]["GBP"],
            ExchangeRate::from_ratio(4, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_rate_table_rejects_bad_rates() {
        assert!(parse_rate_table(r#"{"USD": {"EUR": "-0.9"}}"#).is_err());
        assert!(parse_rate_table(r#"{"USD": {"EUR": 0.9}}"#).is_err());
        assert!(parse_rate_table("[]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rate_table(Path::new("/nonexistent/rates.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read rate table"));
    }

    #[tokio::test]
    async fn test_build_provider_with_base() {
        let table = parse_rate_table(r#"{"EUR": {"USD": "1.25", "GBP": "0.8"}}"#).unwrap();
        let provider = build_provider(table, Some(Currency::eur()));

        let rate = provider
            .get_exchange_rate(&Currency::usd(), &Currency::gbp())
            .await
            .unwrap();
        assert_eq!(rate, "0.64".parse::<ExchangeRate>().unwrap());
    }
}
