//! FX error types.

use cambio_common::{Currency, CurrencyPair, MoneyError};
use thiserror::Error;

/// Errors that can occur while looking up rates or converting money.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// Rate not available for the requested currency pair.
    #[error("Rate not available for {0}")]
    RateNotAvailable(CurrencyPair),

    /// Conversion needs rounding but the converter forbids it.
    #[error("Rounding necessary to represent {value} with {scale} decimal places")]
    RoundingNecessary { value: String, scale: u32 },

    /// Currency mismatch in an operation.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// Provider produced an unusable rate.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    /// Amount could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Converted amount does not fit a decimal.
    #[error("Amount overflow: {0}")]
    Overflow(String),

    /// Provider returned an error.
    #[error("Rate provider error: {0}")]
    ProviderError(String),
}

impl From<MoneyError> for FxError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::CurrencyMismatch { expected, actual } => {
                FxError::CurrencyMismatch { expected, actual }
            }
            MoneyError::RoundingNecessary { value, scale } => {
                FxError::RoundingNecessary { value, scale }
            }
            MoneyError::InvalidRate(rate) => FxError::InvalidRate(rate),
            MoneyError::InvalidAmount(amount) => FxError::InvalidAmount(amount),
            MoneyError::Overflow(value) => FxError::Overflow(value),
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_errors_keep_their_kind() {
        let err: FxError = MoneyError::RoundingNecessary {
            value: "10/3".to_string(),
            scale: 2,
        }
        .into();
        assert_eq!(
            err,
            FxError::RoundingNecessary {
                value: "10/3".to_string(),
                scale: 2
            }
        );

        let err: FxError = MoneyError::InvalidRate("0".to_string()).into();
        assert!(matches!(err, FxError::InvalidRate(_)));
    }

    #[test]
    fn test_rate_not_available_message() {
        let err = FxError::RateNotAvailable(CurrencyPair::new(Currency::usd(), Currency::eur()));
        assert_eq!(err.to_string(), "Rate not available for USD/EUR");
    }
}
