//! Error types for monetary values.

use crate::Currency;
use thiserror::Error;

/// Errors raised by money, rate and rounding operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Operation on two amounts in different currencies.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: Currency, actual: Currency },

    /// Rounding mode is `Unnecessary` but the value is not exact at the scale.
    #[error("Rounding necessary to represent {value} with {scale} decimal places")]
    RoundingNecessary { value: String, scale: u32 },

    /// Exchange rate is zero, negative or unparseable.
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    /// Amount string could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Result does not fit in a decimal amount.
    #[error("Amount overflow: {0}")]
    Overflow(String),
}

impl MoneyError {
    /// Get error code for reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            MoneyError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            MoneyError::RoundingNecessary { .. } => "ROUNDING_NECESSARY",
            MoneyError::InvalidRate(_) => "INVALID_RATE",
            MoneyError::InvalidAmount(_) => "INVALID_AMOUNT",
            MoneyError::Overflow(_) => "OVERFLOW",
        }
    }
}

/// Result type alias for money operations.
pub type MoneyResult<T> = std::result::Result<T, MoneyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MoneyError::RoundingNecessary {
            value: "1/3".to_string(),
            scale: 2,
        };
        assert_eq!(err.error_code(), "ROUNDING_NECESSARY");
        assert_eq!(
            err.to_string(),
            "Rounding necessary to represent 1/3 with 2 decimal places"
        );

        let err = MoneyError::CurrencyMismatch {
            expected: Currency::usd(),
            actual: Currency::eur(),
        };
        assert_eq!(err.to_string(), "Currency mismatch: expected USD, got EUR");
    }
}
