//! Monetary types for Cambio.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};

use num_rational::BigRational;

use crate::error::{MoneyError, MoneyResult};
use crate::rate::ExchangeRate;
use crate::rounding::{decimal_to_rational, rational_to_decimal, RoundingMode};

/// A monetary amount with currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount value (high precision decimal).
    pub value: Decimal,
    /// ISO 4217 currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money instance.
    pub fn new(value: Decimal, currency: Currency) -> Self {
        Self { value, currency }
    }

    /// Create from a string value.
    pub fn from_str(value: &str, currency: Currency) -> MoneyResult<Self> {
        let value = Decimal::from_str_exact(value.trim())
            .map_err(|_| MoneyError::InvalidAmount(value.to_string()))?;
        Ok(Self { value, currency })
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self {
            value: Decimal::ZERO,
            currency,
        }
    }

    /// The currency of this amount.
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The decimal amount.
    pub fn amount(&self) -> Decimal {
        self.value
    }

    /// Check if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Check if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value < Decimal::ZERO
    }

    /// Get the absolute value.
    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            currency: self.currency.clone(),
        }
    }

    /// Exact value as a rational number.
    pub fn to_rational(&self) -> BigRational {
        decimal_to_rational(&self.value)
    }

    /// Compare with another amount in the same currency.
    ///
    /// The comparison is exact and ignores the scale, so `1.0` equals `1.00`.
    pub fn compare_to(&self, other: &Money) -> MoneyResult<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.value.cmp(&other.value))
    }

    /// Rescale to the currency's decimal places using `mode`.
    pub fn to_scale(&self, mode: RoundingMode) -> MoneyResult<Self> {
        let value = rational_to_decimal(&self.to_rational(), self.currency.decimal_places(), mode)?;
        Ok(Self::new(value, self.currency.clone()))
    }

    /// Convert to `currency` by multiplying with `rate`.
    ///
    /// The product is computed exactly and rounded once, to the target
    /// currency's decimal places.
    pub fn converted_to(
        &self,
        currency: Currency,
        rate: &ExchangeRate,
        mode: RoundingMode,
    ) -> MoneyResult<Self> {
        let product = self.to_rational() * rate.as_rational();
        let value = rational_to_decimal(&product, currency.decimal_places(), mode)?;
        Ok(Self::new(value, currency))
    }

    fn ensure_same_currency(&self, other: &Money) -> MoneyResult<()> {
        if !self.currency.is(&other.currency) {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: other.currency.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

impl Add for Money {
    type Output = MoneyResult<Money>;

    fn add(self, other: Money) -> Self::Output {
        self.ensure_same_currency(&other)?;
        Ok(Money {
            value: self.value + other.value,
            currency: self.currency,
        })
    }
}

impl Sub for Money {
    type Output = MoneyResult<Money>;

    fn sub(self, other: Money) -> Self::Output {
        self.ensure_same_currency(&other)?;
        Ok(Money {
            value: self.value - other.value,
            currency: self.currency,
        })
    }
}

/// ISO 4217 currency.
///
/// Two currencies are equal when their codes are equal; the decimal places
/// do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    code: String,
    decimal_places: u32,
}

impl Currency {
    /// Create a new currency from code, using the standard minor units.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into().to_uppercase();
        let decimal_places = standard_decimal_places(&code);
        Self {
            code,
            decimal_places,
        }
    }

    /// Create a currency with explicit decimal places.
    pub fn with_decimal_places(code: impl Into<String>, decimal_places: u32) -> Self {
        Self {
            code: code.into().to_uppercase(),
            decimal_places,
        }
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Whether `other` denotes the same currency.
    pub fn is(&self, other: &Currency) -> bool {
        self.code == other.code
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

fn standard_decimal_places(code: &str) -> u32 {
    match code {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF"
        | "UGX" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        "CLF" | "UYW" => 4,
        _ => 2,
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Currency {}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An ordered currency pair, source first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency (converted from).
    pub base: Currency,
    /// Quote currency (converted to).
    pub quote: Currency,
}

impl CurrencyPair {
    /// Create a new currency pair.
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Get the inverse pair.
    pub fn inverse(&self) -> Self {
        Self {
            base: self.quote.clone(),
            quote: self.base.clone(),
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
