//! Exchange rates as exact rationals.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MoneyError, MoneyResult};
use crate::rounding::{decimal_to_rational, rational_to_decimal, RoundingMode, MAX_DECIMAL_SCALE};

/// Directional exchange rate: one unit of the source currency is worth
/// `rate` units of the target currency.
///
/// Always strictly positive. Stored as an exact rational so that rates such
/// as `1/3` do not lose precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExchangeRate(BigRational);

impl ExchangeRate {
    /// Create a rate from a rational value.
    pub fn new(value: BigRational) -> MoneyResult<Self> {
        if !value.is_positive() {
            return Err(MoneyError::InvalidRate(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Create a rate from a decimal value.
    pub fn from_decimal(value: Decimal) -> MoneyResult<Self> {
        Self::new(decimal_to_rational(&value))
    }

    /// Create a whole-number rate.
    pub fn from_integer(value: i64) -> MoneyResult<Self> {
        Self::new(BigRational::from_integer(BigInt::from(value)))
    }

    /// Create a rate of `numerator / denominator`.
    pub fn from_ratio(numerator: i64, denominator: i64) -> MoneyResult<Self> {
        if denominator == 0 {
            return Err(MoneyError::InvalidRate(format!("{}/0", numerator)));
        }
        Self::new(BigRational::new(
            BigInt::from(numerator),
            BigInt::from(denominator),
        ))
    }

    /// A rate of exactly one.
    pub fn one() -> Self {
        Self(BigRational::one())
    }

    /// The exact rational value.
    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    /// Rate for the opposite direction, `1 / self`.
    pub fn inverse(&self) -> Self {
        Self(self.0.recip())
    }

    /// Rate obtained by chaining `self` with `other`.
    pub fn multiplied_by(&self, other: &ExchangeRate) -> Self {
        Self(&self.0 * &other.0)
    }

    /// Rate obtained by dividing `self` by `other`.
    pub fn divided_by(&self, other: &ExchangeRate) -> Self {
        Self(&self.0 / &other.0)
    }

    /// Round the rate to a decimal with the given number of places.
    pub fn to_decimal(&self, scale: u32, mode: RoundingMode) -> MoneyResult<Decimal> {
        rational_to_decimal(&self.0, scale, mode)
    }

    /// The rate as a decimal, if it has a finite decimal expansion.
    pub fn to_exact_decimal(&self) -> Option<Decimal> {
        (0..=MAX_DECIMAL_SCALE)
            .find_map(|scale| self.to_decimal(scale, RoundingMode::Unnecessary).ok())
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_exact_decimal() {
            Some(decimal) => write!(f, "{}", decimal),
            None => write!(f, "{}/{}", self.0.numer(), self.0.denom()),
        }
    }
}

impl FromStr for ExchangeRate {
    type Err = MoneyError;

    /// Accepts `"0.9"`, `"15000"` or `"1/3"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || MoneyError::InvalidRate(s.to_string());

        match s.split_once('/') {
            Some((numerator, denominator)) => {
                let numerator: BigInt = numerator.trim().parse().map_err(|_| invalid())?;
                let denominator: BigInt = denominator.trim().parse().map_err(|_| invalid())?;
                if denominator.is_zero() {
                    return Err(invalid());
                }
                Self::new(BigRational::new(numerator, denominator))
            }
            None => {
                let decimal = Decimal::from_str_exact(s).map_err(|_| invalid())?;
                Self::from_decimal(decimal)
            }
        }
    }
}

impl TryFrom<String> for ExchangeRate {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExchangeRate> for String {
    fn from(rate: ExchangeRate) -> Self {
        rate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_forms() {
        let decimal: ExchangeRate = "0.9".parse().unwrap();
        assert_eq!(decimal, ExchangeRate::from_ratio(9, 10).unwrap());

        let integer: ExchangeRate = "15000".parse().unwrap();
        assert_eq!(integer, ExchangeRate::from_integer(15000).unwrap());

        let fraction: ExchangeRate = " 2 / 6 ".parse().unwrap();
        assert_eq!(fraction, ExchangeRate::from_ratio(1, 3).unwrap());
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!("0".parse::<ExchangeRate>(), Err(MoneyError::InvalidRate(_))));
        assert!(matches!("-1.2".parse::<ExchangeRate>(), Err(MoneyError::InvalidRate(_))));
        assert!(matches!("1/0".parse::<ExchangeRate>(), Err(MoneyError::InvalidRate(_))));
        assert!(matches!("abc".parse::<ExchangeRate>(), Err(MoneyError::InvalidRate(_))));
        assert!(ExchangeRate::from_ratio(1, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ExchangeRate::from_decimal(dec!(0.9)).unwrap().to_string(), "0.9");
        assert_eq!(ExchangeRate::from_ratio(1, 4).unwrap().to_string(), "0.25");
        assert_eq!(ExchangeRate::from_ratio(1, 3).unwrap().to_string(), "1/3");
    }

    #[test]
    fn test_inverse_and_chaining() {
        let usd_eur = ExchangeRate::from_decimal(dec!(0.8)).unwrap();
        assert_eq!(usd_eur.inverse(), ExchangeRate::from_decimal(dec!(1.25)).unwrap());

        let eur_gbp = ExchangeRate::from_decimal(dec!(0.5)).unwrap();
        assert_eq!(
            usd_eur.multiplied_by(&eur_gbp),
            ExchangeRate::from_decimal(dec!(0.4)).unwrap()
        );
        assert_eq!(
            usd_eur.divided_by(&eur_gbp),
            ExchangeRate::from_decimal(dec!(1.6)).unwrap()
        );
    }

    #[test]
    fn test_to_decimal() {
        let third = ExchangeRate::from_ratio(1, 3).unwrap();
        assert_eq!(third.to_decimal(4, RoundingMode::HalfUp).unwrap(), dec!(0.3333));
        assert!(third.to_exact_decimal().is_none());
    }

    #[test]
    fn test_serde_as_string() {
        let rate = ExchangeRate::from_ratio(1, 3).unwrap();
        let json = serde_json::to_string(&rate).unwrap();
        assert_eq!(json, "\"1/3\"");

        let parsed: ExchangeRate = serde_json::from_str("\"1.1\"").unwrap();
        assert_eq!(parsed, ExchangeRate::from_ratio(11, 10).unwrap());

        assert!(serde_json::from_str::<ExchangeRate>("\"-1\"").is_err());
    }
}
