//! Rounding policies applied when a value is fitted to a currency scale.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{MoneyError, MoneyResult};

/// Most decimal places a `Decimal` can carry.
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// How to discard digits beyond the target scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Fail instead of discarding a non-zero remainder.
    Unnecessary,
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    HalfUp,
    /// Nearest neighbour, ties towards zero.
    HalfDown,
    /// Nearest neighbour, ties towards positive infinity.
    HalfCeiling,
    /// Nearest neighbour, ties towards negative infinity.
    HalfFloor,
    /// Nearest neighbour, ties to the even neighbour.
    HalfEven,
}

impl RoundingMode {
    /// All modes, in declaration order.
    pub const ALL: [RoundingMode; 10] = [
        RoundingMode::Unnecessary,
        RoundingMode::Up,
        RoundingMode::Down,
        RoundingMode::Ceiling,
        RoundingMode::Floor,
        RoundingMode::HalfUp,
        RoundingMode::HalfDown,
        RoundingMode::HalfCeiling,
        RoundingMode::HalfFloor,
        RoundingMode::HalfEven,
    ];

    /// Canonical upper-case name, e.g. `HALF_EVEN`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Unnecessary => "UNNECESSARY",
            RoundingMode::Up => "UP",
            RoundingMode::Down => "DOWN",
            RoundingMode::Ceiling => "CEILING",
            RoundingMode::Floor => "FLOOR",
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfDown => "HALF_DOWN",
            RoundingMode::HalfCeiling => "HALF_CEILING",
            RoundingMode::HalfFloor => "HALF_FLOOR",
            RoundingMode::HalfEven => "HALF_EVEN",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        RoundingMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| format!("unknown rounding mode: {}", s))
    }
}

/// Round `value` to `scale` decimal places.
///
/// Returns the unscaled integer, i.e. the rounded value multiplied by
/// `10^scale`.
pub fn round_rational(value: &BigRational, scale: u32, mode: RoundingMode) -> MoneyResult<BigInt> {
    let factor = BigRational::from_integer(BigInt::from(10u32).pow(scale));
    let scaled = value * factor;

    if scaled.is_integer() {
        return Ok(scaled.to_integer());
    }

    let floor = scaled.floor().to_integer();
    let ceil = &floor + BigInt::one();
    let (toward_zero, away_from_zero) = if scaled.is_positive() {
        (floor.clone(), ceil.clone())
    } else {
        (ceil.clone(), floor.clone())
    };

    let rounded = match mode {
        RoundingMode::Unnecessary => {
            return Err(MoneyError::RoundingNecessary {
                value: value.to_string(),
                scale,
            })
        }
        RoundingMode::Up => away_from_zero,
        RoundingMode::Down => toward_zero,
        RoundingMode::Ceiling => ceil,
        RoundingMode::Floor => floor,
        RoundingMode::HalfUp
        | RoundingMode::HalfDown
        | RoundingMode::HalfCeiling
        | RoundingMode::HalfFloor
        | RoundingMode::HalfEven => {
            // Distance above the floor, strictly between 0 and 1 here.
            let fraction = &scaled - BigRational::from_integer(floor.clone());
            let half = BigRational::new(BigInt::one(), BigInt::from(2));

            match fraction.cmp(&half) {
                Ordering::Less => floor,
                Ordering::Greater => ceil,
                Ordering::Equal => match mode {
                    RoundingMode::HalfUp => away_from_zero,
                    RoundingMode::HalfDown => toward_zero,
                    RoundingMode::HalfCeiling => ceil,
                    RoundingMode::HalfFloor => floor,
                    _ => {
                        if (&floor % BigInt::from(2)).is_zero() {
                            floor
                        } else {
                            ceil
                        }
                    }
                },
            }
        }
    };

    Ok(rounded)
}

/// Exact rational value of a decimal.
pub fn decimal_to_rational(value: &Decimal) -> BigRational {
    let denominator = BigInt::from(10u32).pow(value.scale());
    BigRational::new(BigInt::from(value.mantissa()), denominator)
}

/// Round a rational to a decimal with `scale` places.
///
/// Scales beyond [`MAX_DECIMAL_SCALE`] fail with `Overflow` before any
/// rounding is attempted.
pub fn rational_to_decimal(value: &BigRational, scale: u32, mode: RoundingMode) -> MoneyResult<Decimal> {
    if scale > MAX_DECIMAL_SCALE {
        return Err(MoneyError::Overflow(format!(
            "{} at {} decimal places",
            value, scale
        )));
    }

    let unscaled = round_rational(value, scale, mode)?;
    let mantissa = i128::try_from(&unscaled).map_err(|_| MoneyError::Overflow(value.to_string()))?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| MoneyError::Overflow(value.to_string()))
}
