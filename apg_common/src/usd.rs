use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

pub const USD_CURRENCY_CODE: &str = "USD";

//--------------------------------------     UsdAmount       ---------------------------------------------------------
/// A US dollar amount, stored as an integer number of cents.
///
/// Amounts cross the system boundary in two shapes: as JSON numbers in dollars (`100.0`) on the client-facing API,
/// and as 2-decimal strings (`"100.00"`) on the payment provider wire. Both conversions live here so that the rest
/// of the codebase only ever deals in whole cents.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, PartialOrd, Ord)]
#[sqlx(transparent)]
pub struct UsdAmount(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a dollar amount: {0}")]
pub struct UsdConversionError(pub String);

impl From<i64> for UsdAmount {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl Add for UsdAmount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for UsdAmount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for UsdAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl UsdAmount {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount in whole cents.
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Converts a dollar value into cents, rejecting negative values and sub-cent precision.
    pub fn try_from_dollars(dollars: f64) -> Result<Self, UsdConversionError> {
        if !dollars.is_finite() {
            return Err(UsdConversionError(format!("{dollars} is not a finite number")));
        }
        if dollars < 0.0 {
            return Err(UsdConversionError(format!("{dollars} is negative")));
        }
        let cents = (dollars * 100.0).round();
        if (dollars * 100.0 - cents).abs() > 1e-6 {
            return Err(UsdConversionError(format!("{dollars} has sub-cent precision")));
        }
        Ok(Self(cents as i64))
    }

    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// The 2-decimal string representation used on the payment provider wire, e.g. `100.00`.
    pub fn to_price_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

impl FromStr for UsdAmount {
    type Err = UsdConversionError;

    /// Parses a decimal price string, e.g. `100.00`, into cents.
    fn from_str(price: &str) -> Result<Self, Self::Err> {
        let trimmed = price.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        let whole_units = whole
            .parse::<i64>()
            .map_err(|e| UsdConversionError(format!("Invalid price value: {price}. {e}.")))?;
        if whole_units < 0 {
            return Err(UsdConversionError(format!("Invalid price value: {price}. Amounts cannot be negative.")));
        }
        if !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UsdConversionError(format!("Invalid price value: {price}.")));
        }
        // ".5" means 50 cents, ".05" means 5 cents
        let cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|e| UsdConversionError(format!("Invalid price value: {price}. {e}.")))? * 10,
            2 => frac.parse::<i64>().map_err(|e| UsdConversionError(format!("Invalid price value: {price}. {e}.")))?,
            _ => return Err(UsdConversionError(format!("Invalid price value: {price}. Sub-cent precision."))),
        };
        Ok(Self(100 * whole_units + cents))
    }
}

impl Display for UsdAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.to_price_string())
    }
}

impl Serialize for UsdAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for UsdAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        UsdAmount::try_from_dollars(dollars).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dollars_to_cents() {
        assert_eq!(UsdAmount::try_from_dollars(100.0).unwrap().value(), 10_000);
        assert_eq!(UsdAmount::try_from_dollars(0.05).unwrap().value(), 5);
        assert_eq!(UsdAmount::try_from_dollars(125.0).unwrap().value(), 12_500);
        assert!(UsdAmount::try_from_dollars(-1.0).is_err());
        assert!(UsdAmount::try_from_dollars(10.001).is_err());
        assert!(UsdAmount::try_from_dollars(f64::NAN).is_err());
    }

    #[test]
    fn price_strings() {
        assert_eq!(UsdAmount::from_cents(10_000).to_price_string(), "100.00");
        assert_eq!(UsdAmount::from_cents(10_550).to_price_string(), "105.50");
        assert_eq!(UsdAmount::from_cents(5).to_price_string(), "0.05");
        assert_eq!("100.00".parse::<UsdAmount>().unwrap().value(), 10_000);
        assert_eq!("105.5".parse::<UsdAmount>().unwrap().value(), 10_550);
        assert_eq!("105.05".parse::<UsdAmount>().unwrap().value(), 10_505);
        assert_eq!("105".parse::<UsdAmount>().unwrap().value(), 10_500);
        assert!("abc".parse::<UsdAmount>().is_err());
        assert!("1.005".parse::<UsdAmount>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(UsdAmount::from_cents(12_500).to_string(), "$125.00");
    }

    #[test]
    fn json_round_trip() {
        let amount: UsdAmount = serde_json::from_str("100.0").unwrap();
        assert_eq!(amount.value(), 10_000);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "100.0");
        assert!(serde_json::from_str::<UsdAmount>("-5.0").is_err());
    }
}
