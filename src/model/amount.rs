//! Amount type for handling monetary values.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include a dollar sign and commas. Amounts are exact; no floating point is
//! involved except when formatting for display.

use crate::error::Res;
use anyhow::Context;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Div;
use std::str::FromStr;

/// Represents a sum of money.
///
/// # Examples
///
/// ```
/// # use household_ledger::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("$1,200.50").unwrap();
/// let b = Amount::from_str("1200.5").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "1,200.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// The larger of `self` and zero.
    pub fn or_zero(self) -> Self {
        if self.is_negative() {
            Self::ZERO
        } else {
            self
        }
    }

    /// The ratio `self / other`, or zero when `other` is zero.
    pub fn ratio(&self, other: Amount) -> Decimal {
        self.0.checked_div(other.0).unwrap_or(Decimal::ZERO)
    }

    /// `self + other`, or `None` if the result does not fit in a `Decimal`.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn checked_mul(self, count: u32) -> Option<Amount> {
        self.0.checked_mul(Decimal::from(count)).map(Amount)
    }

    /// Adds up `amounts`, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
    }

    /// The normalized text stored in the database. Normalizing matters: equal amounts must be
    /// equal strings so that SQL `GROUP BY` treats them as the same value.
    pub(crate) fn to_db(self) -> String {
        self.0.normalize().to_string()
    }

    pub(crate) fn from_db(s: &str) -> Res<Self> {
        let value = Decimal::from_str(s)
            .with_context(|| format!("Invalid amount '{s}' found in the database"))?;
        Ok(Self(value))
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // "-$50.00", "$50.00", "-50.00" and "50.00" are all accepted
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs().round_dp(2).to_f64().unwrap_or_default();
        write!(f, "{sign}{}", format_num::format_num!(",.2", num))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Amount(Decimal::from(value))
    }
}

/// Division by a count. Dividing by zero yields zero.
impl Div<u32> for Amount {
    type Output = Amount;

    fn div(self, rhs: u32) -> Amount {
        Amount(self.0.checked_div(Decimal::from(rhs)).unwrap_or(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_with_dollar_sign() {
        assert_eq!(amt("$50.00").value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_sign() {
        assert_eq!(amt("-$50.00").value(), Decimal::from_str("-50").unwrap());
        assert!(amt("-$50.00").is_negative());
    }

    #[test]
    fn test_parse_empty_string_is_an_error() {
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("   ").is_err());
        assert!(Amount::from_str("$").is_err());
    }

    #[test]
    fn test_parse_multiple_commas() {
        assert_eq!(
            amt("$1,234,567.89").value(),
            Decimal::from_str("1234567.89").unwrap()
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("twelve").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(amt("50").to_string(), "50.00");
        assert_eq!(amt("1234567.891").to_string(), "1,234,567.89");
        assert_eq!(amt("-700").to_string(), "-700.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_db_text_is_normalized() {
        assert_eq!(amt("100.00").to_db(), "100");
        assert_eq!(amt("100").to_db(), "100");
        assert_eq!(amt("0.50").to_db(), "0.5");
        assert_eq!(Amount::from_db("100").unwrap(), amt("100.00"));
        assert!(Amount::from_db("abc").is_err());
    }

    #[test]
    fn test_zero_is_not_negative() {
        assert!(!Amount::ZERO.is_negative());
        assert!(amt("0.00").is_zero());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(amt("1200") / 12, amt("100"));
        assert_eq!(amt("100").checked_mul(9), Some(amt("900")));
        assert_eq!(
            amt("3000")
                .checked_sub(amt("2000"))
                .and_then(|a| a.checked_sub(amt("300"))),
            Some(amt("700"))
        );
        assert_eq!(amt("5") / 0, Amount::ZERO);
        assert_eq!(
            Amount::checked_sum(vec![amt("1"), amt("2.5")]),
            Some(amt("3.5"))
        );
        assert_eq!(Amount::checked_sum(Vec::new()), Some(Amount::ZERO));
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        let big = amt("50000000000000000000000000000");
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Amount::checked_sum(vec![big, big, amt("1")]), None);
        let negative_big = amt("-50000000000000000000000000000");
        assert_eq!(negative_big.checked_sub(big), None);
        assert_eq!(big.checked_mul(2), None);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(amt("650").ratio(amt("1000")), Decimal::from_str("0.65").unwrap());
        assert_eq!(amt("650").ratio(Amount::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_or_zero() {
        assert_eq!(amt("-5").or_zero(), Amount::ZERO);
        assert_eq!(amt("5").or_zero(), amt("5"));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&amt("1200")).unwrap();
        assert_eq!(json, "\"1,200.00\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amt("1200"));
    }
}
