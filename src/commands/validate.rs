//! Checks applied to command input before anything is written.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Period};
use crate::{Config, Result};

pub(super) fn non_negative(field: &str, amount: Amount) -> Result<Amount> {
    if amount.is_negative() {
        return Err(Error::validation(format!(
            "The {field} cannot be negative, got {amount}"
        )));
    }
    Ok(amount)
}

/// Returns the trimmed value, or an error if nothing is left after trimming.
pub(super) fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("The {field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Checks `value` against the configured `choices`. An empty list accepts anything.
pub(super) fn one_of(field: &str, value: &str, choices: &[String]) -> Result<()> {
    if choices.is_empty() || choices.iter().any(|c| c == value) {
        return Ok(());
    }
    Err(Error::validation(format!(
        "'{value}' is not a valid {field}, expected one of: {}",
        choices.join(", ")
    )))
}

pub(super) fn at_least_one(field: &str, count: i64) -> Result<u32> {
    match u32::try_from(count) {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::validation(format!(
            "The {field} must be at least 1, got {count}"
        ))),
    }
}

/// Fails unless `period` has been started. Writes scoped to a month are only allowed after it
/// has been started.
pub(super) async fn started(config: &Config, period: &Period) -> Result<()> {
    let initialized = config
        .db()
        .is_initialized(&period.period_ref())
        .await
        .pub_result(ErrorType::Database)?;
    if !initialized {
        return Err(Error::validation(format!(
            "{period} has not been started, run 'household month start' first"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_non_negative() {
        assert!(non_negative("amount", Amount::ZERO).is_ok());
        let err = non_negative("amount", Amount::from_str("-5").unwrap()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Car  ").unwrap(), "Car");
        assert!(required("name", "   ").is_err());
    }

    #[test]
    fn test_one_of() {
        let choices = vec!["Rent".to_string(), "Water".to_string()];
        assert!(one_of("category", "Rent", &choices).is_ok());
        assert!(one_of("category", "Travel", &choices).is_err());
        assert!(one_of("category", "Travel", &[]).is_ok());
    }

    #[test]
    fn test_at_least_one() {
        assert_eq!(at_least_one("installment count", 12).unwrap(), 12);
        assert!(at_least_one("installment count", 0).is_err());
        assert!(at_least_one("installment count", -3).is_err());
    }
}
