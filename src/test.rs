//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, NewExpense, NewIncome, Period};
use crate::Config;
use chrono::Month;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a household home directory with Config and database.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with the default config and an empty database.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("household");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Marks a month as started without carrying anything into it.
    pub async fn start_month(&self, month: Month, year: i32) -> Period {
        let period = Period::new(month, year);
        self.config
            .db()
            .initialize_period(&period, false, false)
            .await
            .unwrap();
        period
    }

    /// Inserts an income row directly, skipping command validation.
    pub async fn add_income(
        &self,
        period: &Period,
        person: &str,
        category: &str,
        description: &str,
        amount: &str,
        recurring: bool,
    ) -> i64 {
        let income = NewIncome {
            person: person.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            amount: Amount::from_str(amount).unwrap(),
            recurring,
        };
        self.config
            .db()
            .insert_income(period, &income)
            .await
            .unwrap()
    }

    /// Inserts an expense row directly, skipping command validation.
    pub async fn add_expense(
        &self,
        period: &Period,
        category: &str,
        description: &str,
        amount: &str,
        recurring: bool,
    ) -> i64 {
        let expense = NewExpense {
            category: category.to_string(),
            description: description.to_string(),
            amount: Amount::from_str(amount).unwrap(),
            recurring,
        };
        self.config
            .db()
            .insert_expense(period, &expense)
            .await
            .unwrap()
    }
}
