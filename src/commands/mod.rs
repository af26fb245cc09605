//! Command handlers for the household CLI.
//!
//! Each handler takes the `Config` (which owns the database handle) and its arguments, performs
//! one operation, and returns an `Out` describing the outcome. Nothing is re-rendered implicitly;
//! the caller decides what to show next.

mod debt;
mod expense;
mod goal;
mod income;
mod init;
mod month;
mod summary;
mod validate;

use crate::args::PeriodArgs;
use crate::error::Error;
use crate::model::Period;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use debt::{add_debt, delete_debt, list_debts, tick, DebtReport};
pub use expense::{add_expense, delete_expense, list_expense, ExpenseReport};
pub use goal::{add_goal, contribute, list_goals};
pub use income::{add_income, delete_income, list_income, IncomeReport};
pub use init::init;
pub use month::{month_status, start_month, MonthStart};
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Resolves the month and year a command operates on. Missing values default to the current
/// month and year. The year must fall inside the configured window.
pub fn select_period(config: &Config, args: &PeriodArgs) -> Result<Period> {
    let current = Period::current();
    let period = Period::new(
        args.month.unwrap_or(current.month()),
        args.year.unwrap_or(current.year()),
    );
    let (first, last) = (config.first_year(), config.last_year());
    if !(first..=last).contains(&period.year()) {
        return Err(Error::validation(format!(
            "The year {} is outside of the configured range {first} to {last}",
            period.year()
        )));
    }
    Ok(period)
}

/// "s" when `count` is not one.
fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
