//! Income and expense entries recorded against a period.

use crate::model::Amount;
use serde::{Deserialize, Serialize};

/// A single income row, e.g. a salary payment for one person in one month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    /// The canonical month name the entry was recorded in, e.g. `July`.
    pub month: String,
    /// The period key, e.g. `July-2025`.
    pub period_ref: String,
    pub person: String,
    pub category: String,
    pub description: String,
    pub amount: Amount,
    /// Recurring entries are the templates copied forward when a new month is started.
    pub recurring: bool,
}

/// A single expense row.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub month: String,
    pub period_ref: String,
    pub category: String,
    pub description: String,
    pub amount: Amount,
    pub recurring: bool,
}

/// The fields of an income row that the caller supplies. The ID is assigned by the database.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct NewIncome {
    pub(crate) person: String,
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) recurring: bool,
}

/// The fields of an expense row that the caller supplies.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct NewExpense {
    pub(crate) category: String,
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) recurring: bool,
}
