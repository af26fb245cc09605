//! Types that represent the core data model, such as `Income`, `Debt` and `Goal`, along with the
//! arithmetic derived from them.
mod amount;
mod debt;
mod entry;
mod goal;
mod period;
mod summary;

pub use amount::{Amount, AmountError};
pub use debt::{Debt, DebtStatus};
pub use entry::{Expense, Income};
pub use goal::{Goal, GoalStatus};
pub use period::{parse_month, Period};
pub use summary::{Share, Summary};

pub(crate) use debt::NewDebt;
pub(crate) use entry::{NewExpense, NewIncome};
pub(crate) use goal::NewGoal;
