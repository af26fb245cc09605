//! Month lifecycle: checking whether a month has been started, and starting it.

use crate::args::{PeriodArgs, StartMonthArgs};
use crate::commands::{select_period, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::Period;
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The outcome of starting a month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthStart {
    pub period: Period,
    /// True if the month had already been started, in which case nothing was written.
    pub already_initialized: bool,
    pub carried_income: u64,
    pub carried_expense: u64,
}

/// Reports whether the selected month has been started.
pub async fn month_status(config: Config, args: PeriodArgs) -> Result<Out<bool>> {
    let period = select_period(&config, &args)?;
    let initialized = config
        .db()
        .is_initialized(&period.period_ref())
        .await
        .pub_result(ErrorType::Database)?;
    let message = if initialized {
        format!("{period} has been started")
    } else {
        format!("{period} has not been started")
    };
    Ok(Out::new(message, initialized))
}

/// Starts the selected month.
///
/// When `carry_income` is set, each distinct recurring income (by person, category, description
/// and amount) found in any month is copied into the new month. `carry_expense` does the same for
/// expenses (by category, description and amount). The copies are flagged recurring.
///
/// Starting a month that was already started does nothing, so recurring entries are never copied
/// twice into the same month. The marker and the copies are written in a single transaction.
///
/// # Errors
///
/// - Returns a validation error if the year is outside of the configured window.
/// - Returns a database error if any write fails; nothing is written in that case.
pub async fn start_month(config: Config, args: StartMonthArgs) -> Result<Out<MonthStart>> {
    let period = select_period(&config, &args.period)?;
    let carried = config
        .db()
        .initialize_period(&period, args.carry_income, args.carry_expense)
        .await
        .pub_result(ErrorType::Database)?;

    let Some(carried) = carried else {
        let start = MonthStart {
            period,
            already_initialized: true,
            carried_income: 0,
            carried_expense: 0,
        };
        return Ok(Out::new(format!("{period} was already started"), start));
    };

    info!(
        "Started {period} with {} recurring income and {} recurring expense entries",
        carried.income, carried.expense
    );
    let start = MonthStart {
        period,
        already_initialized: false,
        carried_income: carried.income,
        carried_expense: carried.expense,
    };
    let message = format!(
        "Started {period}: carried {} income and {} expense entr{}",
        carried.income,
        carried.expense,
        if carried.expense == 1 { "y" } else { "ies" }
    );
    Ok(Out::new(message, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::SummaryArgs;
    use crate::commands::{list_expense, list_income, summary};
    use crate::model::Amount;
    use crate::test::TestEnv;
    use chrono::Month;
    use std::collections::BTreeSet;

    fn start_args(
        month: Month,
        year: i32,
        carry_income: bool,
        carry_expense: bool,
    ) -> StartMonthArgs {
        StartMonthArgs {
            period: PeriodArgs::new(month, year),
            carry_income,
            carry_expense,
        }
    }

    #[tokio::test]
    async fn test_month_status() {
        let env = TestEnv::new().await;
        let args = PeriodArgs::new(Month::July, 2025);
        let out = month_status(env.config(), args.clone()).await.unwrap();
        assert_eq!(out.structure(), Some(&false));
        assert!(out.message().contains("has not been started"));

        start_month(env.config(), start_args(Month::July, 2025, false, false))
            .await
            .unwrap();
        let out = month_status(env.config(), args).await.unwrap();
        assert_eq!(out.structure(), Some(&true));
    }

    #[tokio::test]
    async fn test_start_month_carries_distinct_recurring_income() {
        let env = TestEnv::new().await;
        let may = env.start_month(Month::May, 2025).await;
        let june = env.start_month(Month::June, 2025).await;

        // The same salary template appears in two months; it must be carried once
        env.add_income(&may, "Person 1", "Salary", "Job", "3000", true).await;
        env.add_income(&june, "Person 1", "Salary", "Job", "3000", true).await;
        env.add_income(&june, "Person 2", "Extra", "Freelance", "500", true).await;
        // Not recurring, never carried
        env.add_income(&june, "Person 2", "Extra", "Bonus", "999", false).await;

        let out = start_month(env.config(), start_args(Month::July, 2025, true, false))
            .await
            .unwrap();
        let start = out.structure().unwrap();
        assert!(!start.already_initialized);
        assert_eq!(start.carried_income, 2);
        assert_eq!(start.carried_expense, 0);

        let july = list_income(env.config(), PeriodArgs::new(Month::July, 2025))
            .await
            .unwrap();
        let rows = &july.structure().unwrap().entries;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.recurring && r.period_ref == "July-2025"));
        let descriptions: BTreeSet<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, BTreeSet::from(["Freelance", "Job"]));

        let args = SummaryArgs {
            period: PeriodArgs::new(Month::July, 2025),
        };
        let summary = summary(env.config(), args).await.unwrap();
        assert_eq!(
            summary.structure().unwrap().total_income,
            Amount::from(3500)
        );
    }

    #[tokio::test]
    async fn test_start_month_carries_recurring_expenses() {
        let env = TestEnv::new().await;
        let june = env.start_month(Month::June, 2025).await;
        env.add_expense(&june, "Rent", "Flat", "1200", true).await;
        env.add_expense(&june, "Groceries", "", "400", false).await;

        let out = start_month(env.config(), start_args(Month::July, 2025, false, true))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().carried_expense, 1);
        assert_eq!(out.structure().unwrap().carried_income, 0);

        let july = list_expense(env.config(), PeriodArgs::new(Month::July, 2025))
            .await
            .unwrap();
        let rows = &july.structure().unwrap().entries;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Rent");
        assert_eq!(rows[0].amount, Amount::from(1200));
    }

    #[tokio::test]
    async fn test_start_month_twice_is_a_no_op() {
        let env = TestEnv::new().await;
        let june = env.start_month(Month::June, 2025).await;
        env.add_income(&june, "Person 1", "Salary", "Job", "3000", true).await;

        start_month(env.config(), start_args(Month::July, 2025, true, true))
            .await
            .unwrap();
        let again = start_month(env.config(), start_args(Month::July, 2025, true, true))
            .await
            .unwrap();
        assert!(again.structure().unwrap().already_initialized);
        assert!(again.message().contains("already started"));

        let july = list_income(env.config(), PeriodArgs::new(Month::July, 2025))
            .await
            .unwrap();
        assert_eq!(july.structure().unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn test_start_month_without_carry_copies_nothing() {
        let env = TestEnv::new().await;
        let june = env.start_month(Month::June, 2025).await;
        env.add_income(&june, "Person 1", "Salary", "Job", "3000", true).await;

        start_month(env.config(), start_args(Month::July, 2025, false, false))
            .await
            .unwrap();
        let july = list_income(env.config(), PeriodArgs::new(Month::July, 2025))
            .await
            .unwrap();
        assert!(july.structure().unwrap().entries.is_empty());
    }
}
