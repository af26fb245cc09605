use crate::args::{AddExpenseArgs, DeleteArgs, PeriodArgs};
use crate::commands::validate::{non_negative, one_of, required, started};
use crate::commands::{select_period, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Expense, NewExpense, Period};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The expense entries of one period and their total.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub period: Period,
    pub entries: Vec<Expense>,
    pub total: Amount,
}

/// Records an expense entry in the selected month. The month must have been started.
pub async fn add_expense(config: Config, args: AddExpenseArgs) -> Result<Out<Expense>> {
    let period = select_period(&config, &args.period)?;
    let category = required("category", &args.category)?;
    one_of("expense category", &category, config.expense_categories())?;
    let amount = non_negative("amount", args.amount)?;
    started(&config, &period).await?;

    let new = NewExpense {
        category,
        description: args.description.trim().to_string(),
        amount,
        recurring: args.recurring,
    };
    let id = config
        .db()
        .insert_expense(&period, &new)
        .await
        .pub_result(ErrorType::Database)?;
    debug!("Inserted expense {id} into {period}");

    let expense = Expense {
        id,
        month: period.month_name().to_string(),
        period_ref: period.period_ref(),
        category: new.category,
        description: new.description,
        amount: new.amount,
        recurring: new.recurring,
    };
    let message = format!(
        "Added {} expense of {} to {period} (ID {id})",
        expense.category, expense.amount
    );
    Ok(Out::new(message, expense))
}

pub async fn list_expense(config: Config, args: PeriodArgs) -> Result<Out<ExpenseReport>> {
    let period = select_period(&config, &args)?;
    let db = config.db();
    let period_ref = period.period_ref();
    let entries = db
        .list_expense(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;
    let total = db
        .total_expense(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;

    let mut message = format!(
        "{} expense entr{} in {period}, total {total}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    );
    for e in &entries {
        message.push_str(&format!(
            "\n  [{}] {} | {} | {}{}",
            e.id,
            e.category,
            e.description,
            e.amount,
            if e.recurring { " (recurring)" } else { "" }
        ));
    }
    Ok(Out::new(
        message,
        ExpenseReport {
            period,
            entries,
            total,
        },
    ))
}

pub async fn delete_expense(config: Config, args: DeleteArgs) -> Result<Out<()>> {
    let deleted = config
        .db()
        .delete_expense(args.id)
        .await
        .pub_result(ErrorType::Database)?;
    if !deleted {
        return Err(Error::not_found(format!(
            "There is no expense entry with ID {}",
            args.id
        )));
    }
    Ok(format!("Deleted expense entry {}", args.id).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use chrono::Month;
    use std::str::FromStr;

    fn add_args(category: &str, amount: &str, recurring: bool) -> AddExpenseArgs {
        AddExpenseArgs {
            period: PeriodArgs::new(Month::June, 2025),
            category: category.to_string(),
            description: String::new(),
            amount: Amount::from_str(amount).unwrap(),
            recurring,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_expense() {
        let env = TestEnv::new().await;
        env.start_month(Month::June, 2025).await;
        add_expense(env.config(), add_args("Rent", "1200", true))
            .await
            .unwrap();
        add_expense(env.config(), add_args("Groceries", "$450.10", false))
            .await
            .unwrap();

        let out = list_expense(env.config(), PeriodArgs::new(Month::June, 2025))
            .await
            .unwrap();
        let report = out.structure().unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].category, "Rent");
        assert!(report.entries[0].recurring);
        assert_eq!(report.total, Amount::from_str("1650.10").unwrap());

        // Other months are unaffected
        let out = list_expense(env.config(), PeriodArgs::new(Month::July, 2025))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap().total, Amount::ZERO);
    }

    #[tokio::test]
    async fn test_add_expense_rejects_bad_input() {
        let env = TestEnv::new().await;
        env.start_month(Month::June, 2025).await;

        let err = add_expense(env.config(), add_args("Travel", "10", false))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.to_string().contains("not a valid expense category"));

        let err = add_expense(env.config(), add_args("Rent", "-1", false))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }

    #[tokio::test]
    async fn test_add_expense_requires_started_month() {
        let env = TestEnv::new().await;
        let err = add_expense(env.config(), add_args("Rent", "10", false))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }

    #[tokio::test]
    async fn test_delete_unknown_expense() {
        let env = TestEnv::new().await;
        let err = delete_expense(env.config(), DeleteArgs::new(42))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }
}
