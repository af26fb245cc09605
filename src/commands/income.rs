use crate::args::{AddIncomeArgs, DeleteArgs, PeriodArgs};
use crate::commands::validate::{non_negative, one_of, required, started};
use crate::commands::{select_period, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Income, NewIncome, Period};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The income entries of one period and their total.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct IncomeReport {
    pub period: Period,
    pub entries: Vec<Income>,
    pub total: Amount,
}

/// Records an income entry in the selected month.
///
/// # Errors
///
/// - Returns a validation error if the person or category is missing or not configured, if the
///   amount is negative, or if the month has not been started.
pub async fn add_income(config: Config, args: AddIncomeArgs) -> Result<Out<Income>> {
    let period = select_period(&config, &args.period)?;
    let person = required("person", &args.person)?;
    let category = required("category", &args.category)?;
    one_of("person", &person, config.people())?;
    one_of("income category", &category, config.income_categories())?;
    let amount = non_negative("amount", args.amount)?;
    started(&config, &period).await?;

    let new = NewIncome {
        person,
        category,
        description: args.description.trim().to_string(),
        amount,
        recurring: args.recurring,
    };
    let id = config
        .db()
        .insert_income(&period, &new)
        .await
        .pub_result(ErrorType::Database)?;
    debug!("Inserted income {id} into {period}");

    let income = Income {
        id,
        month: period.month_name().to_string(),
        period_ref: period.period_ref(),
        person: new.person,
        category: new.category,
        description: new.description,
        amount: new.amount,
        recurring: new.recurring,
    };
    let message = format!(
        "Added {} income of {} for {} to {period} (ID {id})",
        income.category, income.amount, income.person
    );
    Ok(Out::new(message, income))
}

/// Lists the income entries of the selected month in the order they were added.
pub async fn list_income(config: Config, args: PeriodArgs) -> Result<Out<IncomeReport>> {
    let period = select_period(&config, &args)?;
    let db = config.db();
    let period_ref = period.period_ref();
    let entries = db
        .list_income(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;
    let total = db
        .total_income(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;

    let mut message = format!(
        "{} income entr{} in {period}, total {total}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    );
    for e in &entries {
        message.push_str(&format!(
            "\n  [{}] {} | {} | {} | {}{}",
            e.id,
            e.person,
            e.category,
            e.description,
            e.amount,
            if e.recurring { " (recurring)" } else { "" }
        ));
    }
    Ok(Out::new(
        message,
        IncomeReport {
            period,
            entries,
            total,
        },
    ))
}

/// Deletes an income entry by ID.
///
/// # Errors
///
/// - Returns a not found error if no income entry has the ID.
pub async fn delete_income(config: Config, args: DeleteArgs) -> Result<Out<()>> {
    let deleted = config
        .db()
        .delete_income(args.id)
        .await
        .pub_result(ErrorType::Database)?;
    if !deleted {
        return Err(Error::not_found(format!(
            "There is no income entry with ID {}",
            args.id
        )));
    }
    Ok(format!("Deleted income entry {}", args.id).into())
}
