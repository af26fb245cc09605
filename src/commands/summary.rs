use crate::args::SummaryArgs;
use crate::commands::{select_period, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, Summary};
use crate::{Config, Result};
use anyhow::Context;
use tracing::warn;

/// Computes the totals of the selected month and its net balance:
/// `income - expenses - debt installments`.
///
/// The debt total is one installment of every debt that exists right now, whether or not the month
/// falls inside the debt's term. Nothing is retired here; use `household debt list` or
/// `household debt tick` for that.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<Summary>> {
    let period = select_period(&config, &args.period)?;
    let db = config.db();
    let period_ref = period.period_ref();

    let income = db
        .total_income(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;
    let expense = db
        .total_expense(&period_ref)
        .await
        .pub_result(ErrorType::Database)?;
    let debts = db
        .list_debts(&period)
        .await
        .pub_result(ErrorType::Database)?;
    let debt = Amount::checked_sum(debts.iter().map(|d| d.per_installment()))
        .context("The debt installments add up to more than the largest supported value")
        .pub_result(ErrorType::Database)?;

    let summary =
        Summary::new(period, income, expense, debt).pub_result(ErrorType::Database)?;
    if summary.is_negative() {
        warn!(
            "The balance for {period} is negative: {}",
            summary.net_balance
        );
    }

    let mut message = format!(
        "Summary for {period}\n  Income:   {}\n  Expenses: {}\n  Debts:    {}\n  Balance:  {}",
        summary.total_income,
        summary.total_expense,
        summary.total_debt_installment,
        summary.net_balance
    );
    if let Some(shares) = summary.breakdown() {
        let parts: Vec<String> = shares
            .iter()
            .map(|s| format!("{} {}%", s.label, s.percent))
            .collect();
        message.push_str(&format!("\n  Breakdown: {}", parts.join(", ")));
    }
    Ok(Out::new(message, summary))
}
