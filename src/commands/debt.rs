//! Installment debts. A debt whose installments have all elapsed as of the viewed month is retired,
//! which deletes it. Listing debts retires first, so a paid off debt disappears the first time a
//! started month past its term is looked at. Adding, listing and retiring all require the month to
//! have been started.

use crate::args::{AddDebtArgs, DeleteArgs, PeriodArgs};
use crate::commands::validate::{at_least_one, non_negative, required, started};
use crate::commands::{plural, select_period, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Debt, DebtStatus, NewDebt, Period};
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Every remaining debt as seen from one period, plus the ones retired while producing it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DebtReport {
    pub period: Period,
    pub debts: Vec<DebtStatus>,
    pub retired: Vec<Debt>,
}

/// Records a debt whose first installment is due in the selected month.
///
/// # Errors
///
/// - Returns a validation error if the name is blank, the total is negative, there are fewer
///   than one installments, or the month has not been started.
pub async fn add_debt(config: Config, args: AddDebtArgs) -> Result<Out<Debt>> {
    let start = select_period(&config, &args.period)?;
    let new = NewDebt {
        name: required("name", &args.name)?,
        total_amount: non_negative("total", args.total)?,
        installments: at_least_one("installment count", args.installments)?,
        start,
    };
    started(&config, &start).await?;
    let id = config
        .db()
        .insert_debt(&new)
        .await
        .pub_result(ErrorType::Database)?;

    let debt = Debt {
        id,
        name: new.name,
        total_amount: new.total_amount,
        installments: new.installments,
        start: new.start,
    };
    let message = format!(
        "Added debt '{}' (ID {id}): {} in {} installment{} of {} starting {start}",
        debt.name,
        debt.total_amount,
        debt.installments,
        plural(debt.installments as usize),
        debt.per_installment()
    );
    Ok(Out::new(message, debt))
}

/// Deletes the debts that have no installments left as of the selected month and returns them.
/// Running it again for the same month deletes nothing.
pub async fn tick(config: Config, args: PeriodArgs) -> Result<Out<Vec<Debt>>> {
    let period = select_period(&config, &args)?;
    started(&config, &period).await?;
    let (_, retired) = retire(&config, &period).await?;
    let message = format!(
        "Retired {} paid off debt{} as of {period}",
        retired.len(),
        plural(retired.len())
    );
    Ok(Out::new(message, retired))
}

/// Shows every debt as of the selected month after retiring the paid off ones.
pub async fn list_debts(config: Config, args: PeriodArgs) -> Result<Out<DebtReport>> {
    let period = select_period(&config, &args)?;
    started(&config, &period).await?;
    let (live, retired) = retire(&config, &period).await?;
    let debts: Vec<DebtStatus> = live.iter().map(|debt| debt.status(&period)).collect();

    let mut message = format!("{} debt{} as of {period}", debts.len(), plural(debts.len()));
    for d in &debts {
        message.push_str(&format!(
            "\n  [{}] {} | installment {}/{} | {} per month | {} remaining",
            d.id,
            d.name,
            d.installment_number,
            d.installments,
            d.per_installment,
            d.remaining_amount
        ));
    }
    if !retired.is_empty() {
        message.push_str(&format!(
            "\nRetired {} paid off debt{}",
            retired.len(),
            plural(retired.len())
        ));
    }

    Ok(Out::new(
        message,
        DebtReport {
            period,
            debts,
            retired,
        },
    ))
}

/// # Errors
///
/// - Returns a not found error if no debt has the ID.
pub async fn delete_debt(config: Config, args: DeleteArgs) -> Result<Out<()>> {
    let deleted = config
        .db()
        .delete_debt(args.id)
        .await
        .pub_result(ErrorType::Database)?;
    if !deleted {
        return Err(Error::not_found(format!(
            "There is no debt with ID {}",
            args.id
        )));
    }
    Ok(format!("Deleted debt {}", args.id).into())
}

/// Reads every debt once, deletes the ones paid off as of `period`, and returns the survivors
/// followed by the retired debts.
async fn retire(config: &Config, period: &Period) -> Result<(Vec<Debt>, Vec<Debt>)> {
    let db = config.db();
    let debts = db.list_debts(period).await.pub_result(ErrorType::Database)?;
    let (paid_off, live): (Vec<Debt>, Vec<Debt>) =
        debts.into_iter().partition(|d| d.is_paid_off(period));
    for debt in &paid_off {
        db.delete_debt(debt.id)
            .await
            .pub_result(ErrorType::Database)?;
        info!(
            "Debt '{}' (ID {}) is paid off as of {period} and has been removed",
            debt.name, debt.id
        );
    }
    Ok((live, paid_off))
}
