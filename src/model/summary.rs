//! The monthly summary: income minus expenses minus debt installments.

use crate::error::Res;
use crate::model::{Amount, Period};
use anyhow::Context;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals for one period.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub period: Period,
    pub total_income: Amount,
    pub total_expense: Amount,
    /// One installment of every debt that currently exists, regardless of whether the period falls
    /// inside the debt's term.
    pub total_debt_installment: Amount,
    pub net_balance: Amount,
}

/// One slice of the income / expense / debt breakdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: String,
    pub amount: Amount,
    /// Percent of the sum of all slices, rounded to one decimal place.
    pub percent: Decimal,
}

impl Summary {
    /// Fails if the balance does not fit in a `Decimal`.
    pub(crate) fn new(
        period: Period,
        total_income: Amount,
        total_expense: Amount,
        total_debt_installment: Amount,
    ) -> Res<Self> {
        let net_balance = total_income
            .checked_sub(total_expense)
            .and_then(|a| a.checked_sub(total_debt_installment))
            .with_context(|| format!("The balance for {period} is too large to compute"))?;
        Ok(Self {
            period,
            total_income,
            total_expense,
            total_debt_installment,
            net_balance,
        })
    }

    pub fn is_negative(&self) -> bool {
        self.net_balance.is_negative()
    }

    /// The share of income, expenses and debt installments in their sum. Returns `None` when all
    /// three are zero since there is nothing to chart.
    pub fn breakdown(&self) -> Option<Vec<Share>> {
        let labels = ["Income", "Expenses", "Debts"];
        let amounts = [
            self.total_income,
            self.total_expense,
            self.total_debt_installment,
        ];
        // Scale down by three when the slices cannot be added as they are; the ratios stay the same
        let (parts, whole) = match Amount::checked_sum(amounts) {
            Some(whole) => (amounts, whole),
            None => {
                let thirds = amounts.map(|a| a / 3);
                (thirds, Amount::checked_sum(thirds)?)
            }
        };
        if whole.is_zero() {
            return None;
        }
        Some(
            labels
                .iter()
                .zip(amounts.iter().zip(parts.iter()))
                .map(|(label, (amount, part))| Share {
                    label: label.to_string(),
                    amount: *amount,
                    percent: (part.ratio(whole) * Decimal::ONE_HUNDRED).round_dp(1),
                })
                .collect(),
        )
    }
}
