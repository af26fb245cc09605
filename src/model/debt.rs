//! Debts paid off in equal monthly installments, and the amortization math over them.
//!
//! Nothing about a debt's progress is stored. Given the period being viewed, the number of elapsed
//! installments is derived from the debt's start period, and from that the remaining balance.

use crate::model::period::canonical_month;
use crate::model::{Amount, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::min;
use tracing::warn;

/// A debt as stored.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: i64,
    pub name: String,
    pub total_amount: Amount,
    /// Always at least one.
    pub installments: u32,
    /// The period in which the first installment is due.
    pub start: Period,
}

/// The fields of a debt that the caller supplies.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct NewDebt {
    pub(crate) name: String,
    pub(crate) total_amount: Amount,
    pub(crate) installments: u32,
    pub(crate) start: Period,
}

/// The state of a debt as seen from one period.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DebtStatus {
    pub id: i64,
    pub name: String,
    /// The installment due in the viewed period, 1-based, e.g. the `4` in `4/12`.
    pub installment_number: u32,
    pub installments: u32,
    pub elapsed: u32,
    pub per_installment: Amount,
    pub remaining_installments: u32,
    pub remaining_amount: Amount,
    /// Fraction of the term that has elapsed, capped at 1.
    pub progress: Decimal,
}

impl Debt {
    /// Rebuilds a debt from stored columns. Old databases may hold rows without a start year or
    /// with a start month that is not one of the twelve canonical names. Those are repaired with
    /// the `viewed` period's month and year. The repair is lossy: the real start is unknown.
    pub(crate) fn from_stored(
        id: i64,
        name: String,
        total_amount: Amount,
        installments: u32,
        start_month: Option<&str>,
        start_year: Option<i32>,
        viewed: &Period,
    ) -> Self {
        let month = match start_month.and_then(canonical_month) {
            Some(month) => month,
            None => {
                warn!(
                    "Debt {id} '{name}' has an invalid start month {start_month:?}, using {}",
                    viewed.month_name()
                );
                viewed.month()
            }
        };
        let year = match start_year {
            Some(year) => year,
            None => {
                warn!(
                    "Debt {id} '{name}' has no start year, using {}",
                    viewed.year()
                );
                viewed.year()
            }
        };
        Self {
            id,
            name,
            total_amount,
            installments,
            start: Period::new(month, year),
        }
    }

    /// The amount of one installment: `total / installments`.
    pub fn per_installment(&self) -> Amount {
        self.total_amount / self.installments
    }

    /// Months between the start period and `period`, never negative.
    pub fn elapsed(&self, period: &Period) -> u32 {
        let months = period.months_since(&self.start).max(0);
        u32::try_from(months).unwrap_or(u32::MAX)
    }

    pub fn remaining_installments(&self, period: &Period) -> u32 {
        self.installments.saturating_sub(self.elapsed(period))
    }

    pub fn remaining_amount(&self, period: &Period) -> Amount {
        // Rounding in `per_installment` can push the product past the total only at the very top
        // of the decimal range, where the total itself is the right answer.
        self.per_installment()
            .checked_mul(self.remaining_installments(period))
            .unwrap_or(self.total_amount)
    }

    /// The 1-based installment due in `period`, never past the last one.
    pub fn installment_number(&self, period: &Period) -> u32 {
        min(self.elapsed(period).saturating_add(1), self.installments)
    }

    /// True once every installment has elapsed. Such debts are retired.
    pub fn is_paid_off(&self, period: &Period) -> bool {
        self.remaining_installments(period) == 0
    }

    pub fn status(&self, period: &Period) -> DebtStatus {
        let elapsed = self.elapsed(period);
        let progress = Decimal::from(elapsed)
            .checked_div(Decimal::from(self.installments))
            .unwrap_or(Decimal::ZERO)
            .min(Decimal::ONE);
        DebtStatus {
            id: self.id,
            name: self.name.clone(),
            installment_number: self.installment_number(period),
            installments: self.installments,
            elapsed,
            per_installment: self.per_installment(),
            remaining_installments: self.remaining_installments(period),
            remaining_amount: self.remaining_amount(period),
            progress,
        }
    }
}
