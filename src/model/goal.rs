//! Savings goals.

use crate::model::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A savings goal. `saved_amount` only ever grows and may exceed `target_amount`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Amount,
    pub deadline_months: u32,
    pub saved_amount: Amount,
    pub start_date: NaiveDate,
}

/// The fields of a goal that the caller supplies.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct NewGoal {
    pub(crate) name: String,
    pub(crate) target_amount: Amount,
    pub(crate) deadline_months: u32,
    pub(crate) start_date: NaiveDate,
}

impl Goal {
    /// `saved / target`, unclamped, so over-saving shows as more than 1. Zero when the target is
    /// zero.
    pub fn progress(&self) -> Decimal {
        self.saved_amount.ratio(self.target_amount)
    }

    /// Progress clamped to `[0, 1]` for a progress bar.
    pub fn display_progress(&self) -> Decimal {
        self.progress().clamp(Decimal::ZERO, Decimal::ONE)
    }

    /// How much is still needed to reach the target, never negative.
    pub fn missing_amount(&self) -> Amount {
        self.target_amount
            .checked_sub(self.saved_amount)
            .map_or(Amount::ZERO, Amount::or_zero)
    }
}

/// A goal along with its derived progress, as listed to the user.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GoalStatus {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: Decimal,
    pub display_progress: Decimal,
    pub missing_amount: Amount,
}

impl From<Goal> for GoalStatus {
    fn from(goal: Goal) -> Self {
        Self {
            progress: goal.progress(),
            display_progress: goal.display_progress(),
            missing_amount: goal.missing_amount(),
            goal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: u32, saved: u32) -> Goal {
        Goal {
            id: 1,
            name: "Trip".to_string(),
            target_amount: Amount::from(target),
            deadline_months: 12,
            saved_amount: Amount::from(saved),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_progress() {
        let g = goal(1000, 650);
        assert_eq!(g.progress(), Decimal::new(65, 2));
        assert_eq!(g.display_progress(), Decimal::new(65, 2));
        assert_eq!(g.missing_amount(), Amount::from(350));
    }

    #[test]
    fn test_over_saving_is_clamped_only_for_display() {
        let g = goal(1000, 1500);
        assert_eq!(g.progress(), Decimal::new(15, 1));
        assert_eq!(g.display_progress(), Decimal::ONE);
        assert_eq!(g.missing_amount(), Amount::ZERO);
    }

    #[test]
    fn test_zero_target() {
        let g = goal(0, 20);
        assert_eq!(g.progress(), Decimal::ZERO);
        assert_eq!(g.display_progress(), Decimal::ZERO);
    }
}
