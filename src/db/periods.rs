//! Period markers and the carry-forward of recurring entries into a newly started month.

use crate::db::Db;
use crate::error::Res;
use crate::model::Period;
use anyhow::Context;
use tracing::debug;

/// How many recurring rows were copied into a newly started period.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub(crate) struct Carried {
    pub(crate) income: u64,
    pub(crate) expense: u64,
}

impl Db {
    /// Returns true if a marker exists for `period_ref`.
    pub(crate) async fn is_initialized(&self, period_ref: &str) -> Res<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM periods WHERE period_ref = ?")
            .bind(period_ref)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to look up the marker for {period_ref}"))?;
        Ok(row.is_some())
    }

    /// Creates the marker for `period` and, if requested, copies each distinct recurring income
    /// and/or expense template into it.
    ///
    /// The marker and the copies are written in one transaction. If anything fails, nothing is
    /// written. Returns `None` without writing anything when the period already has a marker.
    pub(crate) async fn initialize_period(
        &self,
        period: &Period,
        carry_income: bool,
        carry_expense: bool,
    ) -> Res<Option<Carried>> {
        let period_ref = period.period_ref();
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin the month initialization transaction")?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM periods WHERE period_ref = ?")
            .bind(&period_ref)
            .fetch_optional(&mut *tx)
            .await
            .with_context(|| format!("Failed to look up the marker for {period_ref}"))?;
        if existing.is_some() {
            debug!("{period_ref} is already initialized");
            return Ok(None);
        }

        sqlx::query("INSERT INTO periods (period_ref, year, initialized) VALUES (?, ?, 1)")
            .bind(&period_ref)
            .bind(period.year())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create the marker for {period_ref}"))?;

        let mut carried = Carried::default();

        // Grouping collapses templates that were themselves copied into many months
        if carry_income {
            carried.income = sqlx::query(
                r#"
                INSERT INTO incomes (month, period_ref, person, category, description, amount, recurring)
                SELECT ?, ?, person, category, description, amount, 1
                FROM incomes
                WHERE recurring = 1
                GROUP BY person, category, description, amount
                ORDER BY MIN(id)
                "#,
            )
            .bind(period.month_name())
            .bind(&period_ref)
            .execute(&mut *tx)
            .await
            .context("Failed to carry recurring income forward")?
            .rows_affected();
        }

        if carry_expense {
            carried.expense = sqlx::query(
                r#"
                INSERT INTO expenses (month, period_ref, category, description, amount, recurring)
                SELECT ?, ?, category, description, amount, 1
                FROM expenses
                WHERE recurring = 1
                GROUP BY category, description, amount
                ORDER BY MIN(id)
                "#,
            )
            .bind(period.month_name())
            .bind(&period_ref)
            .execute(&mut *tx)
            .await
            .context("Failed to carry recurring expenses forward")?
            .rows_affected();
        }

        tx.commit()
            .await
            .context("Failed to commit the month initialization transaction")?;

        debug!(
            "Initialized {period_ref}, carried {} income and {} expense rows",
            carried.income, carried.expense
        );
        Ok(Some(carried))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Period;
    use crate::test::TestEnv;
    use chrono::Month;

    #[tokio::test]
    async fn test_initialize_creates_marker() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        let july = Period::new(Month::July, 2025);

        assert!(!db.is_initialized("July-2025").await.unwrap());
        let carried = db.initialize_period(&july, true, true).await.unwrap();
        assert_eq!(carried.unwrap().income, 0);
        assert!(db.is_initialized("July-2025").await.unwrap());

        // A second call writes nothing
        assert!(db.initialize_period(&july, true, true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_carry_rolls_back_marker() {
        let env = TestEnv::new().await;
        let db = env.config().db().clone();
        sqlx::query("DROP TABLE expenses")
            .execute(db.pool())
            .await
            .unwrap();

        let august = Period::new(Month::August, 2025);
        assert!(db.initialize_period(&august, false, true).await.is_err());
        assert!(!db.is_initialized("August-2025").await.unwrap());
    }
}
