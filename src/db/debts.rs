//! Debt rows.

use crate::db::Db;
use crate::error::Res;
use crate::model::{Amount, Debt, NewDebt, Period};
use anyhow::Context;

#[derive(sqlx::FromRow)]
struct DebtRow {
    id: i64,
    name: String,
    total_amount: String,
    installments: i64,
    start_month: Option<String>,
    start_year: Option<i32>,
}

impl DebtRow {
    fn into_debt(self, viewed: &Period) -> Res<Debt> {
        let installments = u32::try_from(self.installments)
            .ok()
            .filter(|n| *n >= 1)
            .with_context(|| {
                format!(
                    "Debt {} has an invalid installment count {}",
                    self.id, self.installments
                )
            })?;
        Ok(Debt::from_stored(
            self.id,
            self.name,
            Amount::from_db(&self.total_amount)?,
            installments,
            self.start_month.as_deref(),
            self.start_year,
            viewed,
        ))
    }
}

impl Db {
    pub(crate) async fn insert_debt(&self, debt: &NewDebt) -> Res<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO debts (name, total_amount, installments, start_month, start_year)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&debt.name)
        .bind(debt.total_amount.to_db())
        .bind(debt.installments)
        .bind(debt.start.month_name())
        .bind(debt.start.year())
        .execute(&self.pool)
        .await
        .context("Failed to insert debt")?;
        Ok(result.last_insert_rowid())
    }

    /// Lists every debt in insertion order. `viewed` is the period the caller is looking at; it
    /// stands in for the start of legacy rows that lack one.
    pub(crate) async fn list_debts(&self, viewed: &Period) -> Res<Vec<Debt>> {
        let rows: Vec<DebtRow> = sqlx::query_as(
            r#"
            SELECT id, name, total_amount, installments, start_month, start_year
            FROM debts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list debts")?;
        rows.into_iter().map(|row| row.into_debt(viewed)).collect()
    }

    /// Deletes a debt. Returns false if no row had that ID.
    pub(crate) async fn delete_debt(&self, id: i64) -> Res<bool> {
        let result = sqlx::query("DELETE FROM debts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete debt {id}"))?;
        Ok(result.rows_affected() > 0)
    }
}
