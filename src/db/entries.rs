//! Income and expense rows.

use crate::db::Db;
use crate::error::Res;
use crate::model::{Amount, Expense, Income, NewExpense, NewIncome, Period};
use anyhow::Context;

#[derive(sqlx::FromRow)]
struct IncomeRow {
    id: i64,
    month: String,
    period_ref: String,
    person: String,
    category: String,
    description: String,
    amount: String,
    recurring: bool,
}

impl TryFrom<IncomeRow> for Income {
    type Error = anyhow::Error;

    fn try_from(row: IncomeRow) -> Res<Self> {
        Ok(Income {
            id: row.id,
            month: row.month,
            period_ref: row.period_ref,
            person: row.person,
            category: row.category,
            description: row.description,
            amount: Amount::from_db(&row.amount)?,
            recurring: row.recurring,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ExpenseRow {
    id: i64,
    month: String,
    period_ref: String,
    category: String,
    description: String,
    amount: String,
    recurring: bool,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = anyhow::Error;

    fn try_from(row: ExpenseRow) -> Res<Self> {
        Ok(Expense {
            id: row.id,
            month: row.month,
            period_ref: row.period_ref,
            category: row.category,
            description: row.description,
            amount: Amount::from_db(&row.amount)?,
            recurring: row.recurring,
        })
    }
}

impl Db {
    /// Inserts an income row into `period` and returns its ID.
    pub(crate) async fn insert_income(&self, period: &Period, income: &NewIncome) -> Res<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO incomes (month, period_ref, person, category, description, amount, recurring)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.month_name())
        .bind(period.period_ref())
        .bind(&income.person)
        .bind(&income.category)
        .bind(&income.description)
        .bind(income.amount.to_db())
        .bind(income.recurring)
        .execute(&self.pool)
        .await
        .context("Failed to insert income")?;
        Ok(result.last_insert_rowid())
    }

    /// Lists the income rows of one period in insertion order.
    pub(crate) async fn list_income(&self, period_ref: &str) -> Res<Vec<Income>> {
        let rows: Vec<IncomeRow> = sqlx::query_as(
            r#"
            SELECT id, month, period_ref, person, category, description, amount, recurring
            FROM incomes
            WHERE period_ref = ?
            ORDER BY id
            "#,
        )
        .bind(period_ref)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list income for {period_ref}"))?;
        rows.into_iter().map(Income::try_from).collect()
    }

    /// Deletes an income row. Returns false if no row had that ID.
    pub(crate) async fn delete_income(&self, id: i64) -> Res<bool> {
        let result = sqlx::query("DELETE FROM incomes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete income {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    /// The sum of all income in a period, zero if there is none.
    pub(crate) async fn total_income(&self, period_ref: &str) -> Res<Amount> {
        let amounts: Vec<(String,)> = sqlx::query_as("SELECT amount FROM incomes WHERE period_ref = ?")
            .bind(period_ref)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to total income for {period_ref}"))?;
        sum(amounts)
    }

    /// Inserts an expense row into `period` and returns its ID.
    pub(crate) async fn insert_expense(&self, period: &Period, expense: &NewExpense) -> Res<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (month, period_ref, category, description, amount, recurring)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.month_name())
        .bind(period.period_ref())
        .bind(&expense.category)
        .bind(&expense.description)
        .bind(expense.amount.to_db())
        .bind(expense.recurring)
        .execute(&self.pool)
        .await
        .context("Failed to insert expense")?;
        Ok(result.last_insert_rowid())
    }

    /// Lists the expense rows of one period in insertion order.
    pub(crate) async fn list_expense(&self, period_ref: &str) -> Res<Vec<Expense>> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            r#"
            SELECT id, month, period_ref, category, description, amount, recurring
            FROM expenses
            WHERE period_ref = ?
            ORDER BY id
            "#,
        )
        .bind(period_ref)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to list expenses for {period_ref}"))?;
        rows.into_iter().map(Expense::try_from).collect()
    }

    /// Deletes an expense row. Returns false if no row had that ID.
    pub(crate) async fn delete_expense(&self, id: i64) -> Res<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete expense {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    /// The sum of all expenses in a period, zero if there are none.
    pub(crate) async fn total_expense(&self, period_ref: &str) -> Res<Amount> {
        let amounts: Vec<(String,)> =
            sqlx::query_as("SELECT amount FROM expenses WHERE period_ref = ?")
                .bind(period_ref)
                .fetch_all(&self.pool)
                .await
                .with_context(|| format!("Failed to total expenses for {period_ref}"))?;
        sum(amounts)
    }
}

/// Amounts are stored as decimal text, so they are summed here rather than with SQL `SUM`.
fn sum(amounts: Vec<(String,)>) -> Res<Amount> {
    let mut total = Amount::ZERO;
    for (s,) in &amounts {
        total = total
            .checked_add(Amount::from_db(s)?)
            .context("The amounts add up to more than the largest supported value")?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use chrono::Month;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_income_is_scoped_to_period() {
        let env = TestEnv::new().await;
        let july = env.start_month(Month::July, 2025).await;
        let august = env.start_month(Month::August, 2025).await;
        let db = env.config().db().clone();

        let new = NewIncome {
            person: "Person 1".to_string(),
            category: "Salary".to_string(),
            description: "".to_string(),
            amount: Amount::from_str("2500.50").unwrap(),
            recurring: false,
        };
        let id = db.insert_income(&july, &new).await.unwrap();
        db.insert_income(&august, &new).await.unwrap();

        let listed = db.list_income("July-2025").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].month, "July");
        assert_eq!(listed[0].amount, new.amount);
        assert_eq!(
            db.total_income("July-2025").await.unwrap(),
            Amount::from_str("2500.5").unwrap()
        );
        assert_eq!(db.total_income("May-2025").await.unwrap(), Amount::ZERO);
    }

    #[tokio::test]
    async fn test_delete_expense_reports_missing_rows() {
        let env = TestEnv::new().await;
        let july = env.start_month(Month::July, 2025).await;
        let db = env.config().db().clone();
        let new = NewExpense {
            category: "Rent".to_string(),
            description: "Flat".to_string(),
            amount: Amount::from(900),
            recurring: true,
        };
        let id = db.insert_expense(&july, &new).await.unwrap();

        assert!(db.delete_expense(id).await.unwrap());
        assert!(!db.delete_expense(id).await.unwrap());
        assert!(db.list_expense("July-2025").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_total_overflow_is_an_error() {
        let env = TestEnv::new().await;
        let june = env.start_month(Month::June, 2025).await;
        let huge = "50000000000000000000000000000";
        env.add_income(&june, "Person 1", "Salary", "", huge, false).await;
        env.add_income(&june, "Person 2", "Salary", "", huge, false).await;
        env.add_expense(&june, "Rent", "", huge, false).await;
        env.add_expense(&june, "Rent", "", huge, false).await;

        let db = env.config().db().clone();
        let err = db.total_income("June-2025").await.unwrap_err();
        assert!(format!("{err:#}").contains("largest supported value"));
        assert!(db.total_expense("June-2025").await.is_err());
    }
}
