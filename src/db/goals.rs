//! Savings goal rows.

use crate::db::Db;
use crate::error::Res;
use crate::model::{Amount, Goal, NewGoal};
use anyhow::Context;
use chrono::NaiveDate;

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: i64,
    name: String,
    target_amount: String,
    deadline_months: i64,
    saved_amount: String,
    start_date: String,
}

impl TryFrom<GoalRow> for Goal {
    type Error = anyhow::Error;

    fn try_from(row: GoalRow) -> Res<Self> {
        let deadline_months = u32::try_from(row.deadline_months).with_context(|| {
            format!(
                "Goal {} has an invalid deadline {}",
                row.id, row.deadline_months
            )
        })?;
        let start_date = NaiveDate::parse_from_str(&row.start_date, "%Y-%m-%d")
            .with_context(|| format!("Goal {} has an invalid start date", row.id))?;
        Ok(Goal {
            id: row.id,
            name: row.name,
            target_amount: Amount::from_db(&row.target_amount)?,
            deadline_months,
            saved_amount: Amount::from_db(&row.saved_amount)?,
            start_date,
        })
    }
}

const SELECT_GOALS: &str = r#"
    SELECT id, name, target_amount, deadline_months, saved_amount, start_date
    FROM goals
"#;

impl Db {
    pub(crate) async fn insert_goal(&self, goal: &NewGoal) -> Res<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO goals (name, target_amount, deadline_months, saved_amount, start_date)
            VALUES (?, ?, ?, '0', ?)
            "#,
        )
        .bind(&goal.name)
        .bind(goal.target_amount.to_db())
        .bind(goal.deadline_months)
        .bind(goal.start_date.format("%Y-%m-%d").to_string())
        .execute(&self.pool)
        .await
        .context("Failed to insert goal")?;
        Ok(result.last_insert_rowid())
    }

    pub(crate) async fn list_goals(&self) -> Res<Vec<Goal>> {
        let rows: Vec<GoalRow> = sqlx::query_as(&format!("{SELECT_GOALS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list goals")?;
        rows.into_iter().map(Goal::try_from).collect()
    }

    /// Adds `amount` to a goal's saved amount and returns the updated goal, or `None` if no goal
    /// has that ID. The read and the write happen in one transaction.
    pub(crate) async fn add_to_goal(&self, id: i64, amount: Amount) -> Res<Option<Goal>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin the contribution transaction")?;

        let row: Option<GoalRow> = sqlx::query_as(&format!("{SELECT_GOALS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .with_context(|| format!("Failed to look up goal {id}"))?;
        let mut goal = match row {
            Some(row) => Goal::try_from(row)?,
            None => return Ok(None),
        };

        goal.saved_amount = goal
            .saved_amount
            .checked_add(amount)
            .with_context(|| format!("The saved amount of goal {id} would overflow"))?;
        sqlx::query("UPDATE goals SET saved_amount = ? WHERE id = ?")
            .bind(goal.saved_amount.to_db())
            .bind(id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to update goal {id}"))?;

        tx.commit()
            .await
            .context("Failed to commit the contribution transaction")?;
        Ok(Some(goal))
    }
}
