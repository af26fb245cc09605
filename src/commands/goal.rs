use crate::args::{AddGoalArgs, ContributeArgs};
use crate::commands::validate::{at_least_one, non_negative, required};
use crate::commands::{plural, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Goal, GoalStatus, NewGoal};
use crate::{Config, Result};
use chrono::Local;
use rust_decimal::Decimal;
use tracing::info;

/// Creates a savings goal starting today with nothing saved.
pub async fn add_goal(config: Config, args: AddGoalArgs) -> Result<Out<Goal>> {
    let new = NewGoal {
        name: required("name", &args.name)?,
        target_amount: non_negative("target", args.target)?,
        deadline_months: at_least_one("deadline in months", args.deadline_months)?,
        start_date: Local::now().date_naive(),
    };
    let id = config
        .db()
        .insert_goal(&new)
        .await
        .pub_result(ErrorType::Database)?;
    let goal = Goal {
        id,
        name: new.name,
        target_amount: new.target_amount,
        deadline_months: new.deadline_months,
        saved_amount: Amount::ZERO,
        start_date: new.start_date,
    };
    let message = format!(
        "Added goal '{}' (ID {id}): save {} within {} month{}",
        goal.name,
        goal.target_amount,
        goal.deadline_months,
        plural(goal.deadline_months as usize)
    );
    Ok(Out::new(message, goal))
}

pub async fn list_goals(config: Config) -> Result<Out<Vec<GoalStatus>>> {
    let goals: Vec<GoalStatus> = config
        .db()
        .list_goals()
        .await
        .pub_result(ErrorType::Database)?
        .into_iter()
        .map(GoalStatus::from)
        .collect();

    let mut message = format!("{} goal{}", goals.len(), plural(goals.len()));
    for g in &goals {
        message.push_str(&format!(
            "\n  [{}] {} | {} of {} ({}%) | {} to go",
            g.goal.id,
            g.goal.name,
            g.goal.saved_amount,
            g.goal.target_amount,
            percent(g.progress),
            g.missing_amount
        ));
    }
    Ok(Out::new(message, goals))
}

/// Adds money to a goal's saved amount. Saving past the target is allowed.
///
/// # Errors
///
/// - Returns a validation error if the amount is negative.
/// - Returns a not found error if no goal has the ID.
pub async fn contribute(config: Config, args: ContributeArgs) -> Result<Out<GoalStatus>> {
    let amount = non_negative("amount", args.amount)?;
    let goal = config
        .db()
        .add_to_goal(args.id, amount)
        .await
        .pub_result(ErrorType::Database)?
        .ok_or_else(|| Error::not_found(format!("There is no goal with ID {}", args.id)))?;

    let status = GoalStatus::from(goal);
    if status.progress >= Decimal::ONE {
        info!("Goal '{}' has reached its target", status.goal.name);
    }
    let message = format!(
        "Added {amount} to '{}', saved {} of {} ({}%)",
        status.goal.name,
        status.goal.saved_amount,
        status.goal.target_amount,
        percent(status.progress)
    );
    Ok(Out::new(message, status))
}

/// Progress shown as a percentage. Saved amounts far past a tiny target saturate.
fn percent(progress: Decimal) -> Decimal {
    progress
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::MAX)
        .round_dp(1)
        .normalize()
}
