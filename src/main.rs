use clap::Parser;
use household_ledger::args::{
    Args, Command, DebtSubcommand, ExpenseSubcommand, GoalSubcommand, IncomeSubcommand,
    MonthSubcommand,
};
use household_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().household_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Month(month_args) => {
            let config = Config::load(home).await?;
            match month_args.action() {
                MonthSubcommand::Status(args) => commands::month_status(config, args.clone())
                    .await?
                    .print(),
                MonthSubcommand::Start(args) => commands::start_month(config, args.clone())
                    .await?
                    .print(),
            }
        }

        Command::Income(income_args) => {
            let config = Config::load(home).await?;
            match income_args.action() {
                IncomeSubcommand::Add(args) => {
                    commands::add_income(config, args.clone()).await?.print()
                }
                IncomeSubcommand::List(args) => {
                    commands::list_income(config, args.clone()).await?.print()
                }
                IncomeSubcommand::Delete(args) => {
                    commands::delete_income(config, args.clone()).await?.print()
                }
            }
        }

        Command::Expense(expense_args) => {
            let config = Config::load(home).await?;
            match expense_args.action() {
                ExpenseSubcommand::Add(args) => {
                    commands::add_expense(config, args.clone()).await?.print()
                }
                ExpenseSubcommand::List(args) => {
                    commands::list_expense(config, args.clone()).await?.print()
                }
                ExpenseSubcommand::Delete(args) => commands::delete_expense(config, args.clone())
                    .await?
                    .print(),
            }
        }

        Command::Debt(debt_args) => {
            let config = Config::load(home).await?;
            match debt_args.action() {
                DebtSubcommand::Add(args) => commands::add_debt(config, args.clone()).await?.print(),
                DebtSubcommand::List(args) => {
                    commands::list_debts(config, args.clone()).await?.print()
                }
                DebtSubcommand::Delete(args) => {
                    commands::delete_debt(config, args.clone()).await?.print()
                }
                DebtSubcommand::Tick(args) => commands::tick(config, args.clone()).await?.print(),
            }
        }

        Command::Goal(goal_args) => {
            let config = Config::load(home).await?;
            match goal_args.action() {
                GoalSubcommand::Add(args) => commands::add_goal(config, args.clone()).await?.print(),
                GoalSubcommand::List => commands::list_goals(config).await?.print(),
                GoalSubcommand::Contribute(args) => {
                    commands::contribute(config, args.clone()).await?.print()
                }
            }
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, summary_args.clone())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise log at `level` for the library and the binary only.
        None => EnvFilter::new(format!(
            "{}={level},{}={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            env!("CARGO_BIN_NAME"),
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
