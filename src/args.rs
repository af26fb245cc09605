//! These structs provide the CLI interface for the household CLI.

use crate::model::{parse_month, Amount};
use chrono::Month;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// household: A command-line tool for tracking household finances month by month.
///
/// Record income and expenses against a month, carry recurring entries forward when a new month
/// is started, follow installment debts until they are paid off, put money aside towards savings
/// goals, and see the monthly balance.
///
/// A month must be started with `household month start` before income or expenses can be added to
/// it. Starting a month can copy every recurring income and expense into it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the database.
    ///
    /// This is the first command you should run. The data directory defaults to $HOME/household;
    /// pass --household-home or set HOUSEHOLD_HOME to put it somewhere else.
    Init,
    /// Check whether a month has been started, or start it.
    Month(MonthArgs),
    /// Add, list or delete income entries.
    Income(IncomeArgs),
    /// Add, list or delete expense entries.
    Expense(ExpenseArgs),
    /// Add, list or delete installment debts.
    Debt(DebtArgs),
    /// Add or list savings goals, or put money towards one.
    Goal(GoalArgs),
    /// Show the totals and balance of a month.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where household data and configuration is held. Defaults to ~/household
    #[arg(long, env = "HOUSEHOLD_HOME", default_value_t = default_household_home())]
    household_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn household_home(&self) -> &DisplayPath {
        &self.household_home
    }
}

/// Selects the month a command operates on. Both values default to today's month and year.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct PeriodArgs {
    /// The month: a name such as "July" or "jul", or a number from 1 to 12.
    #[arg(long, value_parser = parse_month)]
    pub month: Option<Month>,

    /// The year, e.g. 2025.
    #[arg(long)]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn new(month: Month, year: i32) -> Self {
        Self {
            month: Some(month),
            year: Some(year),
        }
    }
}

/// Args for the `household month` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    #[command(subcommand)]
    action: MonthSubcommand,
}

impl MonthArgs {
    pub fn action(&self) -> &MonthSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum MonthSubcommand {
    /// Report whether the month has been started.
    Status(PeriodArgs),
    /// Start the month, optionally copying recurring income and expenses into it.
    Start(StartMonthArgs),
}

/// Args for `household month start`.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct StartMonthArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// Copy every distinct recurring income into the new month.
    #[arg(long)]
    pub carry_income: bool,

    /// Copy every distinct recurring expense into the new month.
    #[arg(long)]
    pub carry_expense: bool,
}

/// Args for the `household income` command.
#[derive(Debug, Parser, Clone)]
pub struct IncomeArgs {
    #[command(subcommand)]
    action: IncomeSubcommand,
}

impl IncomeArgs {
    pub fn action(&self) -> &IncomeSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum IncomeSubcommand {
    /// Record an income entry in a month.
    Add(AddIncomeArgs),
    /// List the income entries of a month.
    List(PeriodArgs),
    /// Delete an income entry by ID.
    Delete(DeleteArgs),
}

/// Args for `household income add`.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddIncomeArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// Who received the income.
    #[arg(long)]
    pub person: String,

    /// The kind of income, e.g. "Salary".
    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// The amount, zero or more. "$1,200.50" and "1200.5" are both accepted.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Amount,

    /// Mark the income as recurring so it can be carried into future months.
    #[arg(long)]
    pub recurring: bool,
}

/// Args for the `household expense` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    action: ExpenseSubcommand,
}

impl ExpenseArgs {
    pub fn action(&self) -> &ExpenseSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExpenseSubcommand {
    /// Record an expense entry in a month.
    Add(AddExpenseArgs),
    /// List the expense entries of a month.
    List(PeriodArgs),
    /// Delete an expense entry by ID.
    Delete(DeleteArgs),
}

/// Args for `household expense add`.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddExpenseArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,

    /// The expense category, e.g. "Rent".
    #[arg(long)]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// The amount, zero or more.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Amount,

    /// Mark the expense as recurring so it can be carried into future months.
    #[arg(long)]
    pub recurring: bool,
}

/// Args for the `household debt` command.
#[derive(Debug, Parser, Clone)]
pub struct DebtArgs {
    #[command(subcommand)]
    action: DebtSubcommand,
}

impl DebtArgs {
    pub fn action(&self) -> &DebtSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DebtSubcommand {
    /// Record a debt paid in equal monthly installments, starting in the selected month.
    Add(AddDebtArgs),
    /// Show every debt as of the selected month. Debts with no installments left are removed.
    List(PeriodArgs),
    /// Delete a debt by ID.
    Delete(DeleteArgs),
    /// Remove the debts that have no installments left as of the selected month.
    Tick(PeriodArgs),
}

/// Args for `household debt add`.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddDebtArgs {
    // The month of the first installment
    #[clap(flatten)]
    pub period: PeriodArgs,

    #[arg(long)]
    pub name: String,

    /// The total amount owed, zero or more.
    #[arg(long, allow_hyphen_values = true)]
    pub total: Amount,

    /// The number of monthly installments, at least one.
    #[arg(long, allow_hyphen_values = true)]
    pub installments: i64,
}

/// Args for the `household goal` command.
#[derive(Debug, Parser, Clone)]
pub struct GoalArgs {
    #[command(subcommand)]
    action: GoalSubcommand,
}

impl GoalArgs {
    pub fn action(&self) -> &GoalSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum GoalSubcommand {
    /// Create a savings goal.
    Add(AddGoalArgs),
    /// List every savings goal with its progress.
    List,
    /// Put money towards a goal.
    Contribute(ContributeArgs),
}

/// Args for `household goal add`.
#[derive(Debug, ClapArgs, Clone)]
pub struct AddGoalArgs {
    #[arg(long)]
    pub name: String,

    /// The amount to save, zero or more.
    #[arg(long, allow_hyphen_values = true)]
    pub target: Amount,

    /// How many months the goal should take, at least one.
    #[arg(long, allow_hyphen_values = true)]
    pub deadline_months: i64,
}

/// Args for `household goal contribute`.
#[derive(Debug, ClapArgs, Clone)]
pub struct ContributeArgs {
    /// The ID of the goal.
    pub id: i64,

    /// The amount to add to the saved total, zero or more.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Amount,
}

/// Args for the `household summary` command.
#[derive(Debug, Default, ClapArgs, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    pub period: PeriodArgs,
}

/// Identifies the row to delete.
#[derive(Debug, ClapArgs, Clone)]
pub struct DeleteArgs {
    /// The ID of the row.
    pub id: i64,
}

impl DeleteArgs {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

fn default_household_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("household"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --household-home or HOUSEHOLD_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("household")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["household", "--household-home", "/tmp/household-test"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_income_add() {
        let args = parse(&[
            "income", "add", "--month", "jul", "--year", "2025", "--person", "Person 1",
            "--category", "Salary", "--amount", "$3,000", "--recurring",
        ]);
        let Command::Income(income) = args.command() else {
            panic!("expected income command");
        };
        let IncomeSubcommand::Add(add) = income.action() else {
            panic!("expected income add");
        };
        assert_eq!(add.period.month, Some(Month::July));
        assert_eq!(add.period.year, Some(2025));
        assert_eq!(add.amount, Amount::from(3000));
        assert!(add.recurring);
        assert_eq!(add.description, "");
    }

    #[test]
    fn test_negative_amount_reaches_validation() {
        let args = parse(&["expense", "add", "--category", "Rent", "--amount", "-5"]);
        let Command::Expense(expense) = args.command() else {
            panic!("expected expense command");
        };
        let ExpenseSubcommand::Add(add) = expense.action() else {
            panic!("expected expense add");
        };
        assert!(add.amount.is_negative());
        assert_eq!(add.period.month, None);
    }

    #[test]
    fn test_bad_month_is_rejected() {
        let argv = ["household", "summary", "--month", "Smarch"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_month_start_flags() {
        let args = parse(&["month", "start", "--carry-income"]);
        let Command::Month(month) = args.command() else {
            panic!("expected month command");
        };
        let MonthSubcommand::Start(start) = month.action() else {
            panic!("expected month start");
        };
        assert!(start.carry_income);
        assert!(!start.carry_expense);
    }

    #[test]
    fn test_log_level_default() {
        let args = parse(&["goal", "list"]);
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        assert_eq!(
            args.common().household_home().path(),
            Path::new("/tmp/household-test")
        );
    }
}
