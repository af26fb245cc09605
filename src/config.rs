//! Configuration file handling.
//!
//! The configuration file is stored at `$HOUSEHOLD_HOME/config.json` and contains the year window
//! of the period picker and the lists of choices offered for people and categories.

use crate::db::Db;
use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "household";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const HOUSEHOLD_SQLITE: &str = "household.sqlite";
const FIRST_YEAR: i32 = 2025;
const LAST_YEAR: i32 = 2034;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$HOUSEHOLD_HOME` and from there it loads `$HOUSEHOLD_HOME/config.json` and opens
/// the SQLite database. Every command receives a `Config`; its `Db` is the only store handle.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    db: Db,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory and:
    /// - Creates an initial `config.json` file with default settings
    /// - Creates the SQLite database and its schema
    ///
    /// # Errors
    /// - Returns an error if any file operations fail or if a database already exists.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> Res<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the household home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        // The database refuses to overwrite an existing file, so create it before the config
        let sqlite_path = root.join(HOUSEHOLD_SQLITE);
        let db = Db::init(&sqlite_path)
            .await
            .context("Unable to create SQLite DB")?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    /// This will
    /// - validate that `household_home` exists and that the config file exists
    /// - load the config file
    /// - open the database, migrating its schema if needed
    /// - return the loaded configuration object
    pub async fn load(household_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(household_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The household home directory is missing, run 'household init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let sqlite_path = root.join(HOUSEHOLD_SQLITE);
        let db = Db::load(&sqlite_path)
            .await
            .context("Unable to load SQLite DB")?;

        Ok(Self {
            root,
            config_path,
            config_file,
            db,
            sqlite_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub(crate) fn db(&self) -> &Db {
        &self.db
    }

    /// The first year that may be selected.
    pub fn first_year(&self) -> i32 {
        self.config_file.first_year
    }

    /// The last year that may be selected.
    pub fn last_year(&self) -> i32 {
        self.config_file.last_year
    }

    /// The people income can be recorded for. Empty means anyone.
    pub fn people(&self) -> &[String] {
        &self.config_file.people
    }

    /// Income categories. Empty means any category.
    pub fn income_categories(&self) -> &[String] {
        &self.config_file.income_categories
    }

    /// Expense categories. Empty means any category.
    pub fn expense_categories(&self) -> &[String] {
        &self.config_file.expense_categories
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "household",
///   "config_version": 1,
///   "first_year": 2025,
///   "last_year": 2034,
///   "people": ["Person 1", "Person 2"],
///   "income_categories": ["Salary", "Extra"],
///   "expense_categories": ["Rent", "Groceries", "Electricity", "Water", "Internet", "Other"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "household"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    #[serde(default = "default_first_year")]
    first_year: i32,

    #[serde(default = "default_last_year")]
    last_year: i32,

    #[serde(default)]
    people: Vec<String>,

    #[serde(default)]
    income_categories: Vec<String>,

    #[serde(default)]
    expense_categories: Vec<String>,
}

fn default_first_year() -> i32 {
    FIRST_YEAR
}

fn default_last_year() -> i32 {
    LAST_YEAR
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            first_year: FIRST_YEAR,
            last_year: LAST_YEAR,
            people: strings(&["Person 1", "Person 2"]),
            income_categories: strings(&["Salary", "Extra"]),
            expense_categories: strings(&[
                "Rent",
                "Groceries",
                "Electricity",
                "Water",
                "Internet",
                "Other",
            ]),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if its values are inconsistent
    pub async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.first_year <= config.last_year,
            "Invalid year window in config file: first_year {} is after last_year {}",
            config.first_year,
            config.last_year
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
