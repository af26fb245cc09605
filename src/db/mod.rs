//! This module is responsible for reading, writing and managing the SQLite database.
//!
//! The `Db` methods are split by the collection they work on:
//! - `periods`: month initialization markers and the carry-forward of recurring entries
//! - `entries`: income and expense rows
//! - `debts`: debts and their retirement
//! - `goals`: savings goals and contributions

mod debts;
mod entries;
mod goals;
mod migrations;
mod periods;

use crate::error::Res;
use anyhow::{bail, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::debug;

/// A handle to the household SQLite database. Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display());
        }
        let pool = connect(path, true).await?;

        sqlx::query("CREATE TABLE schema_version (version INTEGER NOT NULL)")
            .execute(&pool)
            .await
            .context("Failed to create schema_version table")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
            .execute(&pool)
            .await
            .context("Failed to insert initial schema version")?;

        migrations::run(&pool, 0, migrations::CURRENT_VERSION).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Creates a SQLite client
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let pool = connect(path, false).await?;
        let db = Self { pool };

        let version = db.schema_version().await?;
        if version > migrations::CURRENT_VERSION {
            bail!(
                "The database schema is at version {version} but this program only supports up to \
                version {}. Is a newer version of household installed?",
                migrations::CURRENT_VERSION
            );
        }
        migrations::run(&db.pool, version, migrations::CURRENT_VERSION).await?;
        Ok(db)
    }

    async fn schema_version(&self) -> Res<i32> {
        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await
            .context("Failed to query schema version")?;
        Ok(row.0.unwrap_or(0))
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Opens a single-connection pool. One connection is all a single-user session needs, and it
/// serializes every write.
async fn connect(path: &Path, create: bool) -> Res<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Unable to open SQLite database at '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("household.sqlite");
        let db = Db::init(&path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), migrations::CURRENT_VERSION);
        drop(db);

        let db = Db::load(&path).await.unwrap();
        assert_eq!(db.schema_version().await.unwrap(), migrations::CURRENT_VERSION);
    }

    #[tokio::test]
    async fn test_init_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("household.sqlite");
        Db::init(&path).await.unwrap();
        assert!(Db::init(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Db::load(dir.path().join("nope.sqlite")).await.unwrap_err();
        assert!(err.to_string().contains("database file is missing"));
    }

    #[tokio::test]
    async fn test_load_refuses_newer_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("household.sqlite");
        let db = Db::init(&path).await.unwrap();
        sqlx::query("UPDATE schema_version SET version = 99")
            .execute(db.pool())
            .await
            .unwrap();
        drop(db);

        let err = Db::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("newer version"));
    }
}
