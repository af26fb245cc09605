use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` file with default settings
/// - Creates the SQLite database with the current schema
///
/// # Arguments
/// - `household_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/household`
///
/// # Errors
/// - Returns an error if any file operations fail or if the directory already holds a database.
pub async fn init(household_home: &Path) -> Result<Out<()>> {
    let config = Config::create(household_home).await?;
    Ok(format!(
        "Successfully created the household directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("household");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(Config::load(&home).await.is_ok());
    }
}
