//! Database layer
//!
//! SQLite via sqlx. WAL journal, foreign keys on, and a small pool:
//! this is a single-process server and SQLite writes serialize anyway.

pub mod models;
pub mod repository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub struct DbService;

impl DbService {
    /// Open (creating if needed) the database at `path` and run
    /// pending migrations.
    pub async fn connect(path: &Path) -> Result<SqlitePool, sqlx::Error> {
        let url = format!("sqlite://{}", path.display());
        let options = SqliteConnectOptions::from_str(&url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_millis(5000))
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(pool)
    }

    /// In-memory database for tests. Single connection so the data
    /// outlives individual acquires.
    pub async fn connect_memory() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::migrate(&pool).await?;
        Ok(pool)
    }

    async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .set_ignore_missing(true)
            .run(pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        tracing::debug!("database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_file_and_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.db");

        let pool = DbService::connect(&path).await.unwrap();
        assert!(path.exists());

        // Schema is in place and usable.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM branches")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        // A second connect against the same file is a no-op migration.
        pool.close().await;
        DbService::connect(&path).await.unwrap();
    }
}
