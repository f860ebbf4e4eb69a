//! SQLite persistence

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;

use super::KeyValuePersistence;
use super::Result;
use super::connection_error;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// SQLite persistence, one row per key
#[derive(Clone, Debug)]
pub struct Sqlite {
    /// Pool of connections
    connection_pool: SqlitePool,
}

impl Sqlite {
    /// Create SQLite persistence from a URL like `sqlite://notes.db`
    ///
    /// The database file is created when missing, migrations will be run
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(connection_error)?
            .create_if_missing(true);

        // single writer, the stores serialize their own operations
        let connection_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        tracing::info!("Connected to {database_url}");

        Self::new_with_pool(connection_pool).await
    }

    /// Create SQLite persistence with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: SqlitePool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(connection_error)?;

        Ok(Self { connection_pool })
    }
}

#[async_trait]
impl KeyValuePersistence for Sqlite {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r"
            SELECT value
            FROM key_values
            WHERE key = ?
            ",
        )
        .bind(key)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO key_values (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT (key) DO UPDATE
            SET value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query(
            r"
            DELETE FROM key_values
            WHERE key = ?
            ",
        )
        .bind(key)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(())
    }
}
