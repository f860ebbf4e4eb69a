//! All things related to the persistence of whole documents under a key

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

pub use memory::Memory;
pub use sqlite::Sqlite;

mod memory;
mod sqlite;

/// Persistence errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the backend
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all persistence interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Persistence configuration
pub enum Config {
    /// Keep everything in memory, lost on shutdown
    Memory,

    /// Connect to a SQLite database by URL, created when missing
    Sqlite(String),

    /// Use an existing SQLite pool
    ExistingPool(SqlitePool),
}

impl Config {
    /// Detect configuration from environment
    ///
    /// Uses `DATABASE_URL` when set, memory otherwise
    pub fn from_env() -> Self {
        match crate::utils::env_var_optional("DATABASE_URL") {
            Some(url) => Self::Sqlite(url),
            None => Self::Memory,
        }
    }
}

/// A ready to use backend
pub enum Backend {
    /// In-memory backend
    Memory(Memory),

    /// SQLite backend
    Sqlite(Sqlite),
}

/// Setup the persistence backend
///
/// # Errors
///
/// Will return `Err` when the SQLite database can not be opened or migrated
pub async fn setup(config: Config) -> Result<Backend> {
    match config {
        Config::Memory => {
            tracing::info!("`DATABASE_URL` is not set, notes are kept in memory only");

            Ok(Backend::Memory(Memory::new()))
        }
        Config::Sqlite(url) => Sqlite::new(&url).await.map(Backend::Sqlite),
        Config::ExistingPool(pool) => Sqlite::new_with_pool(pool).await.map(Backend::Sqlite),
    }
}

/// Key-value persistence, one string blob per key
#[async_trait]
pub trait KeyValuePersistence: Clone + Send + Sync + 'static {
    /// Get the value stored under a key, if any
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value under a key, replacing what was there
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key
    ///
    /// Removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Map any error into a connection error
pub(crate) fn connection_error<E>(err: E) -> Error
where
    E: std::error::Error,
{
    Error::Connection(err.to_string())
}
