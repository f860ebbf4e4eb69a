//! Whole documents: a collection serialized as one JSON array under one key

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::persistence;
use crate::persistence::KeyValuePersistence;

/// Failures reading or writing a document
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed
    #[error(transparent)]
    Persistence(#[from] persistence::Error),

    /// The stored document is not a valid collection
    #[error("Malformed document: {0}")]
    Malformed(serde_json::Error),

    /// The collection could not be serialized
    #[error("Could not serialize document: {0}")]
    Encode(serde_json::Error),

    /// A note has a date in no known format
    #[error(r#"Note "{id}" has an unreadable date: {date}"#)]
    InvalidDate { id: String, date: String },

    /// The document under this key was not read successfully, so it is not overwritten
    #[error("Document under {0} was not loaded, refusing to overwrite it")]
    NotLoaded(&'static str),
}

/// Read the collection stored under a key
///
/// A missing key is an empty collection
pub async fn read<P, T>(persistence: &P, key: &str) -> Result<Vec<T>, StorageError>
where
    P: KeyValuePersistence,
    T: DeserializeOwned,
{
    let Some(document) = persistence.get(key).await? else {
        tracing::debug!("No document stored under {key}");

        return Ok(Vec::new());
    };

    decode(&document)
}

/// Replace the collection stored under a key
pub async fn write<P, T>(persistence: &P, key: &str, items: &[T]) -> Result<(), StorageError>
where
    P: KeyValuePersistence,
    T: Serialize,
{
    let document = encode(items)?;

    persistence.set(key, &document).await?;

    tracing::debug!("Wrote {} item(s) under {key}", items.len());

    Ok(())
}

/// Serialize a collection
pub fn encode<T>(items: &[T]) -> Result<String, StorageError>
where
    T: Serialize,
{
    serde_json::to_string(items).map_err(StorageError::Encode)
}

/// Deserialize a collection
pub fn decode<T>(document: &str) -> Result<Vec<T>, StorageError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(document).map_err(StorageError::Malformed)
}
