//! Memory persistence
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::KeyValuePersistence;
use super::Result;

/// An in-memory key-value persistence
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// All values by key
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl Memory {
    /// Create a new empty Memory persistence
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValuePersistence for Memory {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.values.lock().await.remove(key);

        Ok(())
    }
}
