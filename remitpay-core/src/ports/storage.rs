//! Storage port - device-local key-value storage

use async_trait::async_trait;

use crate::domain::result::Result;

/// Device-local key-value storage
///
/// Each key holds one JSON document that is fully rewritten on every
/// mutation. Implementations (adapters) decide where the documents live.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the document stored under `key`, `None` if nothing was written yet
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the document stored under `key`; removing a missing key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;
}
