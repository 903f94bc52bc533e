//! Shared plumbing for the persisted stores
//!
//! Store documents use the envelope `{"state": ..., "version": 0}` and are
//! rewritten in full on every mutation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

/// Current envelope version
pub const STATE_VERSION: u32 = 0;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

/// Read a store's state, falling back to the default when nothing was saved yet
pub async fn load_state<T>(storage: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match storage.get_item(key).await? {
        Some(raw) => {
            let envelope: Envelope<T> = serde_json::from_str(&raw)?;
            Ok(envelope.state)
        }
        None => Ok(T::default()),
    }
}

/// Persist a store's full state
pub async fn save_state<T>(storage: &dyn KeyValueStore, key: &str, state: &T) -> Result<()>
where
    T: Serialize,
{
    let envelope = Envelope {
        state,
        version: STATE_VERSION,
    };
    let raw = serde_json::to_string(&envelope)?;
    storage.set_item(key, &raw).await
}

/// Read a bare JSON document (no envelope)
pub async fn load_document<T>(storage: &dyn KeyValueStore, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match storage.get_item(key).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(T::default()),
    }
}

/// Write a bare JSON document (no envelope)
pub async fn save_document<T>(storage: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize,
{
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw).await
}

/// Artificial latency before a mutation
pub async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Counts one in-flight mutation for its lifetime, on success and on error
///
/// A store is loading while its counter is non-zero.
pub struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    pub fn raise(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
