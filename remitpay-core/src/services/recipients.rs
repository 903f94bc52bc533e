//! Recipient store - the user's saved payees

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{NewRecipient, Recipient, RecipientUpdate};
use crate::ports::KeyValueStore;
use crate::services::persist::{load_state, save_state, simulate_latency, LoadingGuard};

/// Storage key of the persisted recipient list
pub const RECIPIENTS_KEY: &str = "recipients-storage";

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecipientsState {
    #[serde(default)]
    recipients: Vec<Recipient>,
}

/// In-memory recipient list, persisted in full after each mutation
pub struct RecipientStore {
    storage: Arc<dyn KeyValueStore>,
    recipients: RwLock<Vec<Recipient>>,
    loading: AtomicUsize,
    /// Held from snapshot to commit so concurrent mutations apply in turn
    mutation: Mutex<()>,
    latency: Duration,
}

impl RecipientStore {
    /// Hydrate the store from storage
    pub async fn load(storage: Arc<dyn KeyValueStore>, latency: Duration) -> Result<Self> {
        let state: RecipientsState = load_state(storage.as_ref(), RECIPIENTS_KEY).await?;
        Ok(Self {
            storage,
            recipients: RwLock::new(state.recipients),
            loading: AtomicUsize::new(0),
            mutation: Mutex::new(()),
            latency,
        })
    }

    /// True while a mutation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    /// Save a new recipient; assigns id and created_at
    pub async fn add(&self, recipient: NewRecipient) -> Result<Recipient> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.latency).await;

        validate_new(&recipient)?;

        let id = format!("recipient_{}", Uuid::new_v4().simple());
        let created = recipient.into_recipient(id, Utc::now());

        let _mutation = self.mutation.lock().await;
        let mut next = self.snapshot();
        next.push(created.clone());
        self.commit(next).await?;

        Ok(created)
    }

    /// Merge changes into the recipient with `id`
    ///
    /// Returns the updated record, or `None` if no recipient has that id.
    pub async fn update(&self, id: &str, update: RecipientUpdate) -> Result<Option<Recipient>> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.latency).await;

        let _mutation = self.mutation.lock().await;
        let mut next = self.snapshot();
        let updated = next.iter_mut().find(|r| r.id == id).map(|r| {
            r.apply(update);
            r.clone()
        });

        if updated.is_some() {
            self.commit(next).await?;
        }
        Ok(updated)
    }

    /// Remove the recipient with `id`; returns whether one was removed
    ///
    /// Transactions that reference it are left alone.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.latency).await;

        let _mutation = self.mutation.lock().await;
        let mut next = self.snapshot();
        let before = next.len();
        next.retain(|r| r.id != id);
        let removed = next.len() != before;

        if removed {
            self.commit(next).await?;
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<Recipient> {
        self.read().iter().find(|r| r.id == id).cloned()
    }

    pub fn list_by_user(&self, user_id: &str) -> Vec<Recipient> {
        self.read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn list_by_user_and_currency(&self, user_id: &str, currency: &str) -> Vec<Recipient> {
        self.read()
            .iter()
            .filter(|r| r.user_id == user_id && r.currency == currency)
            .cloned()
            .collect()
    }

    /// Display name for a possibly-deleted recipient
    pub fn name_or_unknown(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.get(id))
            .map(|r| r.full_name)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Recipient>> {
        self.recipients.read().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> Vec<Recipient> {
        self.read().clone()
    }

    /// Persist first; in-memory state only changes once the write succeeded
    async fn commit(&self, next: Vec<Recipient>) -> Result<()> {
        let state = RecipientsState { recipients: next };
        save_state(self.storage.as_ref(), RECIPIENTS_KEY, &state).await?;

        let mut guard = self
            .recipients
            .write()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        *guard = state.recipients;
        Ok(())
    }
}

fn validate_new(recipient: &NewRecipient) -> Result<()> {
    let missing_required = [
        &recipient.user_id,
        &recipient.full_name,
        &recipient.country,
        &recipient.currency,
    ]
    .iter()
    .any(|field| field.trim().is_empty());

    let has_delivery_details = recipient
        .account_number
        .as_deref()
        .is_some_and(|a| !a.trim().is_empty())
        || recipient
            .mobile_money_provider
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

    if missing_required || !has_delivery_details {
        return Err(Error::validation("Please fill in all required fields"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FlakyStore, MemoryStore};

    fn bank_recipient(user_id: &str, name: &str, currency: &str) -> NewRecipient {
        let mut r = NewRecipient::new(user_id, name, "Kenya", currency);
        r.account_number = Some("0011223344".to_string());
        r.bank_name = Some("KCB".to_string());
        r
    }

    async fn empty_store() -> (Arc<MemoryStore>, RecipientStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = RecipientStore::load(storage.clone(), Duration::ZERO)
            .await
            .unwrap();
        (storage, store)
    }

    #[tokio::test]
    async fn test_add_then_list_by_user() {
        let (_, store) = empty_store().await;

        let added = store.add(bank_recipient("user_a", "Jane", "KES")).await.unwrap();
        assert!(added.id.starts_with("recipient_"));

        let mine = store.list_by_user("user_a");
        assert_eq!(mine, vec![added]);
        assert!(store.list_by_user("user_b").is_empty());
    }

    #[tokio::test]
    async fn test_list_by_currency() {
        let (_, store) = empty_store().await;
        store.add(bank_recipient("user_a", "Jane", "KES")).await.unwrap();
        store.add(bank_recipient("user_a", "Ade", "NGN")).await.unwrap();
        store.add(bank_recipient("user_b", "Kofi", "KES")).await.unwrap();

        let kes = store.list_by_user_and_currency("user_a", "KES");
        assert_eq!(kes.len(), 1);
        assert_eq!(kes[0].full_name, "Jane");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (_, store) = empty_store().await;
        let added = store.add(bank_recipient("user_a", "Jane", "KES")).await.unwrap();

        let updated = store
            .update(
                &added.id,
                RecipientUpdate {
                    full_name: Some("Jane W.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Jane W.");
        assert_eq!(updated.created_at, added.created_at);

        assert!(store.update("missing", RecipientUpdate::default()).await.unwrap().is_none());

        assert!(store.delete(&added.id).await.unwrap());
        assert!(!store.delete(&added.id).await.unwrap());
        assert_eq!(store.name_or_unknown(Some(&added.id)), "Unknown");
    }

    #[tokio::test]
    async fn test_mobile_money_recipient_needs_no_account() {
        let (_, store) = empty_store().await;
        let mut r = NewRecipient::new("user_a", "Amina", "Kenya", "KES");
        r.mobile_money_provider = Some("M-Pesa".to_string());
        assert!(store.add(r).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_incomplete_recipient() {
        let (_, store) = empty_store().await;
        let r = NewRecipient::new("user_a", "Jane", "", "KES");
        let err = store.add(r).await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");
        assert!(!store.is_loading());
        assert!(store.list_by_user("user_a").is_empty());
    }

    #[tokio::test]
    async fn test_persists_full_list() {
        let (storage, store) = empty_store().await;
        store.add(bank_recipient("user_a", "Jane", "KES")).await.unwrap();
        store.add(bank_recipient("user_a", "Ade", "NGN")).await.unwrap();

        let reloaded = RecipientStore::load(storage, Duration::ZERO).await.unwrap();
        assert_eq!(reloaded.list_by_user("user_a").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_waits_for_latency_while_loading() {
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(
            RecipientStore::load(storage, Duration::from_millis(300))
                .await
                .unwrap(),
        );
        let started = tokio::time::Instant::now();

        let adding = tokio::spawn({
            let store = store.clone();
            async move { store.add(bank_recipient("user_a", "Jane", "KES")).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(store.is_loading());
        assert!(store.list_by_user("user_a").is_empty());

        adding.await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(!store.is_loading());
        assert_eq!(store.list_by_user("user_a").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_list_unchanged() {
        let storage = Arc::new(FlakyStore::new());
        let store = RecipientStore::load(storage.clone(), Duration::ZERO)
            .await
            .unwrap();
        let kept = store.add(bank_recipient("user_a", "Jane", "KES")).await.unwrap();

        storage.fail_writes(true);
        assert!(store.add(bank_recipient("user_a", "Ade", "NGN")).await.is_err());
        assert!(store.delete(&kept.id).await.is_err());
        let renamed = RecipientUpdate {
            full_name: Some("Jane W.".to_string()),
            ..Default::default()
        };
        assert!(store.update(&kept.id, renamed).await.is_err());

        assert!(!store.is_loading());
        assert_eq!(store.list_by_user("user_a"), vec![kept]);
    }
}
