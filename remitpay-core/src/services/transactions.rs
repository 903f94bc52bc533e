//! Transaction store - transfer history
//!
//! New transactions are prepended, so every listing is newest first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{generate_reference_number, NewTransaction, Transaction, TransactionUpdate};
use crate::ports::KeyValueStore;
use crate::services::persist::{load_state, save_state, simulate_latency, LoadingGuard};

/// Storage key of the persisted transaction list
pub const TRANSACTIONS_KEY: &str = "transactions-storage";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TransactionsState {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// In-memory transaction list, persisted in full after each mutation
pub struct TransactionStore {
    storage: Arc<dyn KeyValueStore>,
    transactions: RwLock<Vec<Transaction>>,
    loading: AtomicUsize,
    /// Held from snapshot to commit so concurrent mutations apply in turn
    mutation: Mutex<()>,
    add_latency: Duration,
    update_latency: Duration,
}

impl TransactionStore {
    /// Hydrate the store from storage
    pub async fn load(
        storage: Arc<dyn KeyValueStore>,
        add_latency: Duration,
        update_latency: Duration,
    ) -> Result<Self> {
        let state: TransactionsState = load_state(storage.as_ref(), TRANSACTIONS_KEY).await?;
        Ok(Self {
            storage,
            transactions: RwLock::new(state.transactions),
            loading: AtomicUsize::new(0),
            mutation: Mutex::new(()),
            add_latency,
            update_latency,
        })
    }

    /// True while a mutation is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    /// Record a new transaction and return its id
    ///
    /// Assigns the id, a fresh reference number and created_at.
    pub async fn add(&self, transaction: NewTransaction) -> Result<String> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.add_latency).await;

        let now = Utc::now();
        let id = format!("tx_{}", Uuid::new_v4().simple());
        let reference = generate_reference_number(now);
        let created = transaction.into_transaction(id.clone(), reference, now);

        let _mutation = self.mutation.lock().await;
        let mut next = self.snapshot();
        next.insert(0, created);
        self.commit(next).await?;

        Ok(id)
    }

    /// Merge changes into the transaction with `id`
    ///
    /// Any field may be overwritten, status included. Returns the updated
    /// record, or `None` if no transaction has that id.
    pub async fn update(
        &self,
        id: &str,
        update: TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        let _loading = LoadingGuard::raise(&self.loading);
        simulate_latency(self.update_latency).await;

        let _mutation = self.mutation.lock().await;
        let mut next = self.snapshot();
        let updated = next.iter_mut().find(|t| t.id == id).map(|t| {
            t.apply(update);
            t.clone()
        });

        if updated.is_some() {
            self.commit(next).await?;
        }
        Ok(updated)
    }

    /// The user's transactions, newest first
    pub fn list_by_user(&self, user_id: &str) -> Vec<Transaction> {
        self.read()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Transaction> {
        self.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn get_by_reference(&self, reference_number: &str) -> Option<Transaction> {
        self.read()
            .iter()
            .find(|t| t.reference_number == reference_number)
            .cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Transaction>> {
        self.transactions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn snapshot(&self) -> Vec<Transaction> {
        self.read().clone()
    }

    /// Persist first; in-memory state only changes once the write succeeded
    async fn commit(&self, next: Vec<Transaction>) -> Result<()> {
        let state = TransactionsState { transactions: next };
        save_state(self.storage.as_ref(), TRANSACTIONS_KEY, &state).await?;

        let mut guard = self
            .transactions
            .write()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        *guard = state.transactions;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FlakyStore, MemoryStore};
    use crate::domain::{is_reference_number, TransactionStatus};
    use rust_decimal::Decimal;

    fn new_transaction(user_id: &str) -> NewTransaction {
        NewTransaction {
            user_id: user_id.to_string(),
            recipient_id: Some("recipient_1".to_string()),
            payment_method_id: None,
            from_currency: "USD".to_string(),
            to_currency: "KES".to_string(),
            send_amount: Decimal::new(100, 0),
            receive_amount: Decimal::new(12915, 0),
            exchange_rate: Decimal::new(12915, 2),
            fee_amount: Decimal::new(489, 2),
            total_amount: Decimal::new(10489, 2),
            status: TransactionStatus::Processing,
            delivery_method: None,
            estimated_arrival: None,
            completed_at: None,
            notes: None,
        }
    }

    async fn empty_store() -> (Arc<MemoryStore>, TransactionStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = TransactionStore::load(storage.clone(), Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        (storage, store)
    }

    #[tokio::test]
    async fn test_add_assigns_reference_number() {
        let (_, store) = empty_store().await;

        let id = store.add(new_transaction("user_a")).await.unwrap();
        let tx = store.get_by_id(&id).unwrap();

        assert!(is_reference_number(&tx.reference_number), "{}", tx.reference_number);
        assert_eq!(store.get_by_reference(&tx.reference_number).unwrap().id, id);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_per_user() {
        let (_, store) = empty_store().await;
        let first = store.add(new_transaction("user_a")).await.unwrap();
        let second = store.add(new_transaction("user_a")).await.unwrap();
        store.add(new_transaction("user_b")).await.unwrap();

        let ids: Vec<String> = store.list_by_user("user_a").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test]
    async fn test_update_status_any_direction() {
        let (_, store) = empty_store().await;
        let id = store.add(new_transaction("user_a")).await.unwrap();

        let done = store
            .update(&id, TransactionUpdate::status(TransactionStatus::Completed))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, TransactionStatus::Completed);

        let back = store
            .update(&id, TransactionUpdate::status(TransactionStatus::Pending))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back.status, TransactionStatus::Pending);
        assert_eq!(back.reference_number, done.reference_number);

        assert!(store
            .update("tx_missing", TransactionUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_reload_keeps_order() {
        let (storage, store) = empty_store().await;
        let first = store.add(new_transaction("user_a")).await.unwrap();
        let second = store.add(new_transaction("user_a")).await.unwrap();

        let reloaded = TransactionStore::load(storage, Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        let ids: Vec<String> = reloaded.list_by_user("user_a").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_and_update_wait_for_their_latency() {
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(
            TransactionStore::load(storage, Duration::from_millis(500), Duration::from_millis(300))
                .await
                .unwrap(),
        );

        let started = tokio::time::Instant::now();
        let adding = tokio::spawn({
            let store = store.clone();
            async move { store.add(new_transaction("user_a")).await }
        });
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(store.is_loading());
        let id = adding.await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(!store.is_loading());

        let started = tokio::time::Instant::now();
        store
            .update(&id, TransactionUpdate::status(TransactionStatus::Completed))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_list_unchanged() {
        let storage = Arc::new(FlakyStore::new());
        let store = TransactionStore::load(storage.clone(), Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        let id = store.add(new_transaction("user_a")).await.unwrap();
        let before = store.list_by_user("user_a");

        storage.fail_writes(true);
        assert!(store.add(new_transaction("user_a")).await.is_err());
        assert!(store
            .update(&id, TransactionUpdate::status(TransactionStatus::Failed))
            .await
            .is_err());

        assert!(!store.is_loading());
        assert_eq!(store.list_by_user("user_a"), before);
        assert_eq!(store.get_by_id(&id).unwrap().status, TransactionStatus::Processing);
    }
}
