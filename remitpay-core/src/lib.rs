//! RemitPay Core - business logic for cross-border money transfers
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Core entities (User, Recipient, Transaction, Currency, quotes)
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Stores, exchange pricing, transfers, receipts, logging
//! - **adapters**: Concrete storage implementations (file, memory)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::FileStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    Currency, DeliveryMethod, FundingMethod, NewRecipient, ProfileUpdate, Recipient,
    RecipientUpdate, Transaction, TransactionStatus, TransactionUpdate, User,
};

/// Main context for RemitPay operations
///
/// Constructed once at startup and handed to the caller; it owns every
/// store, so there is no global state.
pub struct RemitContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub storage: Arc<dyn KeyValueStore>,
    pub auth: AuthStore,
    pub recipients: RecipientStore,
    pub transactions: Arc<TransactionStore>,
    pub transfer_service: TransferService,
}

impl RemitContext {
    /// Open the context over a data directory, reading settings.json from it
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        Self::with_config(data_dir, config).await
    }

    /// Open the context with an explicit configuration
    pub async fn with_config(data_dir: &Path, config: Config) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(
            FileStore::new(data_dir)
                .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?,
        );
        Self::with_storage(data_dir, config, storage).await
    }

    /// Open the context over any storage backend
    pub async fn with_storage(
        data_dir: &Path,
        config: Config,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        let latency = config.latency();

        let auth = AuthStore::load(Arc::clone(&storage), latency.auth)
            .await
            .context("Failed to load session")?;
        let recipients = RecipientStore::load(Arc::clone(&storage), latency.recipients)
            .await
            .context("Failed to load recipients")?;
        let transactions = Arc::new(
            TransactionStore::load(
                Arc::clone(&storage),
                latency.transactions_add,
                latency.transactions_update,
            )
            .await
            .context("Failed to load transactions")?,
        );
        let transfer_service =
            TransferService::new(Arc::clone(&transactions), config.transfers.clone());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            storage,
            auth,
            recipients,
            transactions,
            transfer_service,
        })
    }

    /// Payment summary for the user's transfers as of now
    pub fn payment_summary(&self, user_id: &str) -> domain::result::Result<PaymentSummary> {
        PaymentSummary::build(
            &self.transactions.list_by_user(user_id),
            chrono::Utc::now(),
        )
    }
}
