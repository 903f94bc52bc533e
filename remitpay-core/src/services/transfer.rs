//! Transfer service - quoting and initiating a send

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TransferSettings;
use crate::domain::result::{Error, Result};
use crate::domain::{
    DeliveryMethod, FundingMethod, NewTransaction, Transaction, TransactionStatus, User,
};
use crate::services::exchange;
use crate::services::TransactionStore;

/// Priced transfer shown before confirmation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferQuote {
    pub send_amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub receive_amount: Decimal,
    pub funding: FundingMethod,
    /// Quoted fee after the funding method's adjustment
    pub fee: Decimal,
    pub total: Decimal,
}

/// Everything the send flow collects before confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub recipient_id: Option<String>,
    pub send_amount: Decimal,
    pub from_currency: String,
    pub to_currency: String,
    pub funding: FundingMethod,
    pub delivery_method: DeliveryMethod,
    pub notes: Option<String>,
}

pub struct TransferService {
    transactions: Arc<TransactionStore>,
    settings: TransferSettings,
}

impl TransferService {
    pub fn new(transactions: Arc<TransactionStore>, settings: TransferSettings) -> Self {
        Self {
            transactions,
            settings,
        }
    }

    pub fn settings(&self) -> &TransferSettings {
        &self.settings
    }

    /// Price a transfer for the chosen funding method
    pub fn quote(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        funding: FundingMethod,
    ) -> Result<TransferQuote> {
        let invalid_amount = || Error::validation("Please enter a valid amount");
        if amount <= Decimal::ZERO {
            return Err(invalid_amount());
        }

        let conversion = exchange::calculate(amount, from, to).ok_or_else(invalid_amount)?;
        let fee = funding.fee_for(conversion.fee);
        let total = amount.checked_add(fee).ok_or_else(invalid_amount)?;

        Ok(TransferQuote {
            send_amount: amount,
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate: conversion.rate,
            receive_amount: conversion.receive_amount,
            funding,
            fee,
            total,
        })
    }

    /// Create a processing transaction from a confirmed draft
    pub async fn initiate(&self, user: &User, draft: TransferDraft) -> Result<Transaction> {
        let recipient_id = draft
            .recipient_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| Error::validation("Please select a recipient"))?;

        let quote = self.quote(
            draft.send_amount,
            &draft.from_currency,
            &draft.to_currency,
            draft.funding,
        )?;

        let estimated_arrival = self.estimated_arrival(Utc::now())?;

        let id = self
            .transactions
            .add(NewTransaction {
                user_id: user.id.clone(),
                recipient_id: Some(recipient_id),
                payment_method_id: Some(draft.funding.as_str().to_string()),
                from_currency: quote.from_currency,
                to_currency: quote.to_currency,
                send_amount: quote.send_amount,
                receive_amount: quote.receive_amount,
                exchange_rate: quote.rate,
                fee_amount: quote.fee,
                total_amount: quote.total,
                status: TransactionStatus::Processing,
                delivery_method: Some(draft.delivery_method),
                estimated_arrival: Some(estimated_arrival),
                completed_at: None,
                notes: draft.notes,
            })
            .await?;

        self.transactions
            .get_by_id(&id)
            .ok_or_else(|| Error::not_found(format!("transaction {}", id)))
    }

    /// `now` plus the configured arrival window
    fn estimated_arrival(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let days = self.settings.estimated_arrival_days;
        if days < 0 {
            return Err(Error::config(format!(
                "estimatedArrivalDays must not be negative (got {})",
                days
            )));
        }
        ChronoDuration::try_days(days)
            .and_then(|window| now.checked_add_signed(window))
            .ok_or_else(|| {
                Error::config(format!("estimatedArrivalDays is too large (got {})", days))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use std::time::Duration;

    async fn service() -> TransferService {
        let storage = Arc::new(MemoryStore::new());
        let store = TransactionStore::load(storage, Duration::ZERO, Duration::ZERO)
            .await
            .unwrap();
        TransferService::new(Arc::new(store), TransferSettings::default())
    }

    fn draft(recipient_id: Option<&str>, funding: FundingMethod) -> TransferDraft {
        TransferDraft {
            recipient_id: recipient_id.map(str::to_string),
            send_amount: Decimal::new(100, 0),
            from_currency: "USD".to_string(),
            to_currency: "KES".to_string(),
            funding,
            delivery_method: DeliveryMethod::MobileMoney,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_quote_rejects_non_positive_amount() {
        let service = service().await;
        for amount in [Decimal::ZERO, Decimal::new(-5, 0)] {
            let err = service
                .quote(amount, "USD", "KES", FundingMethod::Card)
                .unwrap_err();
            assert_eq!(err.to_string(), "Please enter a valid amount");
        }
    }

    #[tokio::test]
    async fn test_wallet_quote_adds_surcharge() {
        let service = service().await;
        let card = service
            .quote(Decimal::new(100, 0), "USD", "KES", FundingMethod::Card)
            .unwrap();
        let wallet = service
            .quote(Decimal::new(100, 0), "USD", "KES", FundingMethod::Wallet)
            .unwrap();

        assert_eq!(card.fee, Decimal::new(489, 2));
        assert_eq!(wallet.fee, Decimal::new(589, 2));
        assert_eq!(wallet.total, Decimal::new(10589, 2));
        assert_eq!(wallet.receive_amount, card.receive_amount);
    }

    #[tokio::test]
    async fn test_quote_rejects_amount_that_overflows() {
        let service = service().await;
        let err = service
            .quote(Decimal::MAX / Decimal::from(100), "USD", "NGN", FundingMethod::Card)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid amount");

        // Converts fine but the fee pushes the total over the limit
        let err = service
            .quote(Decimal::MAX, "USD", "USD", FundingMethod::Wallet)
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid amount");
    }

    #[tokio::test]
    async fn test_initiate_rejects_unusable_arrival_window() {
        let storage = Arc::new(MemoryStore::new());
        let store = Arc::new(
            TransactionStore::load(storage, Duration::ZERO, Duration::ZERO)
                .await
                .unwrap(),
        );
        let user = User::new("user_1", "amy@example.com", "Amy");

        for days in [i64::MAX, -1] {
            let settings = TransferSettings {
                estimated_arrival_days: days,
                ..TransferSettings::default()
            };
            let service = TransferService::new(store.clone(), settings);
            let err = service
                .initiate(&user, draft(Some("recipient_1"), FundingMethod::Card))
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{}", err);
        }
        assert!(store.list_by_user("user_1").is_empty());
    }

    #[tokio::test]
    async fn test_initiate_requires_recipient() {
        let service = service().await;
        let user = User::new("user_1", "amy@example.com", "Amy");

        let err = service
            .initiate(&user, draft(None, FundingMethod::Card))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a recipient");
    }

    #[tokio::test]
    async fn test_initiate_creates_processing_transaction() {
        let service = service().await;
        let user = User::new("user_1", "amy@example.com", "Amy");

        let before = Utc::now();
        let tx = service
            .initiate(&user, draft(Some("recipient_1"), FundingMethod::Card))
            .await
            .unwrap();

        assert_eq!(tx.status, TransactionStatus::Processing);
        assert_eq!(tx.user_id, "user_1");
        assert_eq!(tx.delivery_method, Some(DeliveryMethod::MobileMoney));
        assert_eq!(tx.total_amount, tx.send_amount + tx.fee_amount);
        assert_eq!(tx.receive_amount, Decimal::new(12915, 0));

        let arrival = tx.estimated_arrival.unwrap();
        let days = (arrival - before).num_hours();
        assert!((71..=72).contains(&days), "arrival {} hours out", days);
    }
}
