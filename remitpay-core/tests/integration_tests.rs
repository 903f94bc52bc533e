//! Integration tests for remitpay-core
//!
//! These run the full context over a real data directory: JSON documents on
//! disk through the file adapter, with latency simulation turned off.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;

use rust_decimal::Decimal;
use tempfile::TempDir;

use remitpay_core::config::Config;
use remitpay_core::services::{receipt, TransferDraft, RECIPIENTS_KEY, TRANSACTIONS_KEY};
use remitpay_core::{
    DeliveryMethod, FundingMethod, NewRecipient, ProfileUpdate, RemitContext, TransactionStatus,
    TransactionUpdate,
};

// ============================================================================
// Test Helpers
// ============================================================================

async fn open_context(dir: &Path) -> RemitContext {
    RemitContext::with_config(dir, Config::without_latency())
        .await
        .expect("Failed to open context")
}

fn mobile_recipient(user_id: &str) -> NewRecipient {
    let mut r = NewRecipient::new(user_id, "Amina Otieno", "Kenya", "KES");
    r.mobile_money_provider = Some("M-Pesa".to_string());
    r.phone = Some("+254700000001".to_string());
    r
}

fn draft(recipient_id: &str) -> TransferDraft {
    TransferDraft {
        recipient_id: Some(recipient_id.to_string()),
        send_amount: Decimal::new(100, 0),
        from_currency: "USD".to_string(),
        to_currency: "KES".to_string(),
        funding: FundingMethod::Wallet,
        delivery_method: DeliveryMethod::MobileMoney,
        notes: Some("School fees".to_string()),
    }
}

// ============================================================================
// Persistence Across Contexts
// ============================================================================

#[tokio::test]
async fn test_session_shared_between_contexts() {
    let temp_dir = TempDir::new().unwrap();

    let user = {
        let ctx = open_context(temp_dir.path()).await;
        ctx.auth
            .sign_up("amy@example.com", "pw", "Amy Mwangi")
            .await
            .unwrap()
    };

    let ctx = open_context(temp_dir.path()).await;
    assert!(ctx.auth.is_authenticated());
    assert_eq!(ctx.auth.current_user(), Some(user));

    ctx.auth.sign_out().await.unwrap();
    let ctx = open_context(temp_dir.path()).await;
    assert!(!ctx.auth.is_authenticated());
}

#[tokio::test]
async fn test_store_documents_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(temp_dir.path()).await;

    let user = ctx
        .auth
        .sign_up("amy@example.com", "pw", "Amy")
        .await
        .unwrap();
    ctx.recipients.add(mobile_recipient(&user.id)).await.unwrap();

    let raw = std::fs::read_to_string(temp_dir.path().join(format!("{}.json", RECIPIENTS_KEY)))
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["version"], 0);
    assert_eq!(json["state"]["recipients"][0]["full_name"], "Amina Otieno");

    let users = std::fs::read_to_string(temp_dir.path().join("users.json")).unwrap();
    let users: serde_json::Value = serde_json::from_str(&users).unwrap();
    assert!(users.is_array());
    assert_eq!(users[0]["password"], "pw");
}

#[tokio::test]
async fn test_profile_update_persists() {
    let temp_dir = TempDir::new().unwrap();
    {
        let ctx = open_context(temp_dir.path()).await;
        ctx.auth.sign_up("amy@example.com", "pw", "Amy").await.unwrap();
        ctx.auth
            .update_profile(ProfileUpdate {
                phone: Some("+15550001111".to_string()),
                country: Some("United States".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let ctx = open_context(temp_dir.path()).await;
    let user = ctx.auth.current_user().unwrap();
    assert_eq!(user.phone.as_deref(), Some("+15550001111"));
    assert_eq!(user.country.as_deref(), Some("United States"));
}

// ============================================================================
// Send Flow
// ============================================================================

#[tokio::test]
async fn test_send_flow_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(temp_dir.path()).await;

    let user = ctx
        .auth
        .sign_up("amy@example.com", "pw", "Amy Mwangi")
        .await
        .unwrap();
    let recipient = ctx.recipients.add(mobile_recipient(&user.id)).await.unwrap();

    let tx = ctx
        .transfer_service
        .initiate(&user, draft(&recipient.id))
        .await
        .unwrap();

    assert_eq!(tx.status, TransactionStatus::Processing);
    assert_eq!(tx.fee_amount, Decimal::new(589, 2));
    assert_eq!(tx.total_amount, Decimal::new(10589, 2));
    assert_eq!(tx.receive_amount, Decimal::new(12915, 0));
    assert_eq!(tx.payment_method_id.as_deref(), Some("wallet"));

    // Reopen and find it by id and by reference
    let ctx = open_context(temp_dir.path()).await;
    assert_eq!(ctx.transactions.get_by_id(&tx.id), Some(tx.clone()));
    assert_eq!(
        ctx.transactions.get_by_reference(&tx.reference_number).map(|t| t.id),
        Some(tx.id.clone())
    );

    let text = receipt::render_text(&tx, ctx.recipients.get(&recipient.id).as_ref(), "Amy Mwangi");
    assert!(text.contains("To: Amina Otieno"));
    assert!(text.contains("Provider: M-Pesa"));
    assert!(text.contains("Fee: $5.89"));

    let path = receipt::write_html(temp_dir.path(), &tx, None, "Amy Mwangi").unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_deleted_recipient_keeps_transaction() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(temp_dir.path()).await;

    let user = ctx.auth.sign_up("amy@example.com", "pw", "Amy").await.unwrap();
    let recipient = ctx.recipients.add(mobile_recipient(&user.id)).await.unwrap();
    let tx = ctx
        .transfer_service
        .initiate(&user, draft(&recipient.id))
        .await
        .unwrap();

    assert!(ctx.recipients.delete(&recipient.id).await.unwrap());

    let history = ctx.transactions.list_by_user(&user.id);
    assert_eq!(history.len(), 1);
    assert_eq!(
        ctx.recipients.name_or_unknown(history[0].recipient_id.as_deref()),
        "Unknown"
    );

    let text = receipt::render_text(&tx, None, user.display_name());
    assert!(text.contains("To: N/A"));
}

#[tokio::test]
async fn test_summary_counts_completed_only() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(temp_dir.path()).await;

    let user = ctx.auth.sign_up("amy@example.com", "pw", "Amy").await.unwrap();
    let recipient = ctx.recipients.add(mobile_recipient(&user.id)).await.unwrap();

    let first = ctx
        .transfer_service
        .initiate(&user, draft(&recipient.id))
        .await
        .unwrap();
    ctx.transfer_service
        .initiate(&user, draft(&recipient.id))
        .await
        .unwrap();

    ctx.transactions
        .update(&first.id, TransactionUpdate::status(TransactionStatus::Completed))
        .await
        .unwrap();

    let summary = ctx.payment_summary(&user.id).unwrap();
    assert_eq!(summary.completed_count, 1);
    assert_eq!(summary.total_sent, Decimal::new(100, 0));
    assert_eq!(summary.last_7_days[6].sent, Decimal::new(100, 0));
    assert_eq!(summary.top_currencies[0].currency, "KES");
}

#[tokio::test]
async fn test_corrupt_document_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(format!("{}.json", TRANSACTIONS_KEY)),
        "{ not json",
    )
    .unwrap();

    let result = RemitContext::with_config(temp_dir.path(), Config::without_latency()).await;
    let err = result.err().expect("corrupt transactions must not load");
    assert!(format!("{:#}", err).contains("Failed to load transactions"));
}
