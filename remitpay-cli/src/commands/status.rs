//! Status command - override a transfer's status

use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use remitpay_core::services::LogEvent;
use remitpay_core::{TransactionStatus, TransactionUpdate};

use super::{find_transaction, get_context, get_logger, log_event, require_user};
use crate::output::status_label;

/// Any status may follow any other; `completed` also stamps completed_at
pub async fn run(key: &str, status: TransactionStatus, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let tx = find_transaction(&ctx, &user, key)?;

    let mut update = TransactionUpdate::status(status);
    if status == TransactionStatus::Completed && tx.completed_at.is_none() {
        update.completed_at = Some(Utc::now());
    }

    let updated = ctx
        .transactions
        .update(&tx.id, update)
        .await?
        .with_context(|| format!("Transaction '{}' not found", key))?;

    log_event(
        &get_logger(),
        LogEvent::new("transaction_status_changed")
            .with_command("status")
            .with_store("transactions")
            .with_reference(&updated.reference_number),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!(
            "{} {} is now {}",
            "✓".green(),
            updated.reference_number,
            status_label(updated.status)
        );
    }
    Ok(())
}
