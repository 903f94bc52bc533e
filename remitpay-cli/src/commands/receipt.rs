//! Receipt command - print a text receipt or write the HTML one

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use remitpay_core::services::{receipt, LogEvent};

use super::{find_transaction, get_context, get_logger, log_event, require_user};

pub async fn run(key: &str, html: bool, out: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let tx = find_transaction(&ctx, &user, key)?;
    let recipient = tx.recipient_id.as_deref().and_then(|id| ctx.recipients.get(id));

    if !html {
        let text = receipt::render_text(&tx, recipient.as_ref(), user.display_name());
        if json {
            println!("{}", serde_json::json!({ "receipt": text }));
        } else {
            println!("{}", text);
        }
        return Ok(());
    }

    let dir = match out {
        Some(dir) => dir,
        None => ctx.data_dir.join("receipts"),
    };
    let path = receipt::write_html(&dir, &tx, recipient.as_ref(), user.display_name())
        .with_context(|| format!("Failed to write receipt to {}", dir.display()))?;

    log_event(
        &get_logger(),
        LogEvent::new("receipt_exported")
            .with_command("receipt")
            .with_reference(&tx.reference_number),
    );

    if json {
        println!("{}", serde_json::json!({ "path": path.to_string_lossy() }));
    } else {
        println!("{} Receipt saved to {}", "✓".green(), path.display());
    }
    Ok(())
}
