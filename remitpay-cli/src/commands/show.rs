//! Show command - details of one transfer

use anyhow::Result;
use colored::Colorize;
use remitpay_core::services::exchange::{format_currency, format_rate};
use remitpay_core::services::receipt::format_receipt_date;
use remitpay_core::DeliveryMethod;

use super::{find_transaction, get_context, require_user};
use crate::output::{create_table, status_label};

pub async fn run(key: &str, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let tx = find_transaction(&ctx, &user, key)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tx)?);
        return Ok(());
    }

    println!("{} {}", "Transfer".bold(), tx.reference_number.bold());
    println!("  Status: {}", status_label(tx.status));
    println!();

    let mut table = create_table();
    table.add_row(vec![
        "To".to_string(),
        ctx.recipients.name_or_unknown(tx.recipient_id.as_deref()),
    ]);
    table.add_row(vec![
        "You sent".to_string(),
        format_currency(tx.send_amount, &tx.from_currency),
    ]);
    table.add_row(vec![
        "Exchange rate".to_string(),
        format_rate(tx.exchange_rate, &tx.from_currency, &tx.to_currency),
    ]);
    table.add_row(vec![
        "Fee".to_string(),
        format_currency(tx.fee_amount, &tx.from_currency),
    ]);
    table.add_row(vec![
        "Total paid".to_string(),
        format_currency(tx.total_amount, &tx.from_currency),
    ]);
    table.add_row(vec![
        "Recipient receives".to_string(),
        format_currency(tx.receive_amount, &tx.to_currency),
    ]);
    table.add_row(vec![
        "Delivery".to_string(),
        DeliveryMethod::display(tx.delivery_method),
    ]);
    table.add_row(vec!["Created".to_string(), format_receipt_date(tx.created_at)]);
    if let Some(arrival) = tx.estimated_arrival {
        table.add_row(vec!["Est. arrival".to_string(), format_receipt_date(arrival)]);
    }
    if let Some(completed) = tx.completed_at {
        table.add_row(vec!["Completed".to_string(), format_receipt_date(completed)]);
    }
    if let Some(notes) = &tx.notes {
        table.add_row(vec!["Notes".to_string(), notes.clone()]);
    }
    table.add_row(vec!["ID".to_string(), tx.id.clone()]);
    println!("{}", table);

    Ok(())
}
