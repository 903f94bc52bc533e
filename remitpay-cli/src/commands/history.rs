//! History command - the user's transfers, newest first

use anyhow::Result;
use remitpay_core::services::exchange::format_currency;
use remitpay_core::TransactionStatus;

use super::{get_context, require_user};
use crate::output::{create_table, short_date, status_label};

pub async fn run(
    limit: Option<usize>,
    status: Option<TransactionStatus>,
    json: bool,
) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;

    let transactions: Vec<_> = ctx
        .transactions
        .list_by_user(&user.id)
        .into_iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions yet. Send money with 'rp send'.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Date", "Reference", "To", "Sent", "Received", "Status"]);
    for t in &transactions {
        table.add_row(vec![
            short_date(t.created_at),
            t.reference_number.clone(),
            ctx.recipients.name_or_unknown(t.recipient_id.as_deref()),
            format_currency(t.send_amount, &t.from_currency),
            format_currency(t.receive_amount, &t.to_currency),
            status_label(t.status).to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
