//! Summary command - totals over completed transfers

use anyhow::Result;
use colored::Colorize;
use remitpay_core::services::exchange::format_amount;

use super::{get_context, require_user};
use crate::output::create_table;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let summary = ctx.payment_summary(&user.id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Payment Summary".bold());
    println!("{}", "Completed transfers only".dimmed());
    println!();

    let mut table = create_table();
    table.add_row(vec![
        "Completed".to_string(),
        summary.completed_count.to_string(),
    ]);
    table.add_row(vec!["Total sent".to_string(), format_amount(summary.total_sent)]);
    table.add_row(vec!["Total fees".to_string(), format_amount(summary.total_fees)]);
    table.add_row(vec![
        "Average transfer".to_string(),
        format_amount(summary.average_sent),
    ]);
    println!("{}", table);
    println!();

    println!("{}", "Last 7 days".bold());
    let mut days = create_table();
    days.set_header(vec!["Day", "Sent"]);
    for day in &summary.last_7_days {
        days.add_row(vec![
            day.date.format("%a %b %-d").to_string(),
            format_amount(day.sent),
        ]);
    }
    println!("{}", days);

    if !summary.top_currencies.is_empty() {
        println!();
        println!("{}", "Top currencies".bold());
        let mut currencies = create_table();
        currencies.set_header(vec!["Currency", "Received"]);
        for c in &summary.top_currencies {
            currencies.add_row(vec![c.currency.clone(), format_amount(c.received)]);
        }
        println!("{}", currencies);
    }

    Ok(())
}
