//! Quote command - price a transfer without sending it

use anyhow::Result;
use colored::Colorize;
use remitpay_core::services::exchange::{format_currency, format_rate};
use remitpay_core::FundingMethod;
use rust_decimal::Decimal;

use super::get_context;
use crate::output::create_table;

pub async fn run(
    amount: Decimal,
    from: Option<String>,
    to: Option<String>,
    funding: FundingMethod,
    json: bool,
) -> Result<()> {
    let ctx = get_context().await?;
    let defaults = ctx.transfer_service.settings();
    let from = from
        .unwrap_or_else(|| defaults.default_from_currency.clone())
        .to_uppercase();
    let to = to
        .unwrap_or_else(|| defaults.default_to_currency.clone())
        .to_uppercase();

    let quote = ctx.transfer_service.quote(amount, &from, &to, funding)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    let mut table = create_table();
    table.add_row(vec![
        "You send".to_string(),
        format_currency(quote.send_amount, &quote.from_currency),
    ]);
    table.add_row(vec![
        "Exchange rate".to_string(),
        format_rate(quote.rate, &quote.from_currency, &quote.to_currency),
    ]);
    table.add_row(vec![
        format!("Fee ({})", funding.name()),
        format_currency(quote.fee, &quote.from_currency),
    ]);
    table.add_row(vec![
        "Total to pay".to_string(),
        format_currency(quote.total, &quote.from_currency),
    ]);
    table.add_row(vec![
        "Recipient gets".to_string(),
        format_currency(quote.receive_amount, &quote.to_currency),
    ]);
    println!("{}", table);
    println!("{}", funding.arrival().dimmed());

    Ok(())
}
