//! Send command - quote, confirm and initiate a transfer

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input, Select};
use remitpay_core::domain::DELIVERY_OPTIONS;
use remitpay_core::services::exchange::{format_currency, format_rate};
use remitpay_core::services::{LogEvent, TransferDraft};
use remitpay_core::{DeliveryMethod, FundingMethod, Recipient, RemitContext, User};
use rust_decimal::Decimal;

use super::{get_context, get_logger, log_event, require_user};
use crate::output::{create_table, short_date, status_label};

/// Flags collected by `rp send`
pub struct SendArgs {
    pub recipient: Option<String>,
    pub amount: Option<Decimal>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub funding: Option<FundingMethod>,
    pub delivery: Option<DeliveryMethod>,
    pub notes: Option<String>,
    pub yes: bool,
    pub json: bool,
}

pub async fn run(args: SendArgs) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let logger = get_logger();

    let defaults = ctx.transfer_service.settings();
    let from = args
        .from
        .unwrap_or_else(|| defaults.default_from_currency.clone())
        .to_uppercase();

    let recipient = pick_recipient(&ctx, &user, args.recipient.as_deref(), args.to.as_deref())?;
    let to = args
        .to
        .map(|t| t.to_uppercase())
        .unwrap_or_else(|| recipient.currency.clone());

    let amount = match args.amount {
        Some(a) => a,
        None => {
            let raw: String = Input::new()
                .with_prompt(format!("Amount in {}", from))
                .interact_text()?;
            raw.trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Please enter a valid amount"))?
        }
    };

    let funding = match args.funding {
        Some(f) => f,
        None => pick_funding()?,
    };
    let delivery = match args.delivery {
        Some(d) => d,
        None => pick_delivery()?,
    };

    // Validates the amount before anything is shown
    let quote = ctx.transfer_service.quote(amount, &from, &to, funding)?;

    if !args.json {
        let mut table = create_table();
        table.add_row(vec!["Recipient".to_string(), recipient.full_name.clone()]);
        table.add_row(vec!["Delivers to".to_string(), recipient.delivery_summary()]);
        table.add_row(vec![
            "You send".to_string(),
            format_currency(quote.send_amount, &quote.from_currency),
        ]);
        table.add_row(vec![
            "Exchange rate".to_string(),
            format_rate(quote.rate, &quote.from_currency, &quote.to_currency),
        ]);
        table.add_row(vec![
            "Fee".to_string(),
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
        table.add_row(vec!["Payment".to_string(), funding.name().to_string()]);
        table.add_row(vec!["Delivery".to_string(), delivery.label()]);
        println!("{}", table);
    }

    if !args.yes
        && !args.json
        && !Confirm::new()
            .with_prompt("Confirm and send?")
            .default(true)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let draft = TransferDraft {
        recipient_id: Some(recipient.id.clone()),
        send_amount: amount,
        from_currency: from,
        to_currency: to,
        funding,
        delivery_method: delivery,
        notes: args.notes,
    };

    let tx = match ctx.transfer_service.initiate(&user, draft).await {
        Ok(tx) => tx,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("transfer_failed")
                    .with_command("send")
                    .with_store("transactions")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::new("transfer_initiated")
            .with_command("send")
            .with_store("transactions")
            .with_reference(&tx.reference_number),
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tx)?);
        return Ok(());
    }

    println!();
    println!("{} Payment sent! Your money is on its way.", "✓".green());
    println!("  Reference: {}", tx.reference_number.bold());
    println!("  Status: {}", status_label(tx.status));
    if let Some(arrival) = tx.estimated_arrival {
        println!("  Estimated arrival: {}", short_date(arrival));
    }
    println!(
        "{}",
        format!("Run 'rp receipt {}' for a receipt.", tx.reference_number).dimmed()
    );
    Ok(())
}

/// Explicit id, or an interactive choice among the user's recipients
fn pick_recipient(
    ctx: &RemitContext,
    user: &User,
    id: Option<&str>,
    currency: Option<&str>,
) -> Result<Recipient> {
    if let Some(id) = id {
        return ctx
            .recipients
            .get(id)
            .filter(|r| r.user_id == user.id)
            .with_context(|| format!("Recipient '{}' not found", id));
    }

    let candidates = match currency {
        Some(c) => ctx
            .recipients
            .list_by_user_and_currency(&user.id, &c.to_uppercase()),
        None => ctx.recipients.list_by_user(&user.id),
    };
    if candidates.is_empty() {
        anyhow::bail!("Please select a recipient. Add one with 'rp recipient add'.");
    }

    let items: Vec<String> = candidates
        .iter()
        .map(|r| format!("{} ({}) {}", r.full_name, r.currency, r.delivery_summary()))
        .collect();
    let index = Select::new()
        .with_prompt("Send to")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(candidates[index].clone())
}

fn pick_funding() -> Result<FundingMethod> {
    let items: Vec<String> = FundingMethod::ALL
        .iter()
        .map(|f| format!("{} - {}", f.name(), f.arrival()))
        .collect();
    let index = Select::new()
        .with_prompt("Pay with")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(FundingMethod::ALL[index])
}

fn pick_delivery() -> Result<DeliveryMethod> {
    let items: Vec<String> = DELIVERY_OPTIONS
        .iter()
        .map(|o| format!("{} - {} ({})", o.name, o.arrival, o.fee))
        .collect();
    let index = Select::new()
        .with_prompt("Delivery")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(DELIVERY_OPTIONS[index].method)
}
