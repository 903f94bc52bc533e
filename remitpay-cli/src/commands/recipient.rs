//! Recipient commands - manage saved payees

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use remitpay_core::services::LogEvent;
use remitpay_core::{NewRecipient, RecipientUpdate};

use super::{get_context, get_logger, log_event, require_user};
use crate::output::{create_table, short_date};

/// Optional recipient details shared by add and update
#[derive(Args, Default)]
pub struct RecipientFields {
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Bank account number
    #[arg(long)]
    pub account_number: Option<String>,
    /// Bank name
    #[arg(long)]
    pub bank_name: Option<String>,
    /// SWIFT/BIC code
    #[arg(long)]
    pub swift_code: Option<String>,
    /// Mobile money provider (e.g. M-Pesa)
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Subcommand)]
pub enum RecipientCommands {
    /// Save a new recipient
    Add {
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Country
        #[arg(long)]
        country: Option<String>,
        /// Currency the recipient receives
        #[arg(long)]
        currency: Option<String>,
        #[command(flatten)]
        fields: RecipientFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved recipients
    List {
        /// Only recipients receiving this currency
        #[arg(long)]
        currency: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a saved recipient
    Update {
        /// Recipient ID
        id: String,
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Country
        #[arg(long)]
        country: Option<String>,
        /// Currency the recipient receives
        #[arg(long)]
        currency: Option<String>,
        #[command(flatten)]
        fields: RecipientFields,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved recipient
    Remove {
        /// Recipient ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: RecipientCommands) -> Result<()> {
    match command {
        RecipientCommands::Add {
            name,
            country,
            currency,
            fields,
            json,
        } => run_add(name, country, currency, fields, json).await,
        RecipientCommands::List { currency, json } => run_list(currency, json).await,
        RecipientCommands::Update {
            id,
            name,
            country,
            currency,
            fields,
            json,
        } => {
            let update = RecipientUpdate {
                full_name: name,
                email: fields.email,
                phone: fields.phone,
                country,
                currency: currency.map(|c| c.to_uppercase()),
                account_number: fields.account_number,
                bank_name: fields.bank_name,
                swift_code: fields.swift_code,
                mobile_money_provider: fields.provider,
            };
            run_update(&id, update, json).await
        }
        RecipientCommands::Remove { id, force } => run_remove(&id, force).await,
    }
}

async fn run_add(
    name: Option<String>,
    country: Option<String>,
    currency: Option<String>,
    fields: RecipientFields,
    json: bool,
) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Full name").interact_text()?,
    };
    let country = match country {
        Some(c) => c,
        None => Input::new().with_prompt("Country").interact_text()?,
    };
    let currency = match currency {
        Some(c) => c,
        None => Input::new()
            .with_prompt("Currency")
            .default(ctx.config.transfers.default_to_currency.clone())
            .interact_text()?,
    };

    let mut recipient = NewRecipient::new(&user.id, name, country, currency.to_uppercase());
    recipient.email = fields.email;
    recipient.phone = fields.phone;
    recipient.account_number = fields.account_number;
    recipient.bank_name = fields.bank_name;
    recipient.swift_code = fields.swift_code;
    recipient.mobile_money_provider = fields.provider;

    let logger = get_logger();
    let created = match ctx.recipients.add(recipient).await {
        Ok(r) => r,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("recipient_add_failed")
                    .with_command("recipient add")
                    .with_store("recipients")
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };
    log_event(
        &logger,
        LogEvent::new("recipient_added")
            .with_command("recipient add")
            .with_store("recipients"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&created)?);
    } else {
        println!("{} Recipient saved", "✓".green());
        println!("  ID: {}", created.id);
        println!("  {} ({}, {})", created.full_name, created.country, created.currency);
    }
    Ok(())
}

async fn run_list(currency: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;

    let recipients = match currency {
        Some(c) => ctx
            .recipients
            .list_by_user_and_currency(&user.id, &c.to_uppercase()),
        None => ctx.recipients.list_by_user(&user.id),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipients)?);
        return Ok(());
    }

    if recipients.is_empty() {
        println!("No recipients yet. Add one with 'rp recipient add'.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Name", "Country", "Currency", "Delivers to", "Added"]);
    for r in &recipients {
        table.add_row(vec![
            r.id.clone(),
            r.full_name.clone(),
            r.country.clone(),
            r.currency.clone(),
            r.delivery_summary(),
            short_date(r.created_at),
        ]);
    }
    println!("{}", table);
    Ok(())
}

async fn run_update(id: &str, update: RecipientUpdate, json: bool) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to update. Pass at least one field, e.g. --phone.");
    }

    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    owned_recipient(&ctx, &user.id, id)?;

    let updated = ctx
        .recipients
        .update(id, update)
        .await?
        .with_context(|| format!("Recipient '{}' not found", id))?;
    log_event(
        &get_logger(),
        LogEvent::new("recipient_updated")
            .with_command("recipient update")
            .with_store("recipients"),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&updated)?);
    } else {
        println!("{} Recipient '{}' updated", "✓".green(), updated.full_name);
    }
    Ok(())
}

async fn run_remove(id: &str, force: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = require_user(&ctx)?;
    let recipient = owned_recipient(&ctx, &user.id, id)?;

    if !force {
        println!(
            "\n{}",
            format!("This will delete '{}'.", recipient.full_name).yellow()
        );
        println!("{}\n", "Past transfers to them are kept.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.recipients.delete(id).await?;
    log_event(
        &get_logger(),
        LogEvent::new("recipient_removed")
            .with_command("recipient remove")
            .with_store("recipients"),
    );
    println!("{} Recipient '{}' removed", "✓".green(), recipient.full_name);
    Ok(())
}

fn owned_recipient(
    ctx: &remitpay_core::RemitContext,
    user_id: &str,
    id: &str,
) -> Result<remitpay_core::Recipient> {
    ctx.recipients
        .get(id)
        .filter(|r| r.user_id == user_id)
        .with_context(|| format!("Recipient '{}' not found", id))
}
