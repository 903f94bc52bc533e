//! Profile command - show or edit the signed-in user's profile

use anyhow::Result;
use colored::Colorize;
use remitpay_core::services::LogEvent;
use remitpay_core::{ProfileUpdate, User};

use super::{get_context, get_logger, log_event, require_user};
use crate::output::create_table;

pub async fn run(update: ProfileUpdate, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let mut user = require_user(&ctx)?;

    if !update.is_empty() {
        user = ctx.auth.update_profile(update).await?;
        log_event(
            &get_logger(),
            LogEvent::new("profile_updated").with_command("profile").with_store("auth"),
        );
        if !json {
            println!("{} Profile updated", "✓".green());
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    print_profile(&user);
    Ok(())
}

fn print_profile(user: &User) {
    let dash = || "-".to_string();

    let mut table = create_table();
    table.add_row(vec!["Name".to_string(), user.full_name.clone()]);
    table.add_row(vec!["Email".to_string(), user.email.clone()]);
    table.add_row(vec!["Phone".to_string(), user.phone.clone().unwrap_or_else(dash)]);
    table.add_row(vec!["Country".to_string(), user.country.clone().unwrap_or_else(dash)]);
    table.add_row(vec!["Address".to_string(), user.address.clone().unwrap_or_else(dash)]);
    table.add_row(vec!["City".to_string(), user.city.clone().unwrap_or_else(dash)]);
    table.add_row(vec![
        "Postal code".to_string(),
        user.postal_code.clone().unwrap_or_else(dash),
    ]);
    table.add_row(vec![
        "KYC".to_string(),
        if user.kyc_verified { "Verified" } else { "Not verified" }.to_string(),
    ]);
    table.add_row(vec![
        "Member since".to_string(),
        user.created_at.format("%B %Y").to_string(),
    ]);
    println!("{}", table);
}
