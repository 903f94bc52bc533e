//! Auth commands - signup, login, logout, whoami

use std::env;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use remitpay_core::services::LogEvent;

use super::{get_context, get_logger, log_event};

/// Environment variable consulted before prompting for a password
pub const PASSWORD_ENV: &str = "REMITPAY_PASSWORD";

/// Get password from --password flag, REMITPAY_PASSWORD env var, or prompt
fn get_password_or_prompt(password_flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var(PASSWORD_ENV) {
        return Ok(p);
    }

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub async fn run_signup(
    email: Option<String>,
    full_name: Option<String>,
    password: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context().await?;
    let logger = get_logger();

    let full_name = value_or_prompt(full_name, "Full name")?;
    let email = value_or_prompt(email, "Email")?;
    let password = get_password_or_prompt(password, true)?;

    match ctx.auth.sign_up(&email, &password, &full_name).await {
        Ok(user) => {
            log_event(
                &logger,
                LogEvent::new("sign_up_completed").with_command("signup").with_store("auth"),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} Welcome to RemitPay, {}", "✓".green(), user.display_name());
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("sign_up_failed")
                    .with_command("signup")
                    .with_store("auth")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}

pub async fn run_login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let logger = get_logger();

    let email = value_or_prompt(email, "Email")?;
    let password = get_password_or_prompt(password, false)?;

    match ctx.auth.sign_in(&email, &password).await {
        Ok(user) => {
            log_event(
                &logger,
                LogEvent::new("sign_in_completed").with_command("login").with_store("auth"),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} Welcome back, {}", "✓".green(), user.display_name());
            }
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("sign_in_failed")
                    .with_command("login")
                    .with_store("auth")
                    .with_error(e.to_string()),
            );
            Err(e.into())
        }
    }
}

pub async fn run_logout() -> Result<()> {
    let ctx = get_context().await?;
    if !ctx.auth.is_authenticated() {
        println!("{}", "Not logged in".dimmed());
        return Ok(());
    }

    ctx.auth.sign_out().await?;
    log_event(
        &get_logger(),
        LogEvent::new("signed_out").with_command("logout").with_store("auth"),
    );
    println!("Logged out");
    Ok(())
}

pub async fn run_whoami(json: bool) -> Result<()> {
    let ctx = get_context().await?;
    let user = ctx.auth.current_user();

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    match user {
        Some(user) => {
            println!("{}", user.display_name().bold());
            println!("  {}", user.email);
            println!("  ID: {}", user.id.dimmed());
            let kyc = if user.kyc_verified {
                "verified".green()
            } else {
                "not verified".yellow()
            };
            println!("  KYC: {}", kyc);
        }
        None => println!("{}", "Not logged in".dimmed()),
    }
    Ok(())
}
