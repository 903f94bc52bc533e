//! CLI command implementations

pub mod auth;
pub mod currencies;
pub mod history;
pub mod logs;
pub mod profile;
pub mod quote;
pub mod receipt;
pub mod recipient;
pub mod send;
pub mod show;
pub mod status;
pub mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use remitpay_core::domain::is_reference_number;
use remitpay_core::services::{EntryPoint, LogEvent, LoggingService};
use remitpay_core::{RemitContext, Transaction, User};

/// Environment override for the data directory
pub const DATA_DIR_ENV: &str = "REMITPAY_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".remitpay"))
}

/// Open the context over the data directory
pub async fn get_context() -> Result<RemitContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    RemitContext::new(&data_dir)
        .await
        .context("Failed to initialize RemitPay context")
}

/// The signed-in user, or a hint to log in
pub fn require_user(ctx: &RemitContext) -> Result<User> {
    ctx.auth
        .current_user()
        .context("Not logged in. Run 'rp login' or 'rp signup' first.")
}

/// Look a transaction up by reference number or id, scoped to `user`
pub fn find_transaction(ctx: &RemitContext, user: &User, key: &str) -> Result<Transaction> {
    let found = if is_reference_number(key) {
        ctx.transactions.get_by_reference(key)
    } else {
        ctx.transactions.get_by_id(key)
    };

    found
        .filter(|t| t.user_id == user.id)
        .with_context(|| format!("Transaction '{}' not found", key))
}
