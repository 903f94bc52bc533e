//! RemitPay CLI - send money abroad from your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use remitpay_core::{DeliveryMethod, FundingMethod, ProfileUpdate, TransactionStatus};
use rust_decimal::Decimal;

mod commands;
mod output;

use commands::{
    auth, currencies, history, logs, profile, quote, receipt, recipient, send, show, status,
    summary,
};

/// RemitPay - send money abroad from your terminal
#[derive(Parser)]
#[command(name = "rp", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported currencies
    Currencies {
        /// Show the exchange rate table instead
        #[arg(long)]
        rates: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Price a transfer without sending it
    Quote {
        /// Amount to send
        amount: Decimal,
        /// Sending currency (defaults to settings)
        #[arg(long)]
        from: Option<String>,
        /// Receiving currency (defaults to settings)
        #[arg(long)]
        to: Option<String>,
        /// How you pay: card, bank or wallet
        #[arg(long, default_value = "card")]
        funding: FundingMethod,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account and log in
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Password (or set REMITPAY_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (or set REMITPAY_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log out
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or edit your profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        postal_code: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage saved recipients
    Recipient {
        #[command(subcommand)]
        command: recipient::RecipientCommands,
    },

    /// Send money to a recipient
    Send {
        /// Recipient ID (prompts if omitted)
        #[arg(long)]
        recipient: Option<String>,
        /// Amount to send (prompts if omitted)
        #[arg(long)]
        amount: Option<Decimal>,
        /// Sending currency (defaults to settings)
        #[arg(long)]
        from: Option<String>,
        /// Receiving currency (defaults to the recipient's)
        #[arg(long)]
        to: Option<String>,
        /// How you pay: card, bank or wallet
        #[arg(long)]
        funding: Option<FundingMethod>,
        /// How they receive: bank, mobile or cash
        #[arg(long)]
        delivery: Option<DeliveryMethod>,
        /// Note attached to the transfer
        #[arg(long)]
        notes: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON (implies --yes)
        #[arg(long)]
        json: bool,
    },

    /// List your transfers, newest first
    History {
        /// Show at most N transfers
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only transfers with this status
        #[arg(long)]
        status: Option<TransactionStatus>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one transfer by reference number or ID
    Show {
        reference: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a transfer's status
    Status {
        reference: String,
        /// pending, processing, completed, failed or cancelled
        status: TransactionStatus,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print or save a receipt
    Receipt {
        reference: String,
        /// Write an HTML receipt instead of printing text
        #[arg(long)]
        html: bool,
        /// Directory for the HTML receipt (defaults to <data dir>/receipts)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Totals over completed transfers
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Currencies { rates, json } => currencies::run(rates, json),
        Commands::Quote { amount, from, to, funding, json } => {
            quote::run(amount, from, to, funding, json).await
        }
        Commands::Signup { email, name, password, json } => {
            auth::run_signup(email, name, password, json).await
        }
        Commands::Login { email, password, json } => auth::run_login(email, password, json).await,
        Commands::Logout => auth::run_logout().await,
        Commands::Whoami { json } => auth::run_whoami(json).await,
        Commands::Profile { name, email, phone, country, address, city, postal_code, json } => {
            let update = ProfileUpdate {
                email,
                full_name: name,
                phone,
                country,
                address,
                city,
                postal_code,
                kyc_verified: None,
            };
            profile::run(update, json).await
        }
        Commands::Recipient { command } => recipient::run(command).await,
        Commands::Send { recipient, amount, from, to, funding, delivery, notes, yes, json } => {
            send::run(send::SendArgs {
                recipient,
                amount,
                from,
                to,
                funding,
                delivery,
                notes,
                yes,
                json,
            })
            .await
        }
        Commands::History { limit, status, json } => history::run(limit, status, json).await,
        Commands::Show { reference, json } => show::run(&reference, json).await,
        Commands::Status { reference, status, json } => {
            status::run(&reference, status, json).await
        }
        Commands::Receipt { reference, html, out, json } => {
            receipt::run(&reference, html, out, json).await
        }
        Commands::Summary { json } => summary::run(json).await,
        Commands::Logs { command } => logs::run(command),
    }
}
