//! Receipt rendering - shareable text and a standalone HTML document

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::result::Result;
use crate::domain::{DeliveryMethod, Recipient, Transaction};
use crate::services::exchange::{format_currency, format_rate};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━";
const NOT_AVAILABLE: &str = "N/A";

/// `January 1, 2025, 12:00 AM` (UTC)
pub fn format_receipt_date(at: DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %I:%M %p").to_string()
}

/// Plain-text receipt for sharing
///
/// A deleted or unknown recipient renders as `N/A`.
pub fn render_text(
    transaction: &Transaction,
    recipient: Option<&Recipient>,
    sender_name: &str,
) -> String {
    let recipient_name = recipient.map_or(NOT_AVAILABLE, |r| r.full_name.as_str());
    let mut out = String::new();

    let _ = writeln!(out, "{}\n   PAYMENT RECEIPT\n{}\n", RULE, RULE);
    let _ = writeln!(out, "Reference: {}\n", transaction.reference_number);
    let _ = writeln!(out, "From: {}", sender_name);
    let _ = writeln!(out, "To: {}\n", recipient_name);

    section(&mut out, "TRANSACTION DETAILS");
    for (label, value) in amount_rows(transaction) {
        if label == "Amount Received" {
            out.push('\n');
        }
        let _ = writeln!(out, "{}: {}", label, value);
    }
    out.push('\n');

    section(&mut out, "DELIVERY DETAILS");
    for (label, value) in delivery_rows(transaction) {
        let _ = writeln!(out, "{}: {}", label, value);
    }
    out.push('\n');

    section(&mut out, "RECIPIENT INFORMATION");
    for (label, value) in recipient_rows(recipient) {
        let _ = writeln!(out, "{}: {}", label, value);
    }
    out.push('\n');

    let _ = writeln!(out, "{}\n", RULE);
    out.push_str("Thank you for your transfer!");
    out
}

/// Standalone HTML receipt; every interpolated value is escaped
pub fn render_html(
    transaction: &Transaction,
    recipient: Option<&Recipient>,
    sender_name: &str,
) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(
        out,
        "<title>Receipt {}</title>",
        escape_html(&transaction.reference_number)
    );
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n<div class=\"receipt\">\n");

    out.push_str("<div class=\"header\">\n<h1>Payment Successful!</h1>\n");
    out.push_str("<p>Your money is on its way</p>\n</div>\n");

    let _ = writeln!(
        out,
        "<div class=\"reference\"><span>Reference Number</span><strong>{}</strong></div>",
        escape_html(&transaction.reference_number)
    );

    html_section(
        &mut out,
        "Parties",
        &[
            ("From", sender_name.to_string()),
            (
                "To",
                recipient.map_or(NOT_AVAILABLE.to_string(), |r| r.full_name.clone()),
            ),
        ],
    );
    html_section(&mut out, "Amount Details", &amount_rows(transaction));
    html_section(&mut out, "Recipient", &recipient_rows(recipient));
    html_section(&mut out, "Delivery", &delivery_rows(transaction));

    out.push_str("<div class=\"footer\">\n<strong>RemitPay</strong>\n");
    out.push_str("<p>Thank you for your transfer!</p>\n</div>\n");
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

/// `receipt_<reference>.html`
pub fn html_file_name(transaction: &Transaction) -> String {
    format!("receipt_{}.html", transaction.reference_number)
}

/// Write the HTML receipt into `dir` and return its path
pub fn write_html(
    dir: &Path,
    transaction: &Transaction,
    recipient: Option<&Recipient>,
    sender_name: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(html_file_name(transaction));
    std::fs::write(&path, render_html(transaction, recipient, sender_name))?;
    Ok(path)
}

/// Minimal escaping for text and attribute content
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}\n{}\n{}\n", RULE, title, RULE);
}

fn html_section(out: &mut String, title: &str, rows: &[(&str, String)]) {
    let _ = writeln!(out, "<div class=\"section\">\n<h2>{}</h2>", escape_html(title));
    for (label, value) in rows {
        let _ = writeln!(
            out,
            "<div class=\"row\"><span>{}</span><span>{}</span></div>",
            escape_html(label),
            escape_html(value)
        );
    }
    out.push_str("</div>\n");
}

fn amount_rows(tx: &Transaction) -> Vec<(&'static str, String)> {
    vec![
        ("Amount Sent", format_currency(tx.send_amount, &tx.from_currency)),
        (
            "Exchange Rate",
            format_rate(tx.exchange_rate, &tx.from_currency, &tx.to_currency),
        ),
        ("Fee", format_currency(tx.fee_amount, &tx.from_currency)),
        ("Total Paid", format_currency(tx.total_amount, &tx.from_currency)),
        ("Amount Received", format_currency(tx.receive_amount, &tx.to_currency)),
    ]
}

fn delivery_rows(tx: &Transaction) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Method", DeliveryMethod::display(tx.delivery_method)),
        ("Status", tx.status.as_str().to_uppercase()),
        ("Date", format_receipt_date(tx.created_at)),
    ];
    if let Some(arrival) = tx.estimated_arrival {
        rows.push(("Est. Arrival", format_receipt_date(arrival)));
    }
    rows
}

fn recipient_rows(recipient: Option<&Recipient>) -> Vec<(&'static str, String)> {
    let Some(r) = recipient else {
        return vec![
            ("Name", NOT_AVAILABLE.to_string()),
            ("Country", NOT_AVAILABLE.to_string()),
        ];
    };

    let mut rows = vec![("Name", r.full_name.clone()), ("Country", r.country.clone())];
    if let Some(bank) = &r.bank_name {
        rows.push(("Bank", bank.clone()));
    }
    if let Some(account) = &r.account_number {
        rows.push(("Account", account.clone()));
    }
    if let Some(provider) = &r.mobile_money_provider {
        rows.push(("Provider", provider.clone()));
    }
    rows
}

const STYLE: &str = r#"<style>
body {
  font-family: -apple-system, Helvetica, Arial, sans-serif;
  background: #0a0a0a; color: #fff; margin: 0; padding: 24px;
}
.receipt {
  max-width: 560px; margin: 0 auto; background: #171717;
  border-radius: 16px; padding: 32px;
}
.header { text-align: center; margin-bottom: 24px; }
.header h1 { color: #a3e635; margin: 0 0 8px; }
.reference {
  display: flex; flex-direction: column; align-items: center; padding: 16px 0;
  border-top: 1px solid #262626; border-bottom: 1px solid #262626;
}
.reference strong { font-family: monospace; font-size: 18px; margin-top: 4px; }
.section { padding: 16px 0; border-bottom: 1px solid #262626; }
.section h2 { font-size: 14px; text-transform: uppercase; color: #a3a3a3; }
.row { display: flex; justify-content: space-between; padding: 6px 0; }
.footer { text-align: center; padding-top: 24px; color: #a3a3a3; }
.footer strong { color: #a3e635; }
</style>
"#;
