//! Currencies command - list supported currencies and the rate table

use anyhow::Result;
use colored::Colorize;
use remitpay_core::services::exchange;

use crate::output::create_table;

pub fn run(rates: bool, json: bool) -> Result<()> {
    if rates {
        return run_rates(json);
    }

    let currencies = exchange::enabled_currencies();

    if json {
        let rows: Vec<_> = currencies
            .iter()
            .map(|c| {
                serde_json::json!({
                    "code": c.code,
                    "name": c.name,
                    "symbol": c.symbol,
                    "flag_emoji": c.flag_emoji,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["", "Code", "Name", "Symbol"]);
    for c in currencies {
        table.add_row(vec![c.flag_emoji.unwrap_or(""), c.code, c.name, c.symbol]);
    }
    println!("{}", table);

    Ok(())
}

fn run_rates(json: bool) -> Result<()> {
    let quotes: Vec<_> = exchange::tabulated_quotes().collect();

    if json {
        let rows: Vec<_> = quotes
            .iter()
            .map(|(from, to, q)| {
                serde_json::json!({ "from": from, "to": to, "rate": q.rate, "fee": q.fee })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Rate", "Fee"]);
    for (from, to, q) in &quotes {
        table.add_row(vec![
            exchange::format_rate(q.rate, from, to),
            exchange::format_currency(q.fee, from),
        ]);
    }
    println!("{}", table);

    let default = exchange::default_quote();
    println!(
        "{}",
        format!(
            "Other pairs use the inverse of a listed rate, or 1:1 with a {} fee.",
            exchange::format_amount(default.fee)
        )
        .dimmed()
    );

    Ok(())
}
