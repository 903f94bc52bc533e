//! Exchange service - static rate table, conversion and currency formatting
//!
//! Everything here is pure: the rate table is baked into the binary and
//! there is no external feed.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{Conversion, Currency, ExchangeQuote, CURRENCIES};

/// Static quote table: (from, to, rate mantissa, rate scale, fee in cents)
const RATE_TABLE: &[(&str, &str, i64, u32, i64)] = &[
    ("USD", "KES", 12915, 2, 489),
    ("USD", "NGN", 14505, 1, 599),
    ("USD", "GHS", 1575, 2, 489),
    ("USD", "INR", 8325, 2, 489),
    ("USD", "PHP", 5645, 2, 489),
    ("USD", "EUR", 92, 2, 399),
    ("USD", "GBP", 79, 2, 399),
    ("USD", "ZAR", 1865, 2, 489),
    ("USD", "MXN", 1705, 2, 489),
    ("EUR", "USD", 109, 2, 399),
    ("EUR", "KES", 14077, 2, 549),
    ("EUR", "GBP", 86, 2, 299),
    ("GBP", "USD", 127, 2, 399),
    ("GBP", "KES", 16402, 2, 549),
    ("GBP", "EUR", 116, 2, 299),
    ("KES", "USD", 774, 5, 489),
];

/// Quote used when neither direction of a pair is tabulated
pub fn default_quote() -> ExchangeQuote {
    ExchangeQuote::new(Decimal::ONE, Decimal::new(500, 2))
}

/// Every tabulated (from, to, quote) entry
pub fn tabulated_quotes() -> impl Iterator<Item = (&'static str, &'static str, ExchangeQuote)> {
    RATE_TABLE.iter().map(|&(from, to, mantissa, scale, fee_cents)| {
        (
            from,
            to,
            ExchangeQuote::new(Decimal::new(mantissa, scale), Decimal::new(fee_cents, 2)),
        )
    })
}

/// Direct table lookup, no fallbacks
pub fn table_quote(from: &str, to: &str) -> Option<ExchangeQuote> {
    tabulated_quotes()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, quote)| quote)
}

/// Quote for converting `from` into `to`
///
/// Resolution order:
/// 1. identity pair: rate 1, no fee
/// 2. direct table entry
/// 3. reverse entry with the rate inverted; the reverse entry's fee is kept as-is
/// 4. default: rate 1, fee 5.00
pub fn rate(from: &str, to: &str) -> ExchangeQuote {
    if from == to {
        return ExchangeQuote::new(Decimal::ONE, Decimal::ZERO);
    }

    if let Some(direct) = table_quote(from, to) {
        return direct;
    }

    if let Some(reverse) = table_quote(to, from) {
        return ExchangeQuote::new(Decimal::ONE / reverse.rate, reverse.fee);
    }

    default_quote()
}

/// Convert `amount` and price the transfer
///
/// No rounding is applied; callers round for display. `None` when the
/// converted amount or the total does not fit in a `Decimal`.
pub fn calculate(amount: Decimal, from: &str, to: &str) -> Option<Conversion> {
    let ExchangeQuote { rate, fee } = rate(from, to);
    Some(Conversion {
        receive_amount: amount.checked_mul(rate)?,
        rate,
        fee,
        total: amount.checked_add(fee)?,
    })
}

/// Look up a catalog currency
pub fn currency_by_code(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code == code)
}

/// Catalog entries that can currently be selected
pub fn enabled_currencies() -> Vec<&'static Currency> {
    CURRENCIES.iter().filter(|c| c.enabled).collect()
}

/// Round half away from zero to two places
pub fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals with thousands separators, e.g. `12,915.00`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_display(amount);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Currency symbol followed by the formatted amount
///
/// Unknown codes fall back to the bare two-decimal amount.
pub fn format_currency(amount: Decimal, code: &str) -> String {
    match currency_by_code(code) {
        Some(currency) => format!("{}{}", currency.symbol, format_amount(amount)),
        None => format!("{:.2}", round_display(amount)),
    }
}

/// `1 USD = 129.1500 KES`
pub fn format_rate(rate: Decimal, from: &str, to: &str) -> String {
    let rounded = rate.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    format!("1 {} = {:.4} {}", from, rounded, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_usd_to_kes_example() {
        let conversion = calculate(dec("100"), "USD", "KES").unwrap();
        assert_eq!(conversion.rate, dec("129.15"));
        assert_eq!(conversion.fee, dec("4.89"));
        assert_eq!(conversion.receive_amount, dec("12915.00"));
        assert_eq!(conversion.total, dec("104.89"));
    }

    #[test]
    fn test_identity_pair_is_free() {
        for currency in CURRENCIES.iter() {
            let quote = rate(currency.code, currency.code);
            assert_eq!(quote, ExchangeQuote::new(Decimal::ONE, Decimal::ZERO));

            let conversion = calculate(dec("250.75"), currency.code, currency.code).unwrap();
            assert_eq!(conversion.receive_amount, dec("250.75"));
            assert_eq!(conversion.total, dec("250.75"));
        }
    }

    #[test]
    fn test_overflowing_amount_is_none() {
        assert!(calculate(Decimal::MAX / Decimal::from(100), "USD", "NGN").is_none());
        assert!(calculate(Decimal::MAX, "USD", "USD").is_some());
        assert!(calculate(Decimal::MAX, "USD", "GBP").is_none());
    }

    #[test]
    fn test_direct_entries_match_table() {
        for (from, to, quote) in tabulated_quotes() {
            assert_eq!(rate(from, to), quote, "{}->{}", from, to);
        }
    }

    #[test]
    fn test_reverse_entries_are_inverted_with_reverse_fee() {
        for (from, to, quote) in tabulated_quotes() {
            if table_quote(to, from).is_some() {
                continue;
            }
            let reversed = rate(to, from);
            assert_eq!(reversed.rate, Decimal::ONE / quote.rate, "{}->{}", to, from);
            assert_eq!(reversed.fee, quote.fee);
        }

        // NGN -> USD is only tabulated as USD -> NGN
        let quote = rate("NGN", "USD");
        assert_eq!(quote.fee, dec("5.99"));
        assert_eq!(quote.rate, Decimal::ONE / dec("1450.5"));
    }

    #[test]
    fn test_untabulated_pairs_use_default() {
        for a in CURRENCIES.iter() {
            for b in CURRENCIES.iter() {
                if a.code == b.code
                    || table_quote(a.code, b.code).is_some()
                    || table_quote(b.code, a.code).is_some()
                {
                    continue;
                }
                assert_eq!(rate(a.code, b.code), default_quote(), "{}->{}", a.code, b.code);
            }
        }
        assert_eq!(rate("XYZ", "USD"), default_quote());
        assert_eq!(default_quote().fee, dec("5.0"));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec("1234.5"), "USD"), "$1,234.50");
        assert_eq!(format_currency(dec("12915"), "KES"), "KSh12,915.00");
        assert_eq!(format_currency(dec("0.005"), "GBP"), "£0.01");
        assert_eq!(format_currency(dec("999.999"), "EUR"), "€1,000.00");
        assert_eq!(format_currency(dec("1234567.891"), "XYZ"), "1234567.89");
    }

    #[test]
    fn test_format_amount_negative() {
        assert_eq!(format_amount(dec("-1234.5")), "-1,234.50");
        assert_eq!(format_amount(dec("-0.001")), "0.00");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(dec("129.15"), "USD", "KES"), "1 USD = 129.1500 KES");
        assert_eq!(
            format_rate(Decimal::ONE / dec("129.15"), "KES", "USD"),
            "1 KES = 0.0077 USD"
        );
    }

    #[test]
    fn test_currency_lookup() {
        assert_eq!(currency_by_code("NGN").map(|c| c.symbol), Some("₦"));
        assert!(currency_by_code("usd").is_none());
        assert_eq!(enabled_currencies().len(), 10);
    }
}
