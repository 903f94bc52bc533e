//! Payment summary over a user's completed transfers

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Transaction, TransactionStatus};

/// Days covered by the daily chart, today included
pub const CHART_DAYS: i64 = 7;

/// Currencies listed in the breakdown
pub const TOP_CURRENCIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub sent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyTotal {
    pub currency: String,
    pub received: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub completed_count: usize,
    pub total_sent: Decimal,
    pub total_fees: Decimal,
    pub average_sent: Decimal,
    /// Oldest day first
    pub last_7_days: Vec<DailyTotal>,
    /// Largest total received first
    pub top_currencies: Vec<CurrencyTotal>,
}

impl PaymentSummary {
    /// Summarize `transactions`, counting only completed ones
    ///
    /// Amounts are summed regardless of sending currency, as the app does.
    pub fn build(transactions: &[Transaction], now: DateTime<Utc>) -> Result<Self> {
        let completed: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Completed)
            .collect();

        let total_sent = checked_sum(completed.iter().map(|t| t.send_amount))?;
        let total_fees = checked_sum(completed.iter().map(|t| t.fee_amount))?;
        let average_sent = if completed.is_empty() {
            Decimal::ZERO
        } else {
            total_sent / Decimal::from(completed.len())
        };

        let today = now.date_naive();
        let last_7_days = (0..CHART_DAYS)
            .rev()
            .map(|back| {
                let date = today - Duration::days(back);
                let sent = checked_sum(
                    completed
                        .iter()
                        .filter(|t| t.created_at.date_naive() == date)
                        .map(|t| t.send_amount),
                )?;
                Ok(DailyTotal { date, sent })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut by_currency: HashMap<&str, Decimal> = HashMap::new();
        for t in &completed {
            let received = by_currency.entry(t.to_currency.as_str()).or_default();
            *received = received
                .checked_add(t.receive_amount)
                .ok_or_else(out_of_range)?;
        }
        let mut top_currencies: Vec<CurrencyTotal> = by_currency
            .into_iter()
            .map(|(currency, received)| CurrencyTotal {
                currency: currency.to_string(),
                received,
            })
            .collect();
        top_currencies.sort_by(|a, b| {
            b.received
                .cmp(&a.received)
                .then_with(|| a.currency.cmp(&b.currency))
        });
        top_currencies.truncate(TOP_CURRENCIES);

        Ok(Self {
            completed_count: completed.len(),
            total_sent,
            total_fees,
            average_sent,
            last_7_days,
            top_currencies,
        })
    }
}

fn out_of_range() -> Error {
    Error::validation("Payment totals are too large to summarize")
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(out_of_range)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewTransaction;
    use chrono::TimeZone;

    fn tx(
        status: TransactionStatus,
        send: i64,
        to: &str,
        receive: i64,
        at: DateTime<Utc>,
    ) -> Transaction {
        NewTransaction {
            user_id: "user_1".to_string(),
            recipient_id: None,
            payment_method_id: None,
            from_currency: "USD".to_string(),
            to_currency: to.to_string(),
            send_amount: Decimal::from(send),
            receive_amount: Decimal::from(receive),
            exchange_rate: Decimal::ONE,
            fee_amount: Decimal::new(5, 0),
            total_amount: Decimal::from(send + 5),
            status,
            delivery_method: None,
            estimated_arrival: None,
            completed_at: None,
            notes: None,
        }
        .into_transaction(format!("tx_{}", send), "REF17369516000001".into(), at)
    }

    #[test]
    fn test_empty_summary() {
        let now = Utc::now();
        let summary = PaymentSummary::build(&[], now).unwrap();

        assert_eq!(summary.completed_count, 0);
        assert_eq!(summary.average_sent, Decimal::ZERO);
        assert_eq!(summary.last_7_days.len(), 7);
        assert_eq!(summary.last_7_days[6].date, now.date_naive());
        assert!(summary.top_currencies.is_empty());
    }

    #[test]
    fn test_only_completed_transactions_count() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let transactions = vec![
            tx(TransactionStatus::Completed, 100, "KES", 12915, now),
            tx(TransactionStatus::Completed, 300, "NGN", 435150, now - Duration::days(2)),
            tx(TransactionStatus::Processing, 900, "KES", 1, now),
            tx(TransactionStatus::Failed, 50, "GHS", 1, now),
        ];

        let summary = PaymentSummary::build(&transactions, now).unwrap();
        assert_eq!(summary.completed_count, 2);
        assert_eq!(summary.total_sent, Decimal::from(400));
        assert_eq!(summary.total_fees, Decimal::from(10));
        assert_eq!(summary.average_sent, Decimal::from(200));

        assert_eq!(summary.last_7_days[6].sent, Decimal::from(100));
        assert_eq!(summary.last_7_days[4].sent, Decimal::from(300));
        assert_eq!(summary.last_7_days[0].sent, Decimal::ZERO);

        let currencies: Vec<&str> = summary
            .top_currencies
            .iter()
            .map(|c| c.currency.as_str())
            .collect();
        assert_eq!(currencies, vec!["NGN", "KES"]);
    }

    #[test]
    fn test_old_transactions_outside_chart() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let transactions = vec![tx(
            TransactionStatus::Completed,
            100,
            "KES",
            1,
            now - Duration::days(7),
        )];

        let summary = PaymentSummary::build(&transactions, now).unwrap();
        assert!(summary.last_7_days.iter().all(|d| d.sent.is_zero()));
        assert_eq!(summary.total_sent, Decimal::from(100));
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let mut big = tx(TransactionStatus::Completed, 1, "KES", 1, now);
        big.send_amount = Decimal::MAX;
        let transactions = vec![big.clone(), big];

        let err = PaymentSummary::build(&transactions, now).unwrap_err();
        assert_eq!(err.to_string(), "Payment totals are too large to summarize");
    }
}
