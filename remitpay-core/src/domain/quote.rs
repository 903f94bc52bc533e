//! Exchange quote and conversion models

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A {rate, fee} pair for converting one currency to another
///
/// The fee is a flat amount in the sending currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeQuote {
    pub rate: Decimal,
    pub fee: Decimal,
}

impl ExchangeQuote {
    pub const fn new(rate: Decimal, fee: Decimal) -> Self {
        Self { rate, fee }
    }
}

/// Result of converting a send amount with a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub receive_amount: Decimal,
    pub rate: Decimal,
    pub fee: Decimal,
    /// Send amount plus fee, charged to the sender
    pub total: Decimal,
}

/// How the sender pays for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingMethod {
    Card,
    Bank,
    Wallet,
}

impl FundingMethod {
    pub const ALL: [FundingMethod; 3] = [Self::Card, Self::Bank, Self::Wallet];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Bank => "bank",
            Self::Wallet => "wallet",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Card => "Credit or Debit Card",
            Self::Bank => "Bank Account",
            Self::Wallet => "Digital Wallet",
        }
    }

    pub fn arrival(&self) -> &'static str {
        match self {
            Self::Card | Self::Wallet => "Instant processing",
            Self::Bank => "Process within 1-2 days",
        }
    }

    /// Fee charged for this funding method given the quoted fee
    ///
    /// Wallet top-ups carry one extra unit of the sending currency.
    pub fn fee_for(&self, quoted_fee: Decimal) -> Decimal {
        match self {
            Self::Card | Self::Bank => quoted_fee,
            Self::Wallet => quoted_fee + Decimal::ONE,
        }
    }
}

impl fmt::Display for FundingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FundingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            "wallet" => Ok(Self::Wallet),
            other => Err(format!("Unknown funding method: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_fee_surcharge() {
        let fee = Decimal::new(489, 2);
        assert_eq!(FundingMethod::Card.fee_for(fee), fee);
        assert_eq!(FundingMethod::Bank.fee_for(fee), fee);
        assert_eq!(FundingMethod::Wallet.fee_for(fee), Decimal::new(589, 2));
    }

    #[test]
    fn test_funding_method_parse() {
        assert_eq!("Wallet".parse::<FundingMethod>(), Ok(FundingMethod::Wallet));
        assert!("cheque".parse::<FundingMethod>().is_err());
    }
}
