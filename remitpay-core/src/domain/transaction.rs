//! Transaction domain model

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a transfer
///
/// Transitions are driven by the caller; any state may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown transaction status: {}", other)),
        }
    }
}

/// How the recipient obtains the funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    BankTransfer,
    MobileMoney,
    CashPickup,
    WireTransfer,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::MobileMoney => "mobile_money",
            Self::CashPickup => "cash_pickup",
            Self::WireTransfer => "wire_transfer",
        }
    }

    /// Display label: the wire name with the underscore replaced by a space
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }

    /// Label for an optional method; transfers without one were bank transfers
    pub fn display(method: Option<DeliveryMethod>) -> String {
        method
            .map(|m| m.label())
            .unwrap_or_else(|| "Bank Transfer".to_string())
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bank_transfer" | "bank" => Ok(Self::BankTransfer),
            "mobile_money" | "mobile" => Ok(Self::MobileMoney),
            "cash_pickup" | "cash" => Ok(Self::CashPickup),
            "wire_transfer" | "wire" => Ok(Self::WireTransfer),
            other => Err(format!("Unknown delivery method: {}", other)),
        }
    }
}

/// A delivery choice offered when sending
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeliveryOption {
    pub method: DeliveryMethod,
    pub name: &'static str,
    pub description: &'static str,
    pub fee: &'static str,
    pub arrival: &'static str,
}

/// Delivery methods offered in the send flow
pub const DELIVERY_OPTIONS: [DeliveryOption; 3] = [
    DeliveryOption {
        method: DeliveryMethod::BankTransfer,
        name: "Bank Deposit",
        description: "Direct deposit to bank account",
        fee: "Low fee",
        arrival: "Within 1-3 business days",
    },
    DeliveryOption {
        method: DeliveryMethod::MobileMoney,
        name: "MPesa / Airtel Money",
        description: "Instant mobile money transfer",
        fee: "Standard fee",
        arrival: "Instant delivery",
    },
    DeliveryOption {
        method: DeliveryMethod::CashPickup,
        name: "Cash Pickup",
        description: "Pick up cash at agent location",
        fee: "Higher fee",
        arrival: "Ready within minutes",
    },
];

/// A money transfer initiated by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    /// Not enforced; the recipient may have been deleted since
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    pub send_amount: Decimal,
    pub receive_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub total_amount: Decimal,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub reference_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a transaction
///
/// id, reference number and created_at are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: String,
    pub recipient_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    pub send_amount: Decimal,
    pub receive_amount: Decimal,
    pub exchange_rate: Decimal,
    pub fee_amount: Decimal,
    pub total_amount: Decimal,
    pub status: TransactionStatus,
    pub delivery_method: Option<DeliveryMethod>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn into_transaction(
        self,
        id: String,
        reference_number: String,
        created_at: DateTime<Utc>,
    ) -> Transaction {
        Transaction {
            id,
            user_id: self.user_id,
            recipient_id: self.recipient_id,
            payment_method_id: self.payment_method_id,
            from_currency: self.from_currency,
            to_currency: self.to_currency,
            send_amount: self.send_amount,
            receive_amount: self.receive_amount,
            exchange_rate: self.exchange_rate,
            fee_amount: self.fee_amount,
            total_amount: self.total_amount,
            status: self.status,
            delivery_method: self.delivery_method,
            estimated_arrival: self.estimated_arrival,
            completed_at: self.completed_at,
            reference_number,
            notes: self.notes,
            created_at,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    pub recipient_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
    pub send_amount: Option<Decimal>,
    pub receive_amount: Option<Decimal>,
    pub exchange_rate: Option<Decimal>,
    pub fee_amount: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub status: Option<TransactionStatus>,
    pub delivery_method: Option<DeliveryMethod>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl TransactionUpdate {
    pub fn status(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl Transaction {
    /// Merge an update into this record
    pub fn apply(&mut self, update: TransactionUpdate) {
        if update.recipient_id.is_some() {
            self.recipient_id = update.recipient_id;
        }
        if update.payment_method_id.is_some() {
            self.payment_method_id = update.payment_method_id;
        }
        if let Some(v) = update.from_currency {
            self.from_currency = v;
        }
        if let Some(v) = update.to_currency {
            self.to_currency = v;
        }
        if let Some(v) = update.send_amount {
            self.send_amount = v;
        }
        if let Some(v) = update.receive_amount {
            self.receive_amount = v;
        }
        if let Some(v) = update.exchange_rate {
            self.exchange_rate = v;
        }
        if let Some(v) = update.fee_amount {
            self.fee_amount = v;
        }
        if let Some(v) = update.total_amount {
            self.total_amount = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
        if update.delivery_method.is_some() {
            self.delivery_method = update.delivery_method;
        }
        if update.estimated_arrival.is_some() {
            self.estimated_arrival = update.estimated_arrival;
        }
        if update.completed_at.is_some() {
            self.completed_at = update.completed_at;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
    }
}

/// Generate a reference number: `REF` + unix millis + random 0..=999
///
/// Uniqueness is probabilistic; there is no collision check.
pub fn generate_reference_number(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..1000);
    format!("REF{}{}", now.timestamp_millis(), suffix)
}

/// Whether a string looks like a generated reference number
pub fn is_reference_number(s: &str) -> bool {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    REFERENCE_RE
        .get_or_init(|| Regex::new(r"^REF\d{14,16}$").unwrap())
        .is_match(s)
}
