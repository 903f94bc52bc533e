//! Recipient domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person the user sends money to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: String,
    /// Owning user
    pub user_id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub country: String,
    /// Currency the recipient receives in
    pub currency: String,

    // Bank delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift_code: Option<String>,

    // Mobile money delivery
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_money_provider: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a recipient; id and created_at are assigned by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecipient {
    pub user_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: String,
    pub currency: String,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub swift_code: Option<String>,
    pub mobile_money_provider: Option<String>,
}

impl NewRecipient {
    pub fn new(
        user_id: impl Into<String>,
        full_name: impl Into<String>,
        country: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: full_name.into(),
            country: country.into(),
            currency: currency.into(),
            ..Default::default()
        }
    }

    pub fn into_recipient(self, id: String, created_at: DateTime<Utc>) -> Recipient {
        Recipient {
            id,
            user_id: self.user_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            country: self.country,
            currency: self.currency,
            account_number: self.account_number,
            bank_name: self.bank_name,
            swift_code: self.swift_code,
            mobile_money_provider: self.mobile_money_provider,
            created_at,
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipientUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub swift_code: Option<String>,
    pub mobile_money_provider: Option<String>,
}

impl RecipientUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Recipient {
    /// Merge an update into this record
    pub fn apply(&mut self, update: RecipientUpdate) {
        if let Some(v) = update.full_name {
            self.full_name = v;
        }
        if let Some(v) = update.country {
            self.country = v;
        }
        if let Some(v) = update.currency {
            self.currency = v;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.account_number.is_some() {
            self.account_number = update.account_number;
        }
        if update.bank_name.is_some() {
            self.bank_name = update.bank_name;
        }
        if update.swift_code.is_some() {
            self.swift_code = update.swift_code;
        }
        if update.mobile_money_provider.is_some() {
            self.mobile_money_provider = update.mobile_money_provider;
        }
    }

    /// Short description of where the money lands
    pub fn delivery_summary(&self) -> String {
        match (&self.bank_name, &self.account_number, &self.mobile_money_provider) {
            (Some(bank), Some(account), _) => format!("{} {}", bank, mask_account(account)),
            (None, Some(account), _) => mask_account(account),
            (_, None, Some(provider)) => provider.clone(),
            (Some(bank), None, None) => bank.clone(),
            (None, None, None) => String::new(),
        }
    }
}

/// Show only the last 4 characters of an account number
fn mask_account(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 4 {
        return account.to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("••••{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Recipient {
        let mut new = NewRecipient::new("user_1", "Jane Wanjiru", "Kenya", "KES");
        new.account_number = Some("0123456789".to_string());
        new.bank_name = Some("Equity Bank".to_string());
        new.into_recipient("recipient_1".to_string(), Utc::now())
    }

    #[test]
    fn test_apply_merges_only_given_fields() {
        let mut r = sample();
        r.apply(RecipientUpdate {
            phone: Some("+254700000000".to_string()),
            ..Default::default()
        });
        assert_eq!(r.phone.as_deref(), Some("+254700000000"));
        assert_eq!(r.full_name, "Jane Wanjiru");
        assert_eq!(r.bank_name.as_deref(), Some("Equity Bank"));
    }

    #[test]
    fn test_delivery_summary_masks_account() {
        assert_eq!(sample().delivery_summary(), "Equity Bank ••••6789");
    }

    #[test]
    fn test_optional_fields_skipped_in_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["currency"], "KES");
    }
}
