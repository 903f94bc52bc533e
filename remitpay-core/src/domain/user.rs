//! User domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in user as held in the session
///
/// Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub kyc_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            phone: None,
            country: None,
            address: None,
            city: None,
            postal_code: None,
            kyc_verified: false,
            created_at: Utc::now(),
        }
    }

    /// Name shown on receipts, falling back to the email
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }

    /// Merge a profile update into this record
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(v) = &update.email {
            self.email = v.clone();
        }
        if let Some(v) = &update.full_name {
            self.full_name = v.clone();
        }
        if let Some(v) = &update.phone {
            self.phone = Some(v.clone());
        }
        if let Some(v) = &update.country {
            self.country = Some(v.clone());
        }
        if let Some(v) = &update.address {
            self.address = Some(v.clone());
        }
        if let Some(v) = &update.city {
            self.city = Some(v.clone());
        }
        if let Some(v) = &update.postal_code {
            self.postal_code = Some(v.clone());
        }
        if let Some(v) = update.kyc_verified {
            self.kyc_verified = v;
        }
    }
}

/// A user record as persisted in the user list, password included in plaintext
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub kyc_verified: Option<bool>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("user_123", "test@example.com", "Test User");
        assert_eq!(user.id, "user_123");
        assert!(!user.kyc_verified);
        assert_eq!(user.display_name(), "Test User");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = User::new("user_123", "test@example.com", "  ");
        assert_eq!(user.display_name(), "test@example.com");
    }

    #[test]
    fn test_stored_user_is_flat() {
        let stored = StoredUser {
            user: User::new("user_1", "a@b.c", "A B"),
            password: "hunter2".to_string(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["email"], "a@b.c");
        assert_eq!(json["password"], "hunter2");

        // The session view drops the password
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user, stored.user);
    }
}
