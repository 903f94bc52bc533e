//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with merge/validation logic - no I/O.

mod currency;
mod quote;
mod recipient;
pub mod result;
mod transaction;
mod user;

pub use currency::{Currency, CURRENCIES};
pub use quote::{Conversion, ExchangeQuote, FundingMethod};
pub use recipient::{NewRecipient, Recipient, RecipientUpdate};
pub use transaction::{
    generate_reference_number, is_reference_number, DeliveryMethod, DeliveryOption,
    NewTransaction, Transaction, TransactionStatus, TransactionUpdate, DELIVERY_OPTIONS,
};
pub use user::{ProfileUpdate, StoredUser, User};
