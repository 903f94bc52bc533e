//! Service layer - business logic orchestration
//!
//! The stores own in-memory state and persist through the `KeyValueStore`
//! port; the remaining services are stateless.

mod auth;
pub mod exchange;
pub mod logging;
mod persist;
pub mod receipt;
mod recipients;
mod summary;
mod transactions;
mod transfer;

pub use auth::{AuthStore, AUTH_KEY, USERS_KEY};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use persist::STATE_VERSION;
pub use recipients::{RecipientStore, RECIPIENTS_KEY};
pub use summary::{CurrencyTotal, DailyTotal, PaymentSummary};
pub use transactions::{TransactionStore, TRANSACTIONS_KEY};
pub use transfer::{TransferDraft, TransferQuote, TransferService};
