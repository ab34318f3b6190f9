//! In-memory adapters for tests and local development.

mod document_store;
mod purchase_ledger;
mod subscription_ledger;
mod user_profiles;

pub use document_store::InMemoryDocumentStore;
pub use purchase_ledger::InMemoryPurchaseLedger;
pub use subscription_ledger::InMemorySubscriptionLedger;
pub use user_profiles::InMemoryUserProfiles;
