//! PostgreSQL adapters.

mod document_store;
mod purchase_ledger;
mod subscription_ledger;
mod user_profiles;

pub use document_store::PostgresDocumentStore;
pub use purchase_ledger::PostgresPurchaseLedger;
pub use subscription_ledger::PostgresSubscriptionLedger;
pub use user_profiles::PostgresUserProfiles;
