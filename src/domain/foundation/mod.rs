//! Shared value objects and error types used across the domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{AuthError, DomainError, ErrorCode, ValidationError};
pub use ids::{DocumentId, PurchaseId, SubscriptionId, UserId};
pub use timestamp::Timestamp;
