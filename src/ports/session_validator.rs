//! Session validation port.
//!
//! Keeps the HTTP layer provider-agnostic: the auth middleware hands a
//! bearer token to this port and gets back the verified user id,
//! whether the implementation talks to a live OIDC provider or a test
//! double.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, UserId};

/// Validates a bearer token and resolves the caller's identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates the token and returns the user id it asserts.
    ///
    /// Implementations must verify the token cryptographically; a
    /// syntactically valid but unverified token is `InvalidToken`.
    async fn validate(&self, token: &str) -> Result<UserId, AuthError>;
}
