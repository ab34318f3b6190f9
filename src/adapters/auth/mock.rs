//! Mock session validator for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, UserId};
use crate::ports::SessionValidator;

/// Token-to-user map standing in for a real identity provider.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, UserId>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that resolves to the given user id.
    pub fn with_user(self, token: impl Into<String>, user_id: &str) -> Self {
        if let (Ok(mut tokens), Ok(id)) = (self.tokens.write(), UserId::new(user_id)) {
            tokens.insert(token.into(), id);
        }
        self
    }

    /// Forces every validation to fail with the given error.
    pub fn with_error(self, error: AuthError) -> Self {
        if let Ok(mut force) = self.force_error.write() {
            *force = Some(error);
        }
        self
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<UserId, AuthError> {
        if let Ok(force) = self.force_error.read() {
            if let Some(error) = force.clone() {
                return Err(error);
            }
        }

        self.tokens
            .read()
            .ok()
            .and_then(|tokens| tokens.get(token).cloned())
            .ok_or(AuthError::InvalidToken)
    }
}
