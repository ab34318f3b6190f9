//! In-memory user profile store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::billing::SubscriptionStatus;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserProfiles;

/// Mutex-backed profile store holding the denormalized status copy.
#[derive(Default)]
pub struct InMemoryUserProfiles {
    profiles: Mutex<HashMap<String, (SubscriptionStatus, Option<String>)>>,
}

impl InMemoryUserProfiles {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserProfiles for InMemoryUserProfiles {
    async fn set_subscription_status(
        &self,
        user_id: &UserId,
        status: SubscriptionStatus,
        plan_name: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut profiles = self.profiles.lock().map_err(poisoned)?;
        profiles.insert(
            user_id.as_str().to_string(),
            (status, plan_name.map(|p| p.to_string())),
        );
        Ok(())
    }

    async fn get_subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<Option<(SubscriptionStatus, Option<String>)>, DomainError> {
        let profiles = self.profiles.lock().map_err(poisoned)?;
        Ok(profiles.get(user_id.as_str()).cloned())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "user profile lock poisoned")
}
