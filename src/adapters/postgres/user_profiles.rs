//! PostgreSQL implementation of the user profile store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::billing::SubscriptionStatus;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::UserProfiles;

/// sqlx-backed profile store for the denormalized subscription status.
pub struct PostgresUserProfiles {
    pool: PgPool,
}

impl PostgresUserProfiles {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProfiles for PostgresUserProfiles {
    async fn set_subscription_status(
        &self,
        user_id: &UserId,
        status: SubscriptionStatus,
        plan_name: Option<&str>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, subscription_status, subscription_plan, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                subscription_status = EXCLUDED.subscription_status,
                subscription_plan = EXCLUDED.subscription_plan,
                updated_at = NOW()
            "#,
        )
        .bind(user_id.as_str())
        .bind(status.as_str())
        .bind(plan_name)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update profile: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get_subscription_status(
        &self,
        user_id: &UserId,
    ) -> Result<Option<(SubscriptionStatus, Option<String>)>, DomainError> {
        let row: Option<(String, Option<String>)> = sqlx::query_as(
            "SELECT subscription_status, subscription_plan FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read profile: {}", e),
            )
        })?;

        row.map(|(status, plan)| {
            let status = SubscriptionStatus::parse(&status).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid subscription status: {}", status),
                )
            })?;
            Ok((status, plan))
        })
        .transpose()
    }
}
