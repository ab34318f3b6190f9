//! PostgreSQL implementation of the subscription ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::ports::{SubscriptionLedger, SubscriptionUpdate};

/// sqlx-backed subscription ledger.
///
/// Upserts use `ON CONFLICT` on the processor subscription id, so event
/// replay is a plain overwrite. COALESCE keeps identity fields from
/// being cleared by events that omit them.
pub struct PostgresSubscriptionLedger {
    pool: PgPool,
}

impl PostgresSubscriptionLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Option<String>,
    stripe_subscription_id: String,
    price_id: Option<String>,
    status: String,
    current_period_start: Option<DateTime<Utc>>,
    current_period_end: Option<DateTime<Utc>>,
    cancel_at_period_end: bool,
    plan_name: Option<String>,
    amount_cents: Option<i64>,
    currency: String,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid subscription status: {}", row.status),
            )
        })?;
        let user_id = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e)))?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id,
            processor_subscription_id: row.stripe_subscription_id,
            price_id: row.price_id,
            status,
            current_period_start: row.current_period_start.map(Timestamp::from_datetime),
            current_period_end: row.current_period_end.map(Timestamp::from_datetime),
            cancel_at_period_end: row.cancel_at_period_end,
            plan_name: row.plan_name,
            amount_cents: row.amount_cents,
            currency: row.currency,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, stripe_subscription_id, price_id, status, \
     current_period_start, current_period_end, cancel_at_period_end, plan_name, \
     amount_cents, currency";

#[async_trait]
impl SubscriptionLedger for PostgresSubscriptionLedger {
    async fn upsert_from_processor_state(
        &self,
        update: SubscriptionUpdate,
    ) -> Result<Subscription, DomainError> {
        let row: SubscriptionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO subscriptions (
                id, user_id, stripe_subscription_id, price_id, status,
                current_period_start, current_period_end, cancel_at_period_end,
                plan_name, amount_cents, currency
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (stripe_subscription_id) DO UPDATE SET
                user_id = COALESCE(EXCLUDED.user_id, subscriptions.user_id),
                price_id = COALESCE(EXCLUDED.price_id, subscriptions.price_id),
                status = EXCLUDED.status,
                current_period_start = EXCLUDED.current_period_start,
                current_period_end = EXCLUDED.current_period_end,
                cancel_at_period_end = EXCLUDED.cancel_at_period_end,
                plan_name = COALESCE(EXCLUDED.plan_name, subscriptions.plan_name),
                amount_cents = COALESCE(EXCLUDED.amount_cents, subscriptions.amount_cents),
                currency = EXCLUDED.currency
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(SubscriptionId::new().as_uuid())
        .bind(update.user_id.as_ref().map(|u| u.as_str()))
        .bind(&update.processor_subscription_id)
        .bind(&update.price_id)
        .bind(update.status.as_str())
        .bind(update.current_period_start.map(|t| t.as_datetime()))
        .bind(update.current_period_end.map(|t| t.as_datetime()))
        .bind(update.cancel_at_period_end)
        .bind(&update.plan_name)
        .bind(update.amount_cents)
        .bind(&update.currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert subscription: {}", e),
            )
        })?;

        Subscription::try_from(row)
    }

    async fn cancel(&self, processor_subscription_id: &str) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE subscriptions SET status = 'cancelled' WHERE stripe_subscription_id = $1",
        )
        .bind(processor_subscription_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to cancel subscription: {}", e),
            )
        })?;

        Ok(())
    }

    async fn get_active_for_user(
        &self,
        user_id: &UserId,
        now: &Timestamp,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM subscriptions
            WHERE user_id = $1
              AND status = 'active'
              AND current_period_end > $2
            ORDER BY current_period_end DESC
            LIMIT 1
            "#,
            SELECT_COLUMNS
        ))
        .bind(user_id.as_str())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to query subscriptions: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }
}
