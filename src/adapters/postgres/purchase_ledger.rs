//! PostgreSQL implementation of the purchase ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Purchase, PurchaseStatus};
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, PurchaseId, Timestamp, UserId};
use crate::ports::{CompletionOutcome, PurchaseLedger};

/// sqlx-backed purchase ledger.
///
/// The UNIQUE constraint on `payment_intent_id` backs the conflict
/// semantics of `create_pending`; completion is a conditional UPDATE so
/// redelivered confirmations converge without a transaction.
pub struct PostgresPurchaseLedger {
    pool: PgPool,
}

impl PostgresPurchaseLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    document_id: Uuid,
    user_id: Option<String>,
    guest_email: Option<String>,
    payment_intent_id: String,
    amount_cents: i64,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = PurchaseStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid purchase status: {}", row.status),
            )
        })?;
        let user_id = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e)))?;

        Ok(Purchase {
            id: PurchaseId::from_uuid(row.id),
            document_id: DocumentId::from_uuid(row.document_id),
            user_id,
            guest_email: row.guest_email,
            payment_intent_id: row.payment_intent_id,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl PurchaseLedger for PostgresPurchaseLedger {
    async fn create_pending(&self, purchase: &Purchase) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO document_purchases (
                id, document_id, user_id, guest_email, payment_intent_id,
                amount_cents, currency, status, created_at, expires_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.document_id.as_uuid())
        .bind(purchase.user_id.as_ref().map(|u| u.as_str()))
        .bind(&purchase.guest_email)
        .bind(&purchase.payment_intent_id)
        .bind(purchase.amount_cents)
        .bind(&purchase.currency)
        .bind(purchase.status.as_str())
        .bind(purchase.created_at.as_datetime())
        .bind(purchase.expires_at.map(|t| t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::conflict(format!(
                        "Purchase for payment intent {} already exists",
                        purchase.payment_intent_id
                    ));
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record purchase: {}", e),
            )
        })?;

        Ok(())
    }

    async fn mark_completed(
        &self,
        payment_intent_id: &str,
    ) -> Result<CompletionOutcome, DomainError> {
        let updated = sqlx::query(
            r#"
            UPDATE document_purchases
            SET status = 'completed'
            WHERE payment_intent_id = $1 AND status = 'pending'
            "#,
        )
        .bind(payment_intent_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to complete purchase: {}", e),
            )
        })?;

        if updated.rows_affected() > 0 {
            return Ok(CompletionOutcome::Completed);
        }

        let status: Option<String> = sqlx::query_scalar(
            "SELECT status FROM document_purchases WHERE payment_intent_id = $1",
        )
        .bind(payment_intent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read purchase status: {}", e),
            )
        })?;

        // Any existing non-pending row means the event has nothing left
        // to do; only a missing row is reported as unknown.
        Ok(match status {
            Some(_) => CompletionOutcome::AlreadyCompleted,
            None => CompletionOutcome::UnknownIntent,
        })
    }

    async fn find_completed_entitlement(
        &self,
        document_id: &DocumentId,
        user_id: Option<&UserId>,
        guest_email: Option<&str>,
    ) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, document_id, user_id, guest_email, payment_intent_id,
                   amount_cents, currency, status, created_at, expires_at
            FROM document_purchases
            WHERE document_id = $1
              AND status = 'completed'
              AND (
                  ($2::text IS NOT NULL AND user_id = $2)
                  OR ($3::text IS NOT NULL AND LOWER(guest_email) = LOWER($3))
              )
            LIMIT 1
            "#,
        )
        .bind(document_id.as_uuid())
        .bind(user_id.map(|u| u.as_str()))
        .bind(guest_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to query purchases: {}", e),
            )
        })?;

        row.map(Purchase::try_from).transpose()
    }
}
