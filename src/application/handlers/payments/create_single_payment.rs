//! CreateSinglePaymentHandler - initiates a single-document purchase.

use std::sync::Arc;

use crate::domain::billing::Purchase;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::{CreatePaymentIntentRequest, PaymentProvider, PurchaseLedger};

/// Default price of a single document, in cents.
pub const DEFAULT_SINGLE_DOCUMENT_PRICE_CENTS: i64 = 499;

/// Command to start a single-document purchase.
#[derive(Debug, Clone)]
pub struct CreateSinglePaymentCommand {
    pub document_id: DocumentId,
    /// Price override in cents; defaults to the single-document price.
    pub amount_cents: Option<i64>,
    pub user_id: Option<UserId>,
    pub guest_email: Option<String>,
}

/// Result returned to the frontend to confirm the payment.
#[derive(Debug, Clone)]
pub struct CreateSinglePaymentResult {
    pub client_secret: String,
    pub purchase: Purchase,
}

/// Handler for purchase initiation.
///
/// Order matters: the processor call comes first, and the pending
/// ledger row is only written once the processor has accepted the
/// intent. A failed upstream call leaves no ledger rows behind.
pub struct CreateSinglePaymentHandler {
    provider: Arc<dyn PaymentProvider>,
    purchases: Arc<dyn PurchaseLedger>,
}

impl CreateSinglePaymentHandler {
    pub fn new(provider: Arc<dyn PaymentProvider>, purchases: Arc<dyn PurchaseLedger>) -> Self {
        Self { provider, purchases }
    }

    pub async fn handle(
        &self,
        cmd: CreateSinglePaymentCommand,
    ) -> Result<CreateSinglePaymentResult, DomainError> {
        let amount_cents = cmd
            .amount_cents
            .unwrap_or(DEFAULT_SINGLE_DOCUMENT_PRICE_CENTS);
        if amount_cents <= 0 {
            return Err(DomainError::validation(
                "amount_cents",
                "Amount must be positive",
            ));
        }
        if cmd.user_id.is_none() && cmd.guest_email.is_none() {
            return Err(DomainError::validation(
                "guest_email",
                "Guest purchases require an email address",
            ));
        }

        let intent = self
            .provider
            .create_payment_intent(CreatePaymentIntentRequest {
                document_id: cmd.document_id,
                amount_cents,
                currency: "usd".to_string(),
                user_id: cmd.user_id.clone(),
                guest_email: cmd.guest_email.clone(),
            })
            .await
            .map_err(DomainError::from)?;

        let purchase = Purchase::new_pending(
            cmd.document_id,
            cmd.user_id,
            cmd.guest_email,
            intent.id,
            amount_cents,
            "usd",
            Timestamp::now(),
        );

        match self.purchases.create_pending(&purchase).await {
            Ok(()) => {}
            Err(e) if e.is_conflict() => {
                return Err(DomainError::new(
                    ErrorCode::Conflict,
                    "A purchase for this payment intent already exists",
                ))
            }
            Err(e) => return Err(e),
        }

        Ok(CreateSinglePaymentResult {
            client_secret: intent.client_secret,
            purchase,
        })
    }
}
