//! HTTP handlers for payment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use secrecy::{ExposeSecret, SecretString};

use crate::application::handlers::payments::{
    CheckSubscriptionHandler, CheckSubscriptionQuery, CreateSinglePaymentCommand,
    CreateSinglePaymentHandler, CreateSubscriptionCheckoutCommand,
    CreateSubscriptionCheckoutHandler, HandlePaymentWebhookHandler,
};
use crate::domain::billing::WebhookVerifier;
use crate::domain::foundation::{DocumentId, DomainError, ErrorCode};
use crate::ports::{PaymentProvider, PurchaseLedger, SubscriptionLedger, UserProfiles};

use super::super::auth::{AuthenticatedUser, OptionalUser};
use super::super::error::ErrorResponse;
use super::dto::{
    CheckoutSessionResponse, CreateSinglePaymentRequest, CreateSinglePaymentResponse,
    CreateSubscriptionRequest, SubscriptionStatusResponse, WebhookAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Plan names and their processor price ids, plus the frontend base URL
/// used to build checkout redirect targets.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    pub basic_price_id: String,
    pub pro_price_id: String,
    pub enterprise_price_id: String,
    pub frontend_url: String,
}

impl PlanCatalog {
    pub fn price_for(&self, plan_type: &str) -> Option<&str> {
        match plan_type {
            "basic" => Some(&self.basic_price_id),
            "pro" => Some(&self.pro_price_id),
            "enterprise" => Some(&self.enterprise_price_id),
            _ => None,
        }
    }

    pub fn success_url(&self) -> String {
        format!(
            "{}/dashboard?session_id={{CHECKOUT_SESSION_ID}}",
            self.frontend_url.trim_end_matches('/')
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/", self.frontend_url.trim_end_matches('/'))
    }
}

/// Shared state for payment endpoints.
///
/// Cloned per request; all dependencies are Arc-wrapped.
#[derive(Clone)]
pub struct PaymentsAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub purchase_ledger: Arc<dyn PurchaseLedger>,
    pub subscription_ledger: Arc<dyn SubscriptionLedger>,
    pub user_profiles: Arc<dyn UserProfiles>,
    pub webhook_secret: SecretString,
    pub plans: PlanCatalog,
}

impl PaymentsAppState {
    /// Create handlers on demand from the shared state.
    pub fn single_payment_handler(&self) -> CreateSinglePaymentHandler {
        CreateSinglePaymentHandler::new(
            self.payment_provider.clone(),
            self.purchase_ledger.clone(),
        )
    }

    pub fn subscription_checkout_handler(&self) -> CreateSubscriptionCheckoutHandler {
        CreateSubscriptionCheckoutHandler::new(self.payment_provider.clone())
    }

    pub fn check_subscription_handler(&self) -> CheckSubscriptionHandler {
        CheckSubscriptionHandler::new(self.subscription_ledger.clone())
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            WebhookVerifier::new(self.webhook_secret.expose_secret()),
            self.purchase_ledger.clone(),
            self.subscription_ledger.clone(),
            self.user_profiles.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments/create-single-payment - Start a single-document purchase
pub async fn create_single_payment(
    State(state): State<PaymentsAppState>,
    user: OptionalUser,
    Json(request): Json<CreateSinglePaymentRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let document_id = request
        .document_id
        .parse::<DocumentId>()
        .map_err(|_| DomainError::validation("document_id", "Not a valid document id"))?;

    let handler = state.single_payment_handler();
    let cmd = CreateSinglePaymentCommand {
        document_id,
        amount_cents: request.amount_cents,
        user_id: user.user_id,
        guest_email: request.guest_email,
    };

    let result = handler.handle(cmd).await?;

    let response = CreateSinglePaymentResponse {
        client_secret: result.client_secret,
        purchase_id: result.purchase.id.to_string(),
        amount_cents: result.purchase.amount_cents,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/payments/create-subscription - Start a subscription checkout
pub async fn create_subscription(
    State(state): State<PaymentsAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, PaymentApiError> {
    let price_id = state
        .plans
        .price_for(&request.plan_type)
        .ok_or_else(|| {
            DomainError::validation(
                "plan_type",
                format!("Unknown plan: {}", request.plan_type),
            )
        })?
        .to_string();

    let handler = state.subscription_checkout_handler();
    let cmd = CreateSubscriptionCheckoutCommand {
        user_id: user.user_id,
        plan_name: request.plan_type,
        price_id,
        success_url: state.plans.success_url(),
        cancel_url: state.plans.cancel_url(),
    };

    let session = handler.handle(cmd).await?;

    let response = CheckoutSessionResponse {
        session_id: session.id,
        checkout_url: session.url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/payments/check-subscription - Report the user's subscription state
pub async fn check_subscription(
    State(state): State<PaymentsAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, PaymentApiError> {
    let handler = state.check_subscription_handler();
    let query = CheckSubscriptionQuery {
        user_id: user.user_id,
    };

    let result = handler.handle(query).await?;

    let response = SubscriptionStatusResponse {
        subscribed: result.subscribed,
        tier: result.tier,
        period_end: result
            .period_end
            .map(|t| t.as_datetime().to_rfc3339()),
    };

    Ok(Json(response))
}

/// POST /api/payments/webhook - Handle payment processor webhook events
///
/// The body must stay raw; signature verification runs over the exact
/// bytes the processor sent.
pub async fn handle_webhook(
    State(state): State<PaymentsAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> axum::response::Response {
    let signature = match headers.get("Stripe-Signature").and_then(|v| v.to_str().ok()) {
        Some(signature) => signature,
        None => {
            let error = ErrorResponse::new(
                "MISSING_SIGNATURE",
                "Missing Stripe-Signature header",
            );
            return (StatusCode::BAD_REQUEST, Json(error)).into_response();
        }
    };

    let handler = state.webhook_handler();
    match handler.handle(&body, signature).await {
        Ok(_) => (StatusCode::OK, Json(WebhookAckResponse { received: true })).into_response(),
        Err(err) => {
            let error = ErrorResponse::new("WEBHOOK_ERROR", err.to_string());
            (err.status_code(), Json(error)).into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct PaymentApiError(DomainError);

impl From<DomainError> for PaymentApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::ValidationFailed | ErrorCode::InvalidAnswer => StatusCode::BAD_REQUEST,
            ErrorCode::DocumentNotFound
            | ErrorCode::TemplateNotFound
            | ErrorCode::PurchaseNotFound
            | ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::AccessDenied => StatusCode::PAYMENT_REQUIRED,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::PaymentProviderError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message);
        (status, Json(body)).into_response()
    }
}
