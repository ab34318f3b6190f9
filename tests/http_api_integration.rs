//! Integration tests for the HTTP API surface.
//!
//! Drives the full router with in-memory adapters, a mock payment
//! provider, and a mock session validator, asserting routes, status
//! codes, and JSON bodies.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use docugen::adapters::auth::MockSessionValidator;
use docugen::adapters::http::{api_router, DocumentsAppState, PaymentsAppState, PlanCatalog};
use docugen::adapters::memory::{
    InMemoryDocumentStore, InMemoryPurchaseLedger, InMemorySubscriptionLedger,
    InMemoryUserProfiles,
};
use docugen::adapters::template::MarkdownRenderer;
use docugen::domain::billing::Purchase;
use docugen::domain::foundation::{DocumentId, Timestamp};
use docugen::ports::{
    CheckoutSession, CreateCheckoutSessionRequest, CreatePaymentIntentRequest, PaymentError,
    PaymentIntent, PaymentProvider, PurchaseLedger,
};

const SECRET: &str = "whsec_http_secret";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct AcceptingProvider;

#[async_trait]
impl PaymentProvider for AcceptingProvider {
    async fn create_payment_intent(
        &self,
        _request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        Ok(PaymentIntent {
            id: "pi_http_1".to_string(),
            client_secret: "pi_http_1_secret".to_string(),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        Ok(CheckoutSession {
            id: "cs_http_1".to_string(),
            url: format!("https://checkout.stripe.com/c/{}", request.price_id),
        })
    }
}

struct TestApp {
    router: Router,
    purchases: Arc<InMemoryPurchaseLedger>,
}

fn test_app() -> TestApp {
    let store = Arc::new(InMemoryDocumentStore::new());
    let purchases = Arc::new(InMemoryPurchaseLedger::new());
    let subscriptions = Arc::new(InMemorySubscriptionLedger::new());
    let profiles = Arc::new(InMemoryUserProfiles::new());

    let documents_state = DocumentsAppState {
        document_store: store,
        purchase_ledger: purchases.clone(),
        renderer: Arc::new(MarkdownRenderer::new()),
    };
    let payments_state = PaymentsAppState {
        payment_provider: Arc::new(AcceptingProvider),
        purchase_ledger: purchases.clone(),
        subscription_ledger: subscriptions,
        user_profiles: profiles,
        webhook_secret: SecretString::new(SECRET.to_string()),
        plans: PlanCatalog {
            basic_price_id: "price_basic".to_string(),
            pro_price_id: "price_pro".to_string(),
            enterprise_price_id: "price_enterprise".to_string(),
            frontend_url: "https://app.example.com".to_string(),
        },
    };

    let validator = Arc::new(
        MockSessionValidator::new()
            .with_user("token-u1", "u1")
            .with_user("token-u2", "u2"),
    );

    TestApp {
        router: api_router(documents_state, payments_state, validator),
        purchases,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, user: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer token-{user}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json_as(uri: &str, user: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer token-{user}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn nda_request(guest_email: Option<&str>) -> Value {
    json!({
        "template_id": "nda",
        "guest_email": guest_email,
        "answers": [
            { "question_id": "disclosingParty", "kind": "text", "value": "Acme Corp" },
            { "question_id": "receivingParty", "kind": "text", "value": "Jordan Reyes" },
            { "question_id": "purposeDescription", "kind": "text", "value": "Pilot project" }
        ]
    })
}

fn signed_webhook(payload: &str) -> Request<Body> {
    let timestamp = Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/payments/webhook")
        .header("Stripe-Signature", format!("t={},v1={}", timestamp, signature))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

// =============================================================================
// Document Endpoints
// =============================================================================

#[tokio::test]
async fn templates_endpoint_lists_builtin_templates() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/api/documents/templates")).await;
    assert_eq!(status, StatusCode::OK);

    let templates = body["templates"].as_array().unwrap();
    assert_eq!(templates.len(), 3);
    let ids: Vec<&str> = templates.iter().map(|t| t["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&"employment-agreement"));
    assert!(ids.contains(&"nda"));
    assert!(ids.contains(&"service-agreement"));
}

#[tokio::test]
async fn guest_generates_then_pays_then_downloads() {
    let app = test_app();

    // Guest generates a document.
    let (status, document) = send(
        &app.router,
        post_json("/api/documents/generate-document", nda_request(Some("owner@example.com"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let document_id = document["id"].as_str().unwrap().to_string();
    assert!(document["content"].as_str().unwrap().contains("Acme Corp"));

    // Reading the document is open; downloading is not.
    let (status, _body) = send(
        &app.router,
        get(&format!("/api/documents/{}", document_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let download_uri = format!("/api/documents/{}/download", document_id);
    let download_body = json!({ "email": "stranger@example.com" });
    let (status, body) = send(&app.router, post_json(&download_uri, download_body.clone())).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error_code"], "PURCHASE_REQUIRED");

    // Seed a completed purchase for the stranger.
    let purchase = Purchase::new_pending(
        document_id.parse::<DocumentId>().unwrap(),
        None,
        Some("stranger@example.com".to_string()),
        "pi_seeded",
        499,
        "usd",
        Timestamp::now(),
    );
    app.purchases.create_pending(&purchase).await.unwrap();
    app.purchases.mark_completed("pi_seeded").await.unwrap();

    // Download twice; the counter is monotonic. The guest identifies
    // themselves in the request body.
    let (status, body) = send(&app.router, post_json(&download_uri, download_body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["download_count"], 1);

    let (_status, body) = send(&app.router, post_json(&download_uri, download_body)).await;
    assert_eq!(body["download_count"], 2);
}

#[tokio::test]
async fn document_reads_are_open_but_downloads_stay_gated() {
    let app = test_app();

    let (status, document) = send(
        &app.router,
        post_json_as("/api/documents/generate-document", "u1", nda_request(None)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let document_id = document["id"].as_str().unwrap();

    // Reads carry no gate, with or without an identity.
    let (status, _body) = send(
        &app.router,
        get(&format!("/api/documents/{}", document_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _body) = send(
        &app.router,
        get_as(&format!("/api/documents/{}", document_id), "u2"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The owner downloads freely; anyone else must pay.
    let download_uri = format!("/api/documents/{}/download", document_id);
    let (status, _body) = send(&app.router, post_json_as(&download_uri, "u1", json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app.router, post_json_as(&download_uri, "u2", json!({}))).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error_code"], "PURCHASE_REQUIRED");
}

#[tokio::test]
async fn listing_requires_authentication() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/api/documents")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "AUTHENTICATION_REQUIRED");

    let (_status, _doc) = send(
        &app.router,
        post_json_as("/api/documents/generate-document", "u1", nda_request(None)),
    )
    .await;

    let (status, body) = send(&app.router, get_as("/api/documents?per_page=10", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn forged_identity_header_does_not_grant_owner_download() {
    let app = test_app();

    let (_status, document) = send(
        &app.router,
        post_json_as("/api/documents/generate-document", "u1", nda_request(None)),
    )
    .await;
    let document_id = document["id"].as_str().unwrap();

    // A client-asserted header is not an identity; without a valid
    // bearer token the caller stays a guest and hits the payment gate.
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/documents/{}/download", document_id))
        .header("X-User-Id", "u1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(body["error_code"], "PURCHASE_REQUIRED");
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected() {
    let app = test_app();

    let request = Request::builder()
        .uri("/api/documents")
        .header(header::AUTHORIZATION, "Bearer not-a-real-token")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn invalid_template_is_rejected() {
    let app = test_app();

    let mut request = nda_request(Some("guest@example.com"));
    request["template_id"] = json!("last-will");
    let (status, body) = send(&app.router, post_json("/api/documents/generate-document", request)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "TEMPLATE_NOT_FOUND");
}

#[tokio::test]
async fn missing_document_returns_not_found() {
    let app = test_app();

    let uri = format!("/api/documents/{}", DocumentId::new());
    let (status, body) = send(&app.router, get_as(&uri, "u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "DOCUMENT_NOT_FOUND");
}

// =============================================================================
// Payment Endpoints
// =============================================================================

#[tokio::test]
async fn guest_purchase_initiation_returns_client_secret() {
    let app = test_app();

    let (_status, document) = send(
        &app.router,
        post_json("/api/documents/generate-document", nda_request(Some("owner@example.com"))),
    )
    .await;

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/payments/create-single-payment",
            json!({
                "document_id": document["id"],
                "guest_email": "buyer@example.com"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["client_secret"], "pi_http_1_secret");
    assert_eq!(body["amount_cents"], 499);
}

#[tokio::test]
async fn purchase_without_identity_is_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/payments/create-single-payment",
            json!({ "document_id": DocumentId::new().to_string() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn subscription_checkout_resolves_plan_price() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json_as(
            "/api/payments/create-subscription",
            "u1",
            json!({ "plan_type": "pro" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["checkout_url"],
        "https://checkout.stripe.com/c/price_pro"
    );

    let (status, _body) = send(
        &app.router,
        post_json_as(
            "/api/payments/create-subscription",
            "u1",
            json!({ "plan_type": "platinum" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn check_subscription_defaults_to_not_subscribed() {
    let app = test_app();

    let (status, _body) = send(&app.router, get("/api/payments/check-subscription")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app.router, get_as("/api/payments/check-subscription", "u1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subscribed"], false);
}

// =============================================================================
// Webhook Endpoint
// =============================================================================

#[tokio::test]
async fn webhook_rejects_missing_and_bad_signatures() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "MISSING_SIGNATURE");

    let request = Request::builder()
        .method("POST")
        .uri("/api/payments/webhook")
        .header("Stripe-Signature", "t=1,v1=deadbeef")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_acknowledges_verified_events() {
    let app = test_app();

    let payload = json!({
        "id": "evt_http_1",
        "type": "invoice.paid",
        "created": Utc::now().timestamp(),
        "livemode": false,
        "data": { "object": {} }
    })
    .to_string();

    let (status, body) = send(&app.router, signed_webhook(&payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn webhook_completes_seeded_purchase() {
    let app = test_app();

    let purchase = Purchase::new_pending(
        DocumentId::new(),
        None,
        Some("buyer@example.com".to_string()),
        "pi_webhook_1",
        499,
        "usd",
        Timestamp::now(),
    );
    app.purchases.create_pending(&purchase).await.unwrap();

    let payload = json!({
        "id": "evt_http_2",
        "type": "payment_intent.succeeded",
        "created": Utc::now().timestamp(),
        "livemode": false,
        "data": {
            "object": {
                "id": "pi_webhook_1",
                "metadata": { "type": "single_document" }
            }
        }
    })
    .to_string();

    let (status, body) = send(&app.router, signed_webhook(&payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["received"], true);

    let stored = app
        .purchases
        .find_by_payment_intent("pi_webhook_1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status.as_str(), "completed");
}
