//! DocuGen backend server entrypoint.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use docugen::adapters::auth::{OidcConfig, OidcSessionValidator};
use docugen::adapters::http::{api_router, DocumentsAppState, PaymentsAppState, PlanCatalog};
use docugen::adapters::postgres::{
    PostgresDocumentStore, PostgresPurchaseLedger, PostgresSubscriptionLedger,
    PostgresUserProfiles,
};
use docugen::adapters::stripe::{StripeAdapter, StripeAdapterConfig};
use docugen::adapters::template::MarkdownRenderer;
use docugen::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let document_store = Arc::new(PostgresDocumentStore::new(pool.clone()));
    let purchase_ledger = Arc::new(PostgresPurchaseLedger::new(pool.clone()));
    let subscription_ledger = Arc::new(PostgresSubscriptionLedger::new(pool.clone()));
    let user_profiles = Arc::new(PostgresUserProfiles::new(pool));

    let stripe = Arc::new(StripeAdapter::new(StripeAdapterConfig::new(
        config.payment.stripe_api_key.clone(),
    )));

    let documents_state = DocumentsAppState {
        document_store: document_store.clone(),
        purchase_ledger: purchase_ledger.clone(),
        renderer: Arc::new(MarkdownRenderer::new()),
    };

    let payments_state = PaymentsAppState {
        payment_provider: stripe,
        purchase_ledger,
        subscription_ledger,
        user_profiles,
        webhook_secret: config.payment.stripe_webhook_secret.clone(),
        plans: PlanCatalog {
            basic_price_id: config.payment.basic_price_id.clone().unwrap_or_default(),
            pro_price_id: config.payment.pro_price_id.clone().unwrap_or_default(),
            enterprise_price_id: config
                .payment
                .enterprise_price_id
                .clone()
                .unwrap_or_default(),
            frontend_url: config.payment.frontend_url.clone(),
        },
    };

    let session_validator = Arc::new(OidcSessionValidator::new(OidcConfig::new(
        config.auth.issuer_url.clone(),
        config.auth.audience.clone(),
    )));

    let origins = config.server.cors_origins_list();
    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = api_router(documents_state, payments_state, session_validator)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr()?;
    info!(
        %addr,
        test_mode = config.payment.is_test_mode(),
        "starting DocuGen server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
