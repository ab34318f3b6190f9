//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod auth;
pub mod documents;
pub mod error;
pub mod payments;

use axum::{middleware, Router};

pub use auth::{auth_middleware, AuthState, AuthenticatedUser, OptionalUser};
pub use documents::DocumentsAppState;
pub use error::ErrorResponse;
pub use payments::{PaymentsAppState, PlanCatalog};

/// Create the complete API router.
///
/// Mounts the document endpoints at `/api/documents` and the payment
/// endpoints at `/api/payments`. Every route runs behind the bearer
/// token middleware; routes that serve guests simply see no identity.
pub fn api_router(
    documents: DocumentsAppState,
    payments: PaymentsAppState,
    validator: AuthState,
) -> Router {
    Router::new()
        .nest(
            "/api/documents",
            documents::documents_routes().with_state(documents),
        )
        .nest(
            "/api/payments",
            payments::payments_routes().with_state(payments),
        )
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
}
