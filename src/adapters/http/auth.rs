//! Bearer-token authentication middleware and request extractors.
//!
//! `auth_middleware` validates the `Authorization: Bearer` token via
//! the `SessionValidator` port and injects the verified `UserId` into
//! request extensions. Handlers then pull it out with
//! `AuthenticatedUser` (required) or `OptionalUser` (guest-allowed
//! routes). Identity is never read from a client-asserted header.

use std::sync::Arc;

use axum::extract::{Json, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::foundation::{AuthError, UserId};
use crate::ports::SessionValidator;

use super::error::ErrorResponse;

/// Middleware state: the session validator behind the port.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates the bearer token, if any, and stores the verified identity.
///
/// A missing token passes through without an identity so guest routes
/// keep working; the `AuthenticatedUser` extractor rejects those
/// requests where authentication is required. A present-but-invalid
/// token fails the whole request.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_owned);

    match token {
        Some(token) => match validator.validate(&token).await {
            Ok(user_id) => {
                request.extensions_mut().insert(user_id);
                next.run(request).await
            }
            Err(err) => {
                let (status, code) = match &err {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!(error = %msg, "session validation unavailable");
                        (StatusCode::SERVICE_UNAVAILABLE, "AUTH_UNAVAILABLE")
                    }
                };
                let error = ErrorResponse::new(code, err.to_string());
                (status, Json(error)).into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Authenticated user context resolved by the auth middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Optional user context for endpoints that also serve guests.
///
/// Extraction never rejects; an absent identity simply yields no user.
#[derive(Debug, Clone, Default)]
pub struct OptionalUser {
    pub user_id: Option<UserId>,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .extensions
                .get::<UserId>()
                .cloned()
                .ok_or(AuthenticationRequired)?;
            Ok(AuthenticatedUser { user_id })
        })
    }
}

impl<S> axum::extract::FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            Ok(OptionalUser {
                user_id: parts.extensions.get::<UserId>().cloned(),
            })
        })
    }
}
