//! Stripe implementation of the `PaymentProvider` port.
//!
//! Talks to Stripe's form-encoded REST API with a bounded request
//! timeout. Webhook verification lives in the domain layer; this
//! adapter only makes outbound calls.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{
    CheckoutSession, CreateCheckoutSessionRequest, CreatePaymentIntentRequest, PaymentError,
    PaymentIntent, PaymentProvider,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeAdapterConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeAdapterConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Overrides the API base URL (for tests against a local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripeAdapter {
    config: StripeAdapterConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

impl StripeAdapter {
    pub fn new(config: StripeAdapterConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(e.to_string())
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, path, error = %body, "Stripe API call failed");
            return Err(
                PaymentError::api(format!("Stripe API error ({}): {}", status, body))
                    .with_provider_code(status.as_str()),
            );
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::invalid_response(e.to_string()))
    }
}

#[async_trait]
impl PaymentProvider for StripeAdapter {
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut params = vec![
            ("amount", request.amount_cents.to_string()),
            ("currency", request.currency.clone()),
            ("metadata[type]", "single_document".to_string()),
            ("metadata[document_id]", request.document_id.to_string()),
        ];
        if let Some(user_id) = &request.user_id {
            params.push(("metadata[user_id]", user_id.as_str().to_string()));
        }
        if let Some(guest_email) = &request.guest_email {
            params.push(("metadata[guest_email]", guest_email.clone()));
        }

        let response: PaymentIntentResponse =
            self.post_form("/v1/payment_intents", &params).await?;

        let client_secret = response
            .client_secret
            .ok_or_else(|| PaymentError::invalid_response("payment intent has no client_secret"))?;

        Ok(PaymentIntent {
            id: response.id,
            client_secret,
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", request.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url.clone()),
            ("cancel_url", request.cancel_url.clone()),
            ("metadata[user_id]", request.user_id.as_str().to_string()),
            ("metadata[plan_name]", request.plan_name.clone()),
            (
                "subscription_data[metadata][user_id]",
                request.user_id.as_str().to_string(),
            ),
            (
                "subscription_data[metadata][plan_name]",
                request.plan_name.clone(),
            ),
        ];

        let response: CheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &params).await?;

        let url = response
            .url
            .ok_or_else(|| PaymentError::invalid_response("checkout session has no url"))?;

        Ok(CheckoutSession {
            id: response.id,
            url,
        })
    }
}
