//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ConfigValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Stripe price ID for the basic plan
    pub basic_price_id: Option<String>,

    /// Stripe price ID for the pro plan
    pub pro_price_id: Option<String>,

    /// Stripe price ID for the enterprise plan
    pub enterprise_price_id: Option<String>,

    /// Frontend base URL used for checkout redirect targets
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if api_key.is_empty() {
            return Err(ConfigValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "STRIPE_WEBHOOK_SECRET",
            ));
        }

        // Verify key prefixes for safety
        if !api_key.starts_with("sk_") {
            return Err(ConfigValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ConfigValidationError::InvalidStripeWebhookSecret);
        }

        if !self.frontend_url.starts_with("http://") && !self.frontend_url.starts_with("https://") {
            return Err(ConfigValidationError::InvalidFrontendUrl);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: SecretString::new(String::new()),
            stripe_webhook_secret: SecretString::new(String::new()),
            basic_price_id: None,
            pro_price_id: None,
            enterprise_price_id: None,
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}
