//! Identity provider configuration

use serde::Deserialize;

use super::error::ConfigValidationError;

/// OIDC identity provider settings used for bearer token validation.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Issuer URL, used for JWKS discovery and issuer claim validation.
    pub issuer_url: String,

    /// Audience claim tokens must carry to be accepted.
    pub audience: String,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.issuer_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired("auth.issuer_url"));
        }
        if !self.issuer_url.starts_with("http://") && !self.issuer_url.starts_with("https://") {
            return Err(ConfigValidationError::InvalidIssuerUrl);
        }
        if self.audience.is_empty() {
            return Err(ConfigValidationError::MissingRequired("auth.audience"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            issuer_url: "https://auth.example.com".to_string(),
            audience: "docugen-api".to_string(),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn issuer_must_be_a_url() {
        let config = AuthConfig {
            issuer_url: "auth.example.com".to_string(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidIssuerUrl)
        ));
    }

    #[test]
    fn empty_audience_is_rejected() {
        let config = AuthConfig {
            audience: String::new(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingRequired("auth.audience"))
        ));
    }
}
