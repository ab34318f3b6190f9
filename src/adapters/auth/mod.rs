//! Authentication adapters implementing the `SessionValidator` port.

mod mock;
mod oidc;

pub use mock::MockSessionValidator;
pub use oidc::{OidcConfig, OidcSessionValidator};
