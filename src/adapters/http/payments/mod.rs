//! Payment HTTP adapter: purchase initiation, subscription checkout,
//! status checks, and the processor webhook.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PaymentsAppState, PlanCatalog};
pub use routes::payments_routes;
