//! Adapters: infrastructure implementations of the ports.

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
pub mod template;
