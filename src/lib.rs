//! DocuGen - Payment-Gated Document Generation Backend
//!
//! This crate implements the billing core of the DocuGen service: the
//! purchase and subscription ledgers, the document access evaluator, and
//! the payment-processor webhook pipeline that drives ledger state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
