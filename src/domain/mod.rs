//! Domain layer: pure types and decision logic, no I/O.

pub mod billing;
pub mod document;
pub mod foundation;
