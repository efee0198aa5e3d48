//! Domain Layer - Error taxonomy and classification.
//!
//! Pure Rust types with no I/O. Everything the adapter surfaces to callers
//! on failure is defined here.

/// Transport and domain error types.
pub mod error;

/// Transport-to-domain error classification.
pub mod classify;
