//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the application ports plus ambient concerns.

/// gRPC wire schema, generated stubs, and transport adapter.
pub mod grpc;

/// Configuration loading.
pub mod config;

/// Metrics instrumentation.
pub mod metrics;
