//! Application Layer - Stream adapter and port definitions.
//!
//! The adapter opens streams through the transport port, classifies
//! failures with the domain classifier, and delivers items either drained
//! into a collection or through a channel pair.

/// Port interfaces for the remote streaming endpoint.
pub mod ports;

/// Stream adapter services.
pub mod services;
