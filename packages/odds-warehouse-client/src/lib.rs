#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::cast_possible_truncation,
        clippy::too_many_lines
    )
)]

//! Odds Warehouse Client - Streaming adapter
//!
//! A client for the `statistico.OddsWarehouseService` gRPC service. Every
//! remote operation is a server stream; the adapter drains it and hands the
//! results to the caller either as a collection or as a channel pair, with
//! transport failures classified into a small set of domain errors.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Error taxonomy and classification
//!   - `error`: `TransportError`, `ClientError`
//!   - `classify`: status code → domain error mapping
//!
//! - **Application**: Stream adapter and port definitions
//!   - `ports`: `OddsWarehousePort`, the streaming endpoint abstraction
//!   - `services`: `OddsWarehouseClient`, `Fetched`, `OddsStream`
//!
//! - **Infrastructure**: Adapters and ambient concerns
//!   - `grpc`: wire messages, generated stubs, `tonic` transport
//!   - `config`: environment configuration
//!   - `metrics`: counters and histograms
//!
//! # Data Flow
//!
//! ```text
//!                    ┌─────────────┐   fetch_*   ┌──────────────┐
//! OddsWarehouse ───► │  transport  │ ──────────► │  Fetched<T>  │
//!   (gRPC stream)    │    port     │             └──────────────┘
//!                    │             │   stream_*  ┌──────────────┐
//!                    └─────────────┘ ──────────► │ OddsStream<T>│──► items
//!                                     (task)     └──────────────┘──► error
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use odds_warehouse_client::{ClientConfig, ExchangeOddsRequest, OddsWarehouseClient};
//!
//! let config = ClientConfig::load()?;
//! let client = OddsWarehouseClient::connect(&config).await?;
//!
//! let odds = client
//!     .fetch_exchange_odds(&ExchangeOddsRequest { event_id: 1234, ..Default::default() })
//!     .await
//!     .into_result()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Error taxonomy with no I/O.
pub mod domain;

/// Application layer - Stream adapter and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and ambient concerns.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::classify::{Operation, ReadFailurePolicy, classify_open, classify_read};
pub use domain::error::{BoxError, ClientError, ErrorKind, FieldViolation, TransportError};

// Adapter
pub use application::ports::{ItemStream, OddsWarehousePort};
pub use application::services::{
    AdapterSettings, DEFAULT_CHANNEL_SIZE, Fetched, MAX_CHANNEL_SIZE, OddsStream,
    OddsWarehouseClient,
};

// Configuration
pub use infrastructure::config::{ClientConfig, ConfigError};

// gRPC
pub use infrastructure::grpc::messages::{
    EventMarketRequest, ExchangeOdds, ExchangeOddsRequest, Market, MarketRunner,
    MarketRunnerRequest, Price, PriceSize, Runner,
};
pub use infrastructure::grpc::proto;
pub use infrastructure::grpc::{ConnectError, GrpcTransport};

// Metrics
pub use infrastructure::metrics::describe_metrics;
