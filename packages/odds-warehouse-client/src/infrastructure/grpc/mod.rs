//! gRPC Integration
//!
//! Wire messages of the `statistico` odds warehouse contract, the generated
//! `OddsWarehouseService` stubs, and the `tonic` transport adapter.

pub mod messages;
pub mod transport;

pub use transport::{ConnectError, GrpcTransport};

// Allow clippy warnings and missing docs in generated code
#[allow(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used
)]
pub mod proto {
    include!(concat!(env!("OUT_DIR"), "/statistico.OddsWarehouseService.rs"));
}
