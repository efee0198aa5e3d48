//! Application Services
//!
//! - `OddsWarehouseClient`: per-operation `fetch_*` and `stream_*` calls
//! - `Fetched`: outcome of a synchronous drain
//! - `OddsStream`: item and error channels of an asynchronous drain

mod channel;
mod client;
mod fetch;

pub use channel::{DEFAULT_CHANNEL_SIZE, MAX_CHANNEL_SIZE, OddsStream};
pub use client::{AdapterSettings, OddsWarehouseClient};
pub use fetch::Fetched;
