//! Port Interfaces
//!
//! `OddsWarehousePort` is the driven port the adapter opens streams through.
//! The gRPC transport implements it over a `tonic` channel; tests implement
//! it with scripted streams.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::error::TransportError;
use crate::infrastructure::grpc::messages::{
    EventMarketRequest, ExchangeOdds, ExchangeOddsRequest, Market, MarketRunner,
    MarketRunnerRequest,
};

/// An open remote stream. Ends with `None` on end of stream.
pub type ItemStream<T> = Pin<Box<dyn Stream<Item = Result<T, TransportError>> + Send>>;

/// Streaming endpoint of the odds warehouse service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OddsWarehousePort: Send + Sync {
    /// Open a stream of exchange odds for an event runner.
    async fn open_exchange_odds(
        &self,
        request: &ExchangeOddsRequest,
    ) -> Result<ItemStream<ExchangeOdds>, TransportError>;

    /// Open a stream of the markets offered on an event.
    async fn open_event_markets(
        &self,
        request: &EventMarketRequest,
    ) -> Result<ItemStream<Market>, TransportError>;

    /// Open a stream of market runners matching a search.
    async fn open_market_runners(
        &self,
        request: &MarketRunnerRequest,
    ) -> Result<ItemStream<MarketRunner>, TransportError>;
}
