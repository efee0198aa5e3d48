//! Odds Warehouse Client
//!
//! The outbound surface of the crate. Each remote operation is available as
//! a drained collection (`fetch_*`) and as a channel pair (`stream_*`).

use super::channel::{DEFAULT_CHANNEL_SIZE, OddsStream};
use super::fetch::{Fetched, drain};
use crate::application::ports::{ItemStream, OddsWarehousePort};
use crate::domain::classify::{Operation, ReadFailurePolicy, classify_open};
use crate::domain::error::TransportError;
use crate::infrastructure::grpc::messages::{
    EventMarketRequest, ExchangeOdds, ExchangeOddsRequest, Market, MarketRunner,
    MarketRunnerRequest,
};
use crate::infrastructure::metrics::{self, DeliveryMode};

/// Adapter behaviour that is not a transport concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterSettings {
    /// Classification of read failures in `fetch_*` calls.
    pub read_failure: ReadFailurePolicy,
    /// Item channel capacity for `stream_*` calls given a buffer size of `0`.
    pub channel_size: usize,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            read_failure: ReadFailurePolicy::Internal,
            channel_size: DEFAULT_CHANNEL_SIZE,
        }
    }
}

/// Client for the odds warehouse streaming service.
#[derive(Debug, Clone)]
pub struct OddsWarehouseClient<P> {
    port: P,
    settings: AdapterSettings,
}

impl<P: OddsWarehousePort> OddsWarehouseClient<P> {
    /// Create a client over a transport with default settings.
    pub fn new(port: P) -> Self {
        Self::with_settings(port, AdapterSettings::default())
    }

    /// Create a client over a transport with explicit settings.
    pub const fn with_settings(port: P, settings: AdapterSettings) -> Self {
        Self { port, settings }
    }

    /// Current adapter settings.
    #[must_use]
    pub const fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    /// The underlying transport.
    #[must_use]
    pub const fn port(&self) -> &P {
        &self.port
    }

    // =========================================================================
    // Drained collections
    // =========================================================================

    /// Fetch every exchange odds record matching `request`.
    pub async fn fetch_exchange_odds(
        &self,
        request: &ExchangeOddsRequest,
    ) -> Fetched<ExchangeOdds> {
        tracing::debug!(
            event_id = request.event_id,
            market = %request.market,
            exchange = %request.exchange,
            runner = %request.runner,
            "Fetching exchange odds"
        );
        let opened = self.port.open_exchange_odds(request).await;
        self.fetch(Operation::ExchangeOdds, opened).await
    }

    /// Fetch every market offered on the requested event.
    pub async fn fetch_event_markets(&self, request: &EventMarketRequest) -> Fetched<Market> {
        tracing::debug!(
            event_id = request.event_id,
            market = %request.market,
            exchange = %request.exchange,
            "Fetching event markets"
        );
        let opened = self.port.open_event_markets(request).await;
        self.fetch(Operation::EventMarkets, opened).await
    }

    /// Fetch every market runner matching the search.
    pub async fn fetch_market_runners(
        &self,
        request: &MarketRunnerRequest,
    ) -> Fetched<MarketRunner> {
        tracing::debug!(
            market = %request.market,
            runner = %request.runner,
            line = %request.line,
            "Fetching market runners"
        );
        let opened = self.port.open_market_runners(request).await;
        self.fetch(Operation::MarketRunners, opened).await
    }

    // =========================================================================
    // Channel pairs
    // =========================================================================

    /// Stream exchange odds into a channel of `buffer_size` items
    /// (`0` uses the configured default).
    pub async fn stream_exchange_odds(
        &self,
        request: &ExchangeOddsRequest,
        buffer_size: usize,
    ) -> OddsStream<ExchangeOdds> {
        let opened = self.port.open_exchange_odds(request).await;
        self.stream(Operation::ExchangeOdds, opened, buffer_size)
    }

    /// Stream event markets into a channel of `buffer_size` items
    /// (`0` uses the configured default).
    pub async fn stream_event_markets(
        &self,
        request: &EventMarketRequest,
        buffer_size: usize,
    ) -> OddsStream<Market> {
        let opened = self.port.open_event_markets(request).await;
        self.stream(Operation::EventMarkets, opened, buffer_size)
    }

    /// Stream market runners into a channel of `buffer_size` items
    /// (`0` uses the configured default).
    pub async fn stream_market_runners(
        &self,
        request: &MarketRunnerRequest,
        buffer_size: usize,
    ) -> OddsStream<MarketRunner> {
        let opened = self.port.open_market_runners(request).await;
        self.stream(Operation::MarketRunners, opened, buffer_size)
    }

    // =========================================================================
    // Shared drain paths
    // =========================================================================

    async fn fetch<T>(
        &self,
        operation: Operation,
        opened: Result<ItemStream<T>, TransportError>,
    ) -> Fetched<T> {
        metrics::record_invocation(operation, DeliveryMode::Collect);

        match opened {
            Ok(stream) => drain(operation, stream, self.settings.read_failure).await,
            Err(e) => {
                let error = classify_open(operation, e);
                tracing::warn!(
                    operation = operation.as_str(),
                    error = %error,
                    "Failed to open stream"
                );
                metrics::record_error(operation, error.kind());
                Fetched::failed(Vec::new(), error)
            }
        }
    }

    fn stream<T: Send + 'static>(
        &self,
        operation: Operation,
        opened: Result<ItemStream<T>, TransportError>,
        buffer_size: usize,
    ) -> OddsStream<T> {
        metrics::record_invocation(operation, DeliveryMode::Channel);

        match opened {
            Ok(stream) => {
                let capacity = if buffer_size == 0 {
                    self.settings.channel_size
                } else {
                    buffer_size
                };
                tracing::debug!(
                    operation = operation.as_str(),
                    capacity,
                    "Stream opened, spawning producer"
                );
                OddsStream::spawn(operation, stream, capacity)
            }
            Err(e) => {
                let error = classify_open(operation, e);
                tracing::warn!(
                    operation = operation.as_str(),
                    error = %error,
                    "Failed to open stream"
                );
                metrics::record_error(operation, error.kind());
                OddsStream::open_failed(error)
            }
        }
    }
}
