//! gRPC Transport Adapter
//!
//! Implements `OddsWarehousePort` over the generated `tonic` client.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use tonic::Request;
use tonic::codec::Streaming;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::messages::{
    EventMarketRequest, ExchangeOdds, ExchangeOddsRequest, Market, MarketRunner,
    MarketRunnerRequest,
};
use super::proto::odds_warehouse_service_client::OddsWarehouseServiceClient;
use crate::application::ports::{ItemStream, OddsWarehousePort};
use crate::application::services::OddsWarehouseClient;
use crate::domain::error::TransportError;
use crate::infrastructure::config::ClientConfig;

/// Failure to build or connect the gRPC channel.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The endpoint is not a valid URI.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[source] tonic::transport::Error),
    /// TLS could not be configured for the endpoint.
    #[error("failed to configure tls: {0}")]
    Tls(#[source] tonic::transport::Error),
    /// The connection could not be established.
    #[error("failed to connect to odds warehouse: {0}")]
    Connect(#[source] tonic::transport::Error),
}

/// `tonic` transport for the odds warehouse service.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    client: OddsWarehouseServiceClient<Channel>,
    request_timeout: Option<Duration>,
}

impl GrpcTransport {
    /// Wrap an existing channel.
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            client: OddsWarehouseServiceClient::new(channel),
            request_timeout: None,
        }
    }

    /// Attach a deadline to every streaming call.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Connect eagerly using `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ConnectError> {
        let channel = endpoint(config)?
            .connect()
            .await
            .map_err(ConnectError::Connect)?;

        tracing::info!(endpoint = %config.endpoint, "Connected to odds warehouse");
        Ok(Self::new(channel).with_request_timeout(config.request_timeout))
    }

    /// Build a channel that connects on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(config: &ClientConfig) -> Result<Self, ConnectError> {
        let channel = endpoint(config)?.connect_lazy();
        Ok(Self::new(channel).with_request_timeout(config.request_timeout))
    }

    fn request<M>(&self, message: M) -> Request<M> {
        let mut request = Request::new(message);
        if let Some(timeout) = self.request_timeout {
            request.set_timeout(timeout);
        }
        request
    }
}

impl OddsWarehouseClient<GrpcTransport> {
    /// Connect to the service described by `config`.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ConnectError> {
        let transport = GrpcTransport::connect(config).await?;
        Ok(Self::with_settings(transport, config.adapter_settings()))
    }

    /// Client whose channel connects on first use.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn connect_lazy(config: &ClientConfig) -> Result<Self, ConnectError> {
        let transport = GrpcTransport::connect_lazy(config)?;
        Ok(Self::with_settings(transport, config.adapter_settings()))
    }
}

#[async_trait]
impl OddsWarehousePort for GrpcTransport {
    async fn open_exchange_odds(
        &self,
        request: &ExchangeOddsRequest,
    ) -> Result<ItemStream<ExchangeOdds>, TransportError> {
        let mut client = self.client.clone();
        let response = client
            .get_exchange_odds(self.request(request.clone()))
            .await?;
        Ok(item_stream(response.into_inner()))
    }

    async fn open_event_markets(
        &self,
        request: &EventMarketRequest,
    ) -> Result<ItemStream<Market>, TransportError> {
        let mut client = self.client.clone();
        let response = client
            .get_event_markets(self.request(request.clone()))
            .await?;
        Ok(item_stream(response.into_inner()))
    }

    async fn open_market_runners(
        &self,
        request: &MarketRunnerRequest,
    ) -> Result<ItemStream<MarketRunner>, TransportError> {
        let mut client = self.client.clone();
        let response = client
            .market_runner_search(self.request(request.clone()))
            .await?;
        Ok(item_stream(response.into_inner()))
    }
}

fn endpoint(config: &ClientConfig) -> Result<Endpoint, ConnectError> {
    let mut endpoint = Endpoint::from_shared(config.endpoint.clone())
        .map_err(ConnectError::InvalidEndpoint)?
        .connect_timeout(config.connect_timeout)
        .tcp_keepalive(config.tcp_keepalive);

    if let Some(timeout) = config.request_timeout {
        endpoint = endpoint.timeout(timeout);
    }

    if config.uses_tls() {
        endpoint = endpoint
            .tls_config(ClientTlsConfig::new().with_native_roots())
            .map_err(ConnectError::Tls)?;
    }

    Ok(endpoint)
}

fn item_stream<T: Send + 'static>(streaming: Streaming<T>) -> ItemStream<T> {
    Box::pin(streaming.map_err(TransportError::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = ClientConfig::new("not a uri");
        let err = endpoint(&config).unwrap_err();
        assert!(matches!(err, ConnectError::InvalidEndpoint(_)));
        assert!(err.to_string().starts_with("invalid endpoint:"));
    }

    #[test]
    fn plain_endpoint_builds() {
        let config = ClientConfig::new("http://127.0.0.1:50051");
        let endpoint = endpoint(&config).unwrap();
        assert_eq!(endpoint.uri().host(), Some("127.0.0.1"));
        assert_eq!(endpoint.uri().port_u16(), Some(50051));
    }

    #[tokio::test]
    async fn request_carries_timeout() {
        let config = ClientConfig {
            request_timeout: Some(Duration::from_secs(3)),
            ..ClientConfig::new("http://127.0.0.1:50051")
        };
        let transport = GrpcTransport::connect_lazy(&config).unwrap();

        let request = transport.request(ExchangeOddsRequest::default());
        assert_eq!(
            request
                .metadata()
                .get("grpc-timeout")
                .and_then(|v| v.to_str().ok()),
            Some("3000000u")
        );
    }

    #[tokio::test]
    async fn request_without_timeout_has_no_deadline() {
        let transport =
            GrpcTransport::connect_lazy(&ClientConfig::new("http://127.0.0.1:50051")).unwrap();
        let request = transport.request(EventMarketRequest::default());
        assert!(request.metadata().get("grpc-timeout").is_none());
    }
}
