//! Error Classification
//!
//! Maps transport failures onto domain errors. Classification is pure: no
//! retries, no logging, no side effects.

use tonic::Code;

use super::error::{ClientError, TransportError};

/// Remote streaming operation being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GetExchangeOdds`.
    ExchangeOdds,
    /// `GetEventMarkets`.
    EventMarkets,
    /// `MarketRunnerSearch`.
    MarketRunners,
}

impl Operation {
    /// Label value for this operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExchangeOdds => "exchange_odds",
            Self::EventMarkets => "event_markets",
            Self::MarketRunners => "market_runners",
        }
    }

    /// Whether the remote contract defines request validation for this
    /// operation, i.e. whether `InvalidArgument` is a meaningful status.
    #[must_use]
    pub const fn validates_request(self) -> bool {
        match self {
            Self::ExchangeOdds => false,
            Self::EventMarkets | Self::MarketRunners => true,
        }
    }
}

/// How a read failure on an open stream is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Report as `InternalServerError`.
    #[default]
    Internal,
    /// Report as `StreamFailure` with the failed item position.
    StreamFailure,
}

impl ReadFailurePolicy {
    /// Parse policy from string. Unknown values fall back to `Internal`.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "stream_failure" | "stream-failure" => Self::StreamFailure,
            _ => Self::Internal,
        }
    }

    /// Policy name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::StreamFailure => "stream_failure",
        }
    }
}

/// Classify a failure to open a stream.
#[must_use]
pub fn classify_open(operation: Operation, error: TransportError) -> ClientError {
    match error.code() {
        Some(Code::InvalidArgument) if operation.validates_request() => {
            ClientError::InvalidArgument(error)
        }
        Some(Code::Internal) | None => ClientError::InternalServerError(error),
        Some(_) => ClientError::BadGateway(error),
    }
}

/// Classify a failure to read the item at `position` from an open stream.
#[must_use]
pub fn classify_read(
    policy: ReadFailurePolicy,
    position: usize,
    error: TransportError,
) -> ClientError {
    match policy {
        ReadFailurePolicy::Internal => ClientError::InternalServerError(error),
        ReadFailurePolicy::StreamFailure => ClientError::StreamFailure {
            position,
            source: error,
        },
    }
}
