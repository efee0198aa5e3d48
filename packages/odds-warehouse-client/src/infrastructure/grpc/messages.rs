//! OddsWarehouseService Wire Messages
//!
//! Request and response shapes of the `statistico` odds warehouse contract.
//! The adapter relays these values untouched; field meaning belongs to the
//! remote service.

use prost_types::Timestamp;

// =============================================================================
// Requests
// =============================================================================

/// Filter for historical exchange odds of a single event runner.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExchangeOddsRequest {
    /// Event identifier.
    #[prost(uint64, tag = "1")]
    pub event_id: u64,
    /// Market name, e.g. `OVER_UNDER_25`.
    #[prost(string, tag = "2")]
    pub market: String,
    /// Exchange name, e.g. `BETFAIR`.
    #[prost(string, tag = "3")]
    pub exchange: String,
    /// Runner name, e.g. `OVER`.
    #[prost(string, tag = "4")]
    pub runner: String,
    /// Maximum number of odds records to return.
    #[prost(uint32, tag = "5")]
    pub limit: u32,
}

/// Filter for the markets offered on an event.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EventMarketRequest {
    /// Event identifier.
    #[prost(uint64, tag = "1")]
    pub event_id: u64,
    /// Market name. Empty matches every market.
    #[prost(string, tag = "2")]
    pub market: String,
    /// Exchange name. Empty matches every exchange.
    #[prost(string, tag = "3")]
    pub exchange: String,
}

/// Search filter for market runners across competitions and seasons.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MarketRunnerRequest {
    /// Market name, e.g. `MATCH_ODDS`.
    #[prost(string, tag = "1")]
    pub market: String,
    /// Runner name, e.g. `Home`.
    #[prost(string, tag = "2")]
    pub runner: String,
    /// Price line selector (`MAX`, `CLOSING`).
    #[prost(string, tag = "3")]
    pub line: String,
    /// Lower odds bound.
    #[prost(message, optional, tag = "4")]
    pub min_odds: Option<f32>,
    /// Upper odds bound.
    #[prost(message, optional, tag = "5")]
    pub max_odds: Option<f32>,
    /// Competitions to include.
    #[prost(uint64, repeated, tag = "6")]
    pub competition_ids: Vec<u64>,
    /// Seasons to include.
    #[prost(uint64, repeated, tag = "7")]
    pub season_ids: Vec<u64>,
    /// Earliest event date.
    #[prost(message, optional, tag = "8")]
    pub date_from: Option<Timestamp>,
    /// Latest event date.
    #[prost(message, optional, tag = "9")]
    pub date_to: Option<Timestamp>,
    /// Maximum number of runners to return.
    #[prost(message, optional, tag = "10")]
    pub limit: Option<u64>,
}

// =============================================================================
// Responses
// =============================================================================

/// A single exchange price observation.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ExchangeOdds {
    /// Decimal odds.
    #[prost(float, tag = "1")]
    pub price: f32,
    /// Unix timestamp of the observation.
    #[prost(uint64, tag = "2")]
    pub timestamp: u64,
}

/// Price and available volume at that price.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct PriceSize {
    /// Decimal odds.
    #[prost(float, tag = "1")]
    pub price: f32,
    /// Matched volume available.
    #[prost(float, tag = "2")]
    pub size: f32,
}

/// A runner within a market.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Runner {
    /// Exchange runner identifier.
    #[prost(uint64, tag = "1")]
    pub id: u64,
    /// Runner name.
    #[prost(string, tag = "2")]
    pub name: String,
    /// Optional display label.
    #[prost(string, tag = "3")]
    pub label: String,
    /// Back side of the book.
    #[prost(message, repeated, tag = "4")]
    pub back_prices: Vec<PriceSize>,
    /// Lay side of the book.
    #[prost(message, repeated, tag = "5")]
    pub lay_prices: Vec<PriceSize>,
}

/// A market offered on an event.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Market {
    /// Exchange market identifier.
    #[prost(string, tag = "1")]
    pub id: String,
    /// Event identifier.
    #[prost(uint64, tag = "2")]
    pub event_id: u64,
    /// Market name.
    #[prost(string, tag = "3")]
    pub name: String,
    /// Book side (`BACK`, `LAY`).
    #[prost(string, tag = "4")]
    pub side: String,
    /// Exchange name.
    #[prost(string, tag = "5")]
    pub exchange: String,
    /// Runners in the market.
    #[prost(message, repeated, tag = "6")]
    pub runners: Vec<Runner>,
}

/// A runner price snapshot.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Price {
    /// Decimal odds.
    #[prost(float, tag = "1")]
    pub value: f32,
    /// Matched volume.
    #[prost(float, tag = "2")]
    pub size: f32,
    /// Book side (`BACK`, `LAY`).
    #[prost(string, tag = "3")]
    pub side: String,
    /// Unix timestamp of the snapshot.
    #[prost(uint64, tag = "4")]
    pub timestamp: u64,
}

/// A runner matched by a market runner search.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MarketRunner {
    /// Exchange market identifier.
    #[prost(string, tag = "1")]
    pub market_id: String,
    /// Market name.
    #[prost(string, tag = "2")]
    pub market_name: String,
    /// Exchange runner identifier.
    #[prost(uint64, tag = "3")]
    pub runner_id: u64,
    /// Runner name.
    #[prost(string, tag = "4")]
    pub runner_name: String,
    /// Event identifier.
    #[prost(uint64, tag = "5")]
    pub event_id: u64,
    /// Competition identifier.
    #[prost(uint64, tag = "6")]
    pub competition_id: u64,
    /// Season identifier.
    #[prost(uint64, tag = "7")]
    pub season_id: u64,
    /// Kick-off time of the event.
    #[prost(message, optional, tag = "8")]
    pub event_date: Option<Timestamp>,
    /// Exchange name.
    #[prost(string, tag = "9")]
    pub exchange: String,
    /// Price at the requested line.
    #[prost(message, optional, tag = "10")]
    pub price: Option<Price>,
}
