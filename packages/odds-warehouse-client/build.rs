//! Build Script for the Odds Warehouse Client
//!
//! Generates the `statistico.OddsWarehouseService` client and server stubs.
//! Message types are declared in `src/infrastructure/grpc/messages.rs`, so the
//! service is described with the manual builder and no `protoc` is required.
//!
//! Build scripts halt the build on failure; there is no caller to propagate to.

use tonic_build::manual::{Builder, Method, Service};

const CODEC: &str = "tonic_prost::ProstCodec";
const MESSAGES: &str = "crate::infrastructure::grpc::messages";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let service = Service::builder()
        .name("OddsWarehouseService")
        .package("statistico")
        .method(server_streaming(
            "get_exchange_odds",
            "GetExchangeOdds",
            "ExchangeOddsRequest",
            "ExchangeOdds",
        ))
        .method(server_streaming(
            "get_event_markets",
            "GetEventMarkets",
            "EventMarketRequest",
            "Market",
        ))
        .method(server_streaming(
            "market_runner_search",
            "MarketRunnerSearch",
            "MarketRunnerRequest",
            "MarketRunner",
        ))
        .build();

    // Server stubs back the in-process test server.
    Builder::new()
        .build_client(true)
        .build_server(true)
        .build_transport(true)
        .compile(&[service]);
}

fn server_streaming(name: &str, route: &str, input: &str, output: &str) -> Method {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("{MESSAGES}::{input}"))
        .output_type(format!("{MESSAGES}::{output}"))
        .codec_path(CODEC)
        .server_streaming()
        .build()
}
