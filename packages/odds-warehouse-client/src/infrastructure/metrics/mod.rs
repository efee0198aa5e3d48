//! Client Metrics
//!
//! Counters and histograms recorded through the `metrics` facade. The crate
//! installs no recorder; the host application chooses the exporter.
//!
//! # Metrics
//!
//! - `odds_warehouse_client_invocations_total{operation, mode}`
//! - `odds_warehouse_client_items_received_total{operation}`
//! - `odds_warehouse_client_errors_total{operation, kind}`
//! - `odds_warehouse_client_drain_seconds{operation, mode, outcome}`

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

use crate::domain::classify::Operation;
use crate::domain::error::ErrorKind;

/// How the results of an invocation are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Drained into a collection.
    Collect,
    /// Streamed through a channel pair.
    Channel,
}

impl DeliveryMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Channel => "channel",
        }
    }
}

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// End of stream reached.
    Completed,
    /// A read failed part way through.
    Failed,
    /// The consumer dropped the item receiver.
    Abandoned,
}

impl DrainOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Register metric descriptions with the installed recorder.
///
/// Call once after the host application installs its recorder.
pub fn describe_metrics() {
    describe_counter!(
        "odds_warehouse_client_invocations_total",
        "Total streaming calls made to the odds warehouse"
    );
    describe_counter!(
        "odds_warehouse_client_items_received_total",
        "Total items relayed from odds warehouse streams"
    );
    describe_counter!(
        "odds_warehouse_client_errors_total",
        "Total classified errors by kind"
    );
    describe_histogram!(
        "odds_warehouse_client_drain_seconds",
        "Time from stream open to the end of the drain, by outcome"
    );
}

/// Record a streaming call.
pub fn record_invocation(operation: Operation, mode: DeliveryMode) {
    counter!(
        "odds_warehouse_client_invocations_total",
        "operation" => operation.as_str(),
        "mode" => mode.as_str()
    )
    .increment(1);
}

/// Record items relayed to the caller.
pub fn record_items_received(operation: Operation, count: u64) {
    counter!(
        "odds_warehouse_client_items_received_total",
        "operation" => operation.as_str()
    )
    .increment(count);
}

/// Record a classified error.
pub fn record_error(operation: Operation, kind: ErrorKind) {
    counter!(
        "odds_warehouse_client_errors_total",
        "operation" => operation.as_str(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Record the duration of a drain that has ended.
pub fn record_drain_duration(
    operation: Operation,
    mode: DeliveryMode,
    outcome: DrainOutcome,
    duration: Duration,
) {
    histogram!(
        "odds_warehouse_client_drain_seconds",
        "operation" => operation.as_str(),
        "mode" => mode.as_str(),
        "outcome" => outcome.as_str()
    )
    .record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

    use super::*;

    /// Run `record` against a local Prometheus recorder and return the
    /// rendered exposition text.
    fn render(record: impl FnOnce()) -> String {
        let recorder: PrometheusRecorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, record);
        handle.render()
    }

    fn line_for<'a>(rendered: &'a str, name: &str) -> &'a str {
        rendered
            .lines()
            .find(|line| line.starts_with(name) && line.contains('{'))
            .unwrap_or_else(|| panic!("no sample for {name} in:\n{rendered}"))
    }

    #[test]
    fn label_values() {
        assert_eq!(DeliveryMode::Collect.as_str(), "collect");
        assert_eq!(DeliveryMode::Channel.as_str(), "channel");
        assert_eq!(DrainOutcome::Completed.as_str(), "completed");
        assert_eq!(DrainOutcome::Failed.as_str(), "failed");
        assert_eq!(DrainOutcome::Abandoned.as_str(), "abandoned");
    }

    #[test]
    fn error_counter_carries_operation_and_kind() {
        let rendered = render(|| {
            record_error(Operation::MarketRunners, ErrorKind::StreamFailure);
        });

        let line = line_for(&rendered, "odds_warehouse_client_errors_total");
        assert!(line.contains(r#"operation="market_runners""#), "{line}");
        assert!(line.contains(r#"kind="stream_failure""#), "{line}");
        assert!(line.ends_with(" 1"), "{line}");
    }

    #[test]
    fn items_and_invocations_are_counted() {
        let rendered = render(|| {
            record_invocation(Operation::ExchangeOdds, DeliveryMode::Collect);
            record_items_received(Operation::ExchangeOdds, 3);
            record_items_received(Operation::ExchangeOdds, 2);
        });

        let invocations = line_for(&rendered, "odds_warehouse_client_invocations_total");
        assert!(invocations.contains(r#"mode="collect""#), "{invocations}");
        assert!(invocations.ends_with(" 1"), "{invocations}");

        let items = line_for(&rendered, "odds_warehouse_client_items_received_total");
        assert!(items.contains(r#"operation="exchange_odds""#), "{items}");
        assert!(items.ends_with(" 5"), "{items}");
    }

    #[test]
    fn failed_drains_are_timed_with_outcome() {
        let rendered = render(|| {
            record_drain_duration(
                Operation::EventMarkets,
                DeliveryMode::Channel,
                DrainOutcome::Failed,
                Duration::from_millis(5),
            );
        });

        let line = line_for(&rendered, "odds_warehouse_client_drain_seconds");
        assert!(line.contains(r#"mode="channel""#), "{line}");
        assert!(line.contains(r#"outcome="failed""#), "{line}");
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        describe_metrics();
        record_invocation(Operation::ExchangeOdds, DeliveryMode::Collect);
        record_error(Operation::MarketRunners, ErrorKind::StreamFailure);
    }
}
