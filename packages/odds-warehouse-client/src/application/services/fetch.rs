//! Synchronous Drain
//!
//! Reads an open stream to the end and hands back every item in reception
//! order together with at most one classified error.

use std::time::Instant;

use futures::StreamExt;

use crate::application::ports::ItemStream;
use crate::domain::classify::{Operation, ReadFailurePolicy, classify_read};
use crate::domain::error::ClientError;
use crate::infrastructure::metrics::{self, DeliveryMode, DrainOutcome};

/// Outcome of a fully drained stream.
///
/// Items received before a failure are kept; callers choose whether to use
/// them (`into_parts`) or drop them (`into_result`).
#[derive(Debug)]
pub struct Fetched<T> {
    items: Vec<T>,
    error: Option<ClientError>,
}

impl<T> Fetched<T> {
    pub(crate) const fn complete(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    pub(crate) const fn failed(items: Vec<T>, error: ClientError) -> Self {
        Self {
            items,
            error: Some(error),
        }
    }

    /// Items received, in reception order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The error that ended the drain, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// True when the stream reached end of stream without error.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Items on success; on failure the error alone, partial items dropped.
    pub fn into_result(self) -> Result<Vec<T>, ClientError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.items),
        }
    }

    /// Items received so far plus the error, if any.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<ClientError>) {
        (self.items, self.error)
    }
}

/// Drain `stream` until end of stream or the first read failure.
pub(crate) async fn drain<T>(
    operation: Operation,
    mut stream: ItemStream<T>,
    policy: ReadFailurePolicy,
) -> Fetched<T> {
    let started = Instant::now();
    let mut items = Vec::new();

    while let Some(next) = stream.next().await {
        match next {
            Ok(item) => {
                items.push(item);
            }
            Err(e) => {
                let error = classify_read(policy, items.len(), e);
                tracing::warn!(
                    operation = operation.as_str(),
                    received = items.len(),
                    error = %error,
                    "Stream read failed"
                );
                metrics::record_items_received(operation, items.len() as u64);
                metrics::record_error(operation, error.kind());
                metrics::record_drain_duration(
                    operation,
                    DeliveryMode::Collect,
                    DrainOutcome::Failed,
                    started.elapsed(),
                );
                return Fetched::failed(items, error);
            }
        }
    }

    tracing::info!(
        operation = operation.as_str(),
        received = items.len(),
        "Stream drained"
    );
    metrics::record_items_received(operation, items.len() as u64);
    metrics::record_drain_duration(
        operation,
        DeliveryMode::Collect,
        DrainOutcome::Completed,
        started.elapsed(),
    );
    Fetched::complete(items)
}
