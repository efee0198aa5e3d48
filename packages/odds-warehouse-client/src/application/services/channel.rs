//! Channel Delivery
//!
//! Drains an open stream on a background task into a bounded item channel,
//! with a separate single-value channel for the terminal error.
//!
//! ```text
//! Idle → Opening ─┬─► OpenFailed            (error sent, both channels closed)
//!                 └─► Streaming ─┬─► Completed  (both closed, no error)
//!                                └─► Failed     (items closed, error sent)
//! ```
//!
//! Every terminal state closes both channels exactly once. Items already
//! buffered when the stream fails stay readable.

use std::time::Instant;

use futures::StreamExt;
use tokio::sync::{Semaphore, mpsc, oneshot};
use tokio_stream::wrappers::ReceiverStream;

use super::fetch::Fetched;
use crate::application::ports::ItemStream;
use crate::domain::classify::{Operation, ReadFailurePolicy, classify_read};
use crate::domain::error::ClientError;
use crate::infrastructure::metrics::{self, DeliveryMode, DrainOutcome};

/// Item channel capacity used when the caller passes `0`.
pub const DEFAULT_CHANNEL_SIZE: usize = 5000;

/// Largest item channel capacity; larger requests are clamped to it.
pub const MAX_CHANNEL_SIZE: usize = Semaphore::MAX_PERMITS;

/// Item and error channels of one streaming invocation.
#[derive(Debug)]
pub struct OddsStream<T> {
    items: mpsc::Receiver<T>,
    error: oneshot::Receiver<ClientError>,
}

impl<T: Send + 'static> OddsStream<T> {
    /// Channels for an invocation whose stream never opened.
    pub(crate) fn open_failed(error: ClientError) -> Self {
        let (item_tx, items) = mpsc::channel(1);
        let (error_tx, error_rx) = oneshot::channel();
        // Receiver is held by us, the send cannot fail.
        let _ = error_tx.send(error);
        drop(item_tx);

        Self {
            items,
            error: error_rx,
        }
    }

    /// Spawn the producer task draining `stream` into a channel of
    /// `capacity` items.
    pub(crate) fn spawn(operation: Operation, stream: ItemStream<T>, capacity: usize) -> Self {
        let (item_tx, items) = mpsc::channel(effective_capacity(capacity));
        let (error_tx, error_rx) = oneshot::channel();

        tokio::spawn(produce(operation, stream, item_tx, error_tx));

        Self {
            items,
            error: error_rx,
        }
    }
}

impl<T> OddsStream<T> {
    /// Receive the next item. `None` once the item channel is closed.
    pub async fn recv(&mut self) -> Option<T> {
        self.items.recv().await
    }

    /// Number of items buffered and ready to receive.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.items.len()
    }

    /// Drain the remaining items, then wait for the terminal error.
    pub async fn collect(mut self) -> Fetched<T> {
        let mut received = Vec::new();
        while let Some(item) = self.items.recv().await {
            received.push(item);
        }

        match self.error.await {
            Ok(error) => Fetched::failed(received, error),
            Err(_) => Fetched::complete(received),
        }
    }

    /// Raw item and error receivers.
    ///
    /// The error receiver resolves to `Err` when the invocation completed
    /// without error.
    #[must_use]
    pub fn into_parts(self) -> (mpsc::Receiver<T>, oneshot::Receiver<ClientError>) {
        (self.items, self.error)
    }

    /// Items as a `Stream`, plus the error receiver.
    #[must_use]
    pub fn into_stream(self) -> (ReceiverStream<T>, oneshot::Receiver<ClientError>) {
        (ReceiverStream::new(self.items), self.error)
    }
}

const fn effective_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        DEFAULT_CHANNEL_SIZE
    } else if capacity > MAX_CHANNEL_SIZE {
        MAX_CHANNEL_SIZE
    } else {
        capacity
    }
}

async fn produce<T>(
    operation: Operation,
    mut stream: ItemStream<T>,
    items: mpsc::Sender<T>,
    error: oneshot::Sender<ClientError>,
) {
    let started = Instant::now();
    let mut position = 0_usize;

    while let Some(next) = stream.next().await {
        match next {
            Ok(item) => {
                // Awaits capacity: a slow consumer stalls the stream, never drops.
                if items.send(item).await.is_err() {
                    tracing::debug!(
                        operation = operation.as_str(),
                        sent = position,
                        "Item receiver dropped, abandoning stream"
                    );
                    metrics::record_items_received(operation, position as u64);
                    metrics::record_drain_duration(
                        operation,
                        DeliveryMode::Channel,
                        DrainOutcome::Abandoned,
                        started.elapsed(),
                    );
                    return;
                }
                position += 1;
            }
            Err(e) => {
                let classified = classify_read(ReadFailurePolicy::StreamFailure, position, e);
                tracing::warn!(
                    operation = operation.as_str(),
                    sent = position,
                    error = %classified,
                    "Stream read failed"
                );
                metrics::record_items_received(operation, position as u64);
                metrics::record_error(operation, classified.kind());
                metrics::record_drain_duration(
                    operation,
                    DeliveryMode::Channel,
                    DrainOutcome::Failed,
                    started.elapsed(),
                );

                // Close the item channel before publishing the error so a
                // consumer woken by the error can always drain to the end.
                drop(items);
                let _ = error.send(classified);
                return;
            }
        }
    }

    tracing::info!(
        operation = operation.as_str(),
        sent = position,
        "Stream completed"
    );
    metrics::record_items_received(operation, position as u64);
    metrics::record_drain_duration(
        operation,
        DeliveryMode::Channel,
        DrainOutcome::Completed,
        started.elapsed(),
    );

    drop(items);
    drop(error);
}
