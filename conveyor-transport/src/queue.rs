//! The `MessageQueue` trait and the types flowing through it.

use crate::error::TransportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One queued command message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw command text, one command per message.
    pub body: String,
    /// Logical timestamp, monotonically assigned by the backend.
    pub timestamp: i64,
}

/// The consumer side of a queue: a sequence of messages terminated by the
/// queue closing.
///
/// An `Err` item is a transport failure distinct from clean closure; the
/// stream should be considered dead after yielding one.
pub struct MessageStream {
    rx: mpsc::Receiver<TransportResult<Message>>,
}

impl MessageStream {
    /// Wraps a raw receiver. Backend implementations feed the sender side
    /// from their own pump.
    #[must_use]
    pub fn new(rx: mpsc::Receiver<TransportResult<Message>>) -> Self {
        Self { rx }
    }

    /// Receives the next message. Returns `None` once the queue is closed
    /// and drained.
    pub async fn next(&mut self) -> Option<TransportResult<Message>> {
        self.rx.recv().await
    }
}

/// A message queue backend: producers send, one consumer subscribes.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Publishes one command message.
    async fn send(&self, body: &str) -> TransportResult<()>;

    /// Returns the stream of incoming messages. A queue supports a single
    /// subscriber for its lifetime.
    async fn subscribe(&self) -> TransportResult<MessageStream>;

    /// Closes the queue. The subscriber's stream ends once buffered
    /// messages are drained.
    async fn close(&self) -> TransportResult<()>;
}
