//! In-process queue backend.

use crate::error::{TransportError, TransportResult};
use crate::queue::{Message, MessageQueue, MessageStream};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::mpsc;

/// Bounded in-process queue backed by a tokio channel.
///
/// Messages are timestamped at send time from a per-queue counter starting
/// at 1. When the channel buffer is full, `send` waits — the same
/// backpressure a remote broker would apply.
pub struct MemoryQueue {
    tx: Mutex<Option<mpsc::Sender<TransportResult<Message>>>>,
    rx: Mutex<Option<mpsc::Receiver<TransportResult<Message>>>>,
    next_timestamp: AtomicI64,
}

impl MemoryQueue {
    /// Creates a queue buffering up to `capacity` undelivered messages.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(Some(rx)),
            next_timestamp: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl MessageQueue for MemoryQueue {
    async fn send(&self, body: &str) -> TransportResult<()> {
        let tx = self
            .tx
            .lock()
            .expect("sender lock poisoned")
            .clone()
            .ok_or(TransportError::Closed)?;

        let timestamp = self.next_timestamp.fetch_add(1, Ordering::Relaxed) + 1;
        tx.send(Ok(Message {
            body: body.to_string(),
            timestamp,
        }))
        .await
        .map_err(|_| TransportError::Closed)
    }

    async fn subscribe(&self) -> TransportResult<MessageStream> {
        let rx = self
            .rx
            .lock()
            .expect("receiver lock poisoned")
            .take()
            .ok_or(TransportError::AlreadySubscribed)?;
        Ok(MessageStream::new(rx))
    }

    async fn close(&self) -> TransportResult<()> {
        // Dropping the sender ends the stream once the buffer drains.
        self.tx.lock().expect("sender lock poisoned").take();
        Ok(())
    }
}
