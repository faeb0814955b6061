//! Producer side of Conveyor.
//!
//! [`CommandSender`] reads command lines from any buffered input, validates
//! them against the wire grammar before they ever reach the queue, and
//! publishes each valid line as one message. The first invalid line stops
//! the producer with an error — bad input is a caller mistake, not
//! something to silently skip.

use conveyor_transport::{MessageQueue, TransportError};
use conveyor_types::{Command, ParseError};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Result type for producer operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that stop the producer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A line failed command validation.
    #[error("invalid command: {0}")]
    Parse(#[from] ParseError),

    /// The queue rejected a send.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The input source failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads command lines and enqueues them.
pub struct CommandSender {
    queue: Arc<dyn MessageQueue>,
    shutdown: CancellationToken,
}

impl CommandSender {
    /// Creates a sender publishing to `queue`.
    pub fn new(queue: Arc<dyn MessageQueue>) -> Self {
        Self::with_shutdown(queue, CancellationToken::new())
    }

    /// Creates a sender sharing an externally owned shutdown token.
    pub fn with_shutdown(queue: Arc<dyn MessageQueue>, shutdown: CancellationToken) -> Self {
        Self { queue, shutdown }
    }

    /// Token that stops the sender cooperatively between lines.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Consumes `input` line by line until EOF, cancellation, or the first
    /// error. Blank lines are skipped. Returns how many commands were sent.
    pub async fn run<R>(&self, input: R) -> ClientResult<usize>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut sent = 0;

        loop {
            tokio::select! {
                // Shutdown wins over ready input.
                biased;
                _ = self.shutdown.cancelled() => return Ok(sent),
                line = lines.next_line() => match line? {
                    None => return Ok(sent),
                    Some(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let command = Command::parse(line)?;
                        debug!("enqueueing {command}");
                        self.queue.send(line).await?;
                        sent += 1;
                    }
                }
            }
        }
    }
}
