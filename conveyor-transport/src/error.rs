//! Error types for the transport layer.

use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
///
/// A mid-stream error delivered through a
/// [`MessageStream`](crate::MessageStream) signals a feed failure, as
/// opposed to the stream simply ending on a clean close.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The queue has been closed; no further sends are accepted.
    #[error("queue is closed")]
    Closed,

    /// The queue already handed out its consumer stream.
    #[error("queue already has a subscriber")]
    AlreadySubscribed,

    /// The broker connection or channel failed.
    #[error("broker error: {0}")]
    Broker(#[from] lapin::Error),
}
