//! Error types for the dispatch engine.

use conveyor_transport::TransportError;
use thiserror::Error;

/// Result type for engine runs.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that terminate an engine run.
///
/// Malformed commands and sink failures are logged per message and never
/// surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The feed failed to deliver (transport failure, not clean closure).
    #[error("feed failed: {0}")]
    Feed(#[from] TransportError),
}

/// Result type for sink writes.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors from a result sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("failed to persist result: {0}")]
    Io(#[from] std::io::Error),
}
