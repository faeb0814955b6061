//! Command dispatch engine for Conveyor.
//!
//! The consumer-side core: [`DispatchEngine`] pulls messages from a
//! [`MessageQueue`](conveyor_transport::MessageQueue), parses them into
//! commands, applies them to the shared
//! [`OrderedStore`](conveyor_store::OrderedStore), and writes read results
//! through a [`ResultSink`].
//!
//! # Concurrency model
//!
//! One dispatch loop plus up to `max_workers` concurrently running
//! execution units. Admission is a counting semaphore: while all slots are
//! occupied the loop stops pulling from the feed, which backpressures the
//! queue. Per-message failures (malformed text, sink errors) are logged and
//! isolated; only a feed failure or cancellation ends the run, and
//! already-admitted units always run to completion.
//!
//! Result ordering across concurrent units is deliberately unspecified —
//! the store's timestamp-ordered traversal is the only cross-command
//! ordering guarantee.

mod engine;
mod error;
pub mod sink;

pub use engine::{DispatchEngine, EngineConfig};
pub use error::{EngineError, EngineResult, SinkError, SinkResult};
pub use sink::{ConsoleSink, FileSink, ResultSink};
