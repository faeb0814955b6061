//! Message transport layer for Conveyor.
//!
//! Defines the [`MessageQueue`] capability the dispatch engine consumes from
//! and producers publish to — send, subscribe-as-stream, close — so the
//! engine never depends on a concrete backend.
//!
//! # Backends
//!
//! - [`MemoryQueue`]: bounded in-process channel. Used when producer and
//!   consumer share a process, and as the test transport.
//! - [`AmqpQueue`]: AMQP 0.9.1 broker (RabbitMQ and compatibles) via lapin.
//!
//! Every backend stamps each [`Message`] with a monotonically increasing
//! logical timestamp: the in-memory queue at send time, the AMQP backend in
//! delivery (ingestion) order.

mod amqp;
mod error;
mod mem;
mod queue;

pub use amqp::AmqpQueue;
pub use error::{TransportError, TransportResult};
pub use mem::MemoryQueue;
pub use queue::{Message, MessageQueue, MessageStream};
