//! Command grammar for Conveyor.
//!
//! This crate defines the textual wire format producers put on the queue and
//! the typed [`Command`] the consumer dispatches on:
//!
//! ```text
//! addItem('language', 'rust')
//! getItem('language')
//! deleteItem('language')
//! getAllItems()
//! ```
//!
//! Parsing and arity validation happen in one step: a [`Command`] value is
//! always well-formed. The parser is pure and holds no state, so it is safe
//! to call from any number of workers without synchronization.

mod command;

pub use command::{Command, ParseError};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, ParseError>;
