//! The `Command` type and its wire-format parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while turning raw command text into a [`Command`].
///
/// Each variant carries the offending input so a consumer can log the exact
/// message it discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The verb before the opening parenthesis is not a known command.
    #[error("unrecognized command verb in {0:?}")]
    UnknownVerb(String),

    /// The verb is known but the argument count does not match its arity.
    #[error("wrong number of arguments for {verb} in {raw:?}")]
    WrongArity {
        /// The recognized verb.
        verb: &'static str,
        /// The full raw input.
        raw: String,
    },
}

/// A parsed, arity-validated command.
///
/// Commands are immutable once constructed; the only mutating operations on
/// the store they describe are `AddItem` and `DeleteItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Insert or replace a key/value pair.
    AddItem { key: String, value: String },
    /// Remove a key. Removing an absent key is a no-op downstream.
    DeleteItem { key: String },
    /// Look up a single key and emit its value.
    GetItem { key: String },
    /// Emit every live entry in timestamp order.
    GetAllItems,
}

impl Command {
    /// Parses one line of command text.
    ///
    /// Grammar: `verb '(' [arg (',' arg)*] ')'`. Arguments are whitespace-
    /// trimmed, optionally single-quoted, and empty tokens left behind by
    /// trailing separators are dropped. A missing parenthesis pair is
    /// tolerated for zero-argument commands (`getAllItems` alone parses).
    ///
    /// Known limitation of the grammar: argument values containing `,` or
    /// `)` cannot be expressed.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let (verb, args) = split_verb_args(raw);

        match verb {
            "addItem" => match args.as_slice() {
                [key, value] => Ok(Self::AddItem {
                    key: key.clone(),
                    value: value.clone(),
                }),
                _ => Err(ParseError::WrongArity {
                    verb: "addItem",
                    raw: raw.to_string(),
                }),
            },
            "deleteItem" => match args.as_slice() {
                [key] => Ok(Self::DeleteItem { key: key.clone() }),
                _ => Err(ParseError::WrongArity {
                    verb: "deleteItem",
                    raw: raw.to_string(),
                }),
            },
            "getItem" => match args.as_slice() {
                [key] => Ok(Self::GetItem { key: key.clone() }),
                _ => Err(ParseError::WrongArity {
                    verb: "getItem",
                    raw: raw.to_string(),
                }),
            },
            "getAllItems" => {
                if args.is_empty() {
                    Ok(Self::GetAllItems)
                } else {
                    Err(ParseError::WrongArity {
                        verb: "getAllItems",
                        raw: raw.to_string(),
                    })
                }
            }
            _ => Err(ParseError::UnknownVerb(raw.to_string())),
        }
    }

    /// The wire-format verb for this command.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::AddItem { .. } => "addItem",
            Self::DeleteItem { .. } => "deleteItem",
            Self::GetItem { .. } => "getItem",
            Self::GetAllItems => "getAllItems",
        }
    }

    /// The key this command targets, if it targets one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::AddItem { key, .. } | Self::DeleteItem { key } | Self::GetItem { key } => {
                Some(key)
            }
            Self::GetAllItems => None,
        }
    }
}

/// Splits raw text into the verb and its trimmed, unquoted arguments.
fn split_verb_args(raw: &str) -> (&str, Vec<String>) {
    let Some((verb, rest)) = raw.split_once('(') else {
        return (raw.trim(), Vec::new());
    };

    // Everything up to the first `)`; an unclosed call keeps the tail.
    let inside = rest.split_once(')').map_or(rest, |(inside, _)| inside);
    let args = inside
        .split(',')
        .map(|arg| arg.trim().trim_matches('\'').to_string())
        .filter(|arg| !arg.is_empty())
        .collect();

    (verb.trim(), args)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddItem { key, value } => write!(f, "addItem('{key}', '{value}')"),
            Self::DeleteItem { key } => write!(f, "deleteItem('{key}')"),
            Self::GetItem { key } => write!(f, "getItem('{key}')"),
            Self::GetAllItems => write!(f, "getAllItems()"),
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
