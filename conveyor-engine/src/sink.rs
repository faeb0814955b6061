//! Result sinks.
//!
//! The engine hands every emitted result a unique name
//! (`<logicalName>_<counter>`), so sinks never see colliding names and need
//! no coordination beyond tolerating concurrent writers.

use crate::error::SinkResult;
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Destination for emitted command results.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persists one result. Attempted at most once per result; a failure is
    /// logged by the engine and never rolls back the store operation that
    /// produced the result.
    async fn write_result(&self, name: &str, content: &str) -> SinkResult<()>;
}

/// Writes each result to its own file under a base directory.
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates a sink writing into `dir`. The directory must exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ResultSink for FileSink {
    async fn write_result(&self, name: &str, content: &str) -> SinkResult<()> {
        let path = self.dir.join(name);
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Prints results to stdout, one header line per result.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResultSink for ConsoleSink {
    async fn write_result(&self, name: &str, content: &str) -> SinkResult<()> {
        // Holding the stdout lock keeps concurrent results from interleaving.
        let mut out = std::io::stdout().lock();
        writeln!(out, "── {name}")?;
        out.write_all(content.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// An in-memory sink for testing.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every written result in order of arrival.
    #[derive(Debug, Default)]
    pub struct MemorySink {
        results: Mutex<Vec<(String, String)>>,
    }

    impl MemorySink {
        /// Creates an empty sink.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// All `(name, content)` pairs written so far.
        pub fn results(&self) -> Vec<(String, String)> {
            self.results.lock().unwrap().clone()
        }

        /// Number of results written.
        pub fn len(&self) -> usize {
            self.results.lock().unwrap().len()
        }

        /// Whether nothing has been written.
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl ResultSink for MemorySink {
        async fn write_result(&self, name: &str, content: &str) -> SinkResult<()> {
            self.results
                .lock()
                .unwrap()
                .push((name.to_string(), content.to_string()));
            Ok(())
        }
    }
}
