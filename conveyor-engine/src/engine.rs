//! The dispatch loop and its execution units.

use crate::error::{EngineError, EngineResult};
use crate::sink::ResultSink;
use conveyor_store::OrderedStore;
use conveyor_transport::{Message, MessageQueue};
use conveyor_types::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Configuration for the dispatch engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Execution slots: the maximum number of concurrently running
    /// execution units.
    pub max_workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_workers: 8 }
    }
}

/// Bounded-concurrency consumer loop: feed → parse → store → sink.
///
/// Lifecycle is Running → Draining → Stopped: [`run`](Self::run) pulls
/// messages until the feed closes, fails, or the shutdown token fires, then
/// waits for every admitted execution unit before returning.
pub struct DispatchEngine {
    queue: Arc<dyn MessageQueue>,
    store: Arc<OrderedStore>,
    slots: Arc<Semaphore>,
    worker: CommandWorker,
    shutdown: CancellationToken,
}

impl DispatchEngine {
    /// Creates an engine over the given collaborators.
    pub fn new(
        queue: Arc<dyn MessageQueue>,
        store: Arc<OrderedStore>,
        sink: Arc<dyn ResultSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            queue,
            store: Arc::clone(&store),
            slots: Arc::new(Semaphore::new(config.max_workers.max(1))),
            worker: CommandWorker {
                store,
                sink,
                result_seq: Arc::new(AtomicU64::new(0)),
            },
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that cancels the run cooperatively. Cancellation is observed
    /// at the feed-receive point; admitted units still run to completion.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// The store this engine applies commands to.
    #[must_use]
    pub fn store(&self) -> &Arc<OrderedStore> {
        &self.store
    }

    /// Consumes the feed until it closes, fails, or shutdown is requested.
    ///
    /// Returns `Ok(())` after a clean drain; a feed failure surfaces as
    /// [`EngineError::Feed`] once in-flight units have finished.
    pub async fn run(&self) -> EngineResult<()> {
        let mut stream = self.queue.subscribe().await?;
        let mut units: JoinSet<()> = JoinSet::new();
        info!(
            "dispatch engine running with {} execution slots",
            self.slots.available_permits()
        );

        let feed_error = loop {
            // Reap finished units so the set doesn't grow with the feed.
            while let Some(finished) = units.try_join_next() {
                if let Err(err) = finished {
                    warn!("execution unit panicked: {err}");
                }
            }

            tokio::select! {
                // Shutdown wins over a ready message.
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("shutdown requested, draining");
                    break None;
                }
                next = stream.next() => match next {
                    None => {
                        debug!("feed closed, draining");
                        break None;
                    }
                    Some(Err(err)) => {
                        warn!("feed failed: {err}");
                        break Some(err);
                    }
                    Some(Ok(message)) => {
                        // Blocking here while saturated is the backpressure:
                        // no further messages are pulled from the feed.
                        let Ok(permit) = Arc::clone(&self.slots).acquire_owned().await else {
                            break None;
                        };
                        let worker = self.worker.clone();
                        units.spawn(async move {
                            worker.process(message).await;
                            drop(permit);
                        });
                    }
                }
            }
        };

        while let Some(finished) = units.join_next().await {
            if let Err(err) = finished {
                warn!("execution unit panicked: {err}");
            }
        }
        info!("dispatch engine stopped");

        match feed_error {
            Some(err) => Err(EngineError::Feed(err)),
            None => Ok(()),
        }
    }
}

/// The per-message half of the engine: everything an execution unit needs.
#[derive(Clone)]
struct CommandWorker {
    store: Arc<OrderedStore>,
    sink: Arc<dyn ResultSink>,
    /// Shared result counter; incremented exactly once per emitted result.
    result_seq: Arc<AtomicU64>,
}

impl CommandWorker {
    async fn process(&self, message: Message) {
        let command = match Command::parse(&message.body) {
            Ok(command) => command,
            Err(err) => {
                warn!("discarding message: {err}");
                return;
            }
        };
        debug!("applying {command} at timestamp {}", message.timestamp);

        match command {
            Command::AddItem { key, value } => self.store.set(&key, &value, message.timestamp),
            Command::DeleteItem { key } => self.store.delete(&key),
            Command::GetItem { key } => {
                if let Some(value) = self.store.get(&key) {
                    self.emit(&key, &format!("{key} : {value}\n")).await;
                }
            }
            Command::GetAllItems => {
                let mut content = String::new();
                for (key, value) in self.store.all_by_timestamp() {
                    content.push_str(&format!("{key} : {value}\n"));
                }
                self.emit("allItems", &content).await;
            }
        }
    }

    /// Allocates the next unique result name and writes through the sink.
    /// Sink failures are logged; the store operation that produced the
    /// result is never rolled back.
    async fn emit(&self, logical_name: &str, content: &str) {
        let index = self.result_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let name = format!("{logical_name}_{index}");
        if let Err(err) = self.sink.write_result(&name, content).await {
            warn!("failed to write result {name}: {err}");
        }
    }
}
