//! Conveyor consumer binary.
//!
//! Pulls command messages from a queue backend and applies them to the
//! in-memory ordered store, writing read results to files or the console:
//!
//!   conveyor-server --queue amqp --amqp-url amqp://127.0.0.1:5672/%2f
//!   conveyor-server --queue memory --sink console   # commands from stdin
//!
//! With the in-memory backend a producer loop runs in-process, feeding
//! stdin lines into the same queue the engine consumes from.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use conveyor_client::CommandSender;
use conveyor_engine::{ConsoleSink, DispatchEngine, EngineConfig, FileSink, ResultSink};
use conveyor_store::OrderedStore;
use conveyor_transport::{AmqpQueue, MemoryQueue, MessageQueue};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Queue buffer length for undelivered messages.
const QUEUE_BUFFER: usize = 1000;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum QueueBackend {
    /// In-process queue fed by stdin.
    Memory,
    /// AMQP 0.9.1 broker.
    Amqp,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SinkKind {
    /// One file per result under --output-dir.
    Files,
    /// Print results to stdout.
    Console,
}

#[derive(Parser, Debug)]
#[command(name = "conveyor-server")]
#[command(about = "Conveyor command-queue consumer")]
struct Args {
    /// Queue backend
    #[arg(long, value_enum, default_value_t = QueueBackend::Memory)]
    queue: QueueBackend,

    /// AMQP broker URL (amqp backend)
    #[arg(long, default_value = "amqp://127.0.0.1:5672/%2f")]
    amqp_url: String,

    /// Queue name (amqp backend)
    #[arg(long, default_value = "conveyor")]
    queue_name: String,

    /// Maximum concurrently processed commands
    #[arg(long, default_value_t = 8)]
    workers: usize,

    /// Result sink
    #[arg(long, value_enum, default_value_t = SinkKind::Files)]
    sink: SinkKind,

    /// Directory for result files (files sink)
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let sink: Arc<dyn ResultSink> = match args.sink {
        SinkKind::Files => {
            std::fs::create_dir_all(&args.output_dir)
                .with_context(|| format!("creating {}", args.output_dir.display()))?;
            Arc::new(FileSink::new(&args.output_dir))
        }
        SinkKind::Console => Arc::new(ConsoleSink::new()),
    };

    let queue: Arc<dyn MessageQueue> = match args.queue {
        QueueBackend::Memory => Arc::new(MemoryQueue::new(QUEUE_BUFFER)),
        QueueBackend::Amqp => Arc::new(
            AmqpQueue::connect(&args.amqp_url, &args.queue_name, QUEUE_BUFFER)
                .await
                .context("connecting to broker")?,
        ),
    };

    let store = Arc::new(OrderedStore::new());
    let engine = DispatchEngine::new(
        Arc::clone(&queue),
        Arc::clone(&store),
        sink,
        EngineConfig {
            max_workers: args.workers,
        },
    );

    let token = engine.shutdown_token();
    let ctrl_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            ctrl_token.cancel();
        }
    });

    // In-process producer for the memory backend: stdin → queue. Closing
    // the queue at EOF lets the engine drain and exit on its own.
    let producer = match args.queue {
        QueueBackend::Memory => {
            let sender = CommandSender::with_shutdown(Arc::clone(&queue), token.clone());
            let producer_queue = Arc::clone(&queue);
            Some(tokio::spawn(async move {
                let result = sender.run(BufReader::new(tokio::io::stdin())).await;
                let _ = producer_queue.close().await;
                result
            }))
        }
        QueueBackend::Amqp => None,
    };

    engine.run().await.context("engine run failed")?;

    if let Some(producer) = producer {
        match producer.await {
            Ok(Ok(sent)) => info!("producer enqueued {sent} commands"),
            Ok(Err(err)) => warn!("producer stopped: {err}"),
            Err(err) => warn!("producer task failed: {err}"),
        }
    }

    info!("store holds {} entries at shutdown", store.len());
    Ok(())
}
