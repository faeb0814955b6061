//! Conveyor producer binary.
//!
//! Reads command lines from stdin (or a file) and publishes them to an
//! AMQP queue:
//!
//!   conveyor-client --amqp-url amqp://127.0.0.1:5672/%2f --queue conveyor

use anyhow::{Context, Result};
use clap::Parser;
use conveyor_client::CommandSender;
use conveyor_transport::{AmqpQueue, MessageQueue};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Queue buffer length, matching the server default.
const QUEUE_BUFFER: usize = 1000;

#[derive(Parser, Debug)]
#[command(name = "conveyor-client")]
#[command(about = "Publish Conveyor commands to an AMQP queue")]
struct Args {
    /// AMQP broker URL
    #[arg(long, default_value = "amqp://127.0.0.1:5672/%2f")]
    amqp_url: String,

    /// Queue name to publish to
    #[arg(long, default_value = "conveyor")]
    queue: String,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    input: Option<PathBuf>,

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

    let queue = Arc::new(
        AmqpQueue::connect(&args.amqp_url, &args.queue, QUEUE_BUFFER)
            .await
            .context("connecting to broker")?,
    );

    let sender = CommandSender::new(Arc::clone(&queue) as Arc<dyn MessageQueue>);
    let token = sender.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            token.cancel();
        }
    });

    let sent = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .await
                .with_context(|| format!("opening {}", path.display()))?;
            sender.run(BufReader::new(file)).await?
        }
        None => sender.run(BufReader::new(tokio::io::stdin())).await?,
    };
    info!("sent {sent} commands");

    queue.close().await?;
    Ok(())
}
