//! AMQP 0.9.1 queue backend (RabbitMQ and compatibles).

use crate::error::{TransportError, TransportResult};
use crate::queue::{Message, MessageQueue, MessageStream};
use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CONSUMER_TAG: &str = "conveyor";

/// Queue backed by an AMQP broker.
///
/// Deliveries are consumed with auto-ack (the system tolerates at-most-once
/// per result; there is no acknowledgement path back to producers) and
/// stamped with ingestion-order timestamps by the pump task that bridges the
/// broker stream into a [`MessageStream`].
pub struct AmqpQueue {
    connection: Connection,
    channel: Channel,
    queue_name: String,
    buffer: usize,
}

impl AmqpQueue {
    /// Connects to the broker at `url` and declares `queue_name`.
    pub async fn connect(url: &str, queue_name: &str, buffer: usize) -> TransportResult<Self> {
        let connection = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions::default(),
                FieldTable::default(),
            )
            .await?;
        debug!("declared AMQP queue {queue_name}");

        Ok(Self {
            connection,
            channel,
            queue_name: queue_name.to_string(),
            buffer,
        })
    }
}

#[async_trait]
impl MessageQueue for AmqpQueue {
    async fn send(&self, body: &str) -> TransportResult<()> {
        self.channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                body.as_bytes(),
                BasicProperties::default(),
            )
            .await?
            .await?;
        Ok(())
    }

    async fn subscribe(&self) -> TransportResult<MessageStream> {
        let mut consumer = self
            .channel
            .basic_consume(
                &self.queue_name,
                CONSUMER_TAG,
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await?;

        let (tx, rx) = mpsc::channel(self.buffer);
        tokio::spawn(async move {
            let mut timestamp = 0i64;
            while let Some(delivery) = consumer.next().await {
                let item = match delivery {
                    Ok(delivery) => match String::from_utf8(delivery.data) {
                        Ok(body) => {
                            timestamp += 1;
                            Ok(Message { body, timestamp })
                        }
                        Err(err) => {
                            warn!("discarding non-UTF-8 delivery: {err}");
                            continue;
                        }
                    },
                    Err(err) => Err(TransportError::Broker(err)),
                };

                let fatal = item.is_err();
                if tx.send(item).await.is_err() || fatal {
                    break;
                }
            }
            debug!("AMQP consumer pump stopped");
        });

        Ok(MessageStream::new(rx))
    }

    async fn close(&self) -> TransportResult<()> {
        self.channel.close(200, "closing").await?;
        self.connection.close(200, "closing").await?;
        Ok(())
    }
}
