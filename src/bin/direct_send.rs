use anyhow::Context;
use clap::Parser;
use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory, QueueOptions};
use sensor_pubsub::cli::DirectSendArgs;
use sensor_pubsub::publishers::{MessageEnvelope, Publisher};
use sensor_pubsub::sensors::{routing::DIRECT_QUEUE, IntegerReading};

#[tokio::main]
async fn main() {
    sensor_pubsub::telemetry::init_subscriber();
    let _args = DirectSendArgs::parse();

    if let Err(e) = run().await {
        sensor_pubsub::exit_on_error(e);
    }
}

async fn run() -> Result<(), anyhow::Error> {
    let settings = RabbitMqSettings::from_env()?;
    let channel = ConnectionFactory::new_from_config(&settings)
        .open_channel()
        .await?;
    channel
        .declare_queue(DIRECT_QUEUE, QueueOptions::transient())
        .await?;

    let reading = IntegerReading::default();
    let envelope = MessageEnvelope::json(&reading)
        .context("Failed to encode JSON")?
        // The default exchange routes by queue name.
        .with_routing_key(DIRECT_QUEUE.into());
    let body = String::from_utf8_lossy(&envelope.payload).into_owned();

    let publisher = Publisher::builder(channel).build();
    publisher
        .publish(envelope)
        .await
        .context("Failed to publish a message")?;
    tracing::info!(" [x] Sent {}", body);

    publisher.close().await;
    Ok(())
}
