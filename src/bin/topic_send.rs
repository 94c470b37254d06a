use anyhow::Context;
use clap::Parser;
use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory, Durability, ExchangeKind};
use sensor_pubsub::cli::TopicSendArgs;
use sensor_pubsub::publishers::{MessageEnvelope, Publisher};
use sensor_pubsub::sensors::{routing::TOPIC_EXCHANGE, IntegerReading};

#[tokio::main]
async fn main() {
    sensor_pubsub::telemetry::init_subscriber();
    let args = TopicSendArgs::parse();
    if !args.ignored.is_empty() {
        tracing::warn!("Ignoring extra arguments: {:?}", args.ignored);
    }

    if let Err(e) = run(args).await {
        sensor_pubsub::exit_on_error(e);
    }
}

async fn run(args: TopicSendArgs) -> Result<(), anyhow::Error> {
    let settings = RabbitMqSettings::from_env()?;
    let channel = ConnectionFactory::new_from_config(&settings)
        .open_channel()
        .await?;
    channel
        .declare_exchange(TOPIC_EXCHANGE, ExchangeKind::Topic, Durability::Durable)
        .await?;

    let reading = args.overrides().apply(IntegerReading::default());
    let envelope = MessageEnvelope::json(&reading)
        .context("Failed to encode JSON")?
        .with_exchange_name(TOPIC_EXCHANGE.into())
        .with_routing_key(args.routing_key().into());
    let body = String::from_utf8_lossy(&envelope.payload).into_owned();

    let publisher = Publisher::builder(channel).build();
    publisher
        .publish(envelope)
        .await
        .context("Failed to publish a message")?;
    tracing::info!(routing_key = args.routing_key(), " [x] Sent sensor data: {}", body);

    publisher.close().await;
    Ok(())
}
