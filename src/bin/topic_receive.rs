use clap::Parser;
use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory};
use sensor_pubsub::cli::TopicReceiveArgs;
use sensor_pubsub::consumers::{hooks::pre_start::TopicQueueBinder, Consumer};
use sensor_pubsub::sensors::{routing::TOPIC_EXCHANGE, LogReading};

#[tokio::main]
async fn main() {
    sensor_pubsub::telemetry::init_subscriber();
    // Exits with a usage message, before touching the broker, unless we got a queue name
    // and at least one binding key.
    let args = TopicReceiveArgs::parse();

    if let Err(e) = run(args).await {
        sensor_pubsub::exit_on_error(e);
    }
}

async fn run(args: TopicReceiveArgs) -> Result<(), anyhow::Error> {
    let settings = RabbitMqSettings::from_env()?;
    let binder = TopicQueueBinder {
        exchange_name: TOPIC_EXCHANGE.into(),
        routing_keys: args.binding_keys,
    };
    // Publishers send whole numbers, we read them as decimals.
    let consumer = Consumer::builder(
        ConnectionFactory::new_from_config(&settings),
        &args.queue_name,
        LogReading::<f64>::new(),
        (),
    )
    .with_pre_start_hook(binder)
    .build()
    .await?;

    consumer.run_until_interrupted().await
}
