use clap::Parser;
use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory};
use sensor_pubsub::cli::DirectReceiveArgs;
use sensor_pubsub::consumers::{hooks::pre_start::DirectQueueDeclarer, Consumer};
use sensor_pubsub::sensors::{routing::DIRECT_QUEUE, LogReading};

#[tokio::main]
async fn main() {
    sensor_pubsub::telemetry::init_subscriber();
    let _args = DirectReceiveArgs::parse();

    if let Err(e) = run().await {
        sensor_pubsub::exit_on_error(e);
    }
}

async fn run() -> Result<(), anyhow::Error> {
    let settings = RabbitMqSettings::from_env()?;
    let consumer = Consumer::builder(
        ConnectionFactory::new_from_config(&settings),
        DIRECT_QUEUE,
        LogReading::<i64>::new(),
        (),
    )
    .with_pre_start_hook(DirectQueueDeclarer)
    .build()
    .await?;

    consumer.run_until_interrupted().await
}
