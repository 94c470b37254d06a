use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory};
use sensor_pubsub::consumers::{Handler, HandlerError, Incoming};
use sensor_pubsub::publishers::{MessageEnvelope, Publisher};
use sensor_pubsub::sensors::SensorReading;
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tokio::sync::Mutex;

pub fn get_connection_factory() -> ConnectionFactory {
    ConnectionFactory::new_from_config(&RabbitMqSettings::default())
}

pub async fn get_publisher() -> Publisher {
    let channel = get_connection_factory().open_channel().await.unwrap();
    Publisher::builder(channel)
        .publish_timeout(std::time::Duration::from_secs(5))
        .build()
}

pub async fn publish<T: Serialize>(publisher: &Publisher, exchange: &str, routing_key: &str, value: &T) {
    let envelope = MessageEnvelope::json(value)
        .unwrap()
        .with_exchange_name(exchange.into())
        .with_routing_key(routing_key.into());
    publisher.publish(envelope).await.unwrap();
}

/// What a [`Recorder`] saw: decoded readings with their routing key, and decoding failures.
pub struct Received<M> {
    pub readings: Mutex<Vec<(String, SensorReading<M>)>>,
    pub failures: Mutex<usize>,
}

impl<M> Default for Received<M> {
    fn default() -> Self {
        Self {
            readings: Mutex::new(vec![]),
            failures: Mutex::new(0),
        }
    }
}

/// Decode every message as a reading and keep it around for assertions.
pub struct Recorder<M>(PhantomData<fn() -> M>);

impl<M> Recorder<M> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

#[async_trait::async_trait]
impl<M> Handler for Recorder<M>
where
    M: DeserializeOwned + Default + Send + Sync + 'static,
{
    type Context = Received<M>;
    type Error = serde_json::Error;

    async fn handle(
        &self,
        incoming: &Incoming<Received<M>>,
    ) -> Result<(), HandlerError<serde_json::Error>> {
        match SensorReading::<M>::from_payload(&incoming.message.data) {
            Ok(reading) => {
                incoming
                    .context
                    .readings
                    .lock()
                    .await
                    .push((incoming.message.routing_key.to_string(), reading));
                Ok(())
            }
            Err(e) => {
                *incoming.context.failures.lock().await += 1;
                Err(HandlerError::fatal(e))
            }
        }
    }
}
