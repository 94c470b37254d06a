//! `sensor-pubsub` publishes and consumes water-quality sensor readings over RabbitMQ,
//! built on top of [`lapin`].
//!
//! Two delivery patterns are supported:
//! - direct delivery, through the default exchange to the [`DIRECT_QUEUE`](sensors::routing::DIRECT_QUEUE) queue;
//! - topic delivery, through the [`TOPIC_EXCHANGE`](sensors::routing::TOPIC_EXCHANGE) exchange
//!   to every queue bound with a matching routing key pattern.
//!
//! [`Publisher`](crate::publishers::Publisher) and [`Consumer`](crate::consumers::Consumer)
//! are the best starting points. The `direct-send`, `direct-receive`, `topic-send` and
//! `topic-receive` binaries wire them together.

pub mod amqp;
pub mod cli;
pub mod consumers;
pub mod publishers;
pub mod sensors;
pub mod telemetry;

/// Log a fatal error, with its classification when it comes from the broker, and exit
/// with a non-zero status.
pub fn exit_on_error(error: anyhow::Error) -> ! {
    match error.downcast_ref::<amqp::BrokerError>() {
        Some(broker_error) => {
            tracing::error!(class = %broker_error.class(), "{:?}", error)
        }
        None => tracing::error!("{:?}", error),
    }
    std::process::exit(1)
}
