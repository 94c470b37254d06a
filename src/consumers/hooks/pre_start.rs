//! A collection of pre-start hooks.
use crate::amqp::{BrokerError, Channel, Durability, ExchangeKind, QueueOptions};
use crate::consumers::ConsumerPreStartHook;

/// Declare the consumer queue, non-durable and shared.
/// The queue is not bound to any exchange: messages reach it through the default exchange,
/// using the queue name as routing key.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectQueueDeclarer;

#[async_trait::async_trait]
impl ConsumerPreStartHook for DirectQueueDeclarer {
    async fn run(&self, channel: &Channel, queue_name: &str) -> Result<(), BrokerError> {
        channel
            .declare_queue(queue_name, QueueOptions::transient())
            .await
    }
}

/// Declare a durable topic exchange and the consumer queue, then bind the queue to the
/// exchange once for every routing key pattern.
///
/// Patterns are not inspected: a malformed one is rejected by the broker when binding.
#[derive(Clone, Debug)]
pub struct TopicQueueBinder {
    pub exchange_name: String,
    pub routing_keys: Vec<String>,
}

#[async_trait::async_trait]
impl ConsumerPreStartHook for TopicQueueBinder {
    async fn run(&self, channel: &Channel, queue_name: &str) -> Result<(), BrokerError> {
        channel
            .declare_exchange(&self.exchange_name, ExchangeKind::Topic, Durability::Durable)
            .await?;
        channel
            .declare_queue(queue_name, QueueOptions::transient())
            .await?;

        for routing_key in &self.routing_keys {
            tracing::info!(
                "Binding queue {} to exchange {} with routing key {}",
                queue_name,
                self.exchange_name,
                routing_key
            );
            channel
                .bind_queue(queue_name, &self.exchange_name, routing_key)
                .await?;
        }
        Ok(())
    }
}
