//! A thin layer over [`lapin::Channel`] to declare the broker topology we rely on.
use crate::amqp::BrokerError;
use lapin::{
    options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::FieldTable,
    ExchangeKind,
};

/// An open channel to RabbitMq, together with the connection it was opened on.
///
/// Dropping the channel drops the connection as well.
pub struct Channel {
    connection: lapin::Connection,
    channel: lapin::Channel,
}

/// Durability of a queue or exchange.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Durability {
    /// Survives a broker restart.
    Durable,
    /// Lost when the broker restarts.
    Transient,
}

/// Parameters used to declare a queue.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct QueueOptions {
    pub durability: Durability,
    pub exclusive: bool,
    pub auto_delete: bool,
}

impl QueueOptions {
    /// Non-durable, shared, kept around when the last consumer goes away.
    ///
    /// Every queue in the sensor pipelines is declared this way.
    pub fn transient() -> Self {
        Self {
            durability: Durability::Transient,
            exclusive: false,
            auto_delete: false,
        }
    }
}

impl From<QueueOptions> for QueueDeclareOptions {
    fn from(options: QueueOptions) -> Self {
        QueueDeclareOptions {
            passive: false,
            durable: options.durability == Durability::Durable,
            exclusive: options.exclusive,
            auto_delete: options.auto_delete,
            nowait: false,
        }
    }
}

impl Channel {
    #[tracing::instrument(name = "rabbitmq_create_channel", skip(connection))]
    pub(crate) async fn open(connection: lapin::Connection) -> Result<Self, BrokerError> {
        let channel = connection
            .create_channel()
            .await
            .map_err(BrokerError::OpenChannel)?;
        Ok(Self {
            connection,
            channel,
        })
    }

    /// Get access to the underlying raw channel
    pub fn raw(&self) -> &lapin::Channel {
        &self.channel
    }

    /// Declare a RabbitMq queue.
    ///
    /// Declaring a queue that already exists with the same parameters is a no-op.
    #[tracing::instrument(name = "rabbitmq_declare_queue", skip(self))]
    pub async fn declare_queue(&self, queue: &str, options: QueueOptions) -> Result<(), BrokerError> {
        self.channel
            .queue_declare(queue, options.into(), FieldTable::default())
            .await
            .map_err(|source| BrokerError::DeclareQueue {
                queue: queue.into(),
                source,
            })?;
        Ok(())
    }

    /// Declare a RabbitMq exchange.
    #[tracing::instrument(name = "rabbitmq_declare_exchange", skip(self))]
    pub async fn declare_exchange(
        &self,
        exchange: &str,
        exchange_kind: ExchangeKind,
        durability: Durability,
    ) -> Result<(), BrokerError> {
        let options = ExchangeDeclareOptions {
            passive: false,
            durable: durability == Durability::Durable,
            auto_delete: false,
            internal: false,
            nowait: false,
        };
        self.channel
            .exchange_declare(exchange, exchange_kind, options, FieldTable::default())
            .await
            .map_err(|source| BrokerError::DeclareExchange {
                exchange: exchange.into(),
                source,
            })
    }

    /// Bind a queue to an exchange.
    ///
    /// The routing key is handed over to the broker as-is.
    #[tracing::instrument(name = "rabbitmq_bind_queue", skip(self))]
    pub async fn bind_queue(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
    ) -> Result<(), BrokerError> {
        let options = QueueBindOptions { nowait: false };
        self.channel
            .queue_bind(queue, exchange, routing_key, options, FieldTable::default())
            .await
            .map_err(|source| BrokerError::BindQueue {
                queue: queue.into(),
                exchange: exchange.into(),
                routing_key: routing_key.into(),
                source,
            })
    }

    /// Close the channel and then its connection.
    ///
    /// Failures are logged: there is nothing left to do with a connection we are dropping anyway.
    #[tracing::instrument(name = "rabbitmq_close", skip(self))]
    pub async fn close(self) {
        if let Err(e) = self.channel.close(200, "OK").await {
            tracing::warn!("Failed to close the RabbitMQ channel: {}", e);
        }
        if let Err(e) = self.connection.close(200, "OK").await {
            tracing::warn!("Failed to close the RabbitMQ connection: {}", e);
        }
    }
}
