use crate::amqp::{BasicProperties, Channel};
use crate::publishers::MessageEnvelope;
use lapin::message::BasicReturnMessage;
use lapin::options::BasicPublishOptions;
use lapin::publisher_confirm::Confirmation;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use uuid::Uuid;

/// Publishes messages on a single channel.
///
/// Publishing is fire-and-forget: the channel is not in confirm mode, messages are not
/// persistent and unroutable messages are silently dropped by the broker.
///
/// # How do I build a `Publisher`?
///
/// The starting point is [`Publisher::builder`].
///
/// ```rust,no_run
/// use sensor_pubsub::amqp::{configuration::RabbitMqSettings, ConnectionFactory};
/// use sensor_pubsub::publishers::{MessageEnvelope, Publisher};
///
/// async fn publish() -> anyhow::Result<()> {
///     let factory = ConnectionFactory::new_from_config(&RabbitMqSettings::default());
///     let publisher = Publisher::builder(factory.open_channel().await?)
///         .publish_timeout(std::time::Duration::from_secs(5))
///         .build();
///
///     let message = MessageEnvelope::default()
///         .with_payload("Hello world!".as_bytes().into())
///         .with_routing_key("hello".into());
///     publisher.publish(message).await?;
///     publisher.close().await;
///     Ok(())
/// }
/// ```
pub struct Publisher {
    channel: Channel,
    /// Timeout on publishing.
    timeout: std::time::Duration,
}

impl Publisher {
    /// Start building a [`Publisher`] on top of an open channel.
    pub fn builder(channel: Channel) -> PublisherBuilder {
        PublisherBuilder::new(channel)
    }

    /// Publish a message to RabbitMq.
    ///
    /// Fails with [`PublisherError::TimeoutError`] if the broker does not take the message
    /// within the publish timeout. Only this attempt is abandoned: the channel stays usable.
    #[tracing::instrument(skip_all, fields(exchange = %envelope.exchange_name, routing_key = %envelope.routing_key))]
    pub async fn publish(&self, envelope: MessageEnvelope) -> Result<(), PublisherError> {
        let MessageEnvelope {
            payload,
            properties,
            exchange_name,
            routing_key,
        } = envelope;
        let properties = inject_amqp_properties(properties);

        let publish_future = async {
            let confirm = self
                .channel
                .raw()
                .basic_publish(
                    &exchange_name,
                    &routing_key,
                    BasicPublishOptions {
                        mandatory: false,
                        // The immediate flag was dropped in RabbitMQ 3.0 - see https://www.rabbitmq.com/blog/2012/11/19/breaking-things-with-rabbitmq-3-0/
                        // Setting `true` will cause a not-supported error
                        immediate: false,
                    },
                    &payload,
                    properties,
                )
                .await
                .map_err(PublisherError::GenericError)?
                .await
                .map_err(PublisherError::GenericError)?;

            match confirm {
                Confirmation::NotRequested | Confirmation::Ack(_) => Ok(()),
                Confirmation::Nack(nack) => Err(PublisherError::NegativeAck(nack)),
            }
        };

        match tokio::time::timeout(self.timeout, publish_future).await {
            Ok(result) => result,
            Err(_) => Err(PublisherError::TimeoutError(self.timeout)),
        }
    }

    /// Close the underlying channel and connection.
    pub async fn close(self) {
        self.channel.close().await
    }
}

/// Error returned when trying to publish a message using `Publisher`.
#[derive(thiserror::Error, Debug)]
pub enum PublisherError {
    #[error("Generic error encountered when interacting with the RabbitMq broker")]
    GenericError(#[source] lapin::Error),
    #[error("The timeout threshold ({0:?}) was reached while trying to publish the message")]
    TimeoutError(std::time::Duration),
    #[error("The RabbitMq broker nacked the publishing of the message: {0:?}")]
    NegativeAck(Option<Box<BasicReturnMessage>>),
}

/// A builder for [`Publisher`].
///
/// Use [`Publisher::builder`] as entrypoint.
pub struct PublisherBuilder {
    channel: Channel,
    timeout: std::time::Duration,
}

impl PublisherBuilder {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            timeout: std::time::Duration::from_secs(5),
        }
    }

    /// Timeout applied when attempting to publish a message.
    /// Defaults to 5 seconds if left unspecified.
    #[must_use]
    pub fn publish_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Finalise the builder and get an instance of [`Publisher`].
    pub fn build(self) -> Publisher {
        Publisher {
            channel: self.channel,
            timeout: self.timeout,
        }
    }
}

/// Fill in the timestamp and the message id, unless the caller already set them.
fn inject_amqp_properties(props: BasicProperties) -> BasicProperties {
    let current_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|ct| ct.as_secs());

    let props = if let Some(ct) = current_timestamp {
        let ts = *props.timestamp();
        props.with_timestamp(ts.unwrap_or(ct))
    } else {
        warn!("System time is before 1970");
        props
    };

    let message_id = props.message_id().clone();
    props.with_message_id(message_id.unwrap_or_else(|| Uuid::new_v4().to_string().into()))
}
