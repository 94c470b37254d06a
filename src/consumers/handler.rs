use crate::consumers::{HandlerError, Incoming};

/// Implementers of the `Handler` trait are used by a [`Consumer`] to process the messages
/// retrieved from a queue.
///
/// # Scope
///
/// `handle` does not get access to the underlying RabbitMq channel.
/// Messages are acknowledged by the broker as soon as they are delivered: a handler failure
/// is logged by the consumer, which then moves on to the next message.
///
/// [`Consumer`]: crate::consumers::Consumer
#[async_trait::async_trait]
pub trait Handler: Send + Sync + 'static {
    type Context: Send + Sync + 'static;
    type Error: std::fmt::Display + Send + Sync + 'static;

    async fn handle(
        &self,
        incoming: &Incoming<Self::Context>,
    ) -> Result<(), HandlerError<Self::Error>>;
}
