use crate::amqp::{BrokerError, Channel};

#[async_trait::async_trait]
/// A hook to execute logic before a [`Consumer`] starts processing messages.
///
/// # Use case
///
/// A consumer reads from a queue: somebody has to make sure the queue exists and, when
/// messages flow through an exchange, that it is bound to it.
///
/// A pre-start hook gives you access to a channel, allowing you to declare the topology the
/// consumer relies on before it actually starts pulling messages.
/// Hooks are executed in the order they were registered.
///
/// [`Consumer`]: crate::consumers::Consumer
pub trait ConsumerPreStartHook: Send + Sync + 'static {
    async fn run(&self, channel: &Channel, queue_name: &str) -> Result<(), BrokerError>;
}

/// assert it's object safe
type _CHECK = Box<dyn ConsumerPreStartHook>;
