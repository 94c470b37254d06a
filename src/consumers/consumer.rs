use crate::{
    amqp::{BrokerError, Channel, ConnectionFactory},
    consumers::{ConsumerPreStartHook, Delivery, Handler, Incoming},
};
use amq_protocol_types::FieldTable;
use futures_util::{Future, FutureExt, Stream, StreamExt};
use lapin::options::{BasicCancelOptions, BasicConsumeOptions};
use shutdown_handler::ShutdownHandler;
use std::sync::Arc;
use uuid::Uuid;

/// A RabbitMq consumer pulling messages from a single queue and handing them, one at a time,
/// to a [`Handler`].
///
/// The consumer subscribes in automatic acknowledgment mode: the broker considers a message
/// consumed as soon as it has been delivered, whatever the outcome of processing.
///
/// # How do I build a `Consumer`?
///
/// The starting point is [`Consumer::builder`].
/// `build` connects to the broker and runs the pre-start hooks; messages start flowing only
/// once you call [`Consumer::run_until_shutdown`] or [`Consumer::run_until_interrupted`].
pub struct Consumer<H: Handler> {
    /// An open channel to communicate with RabbitMq.
    channel: Channel,
    /// The maximum number of messages `Consumer` is going to process before exiting the processing
    /// loop.
    /// The consumer will process messages indefinitely if set to `None`.
    exit_after: Option<usize>,
    dispatcher: Dispatcher<H>,
}

/// A builder for [`Consumer`].
///
/// Use [`Consumer::builder`] as entrypoint.
pub struct ConsumerBuilder<H: Handler> {
    connection_factory: ConnectionFactory,
    queue_name: String,
    exit_after: Option<usize>,
    pre_start_hooks: Vec<Arc<dyn ConsumerPreStartHook>>,
    handler: H,
    context: Arc<H::Context>,
}

impl<H: Handler> ConsumerBuilder<H> {
    /// Add a hook executed before the consumer starts pulling messages.
    /// Hooks run in the order they are registered.
    #[must_use]
    pub fn with_pre_start_hook<P: ConsumerPreStartHook>(mut self, hook: P) -> Self {
        self.pre_start_hooks.push(Arc::new(hook));
        self
    }

    /// Stop consuming after `n` messages have been processed.
    #[must_use]
    pub fn exit_after(mut self, n: usize) -> Self {
        self.exit_after = Some(n);
        self
    }

    /// Finalise the builder.
    ///
    /// A connection is established with the message broker and all pre-start hooks are executed.
    /// `build` does NOT trigger consumption of messages.
    #[tracing::instrument(skip_all, name = "consumer_new", fields(queue_name = %self.queue_name))]
    pub async fn build(self) -> Result<Consumer<H>, BrokerError> {
        let channel = self.connection_factory.open_channel().await?;

        for hook in &self.pre_start_hooks {
            hook.run(&channel, &self.queue_name).await?;
        }

        Ok(Consumer {
            channel,
            exit_after: self.exit_after,
            dispatcher: Dispatcher {
                queue_name: self.queue_name,
                context: self.context,
                handler: self.handler,
            },
        })
    }
}

impl<H: Handler> Consumer<H> {
    /// Start building a [`Consumer`] that feeds the messages of `queue_name` to `handler`.
    ///
    /// `context` is shared by reference with the handler for every message.
    /// If it is already behind an `Arc` pointer, it won't be "double-wrapped".
    pub fn builder(
        connection_factory: ConnectionFactory,
        queue_name: &str,
        handler: H,
        context: impl Into<Arc<H::Context>>,
    ) -> ConsumerBuilder<H> {
        ConsumerBuilder {
            connection_factory,
            queue_name: queue_name.into(),
            exit_after: None,
            pre_start_hooks: vec![],
            handler,
            context: context.into(),
        }
    }

    /// Run the consumer until the process receives SIGTERM or Ctrl-C.
    pub async fn run_until_interrupted(self) -> Result<(), anyhow::Error> {
        let shutdown = ShutdownHandler::sigterm()?;
        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.shutdown();
                }
            }
        });
        self.run_until_shutdown(shutdown.wait_for_signal()).await?;
        Ok(())
    }

    /// Run the consumer, which will notify RabbitMq to start pushing messages on the queue.
    ///
    /// `run_until_shutdown` returns when:
    /// - `shutdown` resolves; the subscription is cancelled with the broker;
    /// - `exit_after` messages have been processed;
    /// - the broker closes the subscription.
    ///
    /// It fails if the delivery stream breaks (e.g. the connection with RabbitMq is lost).
    #[tracing::instrument(skip_all, name = "consumer_run", fields(queue_name = %self.dispatcher.queue_name))]
    pub async fn run_until_shutdown(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), BrokerError> {
        let queue_name = self.dispatcher.queue_name.as_str();
        let consumer = self
            .channel
            .raw()
            .basic_consume(
                queue_name,
                &Uuid::new_v4().to_string(),
                BasicConsumeOptions {
                    no_ack: true,
                    ..BasicConsumeOptions::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| BrokerError::Subscribe {
                queue: queue_name.into(),
                source,
            })?;
        let consumer_tag = consumer.tag();

        tracing::info!(" [*] Waiting for messages on queue {}. To exit press CTRL+C", queue_name);
        let outcome = self
            .dispatcher
            .run(
                consumer.map(|event| event.map(Delivery::from)),
                shutdown,
                self.exit_after,
            )
            .await;

        if let Ok(LoopExit::Shutdown) = outcome {
            if let Err(e) = self
                .channel
                .raw()
                .basic_cancel(consumer_tag.as_str(), BasicCancelOptions::default())
                .await
            {
                tracing::warn!("Failed to cancel the subscription: {}", e);
            }
        }
        self.channel.close().await;

        outcome.map(|_| ())
    }
}

/// Why the processing loop returned.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum LoopExit {
    Shutdown,
    ExitAfterReached,
    StreamEnded,
}

/// Hands each delivery of a queue over to the handler.
pub(crate) struct Dispatcher<H: Handler> {
    pub(crate) queue_name: String,
    pub(crate) context: Arc<H::Context>,
    pub(crate) handler: H,
}

impl<H: Handler> Dispatcher<H> {
    /// Drain `deliveries` sequentially until `shutdown` resolves, `exit_after` messages have
    /// been handled or the stream ends.
    ///
    /// Handler failures are logged and do not interrupt the loop.
    pub(crate) async fn run<S>(
        &self,
        deliveries: S,
        shutdown: impl Future<Output = ()>,
        exit_after: Option<usize>,
    ) -> Result<LoopExit, BrokerError>
    where
        S: Stream<Item = Result<Delivery, lapin::Error>>,
    {
        let shutdown = shutdown.fuse();
        tokio::pin!(shutdown);
        tokio::pin!(deliveries);
        let mut counter = 0;

        loop {
            // have we consumed all the events we want?
            if exit_after == Some(counter) {
                return Ok(LoopExit::ExitAfterReached);
            }

            tokio::select! {
                // prefer handling a shutdown over processing more events
                biased;

                _ = &mut shutdown => {
                    tracing::info!("consumer received shutdown event");
                    return Ok(LoopExit::Shutdown);
                }

                event = deliveries.next() => {
                    match event {
                        // consumer has shutdown
                        None => return Ok(LoopExit::StreamEnded),
                        Some(Err(e)) => {
                            tracing::error!("Consumer error: {}", e);
                            return Err(BrokerError::Delivery {
                                queue: self.queue_name.clone(),
                                source: e,
                            });
                        }
                        Some(Ok(delivery)) => {
                            self.process(delivery).await;
                            counter += 1;
                        }
                    }
                }
            }
        }
    }

    #[tracing::instrument(
        name = "process_message",
        skip_all,
        fields(delivery_tag = delivery.delivery_tag, routing_key = %delivery.routing_key),
        level = tracing::Level::DEBUG
    )]
    async fn process(&self, delivery: Delivery) {
        let incoming = Incoming {
            context: self.context.clone(),
            message: delivery,
            queue_name: self.queue_name.clone(),
        };
        if let Err(e) = self.handler.handle(&incoming).await {
            tracing::error!(error_type = %e.error_type, "{}", e);
        }
    }
}
