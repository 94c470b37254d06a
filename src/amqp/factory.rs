use crate::amqp::{configuration::RabbitMqSettings, BrokerError, Channel};
use lapin::{uri::AMQPUri, ConnectionProperties};
use tokio::time::timeout;
use tracing::warn;

#[derive(Clone)]
/// All the information required to connect to a RabbitMq broker.
pub struct ConnectionFactory {
    uri: AMQPUri,
    /// The timeout observed when trying to connect to RabbitMq.
    connection_timeout: std::time::Duration,
}

impl ConnectionFactory {
    /// Create a new connection factory from settings.
    ///
    /// A connection timeout can be (optionally) specified in `settings`.
    /// If the connection timeout is left unspecified, it will be defaulted to 10 seconds.
    pub fn new_from_config(settings: &RabbitMqSettings) -> Self {
        let connection_timeout = settings
            .connection_timeout()
            .unwrap_or_else(|| std::time::Duration::from_secs(10));
        Self {
            uri: settings.amqp_uri(),
            connection_timeout,
        }
    }

    /// Create a new connection to a RabbitMq broker.
    #[tracing::instrument(name = "rabbitmq_connect", skip(self), fields(host = %self.uri.authority.host, port = self.uri.authority.port))]
    pub async fn new_connection(&self) -> Result<lapin::Connection, BrokerError> {
        let properties =
            ConnectionProperties::default().with_executor(tokio_executor_trait::Tokio::current());
        let connection = timeout(
            self.connection_timeout,
            lapin::Connection::connect_uri(self.uri.clone(), properties),
        )
        .await
        .map_err(|_| BrokerError::ConnectTimeout(self.connection_timeout))?
        .map_err(BrokerError::Connect)?;
        // Register a callback to log connection errors.
        connection.on_error(|e| {
            warn!("RabbitMQ broken connection: {:?}", e);
        });
        Ok(connection)
    }

    /// Connect to the broker and open a channel on the new connection.
    ///
    /// The connection stays open as long as the returned channel is alive.
    pub async fn open_channel(&self) -> Result<Channel, BrokerError> {
        let connection = self.new_connection().await?;
        Channel::open(connection).await
    }
}
