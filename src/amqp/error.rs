use std::fmt;

/// Error returned when setting up or using a connection to the RabbitMq broker.
///
/// Every variant can be classified via [`BrokerError::class`]: callers are still free to abort
/// on any of them, but the diagnostic tells an operator whether retrying, fixing the settings or
/// fixing the topology is the way forward.
#[derive(thiserror::Error, Debug)]
pub enum BrokerError {
    #[error("Failed to connect to RabbitMQ")]
    Connect(#[source] lapin::Error),
    #[error("Timed out after {0:?} while trying to connect to RabbitMQ")]
    ConnectTimeout(std::time::Duration),
    #[error("Failed to open a channel")]
    OpenChannel(#[source] lapin::Error),
    #[error("Failed to declare the queue `{queue}`")]
    DeclareQueue {
        queue: String,
        #[source]
        source: lapin::Error,
    },
    #[error("Failed to declare the exchange `{exchange}`")]
    DeclareExchange {
        exchange: String,
        #[source]
        source: lapin::Error,
    },
    #[error("Failed to bind the queue `{queue}` to the exchange `{exchange}` with routing key `{routing_key}`")]
    BindQueue {
        queue: String,
        exchange: String,
        routing_key: String,
        #[source]
        source: lapin::Error,
    },
    #[error("Failed to register a consumer on the queue `{queue}`")]
    Subscribe {
        queue: String,
        #[source]
        source: lapin::Error,
    },
    #[error("The delivery stream of the queue `{queue}` failed")]
    Delivery {
        queue: String,
        #[source]
        source: lapin::Error,
    },
    #[error("Invalid RabbitMQ settings")]
    InvalidConfiguration(#[source] config::ConfigError),
}

/// Coarse classification of a [`BrokerError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorClass {
    /// Network trouble or a broken connection/channel: the same operation might succeed later.
    Transient,
    /// The settings we were given cannot work, no matter how many times we try.
    Configuration,
    /// The broker refused the operation - e.g. a queue redeclared with different parameters
    /// or a malformed binding pattern.
    Rejected,
    /// Anything else: a bug on our side or in the client library.
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient => write!(f, "transient"),
            Self::Configuration => write!(f, "configuration"),
            Self::Rejected => write!(f, "rejected"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl BrokerError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ConnectTimeout(_) => ErrorClass::Transient,
            Self::InvalidConfiguration(_) => ErrorClass::Configuration,
            Self::Connect(source)
            | Self::OpenChannel(source)
            | Self::DeclareQueue { source, .. }
            | Self::DeclareExchange { source, .. }
            | Self::BindQueue { source, .. }
            | Self::Subscribe { source, .. }
            | Self::Delivery { source, .. } => classify(source),
        }
    }
}

fn classify(error: &lapin::Error) -> ErrorClass {
    match error {
        lapin::Error::IOError(_)
        | lapin::Error::InvalidConnectionState(_)
        | lapin::Error::InvalidChannelState(_)
        | lapin::Error::MissingHeartbeatError => ErrorClass::Transient,
        lapin::Error::ProtocolError(_) => ErrorClass::Rejected,
        _ => ErrorClass::Internal,
    }
}
