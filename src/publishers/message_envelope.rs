use amq_protocol_types::ShortString;
use serde::Serialize;

use crate::amqp::BasicProperties;

/// A message to be published via `Publisher`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MessageEnvelope {
    // The body of the message - as a sequence of bytes.
    pub payload: Vec<u8>,
    // The name of the exchange we are publishing the message to.
    // Empty for the default exchange, which routes straight to the queue named by the routing key.
    pub exchange_name: String,
    // The routing key used by exchange listeners to determine if they are interested or not
    // to the message.
    pub routing_key: String,
    // AMQP properties attached to the message.
    pub properties: BasicProperties,
}

impl MessageEnvelope {
    /// An envelope carrying `value` encoded as JSON, with the matching content type.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::default()
            .with_payload(serde_json::to_vec(value)?)
            .with_content_type("application/json".into()))
    }

    pub fn with_payload(mut self, value: Vec<u8>) -> Self {
        self.payload = value;
        self
    }

    pub fn with_exchange_name(mut self, value: String) -> Self {
        self.exchange_name = value;
        self
    }

    pub fn with_routing_key(mut self, value: String) -> Self {
        self.routing_key = value;
        self
    }

    pub fn with_content_type(mut self, value: ShortString) -> Self {
        self.properties = self.properties.with_content_type(value);
        self
    }
}
