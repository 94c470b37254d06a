//! Names of the broker objects the sensor pipelines publish to and consume from.

/// The queue used for point-to-point delivery through the default exchange.
pub const DIRECT_QUEUE: &str = "ktmt";

/// The durable topic exchange readings are published to.
pub const TOPIC_EXCHANGE: &str = "sensors_topic";

/// Routing key used by the topic publisher when the caller does not provide one.
pub const DEFAULT_ROUTING_KEY: &str = "anonymous.info";

/// Pick the routing key for a topic publication.
///
/// The key is not validated: whatever the caller passed is what the broker will see.
pub fn routing_key_from(requested: Option<&str>) -> &str {
    match requested {
        Some(key) if !key.is_empty() => key,
        _ => DEFAULT_ROUTING_KEY,
    }
}
