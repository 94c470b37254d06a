//! Command-line surface of the four binaries.
use crate::sensors::{routing::routing_key_from, ReadingOverrides};
use clap::Parser;

/// Publish one sensor reading to the `ktmt` queue.
#[derive(Parser, Debug)]
#[command(name = "direct-send")]
pub struct DirectSendArgs {}

/// Consume sensor readings from the `ktmt` queue until interrupted.
#[derive(Parser, Debug)]
#[command(name = "direct-receive")]
pub struct DirectReceiveArgs {}

/// Publish one sensor reading to the `sensors_topic` exchange.
///
/// Reading fields that are omitted, or that cannot be parsed, keep their default value.
#[derive(Parser, Debug, Default)]
#[command(name = "topic-send")]
pub struct TopicSendArgs {
    /// Routing key, e.g. `sensor.temp` [default: anonymous.info]
    #[arg(allow_hyphen_values = true)]
    pub routing_key: Option<String>,
    /// Sensor identifier [default: 11]
    #[arg(allow_hyphen_values = true)]
    pub id: Option<String>,
    /// Packet sequence number [default: 126]
    #[arg(allow_hyphen_values = true)]
    pub packet_no: Option<String>,
    /// Temperature, whole number [default: 30]
    #[arg(allow_hyphen_values = true)]
    pub temperature: Option<String>,
    /// Humidity, whole number [default: 60]
    #[arg(allow_hyphen_values = true)]
    pub humidity: Option<String>,
    /// Total dissolved solids [default: 1100]
    #[arg(allow_hyphen_values = true)]
    pub tds: Option<String>,
    /// pH [default: 5.0]
    #[arg(allow_hyphen_values = true)]
    pub ph: Option<String>,
    /// Anything after the pH is ignored.
    #[arg(hide = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

impl TopicSendArgs {
    pub fn routing_key(&self) -> &str {
        routing_key_from(self.routing_key.as_deref())
    }

    pub fn overrides(&self) -> ReadingOverrides {
        ReadingOverrides {
            id: self.id.clone(),
            packet_no: self.packet_no.clone(),
            temperature: self.temperature.clone(),
            humidity: self.humidity.clone(),
            tds: self.tds.clone(),
            ph: self.ph.clone(),
        }
    }
}

/// Bind a queue to the `sensors_topic` exchange and consume sensor readings until interrupted.
#[derive(Parser, Debug)]
#[command(name = "topic-receive")]
pub struct TopicReceiveArgs {
    /// Name of the queue to declare and consume from
    pub queue_name: String,
    /// Routing key patterns to bind the queue with, e.g. `sensor.*` or `#.critical`
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub binding_keys: Vec<String>,
}
