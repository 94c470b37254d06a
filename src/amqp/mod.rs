//! Helpers for connecting to a rabbitmq broker

mod channel;
pub mod configuration;
mod error;
mod factory;

pub use channel::{Channel, Durability, QueueOptions};
pub use error::{BrokerError, ErrorClass};
pub use factory::ConnectionFactory;

pub use lapin::{options, types, BasicProperties, ExchangeKind};
