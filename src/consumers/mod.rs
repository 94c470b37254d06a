//! Facilities to consume messages from a RabbitMq queue. Check out [`Consumer`] as a
//! starting point.
pub use consumer::{Consumer, ConsumerBuilder};
pub use error::{ErrorType, HandlerError};
pub use handler::Handler;
pub use incoming_message::{Delivery, Incoming};
pub use pre_start_hook::ConsumerPreStartHook;

mod consumer;
mod error;
mod handler;
pub mod hooks;
mod incoming_message;
mod pre_start_hook;
