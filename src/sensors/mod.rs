//! The sensor reading exchanged by publishers and consumers, and the pieces of logic
//! built around it.
mod handlers;
mod overrides;
mod reading;
pub mod routing;

pub use handlers::LogReading;
pub use overrides::ReadingOverrides;
pub use reading::{DecimalReading, IntegerReading, SensorReading};
