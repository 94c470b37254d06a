use crate::consumers::{Handler, HandlerError, Incoming};
use crate::sensors::SensorReading;
use serde::de::DeserializeOwned;
use std::{fmt, marker::PhantomData};

/// Decode every incoming message as a [`SensorReading`] and log it.
///
/// A payload that cannot be decoded is reported as a fatal handler error: the consumer logs it
/// and moves on to the next message.
pub struct LogReading<M> {
    _measurement: PhantomData<fn() -> M>,
}

impl<M> LogReading<M> {
    pub fn new() -> Self {
        Self {
            _measurement: PhantomData,
        }
    }
}

impl<M> Default for LogReading<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> LogReading<M>
where
    M: DeserializeOwned + Default + fmt::Display,
{
    fn decode(&self, payload: &[u8]) -> Result<SensorReading<M>, HandlerError<serde_json::Error>> {
        SensorReading::from_payload(payload).map_err(HandlerError::fatal)
    }
}

#[async_trait::async_trait]
impl<M> Handler for LogReading<M>
where
    M: DeserializeOwned + Default + fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    type Context = ();
    type Error = serde_json::Error;

    async fn handle(
        &self,
        incoming: &Incoming<()>,
    ) -> Result<(), HandlerError<serde_json::Error>> {
        let reading = self.decode(&incoming.message.data)?;
        tracing::info!(
            queue = %incoming.queue_name,
            routing_key = %incoming.message.routing_key,
            id = reading.id,
            packet_no = reading.packet_no,
            "[{}] Received Sensor Data: {}",
            incoming.queue_name,
            reading
        );
        Ok(())
    }
}
