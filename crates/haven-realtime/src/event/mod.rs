//! Realtime frames and event types.
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <payload>}`.
//! Inbound frames are validated here into either a [`ChannelEvent`], which
//! the channel handles itself, or a [`DomainEvent`] for downstream reactors.

pub mod channel;
pub mod domain;
pub mod outbound;

use serde_json::Value;

use haven_core::error::AppError;
use haven_core::result::AppResult;

pub use channel::ChannelEvent;
pub use domain::{AccountChange, DomainEvent};
pub use outbound::Outbound;

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Handled by the channel.
    Channel(ChannelEvent),
    /// Published to subscribers.
    Domain(DomainEvent),
}

impl Inbound {
    /// Decode a text frame.
    pub fn decode(text: &str) -> AppResult<Self> {
        let mut frame: Value = serde_json::from_str(text)?;
        let Some(object) = frame.as_object_mut() else {
            return Err(AppError::realtime("Frame is not a JSON object"));
        };
        let name = object
            .get("event")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::realtime("Frame has no event name"))?;
        let is_channel = ChannelEvent::NAMES.contains(&name.as_str());
        let data = object.entry("data").or_insert(Value::Null);
        if is_channel && data.is_null() {
            *data = Value::Object(Default::default());
        }

        if is_channel {
            let event = serde_json::from_value(frame).map_err(|e| {
                AppError::realtime(format!("Malformed '{name}' frame: {e}"))
            })?;
            return Ok(Self::Channel(event));
        }
        let event = serde_json::from_value(frame)
            .map_err(|e| AppError::realtime(format!("Undeliverable '{name}' frame: {e}")))?;
        Ok(Self::Domain(event))
    }
}
