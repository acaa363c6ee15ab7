//! # haven-realtime
//!
//! The push-event side of the Haven client:
//!
//! - Wire frames and the closed event unions they decode into
//! - Transport abstraction with a WebSocket implementation
//! - [`RealtimeChannel`]: owns the current connection, replaces it on every
//!   credential change, joins the user and session rooms, and handles the
//!   channel-level forced logouts
//! - [`SecurityReactor`]: turns account events for the signed-in user into
//!   session transitions

pub mod channel;
pub mod event;
pub mod reactor;
pub mod token;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use channel::{Connection, RealtimeChannel};
pub use event::{AccountChange, ChannelEvent, DomainEvent, Inbound, Outbound};
pub use reactor::SecurityReactor;
pub use transport::{Link, Transport, WsTransport};
