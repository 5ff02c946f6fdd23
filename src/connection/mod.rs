//! Connection layer.
//!
//! Ties the pure pieces together into a [`DataConnection`]:
//!
//! - [`Lifecycle`]: the `Negotiating -> Open -> Closed` state machine
//! - [`Negotiator`] and [`DataChannel`]: the external collaborators
//! - [`RegistryHandle`]: non-owning link back to the connection registry
//! - [`ConnectionEvents`]: open, close and error notifications
//!
//! Channel callbacks never touch the connection directly. They are queued
//! through a [`ChannelEventSink`] and processed by
//! [`DataConnection::next_event`].

mod channel;
mod data_connection;
mod events;
mod lifecycle;
mod message;
mod negotiator;
mod options;
mod registry;

#[cfg(test)]
mod testing;

pub use channel::{ChannelEvent, ChannelEventSink, ChannelInitializer, DataChannel};
pub use data_connection::DataConnection;
pub use events::{ConnectionEvent, ConnectionEvents};
pub use lifecycle::{ConnectionPhase, Lifecycle, LifecycleError, Transition, TransitionOutcome};
pub use message::{MessagePayload, ServerMessage, ServerMessageType};
pub use negotiator::{IceCandidate, NegotiationPayload, Negotiator, SdpType, SessionDescription};
pub use options::{CloseOptions, ConnectionOptions, ConnectionOptionsBuilder};
pub use registry::RegistryHandle;
