//! The contracts between the request executor and the network.
//!
//! Concrete HTTP and WebSocket implementations live in the
//! `gqlbind-transport` crate; tests and embedders may supply their own.

mod transport_error;

pub use transport_error::TransportError;

use crate::binder::BoundRequest;
use crate::response::ResponseEnvelope;
use std::future::Future;

/// Sends one query or mutation and waits for its response.
pub trait QueryTransport: Send + Sync {
    fn send(
        &self,
        request: &BoundRequest,
    ) -> impl Future<Output = Result<ResponseEnvelope, TransportError>> + Send;
}

/// Opens long-lived subscriptions.
///
/// `open()` returns as soon as the subscription is registered. Connection
/// progress, events and failures are all reported to the listener, from a
/// task owned by the transport, one call at a time and in arrival order.
pub trait SubscriptionTransport: Send + Sync {
    type Handle: Send;

    fn open(
        &self,
        request: BoundRequest,
        listener: Box<dyn SubscriptionListener>,
    ) -> Result<Self::Handle, TransportError>;
}

/// Receives the events of one subscription.
pub trait SubscriptionListener: Send {
    fn on_connect(&mut self) {}

    /// Called once per `next` frame.
    fn on_message(&mut self, envelope: ResponseEnvelope);

    fn on_error(&mut self, error: TransportError);

    fn on_complete(&mut self) {}
}

/// Lifecycle of a subscription.
///
/// `Connecting -> Active -> Closed | Errored`. A subscription may also move
/// from `Connecting` straight to `Closed` or `Errored`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SubscriptionState {
    Active,
    Closed,
    Connecting,
    Errored,
}
impl SubscriptionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}
impl std::fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Connecting => "connecting",
            Self::Errored => "errored",
        })
    }
}
