//! Subscriptions over the `graphql-transport-ws` protocol.

mod protocol_message;
mod session;
mod subscription_handle;
mod websocket_config;
mod websocket_transport;

pub use subscription_handle::SubscriptionHandle;
pub use websocket_config::WebSocketConfig;
pub use websocket_transport::WebSocketTransport;

/// Value of the `Sec-WebSocket-Protocol` header for `graphql-transport-ws`.
pub(crate) const SUBPROTOCOL: &str = "graphql-transport-ws";

#[cfg(test)]
mod tests;
