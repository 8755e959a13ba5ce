//! Network transports for `gqlbind`:
//!
//! - [`HttpTransport`] sends queries and mutations as JSON `POST` requests.
//! - [`WebSocketTransport`] runs subscriptions over the `graphql-transport-ws`
//!   protocol, one connection per subscription.

mod http;
mod websocket;

pub use http::HttpTransport;
pub use http::HttpTransportBuilder;
pub use http::HttpTransportConfig;
pub use websocket::SubscriptionHandle;
pub use websocket::WebSocketConfig;
pub use websocket::WebSocketTransport;

pub use gqlbind_core::transport::QueryTransport;
pub use gqlbind_core::transport::SubscriptionListener;
pub use gqlbind_core::transport::SubscriptionState;
pub use gqlbind_core::transport::SubscriptionTransport;
pub use gqlbind_core::transport::TransportError;
