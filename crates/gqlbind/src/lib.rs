pub use gqlbind_core::*;

/// Network transports: [`HttpTransport`](transport::HttpTransport) for
/// queries and mutations, [`WebSocketTransport`](transport::WebSocketTransport)
/// for subscriptions.
#[cfg(feature = "transport")]
pub mod transport {
    pub use gqlbind_transport::*;
}

#[cfg(test)]
mod tests;
