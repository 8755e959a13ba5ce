use std::time::Duration;

const DEFAULT_ACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the connections a
/// [`WebSocketTransport`](crate::WebSocketTransport) opens.
#[derive(Clone, Debug, PartialEq)]
pub struct WebSocketConfig {
    /// How long to wait for `connection_ack` after sending `connection_init`.
    pub ack_timeout: Duration,
    /// Extra headers sent with the upgrade request.
    pub headers: Vec<(String, String)>,
    /// Payload of the `connection_init` frame, typically credentials.
    pub init_payload: Option<serde_json::Value>,
}
impl WebSocketConfig {
    pub fn with_ack_timeout(mut self, ack_timeout: Duration) -> Self {
        self.ack_timeout = ack_timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_init_payload(mut self, payload: serde_json::Value) -> Self {
        self.init_payload = Some(payload);
        self
    }
}
impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            ack_timeout: DEFAULT_ACK_TIMEOUT,
            headers: vec![],
            init_payload: None,
        }
    }
}
