use gqlbind_core::binder::BoundRequest;
use gqlbind_core::response::ResponseEnvelope;
use gqlbind_core::response::ResponseError;
use gqlbind_core::transport::TransportError;
use serde::Deserialize;
use serde::Serialize;

/// Frames a client sends.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ClientMessage<'a> {
    Complete {
        id: &'a str,
    },
    ConnectionInit {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<&'a serde_json::Value>,
    },
    Pong {
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
    },
    Subscribe {
        id: &'a str,
        payload: &'a BoundRequest,
    },
}
impl ClientMessage<'_> {
    pub(super) fn to_text(&self) -> Result<String, TransportError> {
        serde_json::to_string(self)
            .map_err(|err| TransportError::Protocol(format!("failed to encode a client frame: {err}")))
    }
}

/// Frames a server sends.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ServerMessage {
    Complete {
        id: String,
    },
    ConnectionAck {
        #[serde(default)]
        payload: Option<serde_json::Value>,
    },
    Error {
        id: String,
        payload: Vec<ResponseError>,
    },
    Next {
        id: String,
        payload: ResponseEnvelope,
    },
    Ping {
        #[serde(default)]
        payload: Option<serde_json::Value>,
    },
    Pong {
        #[serde(default)]
        payload: Option<serde_json::Value>,
    },
}
