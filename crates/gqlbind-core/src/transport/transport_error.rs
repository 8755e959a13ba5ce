use crate::response::ResponseError;
use std::time::Duration;
use thiserror::Error;

/// Failures reported by a transport. None of them are retried.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransportError {
    #[error("the server did not acknowledge the connection within {0:?}")]
    AckTimeout(Duration),

    #[error("the connection was closed{}", describe_close(.code, .reason))]
    ConnectionClosed {
        code: Option<u16>,
        reason: String,
    },

    #[error("http request failed: {0}")]
    Http(String),

    #[error("server responded with HTTP {status}: {body}")]
    HttpStatus {
        body: String,
        status: u16,
    },

    #[error("invalid endpoint url `{url}`: {reason}")]
    InvalidUrl {
        reason: String,
        url: String,
    },

    #[error("the response body is not a GraphQL response: {0}")]
    InvalidResponse(String),

    #[error("the server rejected the operation: {}", describe_rejection(.errors))]
    OperationRejected {
        errors: Vec<ResponseError>,
    },

    #[error("protocol violation: {0}")]
    Protocol(String),

    #[error("websocket failure: {0}")]
    WebSocket(String),
}

fn describe_close(code: &Option<u16>, reason: &str) -> String {
    match (*code, reason) {
        (None, "") => String::new(),
        (Some(code), "") => format!(" (code {code})"),
        (None, reason) => format!(": {reason}"),
        (Some(code), reason) => format!(" (code {code}): {reason}"),
    }
}

fn describe_rejection(errors: &[ResponseError]) -> String {
    errors.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
