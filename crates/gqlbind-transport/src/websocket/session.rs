use crate::websocket::protocol_message::ClientMessage;
use crate::websocket::protocol_message::ServerMessage;
use crate::websocket::WebSocketConfig;
use crate::websocket::SUBPROTOCOL;
use futures_util::SinkExt;
use futures_util::StreamExt;
use gqlbind_core::binder::BoundRequest;
use gqlbind_core::transport::SubscriptionListener;
use gqlbind_core::transport::SubscriptionState;
use gqlbind_core::transport::TransportError;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderName;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use url::Url;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Each connection carries exactly one operation.
const OPERATION_ID: &str = "1";

/// How the read loop of an active subscription ended.
enum Ending {
    /// The server sent `complete` for the operation.
    Completed,
    Failed(TransportError),
    /// The handle asked to stop.
    Stopped,
}

/// Everything the background task of one subscription owns.
pub(super) struct Session {
    pub(super) config: Arc<WebSocketConfig>,
    pub(super) listener: Box<dyn SubscriptionListener>,
    pub(super) request: BoundRequest,
    pub(super) state: watch::Sender<SubscriptionState>,
    pub(super) url: Url,
}
impl Session {
    pub(super) async fn run(mut self, mut stop: oneshot::Receiver<()>) {
        let connected = tokio::select! {
            biased;
            _ = &mut stop => {
                self.set_state(SubscriptionState::Closed);
                return;
            },
            connected = connect(&self.url, &self.config) => connected,
        };
        let mut socket = match connected {
            Ok(socket) => socket,
            Err(err) => return self.fail(err),
        };

        let subscribe = ClientMessage::Subscribe {
            id: OPERATION_ID,
            payload: &self.request,
        };
        if let Err(err) = send(&mut socket, &subscribe).await {
            return self.fail(err);
        }
        self.set_state(SubscriptionState::Active);
        self.listener.on_connect();

        let ending = loop {
            let frame = tokio::select! {
                biased;
                _ = &mut stop => break Ending::Stopped,
                frame = socket.next() => frame,
            };
            if let Some(ending) = self.handle_frame(&mut socket, frame).await {
                break ending;
            }
        };

        match ending {
            Ending::Completed => {
                let _ = socket.close(None).await;
                self.listener.on_complete();
                self.set_state(SubscriptionState::Closed);
            },
            Ending::Failed(err) => {
                let _ = socket.close(None).await;
                self.fail(err);
            },
            Ending::Stopped => {
                let _ = send(&mut socket, &ClientMessage::Complete { id: OPERATION_ID }).await;
                let _ = socket.close(None).await;
                self.set_state(SubscriptionState::Closed);
            },
        }
    }

    /// Deliver one incoming frame. Returns how the subscription ended, if it
    /// did.
    async fn handle_frame(
        &mut self,
        socket: &mut Socket,
        frame: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    ) -> Option<Ending> {
        let text = match frame {
            None => return Some(Ending::Failed(TransportError::ConnectionClosed {
                code: None,
                reason: String::new(),
            })),
            Some(Err(err)) => return Some(Ending::Failed(TransportError::WebSocket(err.to_string()))),
            Some(Ok(Message::Close(frame))) => return Some(Ending::Failed(closed(frame))),
            Some(Ok(Message::Text(text))) => text,
            // Control frames are answered by tungstenite itself.
            Some(Ok(_)) => return None,
        };

        let message = match serde_json::from_str::<ServerMessage>(&text) {
            Ok(message) => message,
            Err(err) => return Some(Ending::Failed(TransportError::Protocol(
                format!("unreadable frame: {err}"),
            ))),
        };
        match message {
            ServerMessage::Next { id, payload } if id == OPERATION_ID => {
                tracing::trace!(errors = payload.errors.len(), "subscription event");
                self.listener.on_message(payload);
                None
            },
            ServerMessage::Error { id, payload } if id == OPERATION_ID =>
                Some(Ending::Failed(TransportError::OperationRejected { errors: payload })),
            ServerMessage::Complete { id } if id == OPERATION_ID =>
                Some(Ending::Completed),
            ServerMessage::Ping { .. } => {
                send(socket, &ClientMessage::Pong { payload: None })
                    .await
                    .err()
                    .map(Ending::Failed)
            },
            ServerMessage::Pong { .. } => None,
            ServerMessage::Next { id, .. }
                | ServerMessage::Error { id, .. }
                | ServerMessage::Complete { id } => Some(Ending::Failed(TransportError::Protocol(
                    format!("frame for unknown operation `{id}`"),
                ))),
            ServerMessage::ConnectionAck { .. } => Some(Ending::Failed(TransportError::Protocol(
                "duplicate `connection_ack`".to_string(),
            ))),
        }
    }

    fn fail(mut self, err: TransportError) {
        tracing::debug!(url = %self.url, %err, "subscription failed");
        self.set_state(SubscriptionState::Errored);
        self.listener.on_error(err);
    }

    fn set_state(&mut self, state: SubscriptionState) {
        let previous = self.state.send_replace(state);
        tracing::debug!(url = %self.url, from = %previous, to = %state, "subscription state changed");
    }
}

/// Open the socket and complete the `connection_init` /
/// `connection_ack` handshake.
async fn connect(url: &Url, config: &WebSocketConfig) -> Result<Socket, TransportError> {
    let mut request = url.as_str()
        .into_client_request()
        .map_err(|err| TransportError::WebSocket(err.to_string()))?;
    let headers = request.headers_mut();
    headers.insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TransportError::WebSocket(format!("invalid header name `{name}`: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| TransportError::WebSocket(format!("invalid value for header `{name}`: {err}")))?;
        headers.insert(name, value);
    }

    let (mut socket, _response) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|err| TransportError::WebSocket(err.to_string()))?;
    tracing::trace!(url = %url, "websocket connected");

    let init = ClientMessage::ConnectionInit {
        payload: config.init_payload.as_ref(),
    };
    send(&mut socket, &init).await?;

    let ack_timeout = config.ack_timeout;
    tokio::time::timeout(ack_timeout, await_ack(&mut socket))
        .await
        .map_err(|_| TransportError::AckTimeout(ack_timeout))??;
    tracing::debug!(url = %url, "connection acknowledged");
    Ok(socket)
}

async fn await_ack(socket: &mut Socket) -> Result<(), TransportError> {
    loop {
        let text = match socket.next().await {
            None => return Err(TransportError::ConnectionClosed {
                code: None,
                reason: String::new(),
            }),
            Some(Err(err)) => return Err(TransportError::WebSocket(err.to_string())),
            Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => continue,
        };
        match serde_json::from_str::<ServerMessage>(&text) {
            Ok(ServerMessage::ConnectionAck { .. }) => return Ok(()),
            Ok(ServerMessage::Ping { .. }) =>
                send(socket, &ClientMessage::Pong { payload: None }).await?,
            Ok(other) => return Err(TransportError::Protocol(
                format!("expected `connection_ack` but received {other:?}"),
            )),
            Err(err) => return Err(TransportError::Protocol(format!("unreadable frame: {err}"))),
        }
    }
}

async fn send(socket: &mut Socket, message: &ClientMessage<'_>) -> Result<(), TransportError> {
    socket.send(Message::Text(message.to_text()?.into()))
        .await
        .map_err(|err| TransportError::WebSocket(err.to_string()))
}

fn closed(frame: Option<CloseFrame>) -> TransportError {
    match frame {
        Some(frame) => TransportError::ConnectionClosed {
            code: Some(u16::from(frame.code)),
            reason: frame.reason.to_string(),
        },
        None => TransportError::ConnectionClosed {
            code: None,
            reason: String::new(),
        },
    }
}
