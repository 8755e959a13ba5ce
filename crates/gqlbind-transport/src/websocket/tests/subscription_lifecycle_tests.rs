use crate::WebSocketConfig;
use crate::WebSocketTransport;
use futures_util::SinkExt;
use futures_util::StreamExt;
use gqlbind_core::OperationKind;
use gqlbind_core::binder::BoundRequest;
use gqlbind_core::document::RequestTemplate;
use gqlbind_core::response::ResponseEnvelope;
use gqlbind_core::schema::SchemaRegistry;
use gqlbind_core::transport::SubscriptionListener;
use gqlbind_core::transport::SubscriptionState;
use gqlbind_core::transport::SubscriptionTransport;
use gqlbind_core::transport::TransportError;
use indexmap::IndexMap;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::ErrorResponse;
use tokio_tungstenite::tungstenite::handshake::server::Request;
use tokio_tungstenite::tungstenite::handshake::server::Response;
use tokio_tungstenite::tungstenite::http::HeaderValue;

#[derive(Debug)]
enum Event {
    Complete,
    Connected,
    Error(TransportError),
    Message(ResponseEnvelope),
}

struct ChannelListener {
    events: mpsc::UnboundedSender<Event>,
    messages: Arc<AtomicUsize>,
}
impl SubscriptionListener for ChannelListener {
    fn on_connect(&mut self) {
        let _ = self.events.send(Event::Connected);
    }

    fn on_message(&mut self, envelope: ResponseEnvelope) {
        self.messages.fetch_add(1, Ordering::SeqCst);
        let _ = self.events.send(Event::Message(envelope));
    }

    fn on_error(&mut self, error: TransportError) {
        let _ = self.events.send(Event::Error(error));
    }

    fn on_complete(&mut self) {
        let _ = self.events.send(Event::Complete);
    }
}

fn listener() -> (Box<ChannelListener>, mpsc::UnboundedReceiver<Event>, Arc<AtomicUsize>) {
    let (events, receiver) = mpsc::unbounded_channel();
    let messages = Arc::new(AtomicUsize::new(0));
    let listener = ChannelListener {
        events,
        messages: messages.clone(),
    };
    (Box::new(listener), receiver, messages)
}

fn review_added() -> BoundRequest {
    let registry = SchemaRegistry::builtin();
    RequestTemplate::assemble(
        &registry,
        "reviewAdded(episode: &episode) { stars commentary }",
        None,
        OperationKind::Subscription,
    )
        .and_then(|template| {
            let mut values = IndexMap::new();
            values.insert("episode".to_string(), gqlbind_core::Value::Enum("JEDI".to_string()));
            template.bind(&registry, &values)
        })
        .expect("subscription binds")
}

/// Accept a single `graphql-transport-ws` connection and hand it to
/// `handler`. Returns the URL to connect to.
async fn serve_one<F, Fut>(handler: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let socket = accept_hdr_async(stream, |_: &Request, mut response: Response| {
            response.headers_mut().insert(
                "Sec-WebSocket-Protocol",
                HeaderValue::from_static("graphql-transport-ws"),
            );
            Ok::<Response, ErrorResponse>(response)
        }).await.expect("websocket handshake");
        handler(socket).await;
    });
    format!("ws://{addr}/graphql")
}

async fn expect_frame(socket: &mut WebSocketStream<TcpStream>) -> serde_json::Value {
    let frame = socket.next().await.expect("a frame").expect("a readable frame");
    serde_json::from_str(frame.to_text().expect("a text frame")).expect("a json frame")
}

async fn acknowledge(socket: &mut WebSocketStream<TcpStream>) -> serde_json::Value {
    let init = expect_frame(socket).await;
    assert_eq!(init["type"], "connection_init");
    socket.send(Message::Text(json!({"type": "connection_ack"}).to_string().into()))
        .await
        .expect("ack sent");
    let subscribe = expect_frame(socket).await;
    assert_eq!(subscribe["type"], "subscribe");
    subscribe
}

#[tokio::test]
async fn unsubscribe_closes_and_stops_delivery() {
    let (completed_tx, completed_rx) = oneshot::channel();
    let url = serve_one(|mut socket| async move {
        let init = expect_frame(&mut socket).await;
        assert_eq!(init["payload"], json!({"token": "s3cret"}));
        socket.send(Message::Text(json!({"type": "connection_ack"}).to_string().into()))
            .await
            .expect("ack sent");

        let subscribe = expect_frame(&mut socket).await;
        assert_eq!(subscribe["id"], "1");
        assert_eq!(
            subscribe["payload"]["query"],
            "subscription { reviewAdded(episode: JEDI) { stars commentary } }",
        );

        let mut stars = 0;
        let mut ticker = tokio::time::interval(Duration::from_millis(10));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    stars = stars % 5 + 1;
                    let next = json!({
                        "type": "next",
                        "id": "1",
                        "payload": {"data": {"reviewAdded": {"stars": stars, "commentary": null}}},
                    });
                    if socket.send(Message::Text(next.to_string().into())).await.is_err() {
                        break;
                    }
                },
                frame = socket.next() => {
                    if let Some(Ok(Message::Text(text))) = frame {
                        let _ = completed_tx.send(text.to_string());
                    }
                    break;
                },
            }
        }
    }).await;

    let transport = WebSocketTransport::new(
        &url,
        WebSocketConfig::default().with_init_payload(json!({"token": "s3cret"})),
    ).unwrap();
    let (listener, mut events, messages) = listener();
    let handle = transport.open(review_added(), listener).unwrap();

    assert_eq!(handle.wait_for(SubscriptionState::Active).await, SubscriptionState::Active);
    assert!(matches!(events.recv().await, Some(Event::Connected)));
    let Some(Event::Message(first)) = events.recv().await else {
        panic!("expected a message");
    };
    assert!(first.data.is_some());

    handle.unsubscribe().await;
    assert_eq!(handle.state(), SubscriptionState::Closed);

    let delivered = messages.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(messages.load(Ordering::SeqCst), delivered);

    let complete: serde_json::Value = serde_json::from_str(&completed_rx.await.unwrap()).unwrap();
    assert_eq!(complete, json!({"type": "complete", "id": "1"}));

    // A second call is a no-op.
    handle.unsubscribe().await;
    assert_eq!(handle.state(), SubscriptionState::Closed);
}

#[tokio::test]
async fn server_complete_ends_the_subscription() {
    let url = serve_one(|mut socket| async move {
        acknowledge(&mut socket).await;
        let next = json!({"type": "next", "id": "1", "payload": {"data": {"reviewAdded": null}}});
        let complete = json!({"type": "complete", "id": "1"});
        socket.send(Message::Text(next.to_string().into())).await.expect("next sent");
        socket.send(Message::Text(complete.to_string().into())).await.expect("complete sent");
        let _ = socket.next().await;
    }).await;

    let transport = WebSocketTransport::new(&url, WebSocketConfig::default()).unwrap();
    let (listener, mut events, _) = listener();
    let handle = transport.open(review_added(), listener).unwrap();

    assert!(matches!(events.recv().await, Some(Event::Connected)));
    assert!(matches!(events.recv().await, Some(Event::Message(_))));
    assert!(matches!(events.recv().await, Some(Event::Complete)));
    assert_eq!(handle.wait_for(SubscriptionState::Closed).await, SubscriptionState::Closed);
}

#[tokio::test]
async fn error_frame_rejects_the_operation() {
    let url = serve_one(|mut socket| async move {
        acknowledge(&mut socket).await;
        let error = json!({
            "type": "error",
            "id": "1",
            "payload": [{"message": "Unknown field \"reviewAdded\""}],
        });
        socket.send(Message::Text(error.to_string().into())).await.expect("error sent");
        let _ = socket.next().await;
    }).await;

    let transport = WebSocketTransport::new(&url, WebSocketConfig::default()).unwrap();
    let (listener, mut events, _) = listener();
    let handle = transport.open(review_added(), listener).unwrap();

    assert!(matches!(events.recv().await, Some(Event::Connected)));
    let Some(Event::Error(TransportError::OperationRejected { errors })) = events.recv().await else {
        panic!("expected the operation to be rejected");
    };
    assert_eq!(errors[0].message, "Unknown field \"reviewAdded\"");
    assert_eq!(handle.wait_for(SubscriptionState::Closed).await, SubscriptionState::Errored);
}

#[tokio::test]
async fn missing_ack_times_out() {
    let url = serve_one(|mut socket| async move {
        let _ = expect_frame(&mut socket).await;
        tokio::time::sleep(Duration::from_secs(5)).await;
    }).await;

    let transport = WebSocketTransport::new(
        &url,
        WebSocketConfig::default().with_ack_timeout(Duration::from_millis(100)),
    ).unwrap();
    let (listener, mut events, _) = listener();
    let handle = transport.open(review_added(), listener).unwrap();

    assert!(matches!(
        events.recv().await,
        Some(Event::Error(TransportError::AckTimeout(timeout))) if timeout == Duration::from_millis(100),
    ));
    assert_eq!(handle.state(), SubscriptionState::Errored);
}

#[tokio::test]
async fn unsubscribe_while_connecting_closes_quietly() {
    // Never accepted, so the websocket handshake cannot finish.
    let pending = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let url = format!("ws://{}/graphql", pending.local_addr().expect("local addr"));

    let transport = WebSocketTransport::new(&url, WebSocketConfig::default()).unwrap();
    let (listener, mut events, _) = listener();
    let handle = transport.open(review_added(), listener).unwrap();
    assert_eq!(handle.state(), SubscriptionState::Connecting);

    handle.unsubscribe().await;

    assert_eq!(handle.state(), SubscriptionState::Closed);
    assert!(events.recv().await.is_none());
}

#[test]
fn only_websocket_urls_are_accepted() {
    assert!(matches!(
        WebSocketTransport::new("http://localhost:4000/graphql", WebSocketConfig::default()),
        Err(TransportError::InvalidUrl { .. }),
    ));
    assert!(WebSocketTransport::new("wss://example.com/graphql", WebSocketConfig::default()).is_ok());
}
