use crate::websocket::session::Session;
use crate::websocket::SubscriptionHandle;
use crate::websocket::WebSocketConfig;
use gqlbind_core::binder::BoundRequest;
use gqlbind_core::transport::SubscriptionListener;
use gqlbind_core::transport::SubscriptionState;
use gqlbind_core::transport::SubscriptionTransport;
use gqlbind_core::transport::TransportError;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::sync::watch;
use url::Url;

/// Opens one `graphql-transport-ws` connection per subscription.
#[derive(Clone, Debug)]
pub struct WebSocketTransport {
    config: Arc<WebSocketConfig>,
    url: Url,
}
impl WebSocketTransport {
    pub fn new(url: &str, config: WebSocketConfig) -> Result<Self, TransportError> {
        let parsed = Url::parse(url).map_err(|err| TransportError::InvalidUrl {
            reason: err.to_string(),
            url: url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "ws" | "wss") {
            return Err(TransportError::InvalidUrl {
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
                url: url.to_string(),
            });
        }
        Ok(Self {
            config: Arc::new(config),
            url: parsed,
        })
    }

    pub fn config(&self) -> &WebSocketConfig {
        &self.config
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
impl SubscriptionTransport for WebSocketTransport {
    type Handle = SubscriptionHandle;

    /// Start connecting in the background and return immediately. Must be
    /// called from within a tokio runtime.
    fn open(
        &self,
        request: BoundRequest,
        listener: Box<dyn SubscriptionListener>,
    ) -> Result<SubscriptionHandle, TransportError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| TransportError::WebSocket(format!("no tokio runtime: {err}")))?;

        let (state_tx, state_rx) = watch::channel(SubscriptionState::Connecting);
        let (stop_tx, stop_rx) = oneshot::channel();
        let session = Session {
            config: self.config.clone(),
            listener,
            request,
            state: state_tx,
            url: self.url.clone(),
        };

        tracing::debug!(url = %self.url, "opening subscription");
        let task = runtime.spawn(session.run(stop_rx));
        Ok(SubscriptionHandle::new(state_rx, stop_tx, task))
    }
}
