use crate::binder::BoundRequest;
use crate::decoder::DecodingError;
use crate::decoder::ResponseDecoder;
use crate::document::RequestPreparationError;
use crate::document::RequestTemplate;
use crate::response::DecodedResponse;
use crate::response::RequestExecutionError;
use crate::response::ResponseEnvelope;
use crate::response::TypedObject;
use crate::schema::SchemaRegistry;
use crate::shape::ResponseShape;
use crate::transport::QueryTransport;
use crate::transport::SubscriptionListener;
use crate::transport::SubscriptionTransport;
use crate::transport::TransportError;
use crate::OperationKind;
use crate::Value;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Everything that can go wrong between preparing a request and handing its
/// decoded data to the caller.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClientError {
    #[error("the response could not be decoded: {0}")]
    Decoding(#[from] DecodingError),

    #[error(transparent)]
    Execution(#[from] RequestExecutionError),

    #[error("the request could not be prepared: {}", describe_preparation(.0))]
    Preparation(Vec<RequestPreparationError>),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
impl std::convert::From<Vec<RequestPreparationError>> for ClientError {
    fn from(errors: Vec<RequestPreparationError>) -> Self {
        Self::Preparation(errors)
    }
}

fn describe_preparation(errors: &[RequestPreparationError]) -> String {
    errors.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Prepares, binds, sends and decodes requests against one schema over one
/// transport. This is the entry point generated client code calls into.
#[derive(Clone, Debug)]
pub struct RequestExecutor<T> {
    registry: Arc<SchemaRegistry>,
    transport: T,
}
impl<T> RequestExecutor<T> {
    pub fn new(registry: Arc<SchemaRegistry>, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn bind(
        &self,
        template: &RequestTemplate,
        values: &IndexMap<String, Value>,
    ) -> Result<BoundRequest, ClientError> {
        Ok(template.bind(&self.registry, values)?)
    }

    /// Decode a response envelope received outside of this executor.
    pub fn decode(
        &self,
        envelope: ResponseEnvelope,
        shape: &ResponseShape,
    ) -> Result<DecodedResponse, ClientError> {
        Ok(ResponseDecoder::new(&self.registry).decode(envelope, shape)?)
    }

    pub fn prepare(
        &self,
        fragment: &str,
        shape: Option<&ResponseShape>,
        kind: OperationKind,
    ) -> Result<RequestTemplate, ClientError> {
        Ok(RequestTemplate::assemble(&self.registry, fragment, shape, kind)?)
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
impl<T: QueryTransport> RequestExecutor<T> {
    /// Bind, send and decode a query or mutation. Server-reported errors are
    /// returned next to whatever data came with them.
    pub async fn execute_partial(
        &self,
        template: &RequestTemplate,
        values: &IndexMap<String, Value>,
        shape: &ResponseShape,
    ) -> Result<DecodedResponse, ClientError> {
        let request = self.bind(template, values)?;
        tracing::debug!(
            kind = %request.kind(),
            operation_name = ?request.operation_name(),
            "sending request",
        );
        let envelope = self.transport.send(&request).await?;
        self.decode(envelope, shape)
    }

    /// Like [`RequestExecutor::execute_partial()`], failing with
    /// [`ClientError::Execution`] when the server reported any error.
    pub async fn execute(
        &self,
        template: &RequestTemplate,
        values: &IndexMap<String, Value>,
        shape: &ResponseShape,
    ) -> Result<Option<TypedObject>, ClientError> {
        Ok(self.execute_partial(template, values, shape).await?.into_result()?)
    }
}
impl<T: SubscriptionTransport> RequestExecutor<T> {
    /// Bind and open a subscription whose events are decoded against `shape`
    /// before they reach `listener`.
    pub fn subscribe<L: TypedSubscriptionListener>(
        &self,
        template: &RequestTemplate,
        values: &IndexMap<String, Value>,
        shape: Arc<ResponseShape>,
        listener: L,
    ) -> Result<T::Handle, ClientError> {
        let request = self.bind(template, values)?;
        tracing::debug!(
            operation_name = ?request.operation_name(),
            "opening subscription",
        );
        let listener = DecodingListener {
            inner: listener,
            registry: self.registry.clone(),
            shape,
        };
        Ok(self.transport.open(request, Box::new(listener))?)
    }
}

/// Receives the decoded events of a subscription opened through
/// [`RequestExecutor::subscribe()`].
pub trait TypedSubscriptionListener: Send + 'static {
    fn on_connect(&mut self) {}

    fn on_event(&mut self, event: DecodedResponse);

    /// Transport failures and events that could not be decoded. A decoding
    /// failure does not end the subscription.
    fn on_error(&mut self, error: ClientError);

    fn on_complete(&mut self) {}
}

struct DecodingListener<L> {
    inner: L,
    registry: Arc<SchemaRegistry>,
    shape: Arc<ResponseShape>,
}
impl<L: TypedSubscriptionListener> SubscriptionListener for DecodingListener<L> {
    fn on_connect(&mut self) {
        self.inner.on_connect();
    }

    fn on_message(&mut self, envelope: ResponseEnvelope) {
        match ResponseDecoder::new(&self.registry).decode(envelope, &self.shape) {
            Ok(event) => self.inner.on_event(event),
            Err(err) => self.inner.on_error(err.into()),
        }
    }

    fn on_error(&mut self, error: TransportError) {
        self.inner.on_error(error.into());
    }

    fn on_complete(&mut self) {
        self.inner.on_complete();
    }
}
