use crate::http::HttpTransportBuilder;
use gqlbind_core::binder::BoundRequest;
use gqlbind_core::response::ResponseEnvelope;
use gqlbind_core::transport::QueryTransport;
use gqlbind_core::transport::TransportError;
use url::Url;

/// Longest prefix of a non-GraphQL error body kept in
/// [`TransportError::HttpStatus`].
const MAX_ERROR_BODY_CHARS: usize = 1024;

/// Sends each request as a JSON `POST` to a single endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    pub(super) client: reqwest::Client,
    pub(super) endpoint: Url,
}
impl HttpTransport {
    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}
impl QueryTransport for HttpTransport {
    async fn send(&self, request: &BoundRequest) -> Result<ResponseEnvelope, TransportError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            kind = %request.kind(),
            operation_name = ?request.operation_name(),
            "sending graphql request",
        );

        let response = self.client.post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        let status = response.status();
        let body = response.bytes()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        let envelope = serde_json::from_slice::<ResponseEnvelope>(&body);
        tracing::trace!(%status, bytes = body.len(), "received graphql response");

        if !status.is_success() {
            // GraphQL-over-HTTP servers answer request errors with a 4xx
            // status and a regular error envelope.
            if let Ok(envelope) = envelope
                && envelope.has_errors() {
                return Ok(envelope);
            }
            return Err(TransportError::HttpStatus {
                body: String::from_utf8_lossy(&body).chars().take(MAX_ERROR_BODY_CHARS).collect(),
                status: status.as_u16(),
            });
        }

        let envelope = envelope.map_err(|err| TransportError::InvalidResponse(err.to_string()))?;
        if !envelope.is_graphql_response() {
            return Err(TransportError::InvalidResponse(
                "the body holds neither `data` nor `errors`".to_string(),
            ));
        }
        Ok(envelope)
    }
}
