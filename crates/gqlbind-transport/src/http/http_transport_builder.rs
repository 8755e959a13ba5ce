use crate::http::HttpTransport;
use gqlbind_core::transport::TransportError;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every request an [`HttpTransport`] sends.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpTransportConfig {
    /// Sent with every request, in addition to `Content-Type` and `Accept`.
    pub headers: Vec<(String, String)>,
    /// Applies to the whole round trip of each request.
    pub timeout: Duration,
}
impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            headers: vec![],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Utility for building an [`HttpTransport`].
#[derive(Clone, Debug)]
pub struct HttpTransportBuilder {
    config: HttpTransportConfig,
    endpoint: String,
}
impl HttpTransportBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config: HttpTransportConfig::default(),
            endpoint: endpoint.into(),
        }
    }

    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|err| TransportError::InvalidUrl {
            reason: err.to_string(),
            url: self.endpoint.clone(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                reason: format!("unsupported scheme `{}`", endpoint.scheme()),
                url: self.endpoint,
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static(
            "application/graphql-response+json, application/json",
        ));
        for (name, value) in &self.config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| TransportError::Http(format!("invalid header name `{name}`: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| TransportError::Http(format!("invalid value for header `{name}`: {err}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.config.timeout)
            .build()
            .map_err(|err| TransportError::Http(err.to_string()))?;

        tracing::debug!(
            %endpoint,
            timeout = ?self.config.timeout,
            headers = self.config.headers.len(),
            "built http transport",
        );
        Ok(HttpTransport {
            client,
            endpoint,
        })
    }

    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        self.with_header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    pub fn with_config(mut self, config: HttpTransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a header sent with every request. A later header with the same
    /// name replaces an earlier one.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }
}
