//! Transport seam between the endpoint clients and the network
//!
//! Endpoint clients describe a request as data ([`TransportRequest`]) and
//! hand it to a [`Transport`]. [`HttpTransport`] is the `reqwest`-backed
//! implementation; tests substitute their own.

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{TransportError, TransportResult};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Url};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// A single request, independent of how it is sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Path segments below the base URL, unencoded
    pub path: Vec<String>,
    /// Query parameters in insertion order, unencoded
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    /// Create a request for the given method and path segments
    pub fn new<I, S>(method: Method, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            path: path.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// GET request
    pub fn get<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post<I, S>(path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach authentication headers
    #[must_use]
    pub fn with_credentials(mut self, credentials: &Credentials) -> Self {
        self.headers.extend(credentials.headers());
        self
    }

    /// Value of a query parameter, if present
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of a header, if present (case-insensitive name)
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Path joined with `/`, for logging
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path.join("/")
    }
}

/// Executes requests and returns the raw response body
///
/// Implementations map network failures and non-2xx answers to
/// [`TransportError`]; they never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request
    async fn execute(&self, request: TransportRequest) -> TransportResult<Vec<u8>>;
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    inner: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build a transport from configuration
    pub fn new(config: &ClientConfig) -> TransportResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(config.base_url.clone()));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|_| {
            TransportError::config(format!(
                "user_agent is not a valid header value: {:?}",
                config.user_agent
            ))
        })?;
        default_headers.insert(USER_AGENT, user_agent);

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build().map_err(TransportError::Request)?;

        Ok(Self { inner, base_url })
    }

    /// Server base URL
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the absolute URL for a request
    pub fn url_for(&self, request: &TransportRequest) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.path);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path_string(), request_id))]
    async fn execute(&self, request: TransportRequest) -> TransportResult<Vec<u8>> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let url = self.url_for(&request)?;
        let mut builder = self
            .inner
            .request(request.method.clone(), url)
            .header(X_REQUEST_ID, &request_id);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            debug!(
                request_id = %request_id,
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis(),
                "Request succeeded"
            );
            Ok(body.to_vec())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis(),
                "Request failed"
            );
            Err(TransportError::status(status.as_u16(), message))
        }
    }
}
