use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ProxyConfig;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// A single outgoing call. Query parameters and form fields are kept as
/// ordered pairs because the API expects repeated `name[]` keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub uri: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub timeout: Duration,
}

impl ApiRequest {
    pub fn new(method: Method, uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method,
            uri: uri.into(),
            query: Vec::new(),
            form: Vec::new(),
            timeout,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// No connection could be established, so the request never left.
    #[error("connection failed: {0}")]
    Connection(String),
    /// The request may have reached the server, but no complete response came
    /// back (read timeout, reset mid-response, truncated body).
    #[error("request interrupted: {0}")]
    Interrupted(String),
    /// The client could not be built or the request was malformed.
    #[error("request setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

/// `reqwest`-backed transport carrying the api key header and proxy settings.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(api_key: &str, proxy: Option<&ProxyConfig>) -> Result<Self, TransportError> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut key = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|err| TransportError::Setup(format!("invalid api key header: {err}")))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        // Without explicit settings reqwest keeps honoring HTTP(S)_PROXY.
        if let Some(proxies) = build_proxies(proxy)? {
            builder = builder.no_proxy();
            for proxy in proxies {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|err| TransportError::Setup(format!("failed to build http client: {err}")))?;

        Ok(Self { client })
    }
}

/// `None` leaves reqwest's environment proxy lookup in place; `Some` replaces
/// it with exactly the returned proxies.
fn build_proxies(
    proxy: Option<&ProxyConfig>,
) -> Result<Option<Vec<reqwest::Proxy>>, TransportError> {
    let invalid = |err: reqwest::Error| TransportError::Setup(format!("invalid proxy: {err}"));

    match proxy {
        None => Ok(None),
        Some(ProxyConfig::Disabled) => Ok(Some(Vec::new())),
        Some(ProxyConfig::All(url)) => Ok(Some(vec![
            reqwest::Proxy::all(with_scheme(url)).map_err(invalid)?
        ])),
        Some(ProxyConfig::PerScheme(map)) => map
            .iter()
            .filter_map(|(scheme, url)| match scheme.as_str() {
                "http" => Some(reqwest::Proxy::http(with_scheme(url)).map_err(invalid)),
                "https" => Some(reqwest::Proxy::https(with_scheme(url)).map_err(invalid)),
                _ => None,
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
    }
}

fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.uri),
            Method::Post => self.client.post(&request.uri),
            Method::Delete => self.client.delete(&request.uri),
        }
        .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        })
    }
}

/// Only failures to connect are safe to resend; anything later may already
/// have been acted on by the server.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::Setup(err.to_string())
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Interrupted(err.to_string())
    }
}
