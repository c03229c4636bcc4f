//! Upstream client: construction, URL building and the upstream call.
//!
//! # Responsibilities
//! - Validate credentials and build the shared HTTP client
//! - Derive the upstream URL from the inbound path and raw query
//! - Attach basic auth and the gzip hint, enforce the round-trip deadline
//! - Map construction and transport failures to synthetic responses
//!
//! # Design Decisions
//! - The request target is handed to hyper as an `http::Uri`, which keeps the
//!   caller's bytes; nothing is re-encoded on the way out
//! - One deadline covers connect, response head and body read

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, Request};
use base64::Engine;
use http_body_util::Empty;
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::ProxyConfig;
use crate::proxy::compression::GZIP;
use crate::proxy::error::{ForwardError, ProxyError, ProxyResult};
use crate::proxy::upstream::{SyntheticResponse, UpstreamResponse};

/// Address of the proxied service.
pub const UPSTREAM_BASE_URL: &str = "https://gegevensmagazijn.tweedekamer.nl";

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// Authenticating reverse proxy for a single upstream.
///
/// Immutable after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct ForwardingProxy {
    client: UpstreamClient,
    username: String,
    authorization: HeaderValue,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for ForwardingProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForwardingProxy")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ForwardingProxy {
    /// Create a proxy for the fixed upstream.
    ///
    /// Fails when `username` or `password` is empty, username first.
    pub fn new(config: &ProxyConfig) -> ProxyResult<Self> {
        Self::with_base_url(config, UPSTREAM_BASE_URL)
    }

    /// Create a proxy for an arbitrary base address (scheme + host, no path).
    pub fn with_base_url(config: &ProxyConfig, base_url: impl Into<String>) -> ProxyResult<Self> {
        if config.username.is_empty() {
            return Err(ProxyError::Configuration("username is required".into()));
        }
        if config.password.is_empty() {
            return Err(ProxyError::Configuration("password is required".into()));
        }

        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", config.username, config.password));
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", credentials))
            .map_err(|e| ProxyError::Configuration(format!("invalid credentials: {}", e)))?;
        authorization.set_sensitive(true);

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            username: config.username.clone(),
            authorization,
            base_url: base_url.into(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Concatenate base, path and raw query without re-encoding anything.
    pub fn build_upstream_url(&self, path: &str, raw_query: &str) -> String {
        if raw_query.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, raw_query)
        }
    }

    /// Perform the authenticated GET against the upstream.
    ///
    /// Never fails: local problems come back as [`UpstreamResponse::Synthetic`].
    pub async fn do_request(&self, path: &str, raw_query: &str) -> UpstreamResponse {
        let url = self.build_upstream_url(path, raw_query);
        let deadline = Instant::now() + self.timeout;

        let request = match Request::builder()
            .method(Method::GET)
            .uri(url.as_str())
            .header(header::AUTHORIZATION, self.authorization.clone())
            .header(header::ACCEPT_ENCODING, GZIP)
            .body(Empty::<Bytes>::new())
        {
            Ok(request) => request,
            Err(e) => return self.failure(&url, ForwardError::from(e)),
        };

        match tokio::time::timeout_at(deadline, self.client.request(request)).await {
            Ok(Ok(response)) => {
                tracing::info!(status = response.status().as_u16(), url = %url, "Upstream responded");
                UpstreamResponse::Upstream { response, deadline }
            }
            Ok(Err(e)) => self.failure(&url, ForwardError::transport(&e)),
            Err(_) => self.failure(&url, ForwardError::Timeout),
        }
    }

    fn failure(&self, url: &str, err: ForwardError) -> UpstreamResponse {
        let synthetic = SyntheticResponse::from_error(&err);
        tracing::warn!(
            status_line = synthetic.status_line(),
            url = %url,
            error = %err,
            "Upstream request failed"
        );
        synthetic.into()
    }
}
