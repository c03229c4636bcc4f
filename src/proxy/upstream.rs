//! Upstream response representation.
//!
//! A call to the upstream either yields a real response or a locally built
//! synthetic failure. Both are drained into a [`BufferedResponse`] before the
//! response transformation runs.

use axum::body::Bytes;
use axum::http::{HeaderMap, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use tokio::time::Instant;

use crate::proxy::error::{FailureKind, ForwardError};

/// Locally constructed response describing a forwarding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResponse {
    pub kind: FailureKind,
    pub body: Bytes,
}

impl SyntheticResponse {
    /// Build the synthetic response for a failure and its message.
    ///
    /// Timeouts carry a fixed body; other failures carry the error text.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let body = match kind {
            FailureKind::Timeout => Bytes::from_static(b"Proxy Timeout"),
            FailureKind::InvalidRequest | FailureKind::Transport => Bytes::from(message.into()),
        };
        Self { kind, body }
    }

    pub fn from_error(err: &ForwardError) -> Self {
        Self::new(err.kind(), err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn status_line(&self) -> &'static str {
        self.kind.status_line()
    }
}

/// Outcome of a single upstream call.
#[derive(Debug)]
pub enum UpstreamResponse {
    /// Response head received from the upstream server, body not yet read.
    Upstream {
        response: Response<Incoming>,
        /// End of the round-trip budget; the body must arrive before it.
        deadline: Instant,
    },
    /// Failure represented locally.
    Synthetic(SyntheticResponse),
}

impl UpstreamResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamResponse::Upstream { response, .. } => response.status(),
            UpstreamResponse::Synthetic(synthetic) => synthetic.status(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, UpstreamResponse::Synthetic(_))
    }

    /// Read the whole body.
    ///
    /// A real response whose body cannot be read before the deadline degrades
    /// to the synthetic response for the read error.
    pub async fn buffer(self) -> BufferedResponse {
        let (response, deadline) = match self {
            UpstreamResponse::Synthetic(synthetic) => return synthetic.into(),
            UpstreamResponse::Upstream { response, deadline } => (response, deadline),
        };

        let (parts, body) = response.into_parts();
        let err = match tokio::time::timeout_at(deadline, body.collect()).await {
            Ok(Ok(collected)) => {
                return BufferedResponse {
                    status: parts.status,
                    headers: parts.headers,
                    body: collected.to_bytes(),
                }
            }
            Ok(Err(e)) => ForwardError::transport(&e),
            Err(_) => ForwardError::Timeout,
        };

        let synthetic = SyntheticResponse::from_error(&err);
        tracing::warn!(
            status = %parts.status,
            status_line = synthetic.status_line(),
            error = %err,
            "Failed to read upstream body"
        );
        synthetic.into()
    }
}

impl From<SyntheticResponse> for UpstreamResponse {
    fn from(synthetic: SyntheticResponse) -> Self {
        UpstreamResponse::Synthetic(synthetic)
    }
}

/// Upstream response with its body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl From<SyntheticResponse> for BufferedResponse {
    fn from(synthetic: SyntheticResponse) -> Self {
        Self {
            status: synthetic.status(),
            headers: HeaderMap::new(),
            body: synthetic.body,
        }
    }
}
