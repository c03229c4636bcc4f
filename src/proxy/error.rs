//! Error taxonomy for the forwarding proxy.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that escape the proxy. Only construction can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProxyError {
    /// Missing credential or unusable client settings.
    #[error("{0}")]
    Configuration(String),
}

/// Result type for proxy construction.
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Local failure on the forwarding path, turned into a synthetic response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The upstream request could not be built.
    InvalidRequest,
    /// The upstream did not answer within the deadline.
    Timeout,
    /// Any other transport failure.
    Transport,
}

impl FailureKind {
    /// Status code written to the caller.
    ///
    /// A malformed request reports 504 even though its status line says 500.
    pub fn status(&self) -> StatusCode {
        match self {
            FailureKind::InvalidRequest => StatusCode::GATEWAY_TIMEOUT,
            FailureKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            FailureKind::Transport => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Full status line of the synthetic response.
    pub fn status_line(&self) -> &'static str {
        match self {
            FailureKind::InvalidRequest => "500 Invalid Proxy Request",
            FailureKind::Timeout => "504 Proxy Timeout",
            FailureKind::Transport => "500 Internal Proxy Error",
        }
    }
}

/// Failure while forwarding one request upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The derived URL or headers do not form a valid request.
    #[error("{0}")]
    InvalidRequest(#[from] axum::http::Error),

    /// The round-trip deadline elapsed.
    #[error("Proxy Timeout")]
    Timeout,

    /// Connection, protocol or body read failure.
    #[error("{0}")]
    Transport(String),
}

impl ForwardError {
    /// Wrap a transport error, keeping its whole source chain in the message.
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ForwardError::Transport(message)
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ForwardError::InvalidRequest(_) => FailureKind::InvalidRequest,
            ForwardError::Timeout => FailureKind::Timeout,
            ForwardError::Transport(_) => FailureKind::Transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = ProxyError::Configuration("username is required".into());
        assert_eq!(err.to_string(), "username is required");
    }

    #[test]
    fn test_failure_mapping() {
        assert_eq!(FailureKind::InvalidRequest.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(FailureKind::InvalidRequest.status_line(), "500 Invalid Proxy Request");
        assert_eq!(FailureKind::Timeout.status().as_u16(), 504);
        assert_eq!(FailureKind::Timeout.status_line(), "504 Proxy Timeout");
        assert_eq!(FailureKind::Transport.status().as_u16(), 500);
        assert_eq!(FailureKind::Transport.status_line(), "500 Internal Proxy Error");
    }

    #[test]
    fn test_invalid_uri_is_invalid_request() {
        let err: ForwardError = axum::http::Request::builder()
            .uri("not a url/foo")
            .body(())
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), FailureKind::InvalidRequest);
    }

    #[test]
    fn test_transport_message_includes_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = ForwardError::transport(&io);
        assert_eq!(err.kind(), FailureKind::Transport);
        assert!(err.to_string().contains("connection refused"));
    }
}
