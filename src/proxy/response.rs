//! Response handling and transformation.
//!
//! # Responsibilities
//! - Short-circuit statuses above 500 with the bare body
//! - Copy upstream headers onto the outbound response, one value per name
//! - Negotiate gzip between what the upstream sent and what the caller accepts
//!
//! # Design Decisions
//! - Exactly 500 is not on the fast path; only codes greater than 500 are
//! - Any header whose value is exactly `gzip` marks the body as already compressed
//! - Hop-by-hop headers are dropped because the buffered body is re-framed

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};

use crate::proxy::client::ForwardingProxy;
use crate::proxy::compression::{self, GZIP};
use crate::proxy::upstream::BufferedResponse;

fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::CONNECTION || *name == header::TRANSFER_ENCODING || name.as_str() == "keep-alive"
}

impl ForwardingProxy {
    /// Serve one inbound request.
    ///
    /// Only the path, raw query and `Accept-Encoding` of the request are read.
    pub async fn handle<B>(&self, request: Request<B>) -> Response<Body> {
        let (inbound, _) = request.into_parts();
        let upstream = self
            .do_request(inbound.uri.path(), inbound.uri.query().unwrap_or(""))
            .await
            .buffer()
            .await;

        transform_response(upstream, &inbound.headers)
    }
}

/// Turn a buffered upstream response into the response sent to the caller.
pub fn transform_response(upstream: BufferedResponse, inbound: &HeaderMap) -> Response<Body> {
    let BufferedResponse {
        status,
        headers,
        body,
    } = upstream;

    if status.as_u16() > 500 {
        return build(status, HeaderMap::new(), body);
    }

    let gzipped = compression::is_gzip_marked(&headers);
    let mut outbound = forward_headers(&headers);

    if gzipped || !compression::accepts_gzip(inbound) {
        return build(status, outbound, body);
    }

    match compression::gzip(&body) {
        Ok(compressed) => {
            outbound.insert(header::CONTENT_ENCODING, HeaderValue::from_static(GZIP));
            outbound.insert(header::CONTENT_LENGTH, HeaderValue::from(compressed.len()));
            build(status, outbound, compressed)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to gzip response body, sending it uncompressed");
            build(status, outbound, body)
        }
    }
}

/// Copy the first value of every header, skipping hop-by-hop framing.
fn forward_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(upstream.keys_len());
    for name in upstream.keys() {
        if is_hop_by_hop(name) {
            continue;
        }
        if let Some(value) = upstream.get(name) {
            outbound.insert(name.clone(), value.clone());
        }
    }
    outbound
}

fn build(status: StatusCode, headers: HeaderMap, body: Bytes) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
