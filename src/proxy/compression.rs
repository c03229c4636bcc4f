//! Gzip negotiation helpers.
//!
//! The whole body is compressed in one pass; there is no streaming encoder.

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use compression_codecs::{gzip::GzipEncoder, EncodeV2};
use compression_core::util::{PartialBuffer, WriteBuffer};
use compression_core::Level;
use std::io;

pub const GZIP: &str = "gzip";

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024;

/// True when the caller's `Accept-Encoding` mentions gzip anywhere.
pub fn accepts_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(GZIP))
        .unwrap_or(false)
}

/// True when any header value is exactly `gzip`.
///
/// This deliberately looks at every header, not only `Content-Encoding`.
pub fn is_gzip_marked(headers: &HeaderMap) -> bool {
    headers.keys().any(|name| {
        headers
            .get(name)
            .map(|v| v.as_bytes() == GZIP.as_bytes())
            .unwrap_or(false)
    })
}

/// Gzip-compress `input` at the default level.
pub fn gzip(input: &[u8]) -> io::Result<Bytes> {
    let mut encoder = GzipEncoder::new(Level::Default.into());
    let mut output_buffer = vec![0u8; OUTPUT_BUFFER_SIZE];
    let mut compressed = Vec::with_capacity(input.len() / 2 + 32);

    let mut input_buf = PartialBuffer::new(input);
    loop {
        let consumed_before = input_buf.written_len();
        let mut output = WriteBuffer::new_initialized(output_buffer.as_mut_slice());
        encoder.encode(&mut input_buf, &mut output)?;

        let written = output.written_len();
        compressed.extend_from_slice(&output_buffer[..written]);

        if input_buf.written_len() >= input.len() {
            break;
        }
        if written == 0 && input_buf.written_len() == consumed_before {
            return Err(io::Error::other("gzip encoder made no progress"));
        }
    }

    loop {
        let mut output = WriteBuffer::new_initialized(output_buffer.as_mut_slice());
        let done = encoder.finish(&mut output)?;

        let written = output.written_len();
        compressed.extend_from_slice(&output_buffer[..written]);

        if done {
            break;
        }
    }

    Ok(Bytes::from(compressed))
}
