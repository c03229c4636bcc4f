//! Forwarding proxy subsystem.
//!
//! # Data Flow
//! ```text
//! inbound GET (path + query + Accept-Encoding)
//!     → client.rs (build upstream URL, basic auth, Accept-Encoding: gzip)
//!     → upstream.rs (real response or synthetic failure, body buffered)
//!     → response.rs (status fast path, header copy, gzip negotiation)
//!     → outbound response
//! ```
//!
//! # Design Decisions
//! - The proxy is immutable after construction; concurrent calls share only the client pool
//! - Forwarding failures never escape as errors; they become synthetic responses
//! - Bodies are buffered in full before any transformation

pub mod client;
pub mod compression;
pub mod error;
pub mod response;
pub mod upstream;

pub use client::{ForwardingProxy, UPSTREAM_BASE_URL};
pub use error::{FailureKind, ProxyError};
pub use upstream::{BufferedResponse, SyntheticResponse, UpstreamResponse};
