//! Authenticating reverse proxy for the Tweede Kamer open data service.
//!
//! Forwards GET requests to a single upstream with basic auth attached and
//! rewrites response compression to match what the caller accepts.

pub mod config;
pub mod http;
pub mod observability;
pub mod proxy;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use proxy::{ForwardingProxy, ProxyError};
