//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, wildcard GET route)
//!     → ForwardingProxy::handle (upstream call + response transform)
//!     → Send to client
//! ```

pub mod server;

pub use server::HttpServer;
