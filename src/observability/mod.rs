//! Observability subsystem.
//!
//! Structured logging only: every subsystem emits `tracing` events and
//! `logging.rs` installs the subscriber that prints them.

pub mod logging;

pub use logging::init_logging;
