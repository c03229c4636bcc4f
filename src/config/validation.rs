//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require a listen port
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("port is required")]
    MissingPort,

    #[error("port must be non-zero")]
    ZeroPort,
}

/// Check the settings needed to start the listener.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.http_port {
        None => errors.push(ValidationError::MissingPort),
        Some(0) => errors.push(ValidationError::ZeroPort),
        Some(_) => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
