//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, header names and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: invalid header name {value:?}")]
    InvalidHeader { field: &'static str, value: String },

    #[error("proxy.verify_header and proxy.subject_header both name {0:?}")]
    DuplicateHeader(String),

    #[error("audit.path must not be empty")]
    EmptyAuditPath,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let verify = check_header(&mut errors, "proxy.verify_header", &config.proxy.verify_header);
    let subject = check_header(&mut errors, "proxy.subject_header", &config.proxy.subject_header);
    if let (Some(verify), Some(subject)) = (verify, subject) {
        if verify == subject {
            errors.push(ValidationError::DuplicateHeader(verify.to_string()));
        }
    }
    if let Some(ref name) = config.proxy.client_addr_header {
        check_header(&mut errors, "proxy.client_addr_header", name);
    }

    if config.audit.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyAuditPath);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &str,
) -> Option<HeaderName> {
    match HeaderName::from_bytes(value.as_bytes()) {
        Ok(name) => Some(name),
        Err(_) => {
            errors.push(ValidationError::InvalidHeader {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
