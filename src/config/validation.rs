//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NodeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::NodeConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("node.tls_url must be an absolute https URL: {0}")]
    InvalidTlsUrl(String),

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.node.namespace.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "node.namespace" });
    }
    if config.node.volume.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "node.volume" });
    }
    if !config.node.tls_url.is_empty() {
        let valid = Url::parse(&config.node.tls_url)
            .map(|u| u.scheme() == "https" && u.host().is_some())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidTlsUrl(config.node.tls_url.clone()));
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(tls) = &config.listener.tls {
        check_address(&mut errors, "listener.tls.bind_address", &tls.bind_address);
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::Empty { field: "listener.tls.cert_path" });
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::Empty { field: "listener.tls.key_path" });
        }
    }
    if config.observability.metrics_enabled {
        check_address(&mut errors, "observability.metrics_address", &config.observability.metrics_address);
    }

    if config.health.enabled {
        if config.health.interval_secs == 0 {
            errors.push(ValidationError::Zero { field: "health.interval_secs" });
        }
        if config.health.probe_file.is_empty() {
            errors.push(ValidationError::Empty { field: "health.probe_file" });
        }
    }
    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "limits.request_timeout_secs" });
    }
    if config.limits.max_drain_bytes == 0 {
        errors.push(ValidationError::Zero { field: "limits.max_drain_bytes" });
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
