//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check that dependent settings are present (redirect needs TLS)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.http_address and listener.https_address must differ")]
    AddressConflict,

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("listener.redirect_to_https requires a [tls] section")]
    RedirectWithoutTls,

    #[error("static_files.{field} must not be empty")]
    EmptyPage { field: &'static str },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let http = check_address("listener.http_address", &config.listener.http_address, &mut errors);
    if config.tls.is_some() {
        let https = check_address("listener.https_address", &config.listener.https_address, &mut errors);
        if http.is_some() && http == https {
            errors.push(ValidationError::AddressConflict);
        }
    } else if config.listener.redirect_to_https {
        errors.push(ValidationError::RedirectWithoutTls);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.request_secs" });
    }
    if config.timeouts.shutdown_secs == 0 {
        errors.push(ValidationError::ZeroTimeout { field: "timeouts.shutdown_secs" });
    }

    if config.static_files.index.is_empty() {
        errors.push(ValidationError::EmptyPage { field: "index" });
    }
    if config.static_files.not_found.is_empty() {
        errors.push(ValidationError::EmptyPage { field: "not_found" });
    }

    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(
    field: &'static str,
    value: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<SocketAddr> {
    match value.parse() {
        Ok(addr) => Some(addr),
        Err(_) => {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
            None
        }
    }
}
