//! Response classification and error bodies.
//!
//! # Responsibilities
//! - Tag responses with what produced them (file, fallback page, redirect)
//! - Build the JSON body returned when a handler panics
//!
//! # Design Decisions
//! - Tags travel as response extensions, read by the access log
//! - Untagged responses are attributed to the static file service

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// What produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// A file from the public directory.
    Static,
    /// The index page, handed to the client-side router.
    Fallback,
    /// The not-found page.
    NotFound,
    /// A redirect to HTTPS.
    Redirect,
}

impl Served {
    pub fn as_str(&self) -> &'static str {
        match self {
            Served::Static => "static",
            Served::Fallback => "fallback",
            Served::NotFound => "not_found",
            Served::Redirect => "redirect",
        }
    }

    /// Attach this tag to a response.
    pub fn tag(self, mut response: Response) -> Response {
        response.extensions_mut().insert(self);
        response
    }
}

/// `500` response for a panicking handler.
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": 500,
            "message": "Internal Server Error",
        })),
    )
        .into_response()
}
