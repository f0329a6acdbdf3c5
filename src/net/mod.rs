//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain listener (tokio TcpListener, served by axum)
//!     → or TLS listener (tls.rs config, served by axum-server)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional; without a certificate pair only plain HTTP is served
//! - Certificates are loaded once at startup

pub mod tls;
