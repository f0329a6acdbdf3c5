//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/access_log.rs (access event + metrics)
//!     → public directory (ServeDir)
//!     → fallback.rs on miss (index page for client routes, 404 page otherwise)
//!     → Send to client
//!
//! Plain listener with TLS enabled:
//!     → redirect.rs (301 to HTTPS)
//! ```

pub mod fallback;
pub mod middleware;
pub mod redirect;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::Served;
pub use server::{HttpServer, ServerError};
