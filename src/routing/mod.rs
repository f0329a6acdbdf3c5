//! Client-side routing subsystem.
//!
//! # Data Flow
//! ```text
//! Navigation event (initial load, back/forward, link click, navigate())
//!     → application.rs (push history entry when navigating)
//!     → router.rs (split + normalize location, first-match lookup)
//!     → security gate (granted / denied / redirect)
//!     → view.rs (exit old view, enter new view)
//!     → environment.rs (replace visible URL)
//!
//! Route Compilation (at startup):
//!     RouteDef[] (pattern + view constructor)
//!     → url.rs (normalize, pattern → anchored matcher)
//!     → table.rs (compile, mount views once)
//!     → Immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable afterwards
//! - First match wins, in registration order
//! - Unmatched paths resolve to the first route
//! - Malformed patterns are rejected at startup

pub mod application;
pub mod environment;
pub mod router;
pub mod table;
pub mod url;
pub mod view;

pub use application::{Application, Link};
pub use environment::{MemoryHistory, NavigationEnvironment};
pub use router::{Access, NavigationState, RouteCallback, Router, SecurityGate, Transition};
pub use table::{Route, RouteDef, RouteTable};
pub use view::{Document, DocumentError, MemoryDocument, MountedView, View, ViewContext};

/// Errors raised while resolving the route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("unclosed parameter in route pattern {pattern:?}")]
    UnclosedParameter { pattern: String },

    #[error("unexpected ']' in route pattern {pattern:?}")]
    UnexpectedBracket { pattern: String },

    #[error("empty parameter name in route pattern {pattern:?}")]
    EmptyParameter { pattern: String },

    #[error("parameter {name:?} repeated in route pattern {pattern:?}")]
    DuplicateParameter { pattern: String, name: String },

    #[error("route pattern {pattern:?} does not compile: {source}")]
    InvalidMatcher {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
