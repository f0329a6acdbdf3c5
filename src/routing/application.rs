//! Application: the composition root of the client-side router.
//!
//! Owns the router, the navigation environment, the document, the optional
//! security gate and the optional route-change callback. Hosts feed it
//! navigation events; nothing else mutates its state.

use std::collections::HashMap;

use crate::routing::environment::{MemoryHistory, NavigationEnvironment};
use crate::routing::router::{
    Access, RouteCallback, Router, SecurityGate, Transition, TransitionContext,
};
use crate::routing::table::{Route, RouteDef};
use crate::routing::url::split;
use crate::routing::view::{Document, MountedView};
use crate::routing::RouteError;

/// A clicked anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    /// Whether the anchor carries the in-app navigation marker (`data-link`).
    pub routed: bool,
}

impl Link {
    pub fn routed(href: impl Into<String>) -> Self {
        Self { href: href.into(), routed: true }
    }

    pub fn external(href: impl Into<String>) -> Self {
        Self { href: href.into(), routed: false }
    }
}

pub struct Application<E, D> {
    router: Router,
    env: E,
    document: D,
    security: Option<SecurityGate>,
    on_route: Option<RouteCallback>,
}

impl<E, D> std::fmt::Debug for Application<E, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("router", &self.router)
            .field("has_security", &self.security.is_some())
            .field("has_on_route", &self.on_route.is_some())
            .finish()
    }
}

impl<E, D> Application<E, D>
where
    E: NavigationEnvironment,
    D: Document,
{
    /// Resolve `routes` against `document`. Views are mounted (hidden) here.
    pub fn new(routes: Vec<RouteDef>, env: E, mut document: D) -> Result<Self, RouteError> {
        let router = Router::new(routes, &mut document)?;
        Ok(Self {
            router,
            env,
            document,
            security: None,
            on_route: None,
        })
    }

    /// Install the security gate.
    pub fn with_security<F>(mut self, gate: F) -> Self
    where
        F: Fn(&Route) -> Access + 'static,
    {
        self.security = Some(Box::new(gate));
        self
    }

    /// Install the route-change callback.
    pub fn with_on_route<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Route) + 'static,
    {
        self.on_route = Some(Box::new(callback));
        self
    }

    /// Initial page load.
    pub fn start(&mut self) -> Transition {
        self.change_route()
    }

    /// The environment moved through history (back/forward).
    pub fn pop_state(&mut self) -> Transition {
        self.change_route()
    }

    /// Push `url` as a new history entry, route to it, then scroll to its fragment if any.
    pub fn navigate(&mut self, url: &str) -> Transition {
        self.env.push(url);
        let transition = self.change_route();

        let (_, _, hash) = split(&self.env.location());
        if !hash.is_empty() {
            if let Err(e) = self.document.scroll_into_view(&hash) {
                tracing::debug!(hash = %hash, error = %e, "Scroll to fragment skipped");
            }
        }
        transition
    }

    /// Leave in-app routing and load `url` as a new document.
    pub fn redirect(&mut self, url: &str) {
        tracing::debug!(url = %url, "Hard redirect");
        self.env.assign(url);
    }

    /// Handle a link click. Only marked links are routed; returns whether the click was handled.
    pub fn click(&mut self, link: &Link) -> Option<Transition> {
        if !link.routed {
            return None;
        }
        Some(self.navigate(&link.href))
    }

    fn change_route(&mut self) -> Transition {
        let transition = self.router.change_route(&mut TransitionContext {
            env: &mut self.env,
            document: &mut self.document,
            security: &self.security,
            on_route: &mut self.on_route,
        });
        tracing::debug!(?transition, url = %self.router.state().url(), "Route changed");
        transition
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn route(&self) -> Option<&Route> {
        self.router.route()
    }

    pub fn pathname(&self) -> &str {
        self.router.state().pathname()
    }

    pub fn search(&self) -> &str {
        self.router.state().search()
    }

    pub fn hash(&self) -> &str {
        self.router.state().hash()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        self.router.state().params()
    }

    pub fn queries(&self) -> &HashMap<String, String> {
        self.router.state().queries()
    }

    pub fn view(&self, id: &str) -> Option<&MountedView> {
        self.router.view(id)
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn document(&self) -> &D {
        &self.document
    }
}

impl<D: Document> Application<MemoryHistory, D> {
    /// Step back in a memory history and route. Returns `None` at the start of the history.
    pub fn back(&mut self) -> Option<Transition> {
        if !self.env.back() {
            return None;
        }
        Some(self.pop_state())
    }

    /// Step forward in a memory history and route. Returns `None` at the end of the history.
    pub fn forward(&mut self) -> Option<Transition> {
        if !self.env.forward() {
            return None;
        }
        Some(self.pop_state())
    }
}
