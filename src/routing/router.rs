//! Navigation state machine.
//!
//! # Responsibilities
//! - Own the navigation state (pathname, search, hash, params, queries, route)
//! - Resolve the active route from the current location
//! - Run view lifecycle hooks on route changes
//! - Consult the security gate and follow its redirects
//! - Keep the visible URL in sync with the resolved state
//!
//! # Design Decisions
//! - Once routes exist there is always exactly one active route (first route is the fallback)
//! - Re-entering the active route is a no-op apart from the URL sync
//! - Route, params and queries are committed together
//! - Hooks run synchronously, exit before enter

use std::collections::HashMap;

use crate::routing::environment::NavigationEnvironment;
use crate::routing::table::{Route, RouteDef, RouteTable};
use crate::routing::url::{normalize, queries, split};
use crate::routing::view::{Document, MountedView, ViewContext};
use crate::routing::RouteError;

/// Verdict of the security gate for a candidate route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Show the route.
    Granted,
    /// Keep the route hidden; only its title is applied.
    Denied,
    /// Do not show the route; go to this URL instead.
    Redirect(String),
}

impl From<(bool, Option<String>)> for Access {
    /// Convert a `(blocked, next)` pair. `next` is ignored unless blocked.
    fn from((blocked, next): (bool, Option<String>)) -> Self {
        match (blocked, next) {
            (false, _) => Access::Granted,
            (true, Some(next)) => Access::Redirect(next),
            (true, None) => Access::Denied,
        }
    }
}

/// Decides whether a route may be shown.
pub type SecurityGate = Box<dyn Fn(&Route) -> Access>;

/// Notified with the active route after every route change.
pub type RouteCallback = Box<dyn FnMut(&Route)>;

/// What a call to [`Router::change_route`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// No routes are registered.
    Idle,
    /// The resolved route was already active.
    Unchanged(usize),
    /// The route was entered.
    Entered(usize),
    /// The gate redirected to another known route, which was entered.
    Redirected { from: usize, to: usize },
    /// The gate redirected to an unknown URL; a hard navigation was issued.
    Escaped { from: usize, url: String },
    /// The gate blocked the route without a redirect.
    Blocked(usize),
}

/// Collaborators borrowed for the duration of one route change.
pub struct TransitionContext<'a> {
    pub env: &'a mut dyn NavigationEnvironment,
    pub document: &'a mut dyn Document,
    pub security: &'a Option<SecurityGate>,
    pub on_route: &'a mut Option<RouteCallback>,
}

/// Current navigation state. Only the router writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pathname: String,
    search: String,
    hash: String,
    params: HashMap<String, String>,
    queries: HashMap<String, String>,
    route: Option<usize>,
    previous_route: Option<usize>,
}

impl NavigationState {
    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn queries(&self) -> &HashMap<String, String> {
        &self.queries
    }

    /// Index of the active route.
    pub fn route(&self) -> Option<usize> {
        self.route
    }

    /// Index of the route that was active before the last route change.
    pub fn previous_route(&self) -> Option<usize> {
        self.previous_route
    }

    /// `pathname + search + hash`.
    pub fn url(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Client-side router.
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    state: NavigationState,
}

impl Router {
    /// Resolve the route table, mounting every view into `document`.
    pub fn new(routes: Vec<RouteDef>, document: &mut dyn Document) -> Result<Self, RouteError> {
        let table = RouteTable::resolve(routes, document)?;
        tracing::info!(routes = table.len(), "Router initialized");
        Ok(Self {
            table,
            state: NavigationState::default(),
        })
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The active route.
    pub fn route(&self) -> Option<&Route> {
        self.state.route.and_then(|i| self.table.get(i))
    }

    /// The route active before the last route change.
    pub fn previous_route(&self) -> Option<&Route> {
        self.state.previous_route.and_then(|i| self.table.get(i))
    }

    /// Look up a mounted view by its identifier.
    pub fn view(&self, id: &str) -> Option<&MountedView> {
        self.table.find_view(id).and_then(|i| self.table.get(i)).map(Route::view)
    }

    /// Re-resolve the active route from the environment's current location.
    pub fn change_route(&mut self, cx: &mut TransitionContext<'_>) -> Transition {
        if self.table.is_empty() {
            return Transition::Idle;
        }

        let location = cx.env.location();
        let (pathname, search, hash) = split(&location);
        let mut pathname = normalize(&pathname);

        let previous = self.state.route;
        let index = match self.table.find(&pathname) {
            Some(index) => index,
            None => {
                let fallback = self.table.get(0).map(|r| r.path().to_string()).unwrap_or_default();
                tracing::debug!(pathname = %pathname, fallback = %fallback, "No route matched, using first route");
                pathname = fallback;
                0
            }
        };
        self.commit(index, pathname, search, hash);
        self.state.previous_route = previous;

        let outcome = if previous == Some(index) {
            Transition::Unchanged(index)
        } else {
            if let Some(previous) = previous {
                self.exit(previous, cx.document);
            }

            let access = match (cx.security.as_ref(), self.table.get(index)) {
                (Some(gate), Some(route)) => gate(route),
                _ => Access::Granted,
            };

            let outcome = match access {
                Access::Granted => {
                    self.enter(index, cx.document);
                    Transition::Entered(index)
                }
                Access::Redirect(next) => {
                    let (pathname, search, hash) = split(&next);
                    let pathname = normalize(&pathname);
                    match self.table.find(&pathname) {
                        Some(target) => {
                            tracing::debug!(from = index, to = target, url = %next, "Route redirected");
                            self.commit(target, pathname, search, hash);
                            self.enter(target, cx.document);
                            Transition::Redirected { from: index, to: target }
                        }
                        None => {
                            tracing::debug!(from = index, url = %next, "Redirect target unknown, leaving router");
                            cx.env.assign(&next);
                            Transition::Escaped { from: index, url: next }
                        }
                    }
                }
                Access::Denied => {
                    if let Some(route) = self.table.get(index) {
                        tracing::debug!(route = %route.path(), "Route blocked");
                        cx.document.set_title(route.view().title());
                    }
                    Transition::Blocked(index)
                }
            };

            if let (Some(callback), Some(route)) = (cx.on_route.as_mut(), self.route()) {
                callback(route);
            }
            outcome
        };

        cx.env.replace(&self.state.url());
        outcome
    }

    /// Record a resolved location. Params and queries are always recomputed with the route.
    fn commit(&mut self, index: usize, pathname: String, search: String, hash: String) {
        self.state.params = self
            .table
            .get(index)
            .map(|r| r.params(&pathname))
            .unwrap_or_default();
        self.state.queries = queries(&search);
        self.state.route = Some(index);
        self.state.pathname = pathname;
        self.state.search = search;
        self.state.hash = hash;
    }

    fn enter(&mut self, index: usize, document: &mut dyn Document) {
        if let Some(route) = self.table.get_mut(index) {
            route.view_mut().enter(&mut ViewContext {
                document,
                state: &self.state,
            });
        }
    }

    fn exit(&mut self, index: usize, document: &mut dyn Document) {
        if let Some(route) = self.table.get_mut(index) {
            route.view_mut().exit(&mut ViewContext {
                document,
                state: &self.state,
            });
        }
    }
}
