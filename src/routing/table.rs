//! Route table resolution.
//!
//! # Responsibilities
//! - Normalize every registered pattern
//! - Compile one anchored matcher per route
//! - Mount each route's view exactly once
//! - First-match lookup in registration order
//!
//! # Design Decisions
//! - Registration order is match priority; a later, more specific route never wins
//! - Malformed patterns fail the whole table at construction
//! - Routes are addressed by index, which is their identity

use std::collections::HashMap;

use regex::Regex;

use crate::routing::url::{normalize, to_matcher};
use crate::routing::view::{Document, MountedView, View};
use crate::routing::RouteError;

type ViewFactory = Box<dyn FnOnce() -> Box<dyn View>>;

/// A route as registered by the page: a pattern and a view constructor.
pub struct RouteDef {
    pattern: String,
    factory: ViewFactory,
}

impl RouteDef {
    pub fn new<F, V>(pattern: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce() -> V + 'static,
        V: View + 'static,
    {
        Self {
            pattern: pattern.into(),
            factory: Box::new(move || Box::new(factory()) as Box<dyn View>),
        }
    }
}

impl std::fmt::Debug for RouteDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDef")
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// A resolved route.
#[derive(Debug)]
pub struct Route {
    pattern: String,
    path: String,
    matcher: Regex,
    param_names: Vec<String>,
    view: MountedView,
}

impl Route {
    /// Pattern exactly as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Normalized pattern.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn view(&self) -> &MountedView {
        &self.view
    }

    pub(crate) fn view_mut(&mut self) -> &mut MountedView {
        &mut self.view
    }

    pub fn matches(&self, pathname: &str) -> bool {
        self.matcher.is_match(pathname)
    }

    /// Parameters captured from `pathname`, or an empty map when it does not match.
    pub fn params(&self, pathname: &str) -> HashMap<String, String> {
        match self.matcher.captures(pathname) {
            Some(caps) => self
                .param_names
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, value)| value.map(|v| (name.clone(), v.as_str().to_string())))
                .collect(),
            None => HashMap::new(),
        }
    }
}

/// Ordered, immutable set of resolved routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Resolve route definitions in order, mounting each view into `document`.
    pub fn resolve(defs: Vec<RouteDef>, document: &mut dyn Document) -> Result<Self, RouteError> {
        let mut routes = Vec::with_capacity(defs.len());
        for def in defs {
            let path = normalize(&def.pattern);
            let compiled = to_matcher(&path)?;
            let matcher = Regex::new(&compiled.source).map_err(|source| RouteError::InvalidMatcher {
                pattern: def.pattern.clone(),
                source,
            })?;
            let view = MountedView::mount((def.factory)(), document);

            tracing::debug!(pattern = %def.pattern, path = %path, view = %view.id(), "Route resolved");
            routes.push(Route {
                pattern: def.pattern,
                path,
                matcher,
                param_names: compiled.params,
                view,
            });
        }
        Ok(Self { routes })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Route> {
        self.routes.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Index of the first route matching `pathname`.
    pub fn find(&self, pathname: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.matches(pathname))
    }

    /// Index of the route whose view has the given identifier.
    pub fn find_view(&self, id: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.view.id() == id)
    }
}
