//! Navigation environment.
//!
//! Abstracts the browser's location and session history. The router reads the
//! current URL and rewrites it; the application pushes entries and performs
//! hard navigations through it.

use url::Url;

/// Location and history primitives the router depends on.
pub trait NavigationEnvironment {
    /// Current URL as `pathname + search + hash`.
    fn location(&self) -> String;

    /// Add a history entry and make it current.
    fn push(&mut self, url: &str);

    /// Rewrite the current history entry without adding one.
    fn replace(&mut self, url: &str);

    /// Leave in-page routing and load `url` as a new document.
    fn assign(&mut self, url: &str);
}

/// Session history kept in memory.
///
/// URLs are resolved against the current entry, so relative links and absolute
/// same-origin links behave as they do in a browser. Entries after the current
/// one are discarded on push.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Url>,
    index: usize,
    assigned: Vec<String>,
}

impl MemoryHistory {
    /// Start a history at `origin` (e.g. `https://localhost:8443`) on `path`.
    pub fn new(origin: &str, path: &str) -> Result<Self, url::ParseError> {
        let start = Url::parse(origin)?.join(path)?;
        Ok(Self {
            entries: vec![start],
            index: 0,
            assigned: Vec::new(),
        })
    }

    /// Number of entries in the session history.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move one entry back. Returns false at the start of the history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Move one entry forward. Returns false at the end of the history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// URLs passed to [`NavigationEnvironment::assign`], oldest first.
    pub fn assigned(&self) -> &[String] {
        &self.assigned
    }

    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        match self.current().join(url) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Ignoring unresolvable URL");
                None
            }
        }
    }
}

impl NavigationEnvironment for MemoryHistory {
    fn location(&self) -> String {
        let url = self.current();
        let mut location = url.path().to_string();
        if let Some(query) = url.query() {
            location.push('?');
            location.push_str(query);
        }
        if let Some(fragment) = url.fragment() {
            location.push('#');
            location.push_str(fragment);
        }
        location
    }

    fn push(&mut self, url: &str) {
        if let Some(resolved) = self.resolve(url) {
            self.entries.truncate(self.index + 1);
            self.entries.push(resolved);
            self.index += 1;
        }
    }

    fn replace(&mut self, url: &str) {
        if let Some(resolved) = self.resolve(url) {
            self.entries[self.index] = resolved;
        }
    }

    fn assign(&mut self, url: &str) {
        self.assigned.push(url.to_string());
    }
}
