//! Views and the document boundary.
//!
//! A [`View`] only supplies its identity and optional page-specific hooks.
//! Showing, hiding and titling the mount point is done by [`MountedView`],
//! which always runs the shared behavior before the view's own hook.

use std::collections::HashMap;

use crate::routing::router::NavigationState;

/// Failures reported by a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("no element with id {0:?}")]
    ElementNotFound(String),
    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
}

/// The page the views are mounted in.
pub trait Document {
    /// Current document title.
    fn title(&self) -> String;

    fn set_title(&mut self, title: &str);

    /// Show or hide the mount point with the given identifier.
    fn set_visible(&mut self, id: &str, visible: bool);

    /// Scroll to the element addressed by a fragment such as `#details`.
    fn scroll_into_view(&mut self, fragment: &str) -> Result<(), DocumentError>;
}

/// In-memory document for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    title: String,
    visible: HashMap<String, bool>,
    scrolled_to: Option<String>,
}

impl MemoryDocument {
    /// Create a document with the given title and mount points (all visible, as authored).
    pub fn new<I, S>(title: impl Into<String>, mount_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            visible: mount_points.into_iter().map(|id| (id.into(), true)).collect(),
            scrolled_to: None,
        }
    }

    /// Whether a mount point is visible. Unknown mount points are reported hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.get(id).copied().unwrap_or(false)
    }

    /// Identifiers of all visible mount points, sorted.
    pub fn visible(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .visible
            .iter()
            .filter(|(_, v)| **v)
            .map(|(k, _)| k.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Element id of the last successful scroll.
    pub fn scrolled_to(&self) -> Option<&str> {
        self.scrolled_to.as_deref()
    }
}

impl Document for MemoryDocument {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_visible(&mut self, id: &str, visible: bool) {
        self.visible.insert(id.to_string(), visible);
    }

    fn scroll_into_view(&mut self, fragment: &str) -> Result<(), DocumentError> {
        let id = fragment
            .strip_prefix('#')
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DocumentError::InvalidSelector(fragment.to_string()))?;
        if !self.visible.contains_key(id) {
            return Err(DocumentError::ElementNotFound(id.to_string()));
        }
        self.scrolled_to = Some(id.to_string());
        Ok(())
    }
}

/// Everything a view hook may touch.
pub struct ViewContext<'a> {
    pub document: &'a mut dyn Document,
    pub state: &'a NavigationState,
}

/// A page section that the router toggles on route changes.
pub trait View {
    /// Identifier of the mount point.
    fn id(&self) -> &str;

    /// Title applied when the view is entered. `None` keeps the document's title at mount time.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Runs after the mount point has been shown and titled.
    fn on_enter(&mut self, _cx: &mut ViewContext<'_>) {}

    /// Runs after the mount point has been hidden.
    fn on_exit(&mut self, _cx: &mut ViewContext<'_>) {}
}

/// A view bound to its mount point. Created once, never destroyed.
pub struct MountedView {
    view: Box<dyn View>,
    id: String,
    title: String,
}

impl std::fmt::Debug for MountedView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedView")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish()
    }
}

impl MountedView {
    /// Mount a view: hide its mount point and fix its title.
    pub fn mount(view: Box<dyn View>, document: &mut dyn Document) -> Self {
        let id = view.id().to_string();
        let title = view
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| document.title());
        document.set_visible(&id, false);
        Self { view, id, title }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Access the page-specific view.
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// Show the mount point, apply the title, then run the view's hook.
    pub fn enter(&mut self, cx: &mut ViewContext<'_>) {
        cx.document.set_visible(&self.id, true);
        cx.document.set_title(&self.title);
        self.view.on_enter(cx);
    }

    /// Hide the mount point, then run the view's hook.
    pub fn exit(&mut self, cx: &mut ViewContext<'_>) {
        cx.document.set_visible(&self.id, false);
        self.view.on_exit(cx);
    }
}
