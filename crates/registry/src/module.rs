//! Project module descriptors handed to the registry by a discovery source.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Marker replaced by the child route's output inside an [`HtmlTemplate`].
pub const OUTLET_MARKER: &str = "<!-- outlet -->";

/// Anything that renders to an HTML fragment.
///
/// Layouts receive the rendered child route as `outlet`; leaf components
/// receive an empty string.
pub trait Component: Send + Sync {
    fn render(&self, outlet: &str) -> String;
}

/// Static HTML with an optional outlet marker.
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    source: String,
}

impl HtmlTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Component for HtmlTemplate {
    fn render(&self, outlet: &str) -> String {
        if self.source.contains(OUTLET_MARKER) {
            self.source.replace(OUTLET_MARKER, outlet)
        } else {
            format!("{}{}", self.source, outlet)
        }
    }
}

/// Renders nothing; stands in for the default index child.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyComponent;

impl Component for EmptyComponent {
    fn render(&self, _outlet: &str) -> String {
        String::new()
    }
}

/// A sub-route a project declares for itself.
#[derive(Clone)]
pub struct SubRouteDecl {
    pub path: String,
    pub component: Arc<dyn Component>,
}

impl SubRouteDecl {
    pub fn new(path: impl Into<String>, component: Arc<dyn Component>) -> Self {
        Self {
            path: path.into(),
            component,
        }
    }
}

impl fmt::Debug for SubRouteDecl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SubRouteDecl")
            .field("path", &self.path)
            .finish()
    }
}

/// What a discovered project exports.
#[derive(Clone, Default)]
pub struct ProjectModule {
    /// Renderable layout; a module without one is listed but never routed.
    pub layout: Option<Arc<dyn Component>>,
    pub routes: Option<Vec<SubRouteDecl>>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ProjectModule {
    pub fn with_layout(layout: Arc<dyn Component>) -> Self {
        Self {
            layout: Some(layout),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn route(mut self, path: impl Into<String>, component: Arc<dyn Component>) -> Self {
        self.routes
            .get_or_insert_with(Vec::new)
            .push(SubRouteDecl::new(path, component));
        self
    }
}

impl fmt::Debug for ProjectModule {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ProjectModule")
            .field("has_layout", &self.layout.is_some())
            .field("routes", &self.routes)
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

/// Discovery key (`projects/<path>/index`) to module.
pub type ModuleMap = BTreeMap<String, ProjectModule>;

/// Asset key (`projects/<path>/preview.<ext>`) to resolved URL.
pub type AssetMap = BTreeMap<String, String>;
