//! Project registry and routing library for the showcase site.
//!
//! This crate provides the core browsing functionality:
//! - Module discovery (explicit registration or a projects directory)
//! - Path parsing into categorized project records
//! - Category and folder indexes with breadcrumbs
//! - Filter, sort and incremental-reveal pagination
//! - Route table assembly from per-project sub-route declarations

pub mod browse;
pub mod discovery;
pub mod error;
pub mod index;
pub mod module;
pub mod parser;
pub mod proximity;
pub mod registry;
pub mod routes;
pub mod types;

// Re-export main types
pub use browse::{BrowseContext, BrowseQuery, PAGE_SIZE, REVEAL_STEP};
pub use discovery::{DirectorySource, ModuleSource, ProjectManifest, StaticSource};
pub use error::{RegistryError, Result};
pub use module::{AssetMap, Component, EmptyComponent, HtmlTemplate, ModuleMap, ProjectModule, SubRouteDecl};
pub use proximity::ProximityObserver;
pub use registry::Registry;
pub use routes::{ChildRoute, RouteMatch, RouteNode, RouteTable};
pub use types::{
    BrowseItem, Breadcrumb, ParsedProject, ProjectRecord, SortOrder, ViewMode, PROJECTS_ROOT,
    UNCATEGORIZED_SLUG,
};
