use crate::browse::{browse_items, BrowseContext, BrowseQuery};
use crate::discovery::{preview_for, ModuleSource};
use crate::error::Result;
use crate::index::{self, categories_of};
use crate::module::{AssetMap, ModuleMap};
use crate::parser::parse_project_keys;
use crate::routes::{assemble_routes, RouteMatch, RouteTable};
use crate::types::{BrowseItem, Breadcrumb, ProjectRecord, UNCATEGORIZED_SLUG};

/// The immutable project set for one build, with its derived indexes and
/// route table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    records: Vec<ProjectRecord>,
    categories: Vec<String>,
    routes: RouteTable,
}

impl Registry {
    pub fn from_source(source: &dyn ModuleSource) -> Result<Self> {
        let modules = source.modules()?;
        let previews = source.previews()?;
        Ok(Self::build(&modules, &previews))
    }

    pub fn build(modules: &ModuleMap, previews: &AssetMap) -> Self {
        let records: Vec<ProjectRecord> = parse_project_keys(modules.keys().map(String::as_str))
            .into_iter()
            .map(|parsed| {
                let key = format!("{}/{}/index", crate::types::PROJECTS_ROOT, parsed.path);
                let mut record = ProjectRecord::from_parsed(parsed);
                if let Some(module) = modules.get(&key) {
                    record.title = module.title.clone();
                    record.description = module.description.clone();
                }
                record.preview = preview_for(&record.path, previews);
                record
            })
            .collect();
        let categories = categories_of(&records);
        let routes = assemble_routes(&records, modules);
        tracing::info!(
            projects = records.len(),
            categories = categories.len(),
            routes = routes.len(),
            "project registry built"
        );
        Self {
            records,
            categories,
            routes,
        }
    }

    /// Every parsed project, sorted by path. Includes projects that are not routable.
    pub fn projects(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.path.as_str()).collect()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn projects_by_category(&self, slug: &str) -> Vec<&ProjectRecord> {
        self.records
            .iter()
            .filter(|record| record.category_slug == slug)
            .collect()
    }

    /// A real category: known and not the uncategorized sentinel.
    pub fn is_category_slug(&self, slug: &str) -> bool {
        slug != UNCATEGORIZED_SLUG && self.categories.iter().any(|category| category == slug)
    }

    pub fn project_by_path(&self, path: &str) -> Option<&ProjectRecord> {
        let path = path.trim_matches('/');
        self.records.iter().find(|record| record.path == path)
    }

    pub fn child_folders(&self, prefix: &str) -> Vec<String> {
        index::child_folders(prefix.trim_matches('/'), &self.records)
    }

    pub fn child_projects(&self, prefix: &str) -> Vec<&ProjectRecord> {
        index::child_projects(prefix.trim_matches('/'), &self.records)
    }

    pub fn is_folder(&self, prefix: &str) -> bool {
        index::is_folder(prefix, &self.records)
    }

    pub fn breadcrumb(&self, prefix: &str) -> Vec<Breadcrumb> {
        index::breadcrumb(prefix)
    }

    pub fn browse(&self, prefix: &str, query: &BrowseQuery) -> Vec<BrowseItem> {
        browse_items(prefix.trim_matches('/'), &self.records, query)
    }

    /// Opens a browsing context over this registry.
    pub fn browse_context(&self, prefix: &str, query: BrowseQuery) -> BrowseContext {
        BrowseContext::new(&self.records, prefix, query)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.resolve(path)
    }
}
