//! Module discovery.
//!
//! The registry only ever sees a [`ModuleMap`] and an [`AssetMap`]; how
//! they are produced is up to the [`ModuleSource`]. Two sources ship here:
//! explicit registration ([`StaticSource`]) and a projects directory
//! scanned with glob patterns ([`DirectorySource`]).

use std::collections::BTreeSet;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::module::{AssetMap, Component, HtmlTemplate, ModuleMap, ProjectModule, SubRouteDecl};
use crate::types::PROJECTS_ROOT;

pub const INDEX_FILENAME: &str = "index.html";
pub const MANIFEST_FILENAME: &str = "project.json";
pub const PREVIEW_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// URL prefix preview assets are served under, relative to the site base.
pub const ASSETS_PREFIX: &str = "assets";

pub trait ModuleSource {
    fn modules(&self) -> Result<ModuleMap>;

    fn previews(&self) -> Result<AssetMap> {
        Ok(AssetMap::new())
    }
}

/// Modules registered explicitly in code.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    modules: ModuleMap,
    previews: AssetMap,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, key: impl Into<String>, module: ProjectModule) -> Self {
        self.modules.insert(key.into(), module);
        self
    }

    pub fn register_preview(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.previews.insert(key.into(), url.into());
        self
    }
}

impl ModuleSource for StaticSource {
    fn modules(&self) -> Result<ModuleMap> {
        Ok(self.modules.clone())
    }

    fn previews(&self) -> Result<AssetMap> {
        Ok(self.previews.clone())
    }
}

/// `project.json` next to a project's `index.html`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub routes: Option<Vec<ManifestRoute>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestRoute {
    pub path: String,
    /// HTML file relative to the project directory.
    pub file: String,
}

/// Projects laid out on disk as `<root>/<segment>+/index.html`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn glob_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let root = self.root.to_str().ok_or_else(|| {
            RegistryError::InvalidInput(format!(
                "projects directory {} is not valid UTF-8",
                self.root.display()
            ))
        })?;
        let root = glob::Pattern::escape(root);
        let mut files = Vec::new();
        for entry in glob::glob(&format!("{root}/{pattern}"))? {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }

    fn parent_dirs(&self, filename: &str) -> Result<BTreeSet<PathBuf>> {
        Ok(self
            .glob_files(&format!("**/{filename}"))?
            .into_iter()
            .filter_map(|file| file.parent().map(Path::to_path_buf))
            .collect())
    }

    fn relative_key(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Option<Vec<&str>> = relative
            .components()
            .map(|component| match component {
                PathComponent::Normal(segment) => segment.to_str(),
                _ => None,
            })
            .collect();
        let segments = segments?;
        if segments.is_empty() {
            return None;
        }
        Some(segments.join("/"))
    }
}

impl ModuleSource for DirectorySource {
    fn modules(&self) -> Result<ModuleMap> {
        let mut modules = ModuleMap::new();
        if !self.root.is_dir() {
            tracing::warn!("projects directory {} does not exist", self.root.display());
            return Ok(modules);
        }

        let layouts = self.parent_dirs(INDEX_FILENAME)?;
        let manifests = self.parent_dirs(MANIFEST_FILENAME)?;
        let mut dirs = layouts.clone();
        for dir in &manifests {
            if layouts.contains(dir) {
                continue;
            }
            // A manifest without a layout above other projects is folder metadata.
            let has_descendants = layouts
                .iter()
                .chain(manifests.iter())
                .any(|other| other != dir && other.starts_with(dir));
            if has_descendants {
                tracing::warn!(
                    "ignoring {MANIFEST_FILENAME} in {}: folder contains projects",
                    dir.display()
                );
                continue;
            }
            dirs.insert(dir.clone());
        }

        for dir in dirs {
            let Some(relative) = self.relative_key(&dir) else {
                tracing::debug!("ignoring project files at {}", dir.display());
                continue;
            };
            match load_module(&dir) {
                Ok(module) => {
                    modules.insert(format!("{PROJECTS_ROOT}/{relative}/index"), module);
                }
                Err(error) => {
                    tracing::warn!("skipping project {relative}: {error}");
                }
            }
        }
        Ok(modules)
    }

    fn previews(&self) -> Result<AssetMap> {
        let mut previews = AssetMap::new();
        if !self.root.is_dir() {
            return Ok(previews);
        }
        for file in self.glob_files("**/preview.*")? {
            let supported = file
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| PREVIEW_EXTENSIONS.contains(&extension));
            if !supported {
                continue;
            }
            if let Some(relative) = self.relative_key(&file) {
                previews.insert(
                    format!("{PROJECTS_ROOT}/{relative}"),
                    format!("{ASSETS_PREFIX}/{relative}"),
                );
            }
        }
        Ok(previews)
    }
}

fn load_module(dir: &Path) -> Result<ProjectModule> {
    let layout_path = dir.join(INDEX_FILENAME);
    let layout = if layout_path.is_file() {
        let source = std::fs::read_to_string(&layout_path)?;
        Some(Arc::new(HtmlTemplate::new(source)) as Arc<dyn Component>)
    } else {
        None
    };

    let manifest_path = dir.join(MANIFEST_FILENAME);
    let manifest = if manifest_path.is_file() {
        read_manifest(&manifest_path)?
    } else {
        ProjectManifest::default()
    };

    let routes = manifest.routes.map(|routes| {
        routes
            .into_iter()
            .filter_map(|route| load_route(dir, route))
            .collect()
    });

    Ok(ProjectModule {
        layout,
        routes,
        title: manifest.title,
        description: manifest.description,
    })
}

fn read_manifest(path: &Path) -> Result<ProjectManifest> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|error| RegistryError::Manifest {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

fn load_route(dir: &Path, route: ManifestRoute) -> Option<SubRouteDecl> {
    let relative = Path::new(&route.file);
    let contained = relative
        .components()
        .all(|component| matches!(component, PathComponent::Normal(_)));
    if !contained {
        tracing::warn!("route file {} escapes {}", route.file, dir.display());
        return None;
    }
    match std::fs::read_to_string(dir.join(relative)) {
        Ok(source) => Some(SubRouteDecl::new(route.path, Arc::new(HtmlTemplate::new(source)))),
        Err(error) => {
            tracing::warn!("route file {} in {}: {error}", route.file, dir.display());
            None
        }
    }
}

/// Finds the preview asset URL for a project path.
pub fn preview_for(path: &str, assets: &AssetMap) -> Option<String> {
    assets.iter().find_map(|(key, url)| {
        let rest = key.strip_prefix(PROJECTS_ROOT)?.strip_prefix('/')?;
        let (project, extension) = rest.rsplit_once("/preview.")?;
        (project == path && PREVIEW_EXTENSIONS.contains(&extension)).then(|| url.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, content).expect("write file");
    }

    #[test]
    fn directory_source_builds_keys_and_modules() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "todo/index.html", "<h1>Todo</h1>");
        write(
            root,
            "todo/project.json",
            r#"{ "title": "Todo", "description": "Tasks" }"#,
        );
        write(root, "reports/q1/index.html", "<h1>Q1</h1><!-- outlet -->");
        write(root, "reports/q1/detail.html", "<p>detail</p>");
        write(
            root,
            "reports/q1/project.json",
            r#"{ "routes": [{ "path": "/", "file": "detail.html" }, { "path": "gone", "file": "missing.html" }] }"#,
        );
        write(root, "draft/project.json", r#"{ "title": "Draft" }"#);
        write(root, "index.html", "<p>root page</p>");

        let modules = DirectorySource::new(root).modules().expect("modules");
        let keys: Vec<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "projects/draft/index",
                "projects/reports/q1/index",
                "projects/todo/index"
            ]
        );

        let todo = &modules["projects/todo/index"];
        assert!(todo.layout.is_some());
        assert_eq!(todo.title.as_deref(), Some("Todo"));
        assert_eq!(todo.description.as_deref(), Some("Tasks"));
        assert!(todo.routes.is_none());

        let q1 = &modules["projects/reports/q1/index"];
        let routes = q1.routes.as_ref().expect("routes");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/");

        assert!(modules["projects/draft/index"].layout.is_none());
    }

    #[test]
    fn folder_manifest_does_not_hide_nested_projects() {
        let dir = tempdir().expect("tempdir");
        write(dir.path(), "reports/project.json", r#"{ "title": "Reports" }"#);
        write(dir.path(), "reports/q1/index.html", "<h1>Q1</h1>");
        write(dir.path(), "reports/q2/index.html", "<h1>Q2</h1>");
        write(dir.path(), "drafts/wip/project.json", r#"{ "title": "WIP" }"#);

        let modules = DirectorySource::new(dir.path()).modules().expect("modules");
        let keys: Vec<&str> = modules.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "projects/drafts/wip/index",
                "projects/reports/q1/index",
                "projects/reports/q2/index"
            ]
        );

        let registry = crate::Registry::from_source(&DirectorySource::new(dir.path()))
            .expect("registry");
        assert_eq!(registry.child_folders(""), vec!["drafts", "reports"]);
        assert!(registry.is_folder("reports"));
        assert!(registry.resolve("reports/q1").is_some());
    }

    #[test]
    fn bad_manifest_drops_the_project() {
        let dir = tempdir().expect("tempdir");
        write(dir.path(), "broken/index.html", "<p>x</p>");
        write(dir.path(), "broken/project.json", "{ not json");
        write(dir.path(), "fine/index.html", "<p>y</p>");

        let modules = DirectorySource::new(dir.path()).modules().expect("modules");
        assert!(!modules.contains_key("projects/broken/index"));
        assert!(modules.contains_key("projects/fine/index"));
    }

    #[test]
    fn route_files_cannot_escape_the_project() {
        let dir = tempdir().expect("tempdir");
        write(dir.path(), "secret.html", "<p>secret</p>");
        write(dir.path(), "app/index.html", "<p>app</p>");
        write(
            dir.path(),
            "app/project.json",
            r#"{ "routes": [{ "path": "leak", "file": "../secret.html" }] }"#,
        );
        let modules = DirectorySource::new(dir.path()).modules().expect("modules");
        let routes = modules["projects/app/index"].routes.as_ref().expect("routes");
        assert!(routes.is_empty());
    }

    #[test]
    fn missing_root_yields_no_modules() {
        let dir = tempdir().expect("tempdir");
        let source = DirectorySource::new(dir.path().join("nope"));
        assert!(source.modules().expect("modules").is_empty());
        assert!(source.previews().expect("previews").is_empty());
    }

    #[test]
    fn previews_map_to_asset_urls() {
        let dir = tempdir().expect("tempdir");
        write(dir.path(), "todo/preview.png", "png");
        write(dir.path(), "reports/q1/preview.webp", "webp");
        write(dir.path(), "reports/q2/preview.gif", "gif");

        let previews = DirectorySource::new(dir.path()).previews().expect("previews");
        assert_eq!(previews.len(), 2);
        assert_eq!(
            previews.get("projects/todo/preview.png").map(String::as_str),
            Some("assets/todo/preview.png")
        );
        assert_eq!(
            preview_for("reports/q1", &previews).as_deref(),
            Some("assets/reports/q1/preview.webp")
        );
        assert_eq!(preview_for("reports/q2", &previews), None);
        assert_eq!(preview_for("reports", &previews), None);
    }

    #[test]
    fn static_source_returns_registrations() {
        let source = StaticSource::new()
            .register("projects/a/index", ProjectModule::default())
            .register_preview("projects/a/preview.jpg", "/static/a.jpg");
        assert_eq!(source.modules().expect("modules").len(), 1);
        assert_eq!(
            preview_for("a", &source.previews().expect("previews")).as_deref(),
            Some("/static/a.jpg")
        );
    }
}
