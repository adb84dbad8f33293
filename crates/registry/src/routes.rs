//! Route table assembly and path dispatch.

use std::fmt;
use std::sync::Arc;

use crate::module::{Component, EmptyComponent, ModuleMap, SubRouteDecl};
use crate::types::{ProjectRecord, PROJECTS_ROOT};

/// A child route under a project layout.
#[derive(Clone)]
pub struct ChildRoute {
    /// Rendered when no further path segment is present.
    pub index: bool,
    /// Path relative to the project, without surrounding slashes. `None` for the index child.
    pub path: Option<String>,
    pub element: Arc<dyn Component>,
}

impl ChildRoute {
    fn from_decl(decl: &SubRouteDecl) -> Self {
        let trimmed = decl.path.trim_matches('/');
        let index = trimmed.is_empty();
        Self {
            index,
            path: (!index).then(|| trimmed.to_string()),
            element: decl.component.clone(),
        }
    }
}

impl fmt::Debug for ChildRoute {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ChildRoute")
            .field("index", &self.index)
            .field("path", &self.path)
            .finish()
    }
}

/// One top-level project route.
#[derive(Clone)]
pub struct RouteNode {
    pub path: String,
    pub element: Arc<dyn Component>,
    pub children: Vec<ChildRoute>,
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RouteNode")
            .field("path", &self.path)
            .field("children", &self.children)
            .finish()
    }
}

/// A resolved request: the project node and the child it selected.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub node: &'a RouteNode,
    pub child: &'a ChildRoute,
}

impl RouteMatch<'_> {
    /// Renders the layout with the selected child as its outlet.
    pub fn render(&self) -> String {
        let outlet = self.child.element.render("");
        self.node.element.render(&outlet)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    nodes: Vec<RouteNode>,
}

impl RouteTable {
    pub fn nodes(&self) -> &[RouteNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.iter().any(|node| node.path == path)
    }

    /// Resolves a request path (slashes optional) against the table.
    ///
    /// The longest project path that equals the request or prefixes it at a
    /// segment boundary wins; the remainder then selects the index child
    /// (empty) or the child with exactly that path.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return None;
        }
        let (node, rest) = self
            .nodes
            .iter()
            .filter_map(|node| {
                let rest = path.strip_prefix(node.path.as_str())?;
                if rest.is_empty() {
                    Some((node, ""))
                } else {
                    rest.strip_prefix('/').map(|rest| (node, rest))
                }
            })
            .max_by_key(|(node, _)| node.path.len())?;

        let rest = rest.trim_matches('/');
        let child = if rest.is_empty() {
            node.children.iter().find(|child| child.index)?
        } else {
            node.children
                .iter()
                .find(|child| child.path.as_deref() == Some(rest))?
        };
        Some(RouteMatch { node, child })
    }
}

/// Builds one node per record whose module exports a layout, in record order.
pub fn assemble_routes(records: &[ProjectRecord], modules: &ModuleMap) -> RouteTable {
    let mut nodes = Vec::with_capacity(records.len());
    for record in records {
        let key = format!("{PROJECTS_ROOT}/{}/index", record.path);
        let Some(layout) = modules.get(&key).and_then(|module| module.layout.clone()) else {
            tracing::debug!("project {} has no layout; not routed", record.path);
            continue;
        };
        let children = match modules.get(&key).and_then(|module| module.routes.as_ref()) {
            Some(routes) => routes.iter().map(ChildRoute::from_decl).collect(),
            None => vec![ChildRoute {
                index: true,
                path: None,
                element: Arc::new(EmptyComponent),
            }],
        };
        nodes.push(RouteNode {
            path: record.path.clone(),
            element: layout,
            children,
        });
    }
    RouteTable { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{HtmlTemplate, ProjectModule};
    use crate::parser::parse_project_keys;

    fn html(source: &str) -> Arc<dyn Component> {
        Arc::new(HtmlTemplate::new(source))
    }

    fn build(modules: &ModuleMap) -> (Vec<ProjectRecord>, RouteTable) {
        let records: Vec<ProjectRecord> = parse_project_keys(modules.keys().map(String::as_str))
            .into_iter()
            .map(ProjectRecord::from_parsed)
            .collect();
        let table = assemble_routes(&records, modules);
        (records, table)
    }

    fn example_modules() -> ModuleMap {
        let mut modules = ModuleMap::new();
        modules.insert(
            "projects/example/index".to_string(),
            ProjectModule::with_layout(html("<nav>example</nav><!-- outlet -->"))
                .route("/", html("<p>overview</p>"))
                .route("step1", html("<p>one</p>"))
                .route("/step2/", html("<p>two</p>")),
        );
        modules.insert(
            "projects/reports/q1/index".to_string(),
            ProjectModule::with_layout(html("<h1>Q1</h1>")),
        );
        modules.insert("projects/x/index".to_string(), ProjectModule::default().title("X"));
        modules
    }

    #[test]
    fn layoutless_modules_are_skipped() {
        let (records, table) = build(&example_modules());
        assert_eq!(records.len(), 3);
        assert_eq!(table.len(), 2);
        assert!(!table.contains("x"));
        assert!(table.resolve("x").is_none());
    }

    #[test]
    fn nodes_follow_record_order() {
        let (_, table) = build(&example_modules());
        let paths: Vec<&str> = table.nodes().iter().map(|node| node.path.as_str()).collect();
        assert_eq!(paths, vec!["example", "reports/q1"]);
    }

    #[test]
    fn missing_routes_get_one_index_child() {
        let (_, table) = build(&example_modules());
        let node = &table.nodes()[1];
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].index);
        assert_eq!(node.children[0].path, None);
    }

    #[test]
    fn declared_routes_map_to_index_and_path_children() {
        let (_, table) = build(&example_modules());
        let node = &table.nodes()[0];
        let shape: Vec<(bool, Option<&str>)> = node
            .children
            .iter()
            .map(|child| (child.index, child.path.as_deref()))
            .collect();
        assert_eq!(
            shape,
            vec![(true, None), (false, Some("step1")), (false, Some("step2"))]
        );
    }

    #[test]
    fn empty_string_path_is_index() {
        let decl = SubRouteDecl::new("", html("x"));
        assert!(ChildRoute::from_decl(&decl).index);
    }

    #[test]
    fn resolve_renders_layout_with_child() {
        let (_, table) = build(&example_modules());
        let index = table.resolve("/example/").expect("index");
        assert_eq!(index.render(), "<nav>example</nav><p>overview</p>");
        let step = table.resolve("example/step2").expect("step2");
        assert_eq!(step.render(), "<nav>example</nav><p>two</p>");
        let default_index = table.resolve("reports/q1").expect("q1");
        assert_eq!(default_index.render(), "<h1>Q1</h1>");
    }

    #[test]
    fn resolve_rejects_unknown_children_and_partial_segments() {
        let (_, table) = build(&example_modules());
        assert!(table.resolve("example/step3").is_none());
        assert!(table.resolve("examples").is_none());
        assert!(table.resolve("reports").is_none());
        assert!(table.resolve("reports/q1/extra").is_none());
        assert!(table.resolve("").is_none());
    }
}
