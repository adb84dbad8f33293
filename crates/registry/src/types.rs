//! Core record types shared by the index, browse and route modules.

use serde::{Deserialize, Serialize};

/// Root segment every discovery key starts with.
pub const PROJECTS_ROOT: &str = "projects";

/// Category slug assigned to projects that sit at the top level.
pub const UNCATEGORIZED_SLUG: &str = "uncategorized";

/// Result of parsing a single discovery key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProject {
    pub category: Option<String>,
    pub name: String,
    pub path: String,
}

/// One discovered project with its module metadata attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Segment path, unique across the registry; doubles as the route path.
    pub path: String,
    /// Remaining segments after the category (`a/b` for nested projects).
    pub name: String,
    /// First path segment, `None` for top-level projects.
    pub category: Option<String>,
    /// `category` or [`UNCATEGORIZED_SLUG`].
    pub category_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resolved preview asset URL, relative to the site base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl ProjectRecord {
    pub fn from_parsed(parsed: ParsedProject) -> Self {
        let category_slug = parsed
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED_SLUG.to_string());
        Self {
            path: parsed.path,
            name: parsed.name,
            category: parsed.category,
            category_slug,
            title: None,
            description: None,
            preview: None,
        }
    }

    /// Title for display, falling back to the project name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Last segment of the project path.
    pub fn leaf_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// One entry of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BrowseItem {
    Folder { path: String, name: String },
    Project(ProjectRecord),
}

impl BrowseItem {
    pub fn path(&self) -> &str {
        match self {
            Self::Folder { path, .. } => path,
            Self::Project(record) => &record.path,
        }
    }

    /// Comparison key: the segment directly below the browsed prefix.
    pub fn name(&self) -> &str {
        match self {
            Self::Folder { name, .. } => name,
            Self::Project(record) => record.leaf_name(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::Folder { name, .. } => crate::index::format_title(name),
            Self::Project(record) => record.display_title().to_string(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Folder { .. } => None,
            Self::Project(record) => record.description.as_deref(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }
}

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub path: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Lenient parse used for query strings; unknown values fall back to ascending.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Display-only layout of a listing; never affects the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Tile,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Tile => "tile",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tile" => Self::Tile,
            _ => Self::List,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_from_parsed_uses_sentinel_slug() {
        let record = ProjectRecord::from_parsed(ParsedProject {
            category: None,
            name: "todo".to_string(),
            path: "todo".to_string(),
        });
        assert_eq!(record.category_slug, UNCATEGORIZED_SLUG);
        assert_eq!(record.display_title(), "todo");
    }

    #[test]
    fn leaf_name_is_last_segment() {
        let record = ProjectRecord::from_parsed(ParsedProject {
            category: Some("cat".to_string()),
            name: "a/b".to_string(),
            path: "cat/a/b".to_string(),
        });
        assert_eq!(record.leaf_name(), "b");
    }

    #[test]
    fn sort_and_view_parse_leniently() {
        assert_eq!(SortOrder::parse("DESC"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Asc);
        assert_eq!(ViewMode::parse("tile"), ViewMode::Tile);
        assert_eq!(ViewMode::parse(""), ViewMode::List);
    }
}
