use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use registry::index::format_title;
use registry::{BrowseItem, BrowseQuery, Breadcrumb, ProjectRecord, SortOrder, ViewMode};

use crate::config::ShowcaseConfig;
use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectInfo {
    pub path: String,
    pub name: String,
    pub category: Option<String>,
    pub category_slug: String,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
    /// Whether the project exports a layout and is reachable.
    pub routable: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryInfo {
    pub slug: String,
    pub title: String,
    pub project_count: usize,
    /// False for the uncategorized sentinel.
    pub is_category: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BreadcrumbInfo {
    pub path: String,
    pub title: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrowseItemInfo {
    /// `folder` or `project`.
    pub kind: String,
    pub path: String,
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub preview: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrowseResponse {
    pub prefix: String,
    pub breadcrumb: Vec<BreadcrumbInfo>,
    pub items: Vec<BrowseItemInfo>,
    pub visible_count: usize,
    pub total: usize,
    pub has_more: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BrowseApiQuery {
    /// Folder prefix; empty for the root.
    pub prefix: Option<String>,
    pub q: Option<String>,
    /// `asc` or `desc`.
    pub sort: Option<String>,
    /// `list` or `tile`.
    pub view: Option<String>,
    pub shown: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Every discovered project, sorted by path", body = [ProjectInfo]),
    )
)]
pub(crate) async fn list_projects(State(state): State<Arc<ServerState>>) -> Json<Vec<ProjectInfo>> {
    let projects = state
        .registry
        .projects()
        .iter()
        .map(|record| map_project(&state, record))
        .collect();
    Json(projects)
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "projects",
    responses(
        (status = 200, description = "Category slugs, uncategorized last", body = [CategoryInfo]),
    )
)]
pub(crate) async fn list_categories(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<CategoryInfo>> {
    let categories = state
        .registry
        .categories()
        .iter()
        .map(|slug| CategoryInfo {
            slug: slug.clone(),
            title: format_title(slug),
            project_count: state.registry.projects_by_category(slug).len(),
            is_category: state.registry.is_category_slug(slug),
        })
        .collect();
    Json(categories)
}

#[utoipa::path(
    get,
    path = "/api/categories/{slug}/projects",
    tag = "projects",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, body = [ProjectInfo]),
        (status = 404, body = ApiErrorResponse),
    )
)]
pub(crate) async fn category_projects(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ProjectInfo>>, ApiError> {
    if !state.registry.categories().iter().any(|category| *category == slug) {
        return Err(ApiError::not_found(format!("unknown category: {slug}")));
    }
    let projects = state
        .registry
        .projects_by_category(&slug)
        .into_iter()
        .map(|record| map_project(&state, record))
        .collect();
    Ok(Json(projects))
}

#[utoipa::path(
    get,
    path = "/api/browse",
    tag = "browse",
    params(BrowseApiQuery),
    responses(
        (status = 200, body = BrowseResponse),
        (status = 400, body = ApiErrorResponse),
        (status = 404, body = ApiErrorResponse),
    ),
    description = "Filtered, sorted window of a folder's immediate children."
)]
pub(crate) async fn browse(
    State(state): State<Arc<ServerState>>,
    query: Result<Query<BrowseApiQuery>, QueryRejection>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let Query(params) = query.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let prefix = params.prefix.as_deref().unwrap_or("").trim_matches('/');
    if !state.registry.is_folder(prefix) {
        return Err(ApiError::not_found(format!("unknown folder: {prefix}")));
    }
    let query = BrowseQuery {
        search: params.q.clone().unwrap_or_default(),
        sort: params.sort.as_deref().map(SortOrder::parse).unwrap_or_default(),
        view: params.view.as_deref().map(ViewMode::parse).unwrap_or_default(),
    };
    let mut context = state.registry.browse_context(prefix, query);
    if let Some(shown) = params.shown {
        context.reveal_to(shown);
    }

    Ok(Json(BrowseResponse {
        prefix: context.prefix().to_string(),
        breadcrumb: state
            .registry
            .breadcrumb(context.prefix())
            .into_iter()
            .map(map_breadcrumb)
            .collect(),
        items: context
            .visible()
            .iter()
            .map(|item| map_item(&state.config, item))
            .collect(),
        visible_count: context.visible_count(),
        total: context.filtered().len(),
        has_more: context.has_more(),
    }))
}

fn map_project(state: &ServerState, record: &ProjectRecord) -> ProjectInfo {
    ProjectInfo {
        path: record.path.clone(),
        name: record.name.clone(),
        category: record.category.clone(),
        category_slug: record.category_slug.clone(),
        title: record.display_title().to_string(),
        description: record.description.clone(),
        preview: record.preview.as_deref().map(|preview| state.config.href(preview)),
        routable: state.registry.routes().contains(&record.path),
    }
}

fn map_item(config: &ShowcaseConfig, item: &BrowseItem) -> BrowseItemInfo {
    let preview = match item {
        BrowseItem::Project(record) => record.preview.as_deref().map(|preview| config.href(preview)),
        BrowseItem::Folder { .. } => None,
    };
    BrowseItemInfo {
        kind: if item.is_folder() { "folder" } else { "project" }.to_string(),
        path: item.path().to_string(),
        name: item.name().to_string(),
        title: item.title(),
        description: item.description().map(str::to_string),
        preview,
    }
}

fn map_breadcrumb(crumb: Breadcrumb) -> BreadcrumbInfo {
    BreadcrumbInfo {
        path: crumb.path,
        title: crumb.title,
    }
}
