use axum::Json;
use utoipa::OpenApi;

use crate::server::api::{
    BreadcrumbInfo, BrowseItemInfo, BrowseResponse, CategoryInfo, ProjectInfo,
};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Showcase API",
        version = "0.1.0",
        description = "Project registry of the showcase site"
    ),
    paths(
        crate::server::api::list_projects,
        crate::server::api::list_categories,
        crate::server::api::category_projects,
        crate::server::api::browse,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Registry
        ProjectInfo,
        CategoryInfo,
        // Browse
        BreadcrumbInfo,
        BrowseItemInfo,
        BrowseResponse,
    )),
    tags(
        (name = "projects", description = "Discovered projects and categories"),
        (name = "browse", description = "Folder listings"),
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
