use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use registry::{BrowseQuery, SortOrder, ViewMode};

use crate::config::ShowcaseConfig;
use crate::render;
use crate::server::ServerState;

/// Browse state carried in the query string. Values are parsed leniently.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub view: Option<String>,
    pub shown: Option<String>,
    pub after: Option<String>,
    pub fragment: Option<String>,
}

impl BrowseParams {
    pub fn query(&self) -> BrowseQuery {
        BrowseQuery {
            search: self.q.clone().unwrap_or_default(),
            sort: self.sort.as_deref().map(SortOrder::parse).unwrap_or_default(),
            view: self.view.as_deref().map(ViewMode::parse).unwrap_or_default(),
        }
    }

    pub fn shown(&self) -> Option<usize> {
        self.shown.as_deref().and_then(|raw| raw.trim().parse().ok())
    }

    pub fn after(&self) -> usize {
        self.after
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.fragment.as_deref(), Some("1" | "true"))
    }
}

/// Serves every request not claimed by a fixed route: project pages first,
/// then folder listings, otherwise the not-found page.
#[tracing::instrument(skip_all, fields(path = %uri.path()))]
pub(crate) async fn dispatch(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
    query: Result<Query<BrowseParams>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("ignoring query string: {}", rejection.body_text());
            BrowseParams::default()
        }
    };
    let Some(relative) = state.config.strip_base(uri.path()) else {
        return not_found(&state.config);
    };
    let Ok(decoded) = urlencoding::decode(relative) else {
        return not_found(&state.config);
    };
    let path = decoded.trim_matches('/');

    if let Some(matched) = state.registry.resolve(path) {
        let title = state
            .registry
            .project_by_path(&matched.node.path)
            .map(|record| record.display_title().to_string())
            .unwrap_or_else(|| matched.node.path.clone());
        return Html(render::project_page(&title, &matched.render())).into_response();
    }

    if state.registry.is_folder(path) {
        return browse(&state, path, &params);
    }

    tracing::debug!("no project or folder at path");
    not_found(&state.config)
}

fn browse(state: &ServerState, prefix: &str, params: &BrowseParams) -> Response {
    let mut context = state.registry.browse_context(prefix, params.query());
    if let Some(shown) = params.shown() {
        context.reveal_to(shown);
    }

    if params.is_fragment() {
        return Html(render::browse_fragment(&state.config, &context, params.after())).into_response();
    }

    let trail = state.registry.breadcrumb(context.prefix());
    Html(render::browse_page(
        &state.config,
        &context,
        &trail,
        state.registry.projects().len(),
    ))
    .into_response()
}

fn not_found(config: &ShowcaseConfig) -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page(config))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_leniently() {
        let params = BrowseParams {
            q: Some("dash".to_string()),
            sort: Some("desc".to_string()),
            view: Some("bogus".to_string()),
            shown: Some("x".to_string()),
            after: Some("12".to_string()),
            fragment: Some("1".to_string()),
        };
        let query = params.query();
        assert_eq!(query.search, "dash");
        assert_eq!(query.sort, SortOrder::Desc);
        assert_eq!(query.view, ViewMode::List);
        assert_eq!(params.shown(), None);
        assert_eq!(params.after(), 12);
        assert!(params.is_fragment());
        assert!(!BrowseParams::default().is_fragment());
    }
}
