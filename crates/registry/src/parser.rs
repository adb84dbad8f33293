//! Discovery-key parsing.
//!
//! A discovery key has the shape `projects/<segment>+/index`. The first
//! segment is the category unless it is the only one; everything after the
//! category forms the project name.

use std::cmp::Ordering;

use crate::types::{ParsedProject, PROJECTS_ROOT};

const KEY_SUFFIX: &str = "/index";

/// Parses a discovery key, returning `None` for keys of any other shape.
pub fn parse_project_key(key: &str) -> Option<ParsedProject> {
    let normalized = key
        .strip_prefix(PROJECTS_ROOT)?
        .strip_prefix('/')?
        .strip_suffix(KEY_SUFFIX)?;
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }

    match parts.as_slice() {
        [single] => Some(ParsedProject {
            category: None,
            name: single.to_string(),
            path: single.to_string(),
        }),
        [category, rest @ ..] => {
            let name = rest.join("/");
            Some(ParsedProject {
                category: Some(category.to_string()),
                path: format!("{category}/{name}"),
                name,
            })
        }
        [] => None,
    }
}

/// Parses every key, drops malformed ones and sorts the result by path.
pub fn parse_project_keys<'a, I>(keys: I) -> Vec<ParsedProject>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed: Vec<ParsedProject> = keys
        .into_iter()
        .filter_map(|key| {
            let project = parse_project_key(key);
            if project.is_none() {
                tracing::debug!("dropping malformed discovery key: {key}");
            }
            project
        })
        .collect();
    parsed.sort_by(|a, b| compare_names(&a.path, &b.path));
    parsed
}

/// Case-insensitive ordering with a case-sensitive tiebreak so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
