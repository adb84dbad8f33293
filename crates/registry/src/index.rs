//! Derived indexes over the project record set: categories, folder
//! children and breadcrumb trails.

use std::collections::BTreeSet;

use crate::parser::compare_names;
use crate::types::{BrowseItem, Breadcrumb, ProjectRecord, UNCATEGORIZED_SLUG};

pub const HOME_TITLE: &str = "Home";
const UNCATEGORIZED_TITLE: &str = "Uncategorized";

/// Distinct category slugs, alphabetical with the uncategorized sentinel last.
pub fn categories_of(records: &[ProjectRecord]) -> Vec<String> {
    let slugs: BTreeSet<&str> = records
        .iter()
        .map(|record| record.category_slug.as_str())
        .collect();
    let mut categories: Vec<String> = slugs.into_iter().map(str::to_string).collect();
    categories.sort_by(|a, b| match (a == UNCATEGORIZED_SLUG, b == UNCATEGORIZED_SLUG) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => compare_names(a, b),
    });
    categories
}

/// Path of `record` relative to `prefix`, or `None` when it is not strictly below it.
fn relative_path<'a>(prefix: &str, record: &'a ProjectRecord) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(record.path.as_str());
    }
    record
        .path
        .strip_prefix(prefix)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
}

fn join_prefix(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}/{segment}")
    }
}

/// Distinct next segments below `prefix` that lead to deeper projects.
///
/// A segment that is itself a project's full path is never a folder.
pub fn child_folders(prefix: &str, records: &[ProjectRecord]) -> Vec<String> {
    let mut folders: Vec<String> = Vec::new();
    for record in records {
        let Some(rest) = relative_path(prefix, record) else {
            continue;
        };
        let Some((segment, _)) = rest.split_once('/') else {
            continue;
        };
        if folders.iter().any(|folder| folder == segment) {
            continue;
        }
        let folder_path = join_prefix(prefix, segment);
        if records.iter().any(|other| other.path == folder_path) {
            continue;
        }
        folders.push(segment.to_string());
    }
    folders
}

/// Records exactly one segment below `prefix`.
pub fn child_projects<'a>(prefix: &str, records: &'a [ProjectRecord]) -> Vec<&'a ProjectRecord> {
    records
        .iter()
        .filter(|record| {
            relative_path(prefix, record).is_some_and(|rest| !rest.contains('/'))
        })
        .collect()
}

/// Immediate children of `prefix`: folders first, then projects.
pub fn children(prefix: &str, records: &[ProjectRecord]) -> Vec<BrowseItem> {
    let folders = child_folders(prefix, records)
        .into_iter()
        .map(|name| BrowseItem::Folder {
            path: join_prefix(prefix, &name),
            name,
        });
    let projects = child_projects(prefix, records)
        .into_iter()
        .cloned()
        .map(BrowseItem::Project);
    folders.chain(projects).collect()
}

/// Whether `prefix` names a folder: some record lives strictly below it
/// and no record sits exactly at it.
pub fn is_folder(prefix: &str, records: &[ProjectRecord]) -> bool {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return true;
    }
    let below = records
        .iter()
        .any(|record| relative_path(prefix, record).is_some());
    below && !records.iter().any(|record| record.path == prefix)
}

/// Breadcrumb trail from the root down to `prefix`.
pub fn breadcrumb(prefix: &str) -> Vec<Breadcrumb> {
    let mut trail = vec![Breadcrumb {
        path: String::new(),
        title: HOME_TITLE.to_string(),
    }];
    let mut current = String::new();
    for segment in prefix.split('/').filter(|segment| !segment.is_empty()) {
        current = join_prefix(&current, segment);
        trail.push(Breadcrumb {
            path: current.clone(),
            title: format_title(segment),
        });
    }
    trail
}

/// Human title for a path segment: dashes become spaces and each word is
/// capitalised.
pub fn format_title(segment: &str) -> String {
    if segment == UNCATEGORIZED_SLUG {
        return UNCATEGORIZED_TITLE.to_string();
    }
    let mut title = String::with_capacity(segment.len());
    let mut previous_is_word = false;
    for ch in segment.chars().map(|ch| if ch == '-' { ' ' } else { ch }) {
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && !previous_is_word {
            title.extend(ch.to_uppercase());
        } else {
            title.push(ch);
        }
        previous_is_word = is_word;
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_project_keys;

    fn records(keys: &[&str]) -> Vec<ProjectRecord> {
        parse_project_keys(keys.iter().copied())
            .into_iter()
            .map(ProjectRecord::from_parsed)
            .collect()
    }

    fn scenario() -> Vec<ProjectRecord> {
        records(&[
            "projects/cta-dashboard/index",
            "projects/reports/q1/index",
            "projects/reports/q2/index",
        ])
    }

    fn paths(projects: &[&ProjectRecord]) -> Vec<String> {
        projects.iter().map(|record| record.path.clone()).collect()
    }

    #[test]
    fn scenario_categories_and_children() {
        let records = scenario();
        assert_eq!(categories_of(&records), vec!["reports", "uncategorized"]);
        assert_eq!(child_folders("", &records), vec!["reports"]);
        assert_eq!(paths(&child_projects("", &records)), vec!["cta-dashboard"]);
        assert_eq!(
            paths(&child_projects("reports", &records)),
            vec!["reports/q1", "reports/q2"]
        );
        assert!(child_folders("reports", &records).is_empty());
    }

    #[test]
    fn uncategorized_is_absent_without_top_level_projects() {
        let records = records(&["projects/b/x/index", "projects/a/y/index"]);
        assert_eq!(categories_of(&records), vec!["a", "b"]);
    }

    #[test]
    fn children_partition_records_under_prefix() {
        let records = records(&[
            "projects/cat/a/b/index",
            "projects/cat/a/c/index",
            "projects/cat/d/index",
            "projects/other/e/index",
            "projects/top/index",
        ]);
        for prefix in ["", "cat", "cat/a", "other"] {
            let items = children(prefix, &records);
            let under: Vec<&ProjectRecord> = records
                .iter()
                .filter(|record| relative_path(prefix, record).is_some())
                .collect();
            for record in &under {
                let owners = items
                    .iter()
                    .filter(|item| {
                        record.path == item.path()
                            || record.path.starts_with(&format!("{}/", item.path()))
                    })
                    .count();
                assert_eq!(owners, 1, "{} under {prefix:?}", record.path);
            }
            for item in &items {
                let rest = if prefix.is_empty() {
                    item.path().to_string()
                } else {
                    item.path()
                        .strip_prefix(&format!("{prefix}/"))
                        .expect("child lives under prefix")
                        .to_string()
                };
                assert!(!rest.contains('/'), "grandchild {} listed", item.path());
            }
        }
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        let records = records(&["projects/report/x/index", "projects/reports/y/index"]);
        assert_eq!(paths(&child_projects("report", &records)), vec!["report/x"]);
    }

    #[test]
    fn folder_detection() {
        let records = scenario();
        assert!(is_folder("", &records));
        assert!(is_folder("reports", &records));
        assert!(is_folder("/reports/", &records));
        assert!(!is_folder("reports/q1", &records));
        assert!(!is_folder("cta-dashboard", &records));
        assert!(!is_folder("missing", &records));
    }

    #[test]
    fn breadcrumb_has_one_entry_per_segment() {
        let trail = breadcrumb("a/b");
        assert_eq!(
            trail,
            vec![
                Breadcrumb { path: String::new(), title: "Home".to_string() },
                Breadcrumb { path: "a".to_string(), title: "A".to_string() },
                Breadcrumb { path: "a/b".to_string(), title: "B".to_string() },
            ]
        );
        assert_eq!(breadcrumb(""), vec![Breadcrumb { path: String::new(), title: "Home".to_string() }]);
    }

    #[test]
    fn format_title_capitalises_words() {
        assert_eq!(format_title("cta-dashboard"), "Cta Dashboard");
        assert_eq!(format_title("q1"), "Q1");
        assert_eq!(format_title("uncategorized"), "Uncategorized");
        assert_eq!(format_title("already Fine"), "Already Fine");
    }
}
