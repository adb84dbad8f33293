//! Filter, sort and incremental-reveal pagination over a folder listing.

use serde::{Deserialize, Serialize};

use crate::index::children;
use crate::parser::compare_names;
use crate::proximity::ProximityObserver;
use crate::types::{BrowseItem, ProjectRecord, SortOrder, ViewMode};

/// Initial number of visible items after any reset.
pub const PAGE_SIZE: usize = 12;

/// Items added by each reveal.
pub const REVEAL_STEP: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub view: ViewMode,
}

impl BrowseQuery {
    pub fn new(search: impl Into<String>, sort: SortOrder) -> Self {
        Self {
            search: search.into(),
            sort,
            view: ViewMode::default(),
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Keeps items whose name, title or (projects only) description contains `search`.
pub fn filter_items(items: Vec<BrowseItem>, search: &str) -> Vec<BrowseItem> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            contains_folded(item.name(), &needle)
                || contains_folded(&item.title(), &needle)
                || item
                    .description()
                    .is_some_and(|description| contains_folded(description, &needle))
        })
        .collect()
}

pub fn sort_items(items: &mut [BrowseItem], sort: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = compare_names(a.name(), b.name()).then_with(|| a.path().cmp(b.path()));
        match sort {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Children of `prefix`, filtered and sorted per `query`.
pub fn browse_items(prefix: &str, records: &[ProjectRecord], query: &BrowseQuery) -> Vec<BrowseItem> {
    let mut items = filter_items(children(prefix, records), &query.search);
    sort_items(&mut items, query.sort);
    items
}

/// Browsing state for one folder view.
///
/// Every change to the prefix, search text or sort order recomputes the
/// filtered list, resets the visible window and moves the proximity
/// observer to the new list generation.
#[derive(Debug)]
pub struct BrowseContext {
    prefix: String,
    query: BrowseQuery,
    filtered: Vec<BrowseItem>,
    visible_count: usize,
    generation: u64,
    observer: ProximityObserver,
}

impl BrowseContext {
    pub fn new(records: &[ProjectRecord], prefix: impl Into<String>, query: BrowseQuery) -> Self {
        let mut context = Self {
            prefix: normalize_prefix(&prefix.into()),
            query,
            filtered: Vec::new(),
            visible_count: 0,
            generation: 0,
            observer: ProximityObserver::new(),
        };
        context.recompute(records);
        context
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn query(&self) -> &BrowseQuery {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn filtered(&self) -> &[BrowseItem] {
        &self.filtered
    }

    pub fn visible(&self) -> &[BrowseItem] {
        &self.filtered[..self.visible_count]
    }

    pub fn has_more(&self) -> bool {
        self.visible_count < self.filtered.len()
    }

    pub fn set_prefix(&mut self, records: &[ProjectRecord], prefix: &str) {
        let prefix = normalize_prefix(prefix);
        if prefix != self.prefix {
            self.prefix = prefix;
            self.recompute(records);
        }
    }

    pub fn set_search(&mut self, records: &[ProjectRecord], search: impl Into<String>) {
        let search = search.into();
        if search != self.query.search {
            self.query.search = search;
            self.recompute(records);
        }
    }

    pub fn set_sort(&mut self, records: &[ProjectRecord], sort: SortOrder) {
        if sort != self.query.sort {
            self.query.sort = sort;
            self.recompute(records);
        }
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.query.view = view;
    }

    /// Shows the next [`REVEAL_STEP`] items; returns `false` once everything is visible.
    pub fn reveal_more(&mut self) -> bool {
        if !self.has_more() {
            return false;
        }
        self.visible_count = (self.visible_count + REVEAL_STEP).min(self.filtered.len());
        true
    }

    /// Restores a previously revealed window, clamped to the list.
    pub fn reveal_to(&mut self, count: usize) {
        let floor = PAGE_SIZE.min(self.filtered.len());
        self.visible_count = count.clamp(floor, self.filtered.len());
    }

    /// Sentinel proximity notification for list `generation`.
    pub fn on_proximity(&mut self, generation: u64, in_view: bool) -> bool {
        if self.observer.signal(generation, in_view) {
            return self.reveal_more();
        }
        false
    }

    /// Stops reacting to proximity signals until the list changes again.
    pub fn unobserve(&mut self) {
        self.observer.detach();
    }

    fn recompute(&mut self, records: &[ProjectRecord]) {
        self.filtered = browse_items(&self.prefix, records, &self.query);
        self.visible_count = PAGE_SIZE.min(self.filtered.len());
        self.generation += 1;
        self.observer.attach(self.generation);
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_matches('/').to_string()
}
