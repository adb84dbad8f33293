//! HTML rendering for the browse, project and not-found pages.

use registry::{BrowseContext, BrowseItem, BrowseQuery, Breadcrumb, SortOrder, ViewMode};

use crate::config::ShowcaseConfig;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #1a1a1a; }
main { padding: 2rem; max-width: 60rem; margin: 0 auto; }
a { color: #0066cc; text-decoration: none; }
.breadcrumb { display: flex; gap: .5rem; color: #666; margin-bottom: 1rem; }
.toolbar { display: flex; gap: 1rem; align-items: center; margin-bottom: 1.5rem; }
.items { list-style: none; padding: 0; margin: 0; }
.items.view-list .item { margin-bottom: 1rem; }
.items.view-tile { display: grid; grid-template-columns: repeat(auto-fill, minmax(14rem, 1fr)); gap: 1rem; }
.items.view-tile .item { border: 1px solid #e5e5e5; border-radius: .5rem; padding: .75rem; }
.item .title { font-weight: 500; display: block; }
.item .description { margin: .25rem 0 0; color: #666; font-size: .9rem; }
.item img { width: 100%; max-width: 20rem; height: auto; border-radius: .5rem; border: 1px solid #e5e5e5; display: block; margin-bottom: .5rem; }
.empty, .not-found p { color: #666; }
.not-found { text-align: center; }
.not-found h1 { font-size: 4rem; margin: 0; color: #666; }
"#;

// Fetches the next window when the sentinel nears the viewport. The observer
// is disconnected before each fetch and re-attached only if another page exists.
const LOAD_MORE_SCRIPT: &str = r#"
(() => {
  const sentinel = document.getElementById('sentinel');
  const list = document.getElementById('items');
  if (!sentinel || !list) return;
  const observer = new IntersectionObserver(async (entries) => {
    if (!entries.some((entry) => entry.isIntersecting)) return;
    observer.disconnect();
    const response = await fetch(sentinel.dataset.next);
    const template = document.createElement('template');
    template.innerHTML = await response.text();
    template.content.querySelectorAll('li').forEach((item) => list.appendChild(item));
    const next = template.content.getElementById('sentinel');
    if (next) {
      sentinel.dataset.next = next.dataset.next;
      sentinel.querySelector('a').href = next.querySelector('a').href;
      observer.observe(sentinel);
    } else {
      sentinel.remove();
    }
  }, { rootMargin: '200px' });
  observer.observe(sentinel);
})();
"#;

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

/// Browse link carrying the query state; `after` requests a list fragment.
pub fn browse_link(
    config: &ShowcaseConfig,
    prefix: &str,
    query: &BrowseQuery,
    shown: Option<usize>,
    after: Option<usize>,
) -> String {
    let mut params = Vec::new();
    if !query.search.is_empty() {
        params.push(format!("q={}", urlencoding::encode(&query.search)));
    }
    if query.sort != SortOrder::Asc {
        params.push(format!("sort={}", query.sort.as_str()));
    }
    if query.view != ViewMode::List {
        params.push(format!("view={}", query.view.as_str()));
    }
    if let Some(shown) = shown {
        params.push(format!("shown={shown}"));
    }
    if let Some(after) = after {
        params.push(format!("after={after}&fragment=1"));
    }
    let href = config.href(prefix);
    if params.is_empty() {
        href
    } else {
        format!("{href}?{}", params.join("&"))
    }
}

fn render_item(config: &ShowcaseConfig, item: &BrowseItem) -> String {
    let href = escape_html(&config.href(item.path()));
    let title = escape_html(&item.title());
    match item {
        BrowseItem::Folder { .. } => format!(
            "<li class=\"item folder\"><a href=\"{href}\"><span class=\"title\">&#128193; {title}</span></a></li>"
        ),
        BrowseItem::Project(record) => {
            let preview = record
                .preview
                .as_deref()
                .map(|preview| {
                    format!("<img src=\"{}\" alt=\"\">", escape_html(&config.href(preview)))
                })
                .unwrap_or_default();
            let description = record
                .description
                .as_deref()
                .map(|description| {
                    format!("<p class=\"description\">{}</p>", escape_html(description))
                })
                .unwrap_or_default();
            format!(
                "<li class=\"item project\"><a href=\"{href}\">{preview}<span class=\"title\">{title}</span></a>{description}</li>"
            )
        }
    }
}

fn render_sentinel(config: &ShowcaseConfig, context: &BrowseContext) -> String {
    if !context.has_more() {
        return String::new();
    }
    let shown = context.visible_count() + registry::REVEAL_STEP;
    let next = browse_link(
        config,
        context.prefix(),
        context.query(),
        Some(shown),
        Some(context.visible_count()),
    );
    let fallback = browse_link(config, context.prefix(), context.query(), Some(shown), None);
    format!(
        "<div id=\"sentinel\" data-next=\"{}\"><a href=\"{}\">Load more</a></div>",
        escape_html(&next),
        escape_html(&fallback)
    )
}

fn render_breadcrumb(config: &ShowcaseConfig, trail: &[Breadcrumb]) -> String {
    let links: Vec<String> = trail
        .iter()
        .enumerate()
        .map(|(position, crumb)| {
            if position + 1 == trail.len() {
                format!("<span>{}</span>", escape_html(&crumb.title))
            } else {
                format!(
                    "<a href=\"{}\">{}</a>",
                    escape_html(&config.href(&crumb.path)),
                    escape_html(&crumb.title)
                )
            }
        })
        .collect();
    format!("<nav class=\"breadcrumb\">{}</nav>", links.join("<span>/</span>"))
}

fn render_toolbar(config: &ShowcaseConfig, context: &BrowseContext) -> String {
    let query = context.query();
    let prefix = context.prefix();
    let hidden = |name: &str, value: &str| {
        format!("<input type=\"hidden\" name=\"{name}\" value=\"{}\">", escape_html(value))
    };
    let toggled_sort = BrowseQuery {
        sort: query.sort.toggled(),
        ..query.clone()
    };
    let sort_label = match query.sort {
        SortOrder::Asc => "Name A&#8594;Z",
        SortOrder::Desc => "Name Z&#8594;A",
    };
    let view_link = |view: ViewMode, label: &str| {
        let target = BrowseQuery {
            view,
            ..query.clone()
        };
        let href = escape_html(&browse_link(config, prefix, &target, None, None));
        if view == query.view {
            format!("<strong>{label}</strong>")
        } else {
            format!("<a href=\"{href}\">{label}</a>")
        }
    };
    let mut form_state = String::new();
    if query.sort != SortOrder::Asc {
        form_state.push_str(&hidden("sort", query.sort.as_str()));
    }
    if query.view != ViewMode::List {
        form_state.push_str(&hidden("view", query.view.as_str()));
    }
    format!(
        "<div class=\"toolbar\">\
         <form method=\"get\" action=\"{action}\"><input type=\"search\" name=\"q\" value=\"{search}\" placeholder=\"Search projects\">{form_state}<button type=\"submit\">Search</button></form>\
         <a href=\"{sort_href}\" title=\"Toggle sort order\">{sort_label}</a>\
         <span>{list} | {tile}</span></div>",
        action = escape_html(&config.href(prefix)),
        search = escape_html(&query.search),
        sort_href = escape_html(&browse_link(config, prefix, &toggled_sort, None, None)),
        list = view_link(ViewMode::List, "List"),
        tile = view_link(ViewMode::Tile, "Tiles"),
    )
}

/// Full folder listing page.
pub fn browse_page(
    config: &ShowcaseConfig,
    context: &BrowseContext,
    trail: &[Breadcrumb],
    total_projects: usize,
) -> String {
    let heading = trail
        .last()
        .filter(|crumb| !crumb.path.is_empty())
        .map(|crumb| crumb.title.clone())
        .unwrap_or_else(|| "Projects".to_string());

    let listing = if total_projects == 0 {
        "<p class=\"empty\">No projects yet. Add <code>projects/my-name/index.html</code> \
         (plus an optional <code>project.json</code>) to add one.</p>"
            .to_string()
    } else if context.filtered().is_empty() {
        format!(
            "<p class=\"empty\">No matches for &#8220;{}&#8221;.</p>",
            escape_html(context.query().search.trim())
        )
    } else {
        let items: String = context
            .visible()
            .iter()
            .map(|item| render_item(config, item))
            .collect();
        format!(
            "<ul id=\"items\" class=\"items view-{}\">{items}</ul>{}<script>{LOAD_MORE_SCRIPT}</script>",
            context.query().view.as_str(),
            render_sentinel(config, context)
        )
    };

    let body = format!(
        "<main>{}<h1>{}</h1>{}{listing}</main>",
        render_breadcrumb(config, trail),
        escape_html(&heading),
        render_toolbar(config, context)
    );
    document(&heading, &body)
}

/// Items revealed since `after`, followed by the next sentinel if any remain.
pub fn browse_fragment(config: &ShowcaseConfig, context: &BrowseContext, after: usize) -> String {
    let start = after.min(context.visible_count());
    let items: String = context.visible()[start..]
        .iter()
        .map(|item| render_item(config, item))
        .collect();
    format!("<ul>{items}</ul>{}", render_sentinel(config, context))
}

pub fn project_page(title: &str, content: &str) -> String {
    document(title, content)
}

pub fn not_found_page(config: &ShowcaseConfig) -> String {
    let body = format!(
        "<main class=\"not-found\"><h1>404</h1><p>Page not found.</p><a href=\"{}\">Back to home</a></main>",
        escape_html(&config.href(""))
    );
    document("Not found", &body)
}
