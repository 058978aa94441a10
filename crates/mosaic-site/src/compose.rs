//! Full-document composition.
//!
//! Wraps rendered blocks (or an assembled collection listing) in the site
//! chrome: document head with SEO metadata, navigation menu, and footer.
//! Composition is deterministic — the same page, blocks, menu, and context
//! always yield byte-identical HTML, which is what makes the publish cache
//! and the idempotent-publish guarantee possible.

use mosaic_blocks::{Block, Page, sort_for_render};
use mosaic_collections::Assembly;
use mosaic_render::{RenderContext, escape_attr, escape_html, render_block};

/// One navigation menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    /// Display label.
    pub label: String,
    /// Absolute URL of the target page.
    pub url: String,
}

/// Build the navigation menu from published pages.
///
/// Pages with `show_in_menu` are sorted by `menu_order`, ties broken by
/// label. Callers pass the published set; drafts never reach the menu.
/// Only page metadata is consulted, so listing stores need not load
/// block data for this.
#[must_use]
pub fn menu_entries(published: &[Page], ctx: &RenderContext) -> Vec<MenuEntry> {
    let mut entries: Vec<(i32, MenuEntry)> = published
        .iter()
        .filter(|page| page.menu.show_in_menu)
        .map(|page| {
            let entry = MenuEntry {
                label: page.menu_label().to_owned(),
                url: ctx.page_url(&page.slug),
            };
            (page.menu.menu_order, entry)
        })
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.label.cmp(&b.1.label)));
    entries.into_iter().map(|(_, entry)| entry).collect()
}

/// Compose a full HTML document for a block-composed page.
///
/// Blocks are sorted by position before rendering; the input order does
/// not matter. Both the live preview shell and the publish pipeline call
/// this with the same context so output cannot drift between them.
#[must_use]
pub fn compose_page(page: &Page, blocks: &[Block], menu: &[MenuEntry], ctx: &RenderContext) -> String {
    let mut sorted = blocks.to_vec();
    sort_for_render(&mut sorted);

    let mut body = String::new();
    for block in &sorted {
        body.push_str(&render_block(block, ctx));
        body.push('\n');
    }

    compose_document(page, &body, menu, ctx)
}

/// Compose a full HTML document for a collection listing.
///
/// Called per request: the listing depends on the state of other pages and
/// is never cached.
#[must_use]
pub fn compose_listing(
    page: &Page,
    assembly: &Assembly,
    menu: &[MenuEntry],
    ctx: &RenderContext,
) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<h1 class=\"listing-title\">{}</h1>\n",
        escape_html(&page.title)
    ));

    for section in &assembly.sections {
        body.push_str(&format!(
            "<section class=\"listing-section listing-section-{}\">\n",
            escape_attr(&section.name)
        ));
        body.push_str(&format!(
            "<h2>{}</h2>\n",
            escape_html(&section_title(&section.name))
        ));
        body.push_str("<div class=\"card-grid\">\n");
        for item in &section.items {
            body.push_str("<article class=\"card\">\n");
            body.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\">\n",
                escape_attr(&ctx.image_url(&item.image)),
                escape_attr(&item.title)
            ));
            body.push_str(&format!(
                "<h3><a href=\"{}\">{}</a></h3>\n",
                escape_attr(&item.url),
                escape_html(&item.title)
            ));
            if !item.snippet.is_empty() {
                body.push_str(&format!("<p>{}</p>\n", escape_html(&item.snippet)));
            }
            body.push_str(&format!(
                "<a class=\"card-link\" href=\"{}\">Read more</a>\n",
                escape_attr(&item.url)
            ));
            body.push_str("</article>\n");
        }
        body.push_str("</div>\n</section>\n");
    }

    let pagination = &assembly.pagination;
    if pagination.total_pages > 1 {
        body.push_str("<nav class=\"pagination\">\n");
        if pagination.has_prev_page {
            body.push_str(&format!(
                "<a class=\"pagination-prev\" href=\"?page={}\">Previous</a>\n",
                pagination.current_page - 1
            ));
        }
        body.push_str(&format!(
            "<span class=\"pagination-status\">Page {} of {}</span>\n",
            pagination.current_page, pagination.total_pages
        ));
        if pagination.has_next_page {
            body.push_str(&format!(
                "<a class=\"pagination-next\" href=\"?page={}\">Next</a>\n",
                pagination.current_page + 1
            ));
        }
        body.push_str("</nav>\n");
    }

    compose_document(page, &body, menu, ctx)
}

/// Wrap a rendered body in the site chrome.
fn compose_document(page: &Page, body: &str, menu: &[MenuEntry], ctx: &RenderContext) -> String {
    let title = page.seo.title.as_deref().unwrap_or(&page.title);

    let mut html = String::with_capacity(body.len() + 1024);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    if let Some(description) = &page.seo.description {
        html.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_attr(description)
        ));
    }
    if let Some(keywords) = &page.seo.keywords {
        html.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">\n",
            escape_attr(keywords)
        ));
    }
    html.push_str(&format!(
        "<link rel=\"canonical\" href=\"{}\">\n",
        escape_attr(&ctx.page_url(&page.slug))
    ));
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"site-header\">\n<nav class=\"site-nav\">\n<ul>\n");
    for entry in menu {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_attr(&entry.url),
            escape_html(&entry.label)
        ));
    }
    html.push_str("</ul>\n</nav>\n</header>\n");

    html.push_str(&format!(
        "<main class=\"page-content\" data-page-id=\"{}\">\n",
        page.id
    ));
    html.push_str(body);
    html.push_str("</main>\n");

    html.push_str("<footer class=\"site-footer\"><p>Powered by Mosaic</p></footer>\n");
    html.push_str("</body>\n</html>\n");
    html
}

/// Display heading for a section tag: first letter uppercased.
fn section_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
