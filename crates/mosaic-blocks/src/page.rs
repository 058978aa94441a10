//! Page entity and related value types.
//!
//! A [`Page`] is the unit of publishing: it carries identity, slug, status,
//! SEO fields, menu placement, and (for published non-collection pages) the
//! cached rendered HTML. Blocks are owned by the page but stored alongside
//! it, not inside it — see [`crate::Block`].

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque page identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (e.g., one read from storage).
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Publication status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    /// Not publicly visible.
    #[default]
    Draft,
    /// Publicly served from the rendered-HTML cache.
    Published,
}

/// Page kind, which decides the rendering branch.
///
/// Collection pages skip the block renderer entirely; their content is
/// assembled from other published pages at request time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Standard block-composed page.
    #[default]
    Regular,
    /// Block-composed page that is also a collection candidate.
    Article,
    /// Aggregates other published pages into a card listing.
    Collection,
}

/// Optional SEO metadata.
///
/// All fields are optional; `None` means "fall back to the page title /
/// emit nothing".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoFields {
    /// `<title>` override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Meta description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Meta keywords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl SeoFields {
    /// True when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.keywords.is_none()
    }
}

/// Menu placement for site navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPlacement {
    /// Whether the page appears in the navigation menu.
    #[serde(default)]
    pub show_in_menu: bool,
    /// Sort key within the menu (lower first).
    #[serde(default)]
    pub menu_order: i32,
    /// Menu label override; falls back to the page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_title: Option<String>,
}

/// Per-collection configuration, present only on collection pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionConfig {
    /// Default section tag when a request doesn't specify one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Card-image overrides keyed by target page id.
    ///
    /// Takes priority over the target page's own representative image.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub card_images: HashMap<PageId, String>,
}

/// A page: identity, metadata, publish state, and the rendered-HTML cache.
///
/// `rendered_html` is authoritative for public serving of published
/// non-collection pages. Every edit to a published page clears it, so a
/// stale cache is never served — editors must republish to go live again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Opaque identity.
    pub id: PageId,
    /// Unique URL-safe slug.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Publication status.
    #[serde(default)]
    pub status: PageStatus,
    /// Page kind (rendering branch).
    #[serde(default, rename = "type")]
    pub kind: PageKind,
    /// SEO metadata.
    #[serde(default, skip_serializing_if = "SeoFields::is_empty")]
    pub seo: SeoFields,
    /// Menu placement.
    #[serde(default)]
    pub menu: MenuPlacement,
    /// Rendered-HTML cache; `Some` only after a publish that no edit has
    /// invalidated since.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_html: Option<String>,
    /// Collection configuration; `Some` only when `kind == Collection`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_config: Option<CollectionConfig>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last publish time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency version; bumped by the store on every save.
    #[serde(default)]
    pub version: u64,
}

impl Page {
    /// Create a new draft page.
    #[must_use]
    pub fn new(slug: impl Into<String>, title: impl Into<String>, kind: PageKind) -> Self {
        let now = Utc::now();
        Self {
            id: PageId::new(),
            slug: slug.into(),
            title: title.into(),
            status: PageStatus::Draft,
            kind,
            seo: SeoFields::default(),
            menu: MenuPlacement::default(),
            rendered_html: None,
            collection_config: None,
            created_at: now,
            updated_at: now,
            published_at: None,
            version: 0,
        }
    }

    /// True when the page can be served from its rendered-HTML cache.
    #[must_use]
    pub fn is_cache_servable(&self) -> bool {
        self.status == PageStatus::Published
            && self.kind != PageKind::Collection
            && self.rendered_html.is_some()
    }

    /// Menu label: `menu_title` override or the page title.
    #[must_use]
    pub fn menu_label(&self) -> &str {
        self.menu.menu_title.as_deref().unwrap_or(&self.title)
    }
}

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex is valid"));

/// Check whether a slug is URL-safe.
///
/// Slugs are lowercase alphanumeric runs joined by single hyphens, with no
/// leading or trailing hyphen. The empty string is reserved for the home
/// page and is accepted.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    slug.is_empty() || SLUG_RE.is_match(slug)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_page_is_draft() {
        let page = Page::new("about", "About Us", PageKind::Regular);

        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(page.version, 0);
        assert!(page.rendered_html.is_none());
        assert!(page.published_at.is_none());
    }

    #[test]
    fn test_cache_servable_requires_published_and_html() {
        let mut page = Page::new("about", "About", PageKind::Regular);
        assert!(!page.is_cache_servable());

        page.status = PageStatus::Published;
        assert!(!page.is_cache_servable());

        page.rendered_html = Some("<html></html>".to_owned());
        assert!(page.is_cache_servable());
    }

    #[test]
    fn test_collection_pages_never_cache_servable() {
        let mut page = Page::new("blog", "Blog", PageKind::Collection);
        page.status = PageStatus::Published;
        page.rendered_html = Some("<html></html>".to_owned());

        assert!(!page.is_cache_servable());
    }

    #[test]
    fn test_menu_label_fallback() {
        let mut page = Page::new("about", "About Us", PageKind::Regular);
        assert_eq!(page.menu_label(), "About Us");

        page.menu.menu_title = Some("About".to_owned());
        assert_eq!(page.menu_label(), "About");
    }

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("about"));
        assert!(is_valid_slug("about-us"));
        assert!(is_valid_slug("guide-2024"));
        assert!(is_valid_slug(""));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug("About"));
        assert!(!is_valid_slug("-about"));
        assert!(!is_valid_slug("about-"));
        assert!(!is_valid_slug("about--us"));
        assert!(!is_valid_slug("about us"));
        assert!(!is_valid_slug("about/us"));
    }

    #[test]
    fn test_page_serde_round_trip() {
        let mut page = Page::new("about", "About", PageKind::Article);
        page.seo.description = Some("An about page".to_owned());
        page.menu.show_in_menu = true;

        let json = serde_json::to_string(&page).unwrap();
        let back: Page = serde_json::from_str(&json).unwrap();

        assert_eq!(page, back);
    }

    #[test]
    fn test_page_kind_wire_name_is_type() {
        let page = Page::new("blog", "Blog", PageKind::Collection);
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["type"], "collection");
        assert_eq!(value["status"], "draft");
    }
}
