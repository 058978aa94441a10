//! Public serve path.
//!
//! One entry point, [`serve`], resolves a slug to the HTML the public site
//! returns. Published block-composed pages come straight from the
//! rendered-HTML cache, untouched; collection pages are assembled and
//! composed fresh on every request; drafts and invalidated pages are not
//! served at all.

use mosaic_blocks::{PageKind, PageStatus};
use mosaic_collections::{AssembleError, assemble};
use mosaic_config::CollectionsConfig;
use mosaic_render::RenderContext;
use mosaic_store::{PageStore, StoreError};

use crate::compose::{compose_listing, menu_entries};

/// Request parameters for a collection listing.
///
/// Ignored for non-collection pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingQuery {
    /// Section filter; `None` falls back to the collection's configured
    /// section.
    pub section: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Requested page size; `None` uses the configured default.
    pub per_page: Option<u32>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            section: None,
            page: 1,
            per_page: None,
        }
    }
}

/// Serve failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ServeError {
    /// No publicly visible page at this slug.
    #[error("no page at slug {0:?}")]
    NotFound(String),
    /// Collection assembly failure.
    #[error(transparent)]
    Assembly(#[from] AssembleError),
    /// Underlying store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlugNotFound(slug) => Self::NotFound(slug),
            other => Self::Store(other),
        }
    }
}

/// Resolve a slug to public HTML.
///
/// Published block-composed pages return their cached `rendered_html`
/// verbatim — the renderer is never re-invoked per request. Collection
/// pages re-assemble on every request because their content depends on
/// the state of other pages. Drafts, and published pages whose cache was
/// invalidated by an edit, are invisible here.
///
/// # Errors
///
/// Returns [`ServeError::NotFound`] for unknown slugs, drafts, and
/// invalidated pages.
pub fn serve(
    store: &dyn PageStore,
    slug: &str,
    query: &ListingQuery,
    defaults: &CollectionsConfig,
    ctx: &RenderContext,
) -> Result<String, ServeError> {
    let record = store.find_by_slug(slug)?;

    if record.page.status != PageStatus::Published {
        return Err(ServeError::NotFound(slug.to_owned()));
    }

    if record.page.kind == PageKind::Collection {
        let per_page = query
            .per_page
            .unwrap_or(defaults.per_page)
            .min(defaults.max_per_page);
        let assembly = assemble(
            store,
            &record.page,
            query.section.as_deref(),
            query.page,
            per_page,
        )?;

        let published = store.pages_by_status(PageStatus::Published);
        let menu = menu_entries(&published, ctx);
        return Ok(compose_listing(&record.page, &assembly, &menu, ctx));
    }

    match &record.page.rendered_html {
        Some(html) => Ok(html.clone()),
        None => {
            // Published but invalidated by an edit; hidden until republish.
            tracing::debug!(page = %record.page.id, slug, "published page has no cache");
            Err(ServeError::NotFound(slug.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use mosaic_blocks::{Block, BlockData, Page, PageId, TextData};
    use mosaic_store::{MemoryStore, PageRecord};
    use pretty_assertions::assert_eq;

    use crate::publish::{publish, save_edit};

    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new("https://example.com")
    }

    fn defaults() -> CollectionsConfig {
        CollectionsConfig::default()
    }

    fn seed_published(store: &MemoryStore, slug: &str, kind: PageKind) -> PageId {
        let mut record = PageRecord::new(Page::new(slug, slug.to_owned(), kind));
        record.blocks.push(Block::with_data(
            BlockData::Text(TextData {
                text: format!("content of {slug}"),
            }),
            0,
        ));
        let saved = store.save(record).unwrap();
        publish(store, saved.page.id, &ctx()).unwrap().page.id
    }

    #[test]
    fn test_published_page_served_from_cache_verbatim() {
        let store = MemoryStore::new();
        let id = seed_published(&store, "about", PageKind::Regular);
        let cached = store.find_by_id(id).unwrap().page.rendered_html.unwrap();

        let html = serve(&store, "about", &ListingQuery::default(), &defaults(), &ctx()).unwrap();
        assert_eq!(html, cached);
    }

    #[test]
    fn test_unknown_slug_not_found() {
        let store = MemoryStore::new();
        let err = serve(
            &store,
            "missing",
            &ListingQuery::default(),
            &defaults(),
            &ctx(),
        )
        .unwrap_err();
        assert_eq!(err, ServeError::NotFound("missing".to_owned()));
    }

    #[test]
    fn test_draft_not_served() {
        let store = MemoryStore::new();
        store
            .save(PageRecord::new(Page::new("draft", "Draft", PageKind::Regular)))
            .unwrap();

        let err = serve(&store, "draft", &ListingQuery::default(), &defaults(), &ctx()).unwrap_err();
        assert_eq!(err, ServeError::NotFound("draft".to_owned()));
    }

    #[test]
    fn test_edited_page_hidden_until_republish() {
        let store = MemoryStore::new();
        let id = seed_published(&store, "about", PageKind::Regular);

        let mut edited = store.find_by_id(id).unwrap();
        edited.page.title = "Edited".to_owned();
        save_edit(&store, edited).unwrap();

        let err = serve(&store, "about", &ListingQuery::default(), &defaults(), &ctx()).unwrap_err();
        assert_eq!(err, ServeError::NotFound("about".to_owned()));

        publish(&store, id, &ctx()).unwrap();
        let html = serve(&store, "about", &ListingQuery::default(), &defaults(), &ctx()).unwrap();
        assert!(html.contains("Edited"));
    }

    #[test]
    fn test_collection_assembled_per_request() {
        let store = MemoryStore::new();
        seed_published(&store, "blog", PageKind::Collection);

        let before = serve(&store, "blog", &ListingQuery::default(), &defaults(), &ctx()).unwrap();
        assert!(!before.contains("first-post"));

        seed_published(&store, "first-post", PageKind::Article);

        let after = serve(&store, "blog", &ListingQuery::default(), &defaults(), &ctx()).unwrap();
        assert!(after.contains("first-post"));
    }

    #[test]
    fn test_collection_per_page_clamped_to_configured_max() {
        let store = MemoryStore::new();
        seed_published(&store, "blog", PageKind::Collection);

        let query = ListingQuery {
            per_page: Some(10_000),
            ..ListingQuery::default()
        };
        // Must not panic or over-allocate; output is a valid document.
        let html = serve(&store, "blog", &query, &defaults(), &ctx()).unwrap();
        assert!(html.starts_with("<!doctype html>"));
    }
}
