//! Publish pipeline and draft editing.
//!
//! Publishing renders a page exactly once and stores the result in
//! `page.rendered_html`; the public serve path then returns that HTML
//! verbatim. Editing a published page invalidates the cache explicitly,
//! so stale content is never served — the page drops off the public site
//! until it is republished.
//!
//! All writes go through [`PageStore::save`], whose version
//! compare-and-swap turns concurrent publishes of the same page into a
//! [`PublishError::Conflict`] for the second writer.

use chrono::Utc;
use mosaic_blocks::{Page, PageId, PageKind, PageStatus};
use mosaic_render::RenderContext;
use mosaic_store::{PageRecord, PageStore, StoreError};

use crate::compose::{compose_page, menu_entries};

/// Publish failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PublishError {
    /// Another writer saved the page first; reload and retry.
    #[error("publish lost a concurrent update on page {page}: expected version {expected}, stored {actual}")]
    Conflict {
        /// The page being published.
        page: PageId,
        /// Version the publish ran against.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },
    /// Underlying store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PublishError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict {
                page,
                expected,
                actual,
            } => Self::Conflict {
                page,
                expected,
                actual,
            },
            other => Self::Store(other),
        }
    }
}

/// Publish a page: render once, cache the HTML, flip to published.
///
/// Block-composed pages get their full document composed here and stored
/// in `rendered_html`. Collection pages flip to published without a cache
/// — their content depends on other pages and is assembled per request.
///
/// The navigation menu baked into the document reflects the published set
/// at publish time, including the page being published; menus refresh on
/// republish.
///
/// # Errors
///
/// Returns [`PublishError::Conflict`] when a concurrent writer saved the
/// page first, and [`PublishError::Store`] for other store failures.
pub fn publish(
    store: &dyn PageStore,
    id: PageId,
    ctx: &RenderContext,
) -> Result<PageRecord, PublishError> {
    let mut record = store.find_by_id(id)?;
    let now = Utc::now();

    record.page.status = PageStatus::Published;
    record.page.published_at = Some(now);
    record.page.updated_at = now;

    if record.page.kind == PageKind::Collection {
        record.page.rendered_html = None;
    } else {
        // Menu from the published set, with this page's fresh state in
        // place of any stored copy of itself.
        let mut published: Vec<Page> = store
            .pages_by_status(PageStatus::Published)
            .into_iter()
            .filter(|other| other.id != id)
            .collect();
        published.push(record.page.clone());
        let menu = menu_entries(&published, ctx);

        let html = compose_page(&record.page, &record.blocks, &menu, ctx);
        record.page.rendered_html = Some(html);
    }

    let saved = store.save(record)?;
    tracing::info!(page = %saved.page.id, slug = %saved.page.slug, "published page");
    Ok(saved)
}

/// Save an edit to a page without publishing it.
///
/// Bumps `updated_at` and clears any cached HTML: an edited published page
/// stays published but is not servable until republished, which is what
/// keeps the public cache from ever going stale.
///
/// # Errors
///
/// Propagates [`StoreError`] from the save, including version conflicts.
pub fn save_edit(store: &dyn PageStore, mut record: PageRecord) -> Result<PageRecord, StoreError> {
    record.page.updated_at = Utc::now();
    record.page.rendered_html = None;
    store.save(record)
}
