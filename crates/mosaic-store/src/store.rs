//! Store trait and error types.
//!
//! [`PageStore`] is the persistence seam of the core: the site layer and
//! collection assembly consume it, external backends implement it. All
//! operations are atomic per entity; a page exclusively owns its blocks,
//! so they load and save together as one [`PageRecord`] and deleting a
//! page deletes its blocks.

use mosaic_blocks::{Block, Page, PageId, PageStatus};

/// A page together with its owned blocks.
///
/// Blocks are stored in no particular order; renderers sort by `position`
/// themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRecord {
    /// The page entity.
    pub page: Page,
    /// Blocks owned by the page.
    pub blocks: Vec<Block>,
}

impl PageRecord {
    /// Create a record for a page with no blocks yet.
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self {
            page,
            blocks: Vec::new(),
        }
    }
}

/// Store failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No page with the given id.
    #[error("page {0} not found")]
    NotFound(PageId),
    /// No page with the given slug.
    #[error("no page with slug {0:?}")]
    SlugNotFound(String),
    /// Version mismatch on save; the caller holds stale data and must
    /// reload before retrying.
    #[error("version conflict on page {page}: expected {expected}, stored {actual}")]
    Conflict {
        /// The page being saved.
        page: PageId,
        /// Version the caller saved against.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },
    /// Another page already uses this slug.
    #[error("slug {0:?} is already taken")]
    SlugTaken(String),
    /// Slug is not URL-safe.
    #[error("slug {0:?} is not URL-safe")]
    InvalidSlug(String),
}

/// Persistence contract for pages and their blocks.
///
/// # Optimistic concurrency
///
/// `save` compares the incoming `page.version` against the stored one and
/// rejects stale writes with [`StoreError::Conflict`]; on success the
/// stored version is bumped. Publishing is a read-modify-write over this
/// contract, so two concurrent publishes of the same page cannot
/// interleave silently — the second writer gets the conflict and retries
/// with fresh data.
pub trait PageStore: Send + Sync {
    /// Load a page with its blocks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no page has this id.
    fn find_by_id(&self, id: PageId) -> Result<PageRecord, StoreError>;

    /// Load a page by slug.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SlugNotFound`] when no page has this slug.
    fn find_by_slug(&self, slug: &str) -> Result<PageRecord, StoreError>;

    /// All pages with the given status, newest first (ties by id).
    fn find_by_status(&self, status: PageStatus) -> Vec<PageRecord>;

    /// All pages with the given status, without their blocks, newest
    /// first (ties by id).
    ///
    /// Listing paths (collection assembly, menus) filter and paginate on
    /// page metadata alone; block data is loaded per page afterwards, so
    /// the cost of a listing stays bounded by the window size, not the
    /// site size.
    fn pages_by_status(&self, status: PageStatus) -> Vec<Page>;

    /// Insert or update a page and its blocks.
    ///
    /// Returns the stored record, whose version has been bumped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] on a stale version,
    /// [`StoreError::SlugTaken`] when another page owns the slug, and
    /// [`StoreError::InvalidSlug`] for a malformed slug.
    fn save(&self, record: PageRecord) -> Result<PageRecord, StoreError>;

    /// Delete a page and its blocks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no page has this id.
    fn delete(&self, id: PageId) -> Result<(), StoreError>;
}
