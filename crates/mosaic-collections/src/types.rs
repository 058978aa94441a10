//! Assembly output types.
//!
//! Derived data, never persisted: a collection's membership depends on the
//! mutable state of other pages, so the output is computed fresh per
//! request and serialized straight onto the wire.

use serde::Serialize;

/// One card in a collection listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardItem {
    /// Target page title.
    pub title: String,
    /// Short teaser text.
    pub snippet: String,
    /// Card image URL (not yet environment-normalized).
    pub image: String,
    /// Site-relative URL of the target page.
    pub url: String,
}

/// A named group of cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionGroup {
    /// Section tag, e.g. `articles`.
    pub name: String,
    /// Cards in this section, in assembly order.
    pub items: Vec<CardItem>,
}

/// Pagination summary.
///
/// `has_next_page` / `has_prev_page` are derived from the other fields at
/// assembly time and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Requested page number (1-based).
    pub current_page: u32,
    /// Total pages; at least 1 even when there are no items.
    pub total_pages: u32,
    /// Total matching items before slicing.
    pub total_items: u32,
    /// Effective page size after clamping.
    pub items_per_page: u32,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_prev_page: bool,
}

/// Full assembly result for one request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    /// Section-grouped cards for the requested window.
    pub sections: Vec<SectionGroup>,
    /// Pagination summary.
    pub pagination: Pagination,
}

impl Assembly {
    /// Total cards in this window (across sections).
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}
