//! Collection assembly.
//!
//! A collection page's content is computed by aggregating other published
//! pages, so it is re-assembled per request and never cached: membership
//! changes whenever any other page's status or metadata changes.
//!
//! Assembly slices the candidate list *before* deriving card data, so the
//! cost of a request is bounded by the page size, not the site size.

use mosaic_blocks::{Block, BlockData, Page, PageId, PageKind, PageStatus, sort_for_render};
use mosaic_store::{PageRecord, PageStore};

use crate::types::{Assembly, CardItem, Pagination, SectionGroup};

/// Hard upper bound on the page size, regardless of what the client asks
/// for.
pub const MAX_PAGE_SIZE: u32 = 48;

/// Default page size when the request doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Placeholder card image when neither an override nor a representative
/// image exists.
pub const DEFAULT_CARD_IMAGE: &str = "/assets/card-default.jpg";

/// Maximum snippet length in characters.
const SNIPPET_MAX_CHARS: usize = 160;

/// Assembly failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The page is not a collection page.
    #[error("page {0} is not a collection page")]
    NotCollection(PageId),
}

/// Section tag of a candidate page, derived from its kind.
///
/// Collection pages are never candidates themselves.
#[must_use]
pub fn page_section(page: &Page) -> Option<&'static str> {
    match page.kind {
        PageKind::Article => Some("articles"),
        PageKind::Regular => Some("pages"),
        PageKind::Collection => None,
    }
}

/// Section tags in fixed listing order.
const SECTION_ORDER: [&str; 2] = ["articles", "pages"];

/// Assemble one listing window for a collection page.
///
/// Candidates are the published pages matching the requested section tag
/// (falling back to the collection's configured section; no section means
/// all candidate sections), excluding the collection page itself. Ordering
/// is creation time descending with ties broken by id — stable across
/// requests. `page` is 1-based; a page beyond the last returns empty
/// sections with `has_next_page = false`, not an error.
///
/// # Errors
///
/// Returns [`AssembleError::NotCollection`] when `collection` is not a
/// collection page.
pub fn assemble(
    store: &dyn PageStore,
    collection: &Page,
    section: Option<&str>,
    page: u32,
    per_page: u32,
) -> Result<Assembly, AssembleError> {
    if collection.kind != PageKind::Collection {
        return Err(AssembleError::NotCollection(collection.id));
    }

    let configured_section = collection
        .collection_config
        .as_ref()
        .and_then(|c| c.section.as_deref());
    let section = section.or(configured_section);

    let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
    let page = page.max(1);

    // Filter and slice on page metadata alone; block data is loaded only
    // for the pages inside the window.
    let candidates: Vec<Page> = store
        .pages_by_status(PageStatus::Published)
        .into_iter()
        .filter(|p| p.id != collection.id)
        .filter(|p| match (page_section(p), section) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(tag), Some(wanted)) => tag == wanted,
        })
        .collect();

    let total_items = u32::try_from(candidates.len()).unwrap_or(u32::MAX);
    let total_pages = total_items.div_ceil(per_page).max(1);

    let start = usize::try_from((page - 1).saturating_mul(per_page)).unwrap_or(usize::MAX);
    let mut cards: Vec<(&'static str, CardItem)> = Vec::new();
    for candidate in candidates
        .iter()
        .skip(start)
        .take(usize::try_from(per_page).unwrap_or(usize::MAX))
    {
        let Ok(record) = store.find_by_id(candidate.id) else {
            tracing::warn!(page = %candidate.id, "candidate page vanished during assembly");
            continue;
        };
        if let Some(tag) = page_section(candidate) {
            cards.push((tag, card_for(&record, collection)));
        }
    }

    let mut sections: Vec<SectionGroup> = Vec::new();
    for tag in SECTION_ORDER {
        let items: Vec<CardItem> = cards
            .iter()
            .filter(|(t, _)| *t == tag)
            .map(|(_, card)| card.clone())
            .collect();
        if !items.is_empty() {
            sections.push(SectionGroup {
                name: tag.to_owned(),
                items,
            });
        }
    }

    tracing::debug!(
        collection = %collection.id,
        section = section.unwrap_or("*"),
        page,
        total_items,
        "collection assembled"
    );

    Ok(Assembly {
        sections,
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: per_page,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        },
    })
}

/// Build the card for one candidate page.
fn card_for(record: &PageRecord, collection: &Page) -> CardItem {
    CardItem {
        title: record.page.title.clone(),
        snippet: snippet_for(record),
        image: card_image_for(record, collection),
        url: format!("/{}", record.page.slug),
    }
}

/// Card image, in priority order: collection override, the page's own
/// representative image, the default placeholder.
fn card_image_for(record: &PageRecord, collection: &Page) -> String {
    if let Some(config) = &collection.collection_config
        && let Some(override_url) = config.card_images.get(&record.page.id)
    {
        return override_url.clone();
    }

    representative_image(&record.blocks).unwrap_or_else(|| DEFAULT_CARD_IMAGE.to_owned())
}

/// First image-bearing block of a page, in render order.
fn representative_image(blocks: &[Block]) -> Option<String> {
    let mut ordered = blocks.to_vec();
    sort_for_render(&mut ordered);

    ordered.iter().find_map(|block| match &block.data {
        BlockData::Hero(d) if !d.background_image.is_empty() => Some(d.background_image.clone()),
        BlockData::Image(d) if !d.url.is_empty() => Some(d.url.clone()),
        _ => None,
    })
}

/// Teaser text: SEO description, else the first text-bearing block,
/// truncated on a character boundary.
fn snippet_for(record: &PageRecord) -> String {
    if let Some(description) = &record.page.seo.description {
        return truncate(description);
    }

    let mut ordered = record.blocks.clone();
    sort_for_render(&mut ordered);

    let text = ordered.iter().find_map(|block| match &block.data {
        BlockData::Text(d) if !d.text.is_empty() => Some(d.text.clone()),
        BlockData::Hero(d) if !d.text.is_empty() => Some(d.text.clone()),
        _ => None,
    });

    text.map(|t| truncate(&t)).unwrap_or_default()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_owned();
    }
    let cut: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use mosaic_blocks::{CollectionConfig, HeroData, ImageData, TextData};
    use mosaic_store::MemoryStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn collection_page() -> Page {
        Page::new("blog", "Blog", PageKind::Collection)
    }

    /// Published article, aged by `days_old` so ordering is deterministic.
    fn article(slug: &str, days_old: i64) -> PageRecord {
        let mut page = Page::new(slug, slug.to_uppercase(), PageKind::Article);
        page.status = PageStatus::Published;
        page.created_at -= TimeDelta::days(days_old);
        PageRecord::new(page)
    }

    fn store_with(records: Vec<PageRecord>) -> MemoryStore {
        let mut store = MemoryStore::new();
        for record in records {
            store = store.with_record(record);
        }
        store
    }

    #[test]
    fn test_not_collection_rejected() {
        let store = MemoryStore::new();
        let page = Page::new("about", "About", PageKind::Regular);

        assert_eq!(
            assemble(&store, &page, None, 1, 12),
            Err(AssembleError::NotCollection(page.id))
        );
    }

    #[test]
    fn test_only_published_matching_pages_included() {
        let mut draft = article("draft", 0);
        draft.page.status = PageStatus::Draft;
        let store = store_with(vec![article("a", 1), article("b", 2), draft]);

        let assembly = assemble(&store, &collection_page(), Some("articles"), 1, 12).unwrap();

        assert_eq!(assembly.item_count(), 2);
        assert_eq!(assembly.pagination.total_items, 2);
    }

    #[test]
    fn test_ordering_newest_first() {
        let store = store_with(vec![article("old", 5), article("new", 1), article("mid", 3)]);

        let assembly = assemble(&store, &collection_page(), Some("articles"), 1, 12).unwrap();

        let urls: Vec<&str> = assembly.sections[0]
            .items
            .iter()
            .map(|i| i.url.as_str())
            .collect();
        assert_eq!(urls, ["/new", "/mid", "/old"]);
    }

    #[test]
    fn test_collection_excludes_itself() {
        let mut coll = collection_page();
        coll.status = PageStatus::Published;
        let store = store_with(vec![PageRecord::new(coll.clone()), article("a", 1)]);

        let assembly = assemble(&store, &coll, None, 1, 12).unwrap();
        assert_eq!(assembly.item_count(), 1);
    }

    #[test]
    fn test_pagination_boundary_beyond_last_page() {
        let store = store_with((0..5_i64).map(|i| article(&format!("a{i}"), i)).collect());

        let assembly = assemble(&store, &collection_page(), Some("articles"), 999, 12).unwrap();

        assert_eq!(assembly.item_count(), 0);
        assert!(assembly.sections.is_empty());
        assert_eq!(assembly.pagination.total_pages, 1);
        assert_eq!(assembly.pagination.total_items, 5);
        assert!(!assembly.pagination.has_next_page);
        assert!(assembly.pagination.has_prev_page);
    }

    #[test]
    fn test_pagination_window_slicing() {
        let store = store_with((0..7_i64).map(|i| article(&format!("a{i}"), i)).collect());

        let first = assemble(&store, &collection_page(), None, 1, 3).unwrap();
        let third = assemble(&store, &collection_page(), None, 3, 3).unwrap();

        assert_eq!(first.item_count(), 3);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_prev_page);

        assert_eq!(third.item_count(), 1);
        assert!(!third.pagination.has_next_page);
        assert!(third.pagination.has_prev_page);
    }

    #[test]
    fn test_per_page_clamped() {
        let store = store_with(vec![article("a", 1)]);

        let assembly = assemble(&store, &collection_page(), None, 1, 10_000).unwrap();
        assert_eq!(assembly.pagination.items_per_page, MAX_PAGE_SIZE);

        let assembly = assemble(&store, &collection_page(), None, 1, 0).unwrap();
        assert_eq!(assembly.pagination.items_per_page, 1);
    }

    #[test]
    fn test_card_image_priority_override_wins() {
        let mut target = article("a", 1);
        target.blocks.push(Block::with_data(
            BlockData::Image(ImageData {
                url: "own.jpg".to_owned(),
                ..ImageData::default()
            }),
            0,
        ));
        let mut coll = collection_page();
        let mut config = CollectionConfig::default();
        config
            .card_images
            .insert(target.page.id, "override.jpg".to_owned());
        coll.collection_config = Some(config);

        let store = store_with(vec![target]);
        let assembly = assemble(&store, &coll, None, 1, 12).unwrap();

        assert_eq!(assembly.sections[0].items[0].image, "override.jpg");
    }

    #[test]
    fn test_card_image_falls_back_to_representative_then_placeholder() {
        let mut with_hero = article("hero", 1);
        with_hero.blocks.push(Block::with_data(
            BlockData::Hero(HeroData {
                background_image: "banner.jpg".to_owned(),
                ..HeroData::default()
            }),
            0,
        ));
        let bare = article("bare", 2);

        let store = store_with(vec![with_hero, bare]);
        let assembly = assemble(&store, &collection_page(), None, 1, 12).unwrap();

        let items = &assembly.sections[0].items;
        assert_eq!(items[0].image, "banner.jpg");
        assert_eq!(items[1].image, DEFAULT_CARD_IMAGE);
    }

    #[test]
    fn test_snippet_prefers_seo_description() {
        let mut target = article("a", 1);
        target.page.seo.description = Some("From SEO".to_owned());
        target.blocks.push(Block::with_data(
            BlockData::Text(TextData {
                text: "From body".to_owned(),
            }),
            0,
        ));

        let store = store_with(vec![target]);
        let assembly = assemble(&store, &collection_page(), None, 1, 12).unwrap();

        assert_eq!(assembly.sections[0].items[0].snippet, "From SEO");
    }

    #[test]
    fn test_snippet_truncated() {
        let mut target = article("a", 1);
        target.blocks.push(Block::with_data(
            BlockData::Text(TextData {
                text: "x".repeat(500),
            }),
            0,
        ));

        let store = store_with(vec![target]);
        let assembly = assemble(&store, &collection_page(), None, 1, 12).unwrap();

        let snippet = &assembly.sections[0].items[0].snippet;
        assert!(snippet.chars().count() <= SNIPPET_MAX_CHARS + 1);
        assert!(snippet.ends_with('…'));
    }

    #[test]
    fn test_sections_grouped_and_ordered() {
        let mut regular = article("about", 1);
        regular.page.kind = PageKind::Regular;
        let store = store_with(vec![regular, article("post", 2)]);

        let assembly = assemble(&store, &collection_page(), None, 1, 12).unwrap();

        let names: Vec<&str> = assembly.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["articles", "pages"]);
    }

    #[test]
    fn test_configured_section_used_when_request_has_none() {
        let mut coll = collection_page();
        coll.collection_config = Some(CollectionConfig {
            section: Some("articles".to_owned()),
            ..CollectionConfig::default()
        });
        let mut regular = article("about", 1);
        regular.page.kind = PageKind::Regular;
        let store = store_with(vec![regular, article("post", 2)]);

        let assembly = assemble(&store, &coll, None, 1, 12).unwrap();

        assert_eq!(assembly.sections.len(), 1);
        assert_eq!(assembly.sections[0].name, "articles");
    }
}
