//! Page and block data model for Mosaic.
//!
//! This crate defines the shared vocabulary both renderers (live preview
//! and publish-time) are driven by:
//!
//! - [`Page`]: the publishable entity with slug, status, SEO fields, menu
//!   placement, and the rendered-HTML cache.
//! - [`Block`]: one typed, positioned unit of page content; its
//!   [`BlockData`] is a tagged union with one variant per kind.
//! - [`BlockKind`]: the closed block-type registry with field schemas and
//!   default-data templates.
//! - [`FieldPath`] / [`apply_patch`]: the inline-edit addressing language
//!   (`data.cards[2].title`) and patch application.
//!
//! Deserialization of block data is permissive by design: missing or
//! malformed fields collapse to defaults and unrecognized kinds are
//! preserved as [`BlockData::Unknown`]. A partially filled block must
//! always render; it never fails the page.

mod block;
mod data;
mod page;
mod path;
mod registry;

pub use block::{Block, BlockId, sort_for_render};
pub use data::{
    Alignment, BlockData, Card, CardsData, CtaData, HeroData, ImageData, QuoteData, RichTextData,
    SpacerData, TextData,
};
pub use page::{
    CollectionConfig, MenuPlacement, Page, PageId, PageKind, PageStatus, SeoFields, is_valid_slug,
};
pub use path::{FieldPath, PatchError, PathError, Segment, apply_patch};
pub use registry::{BlockKind, BlockSchema, FieldKind, FieldSpec};
