//! Collection assembly for Mosaic.
//!
//! A collection page aggregates other published pages into section-grouped
//! card listings with pagination. Unlike block-composed pages, a
//! collection's content depends on the mutable state of *other* pages, so
//! it is assembled fresh per request and deliberately never cached.
//!
//! [`assemble`] is the single entry point; [`Assembly`] is the derived,
//! wire-serializable output.

mod assemble;
mod types;

pub use assemble::{
    AssembleError, DEFAULT_CARD_IMAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, assemble, page_section,
};
pub use types::{Assembly, CardItem, Pagination, SectionGroup};
