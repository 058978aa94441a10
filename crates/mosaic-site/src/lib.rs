//! Site layer for Mosaic: composition, publishing, and serving.
//!
//! Ties the other crates together into the three page lifecycles:
//!
//! - **Compose** ([`compose_page`] / [`compose_listing`]): wrap rendered
//!   blocks or an assembled listing in the site chrome. Deterministic.
//! - **Publish** ([`publish`]): compose once, cache the HTML on the page,
//!   persist with optimistic concurrency. Edits invalidate the cache
//!   ([`save_edit`]) until the page is republished.
//! - **Serve** ([`serve`]): resolve a slug to public HTML — cached pages
//!   verbatim, collections assembled per request, drafts hidden.
//!
//! [`Site`] bundles a store with the render context derived from
//! `mosaic.toml` and exposes the same lifecycle as methods.

mod compose;
mod publish;
mod serve;
mod site;

pub use compose::{MenuEntry, compose_listing, compose_page, menu_entries};
pub use publish::{PublishError, publish, save_edit};
pub use serve::{ListingQuery, ServeError, serve};
pub use site::Site;
