//! Configured site facade.
//!
//! [`Site`] is where `mosaic.toml` turns into runtime values: `base_url`
//! becomes the render context's base, `uploads_prefix` its media
//! resolver, and `hero_fallback` the hero background default. Publish and
//! serve share that one context, so published and previewed output agree
//! on every emitted URL.

use std::sync::Arc;

use mosaic_blocks::PageId;
use mosaic_config::Config;
use mosaic_render::{PrefixResolver, RenderContext};
use mosaic_store::{PageRecord, PageStore, StoreError};

use crate::publish::{self, PublishError};
use crate::serve::{self, ListingQuery, ServeError};

/// A store paired with the render context derived from configuration.
pub struct Site<S> {
    store: S,
    config: Config,
    ctx: RenderContext,
}

impl<S: PageStore> Site<S> {
    /// Build a site from a store and configuration.
    #[must_use]
    pub fn new(store: S, config: Config) -> Self {
        let ctx = RenderContext::new(config.site.base_url.clone())
            .with_media(Arc::new(PrefixResolver::new(
                config.site.uploads_prefix.clone(),
            )))
            .with_hero_fallback(config.site.hero_fallback.clone());
        Self { store, config, ctx }
    }

    /// The render context derived from configuration.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Publish a page with this site's context.
    ///
    /// # Errors
    ///
    /// See [`crate::publish`].
    pub fn publish(&self, id: PageId) -> Result<PageRecord, PublishError> {
        publish::publish(&self.store, id, &self.ctx)
    }

    /// Save an edit without publishing.
    ///
    /// # Errors
    ///
    /// See [`crate::save_edit`].
    pub fn save_edit(&self, record: PageRecord) -> Result<PageRecord, StoreError> {
        publish::save_edit(&self.store, record)
    }

    /// Resolve a slug to public HTML with this site's context and
    /// collection defaults.
    ///
    /// # Errors
    ///
    /// See [`crate::serve`].
    pub fn serve(&self, slug: &str, query: &ListingQuery) -> Result<String, ServeError> {
        serve::serve(&self.store, slug, query, &self.config.collections, &self.ctx)
    }
}
