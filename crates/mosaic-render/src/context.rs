//! Render context and media URL resolution.
//!
//! Both execution contexts — the live preview and the publish-time
//! renderer — drive the same block renderer with an explicit
//! [`RenderContext`] value instead of reading ambient environment state.
//! Previews and published output must match in every emitted link target,
//! so the context carries the one environment-dependent piece: how a
//! relative upload reference becomes an absolute URL.

use std::sync::Arc;

/// Resolves a relative upload reference to a servable absolute URL.
///
/// Implemented by the media-storage layer; the renderer never touches the
/// filesystem itself.
pub trait MediaResolver: Send + Sync {
    /// Resolve a relative upload reference (e.g. `2024/team.jpg`).
    fn resolve(&self, reference: &str) -> String;
}

/// Prefix-joining resolver: `{prefix}/{reference}`.
#[derive(Clone, Debug)]
pub struct PrefixResolver {
    prefix: String,
}

impl PrefixResolver {
    /// Create a resolver with the given URL prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        while prefix.ends_with('/') {
            prefix.pop();
        }
        Self { prefix }
    }
}

impl MediaResolver for PrefixResolver {
    fn resolve(&self, reference: &str) -> String {
        format!("{}/{}", self.prefix, reference.trim_start_matches('/'))
    }
}

/// Fallback hero background used when a hero block has no image set.
const DEFAULT_HERO_FALLBACK: &str = "/assets/hero-default.jpg";

/// Explicit per-render environment: base URL, media resolution, fallbacks.
///
/// Cheap to clone; the media resolver is shared.
#[derive(Clone)]
pub struct RenderContext {
    base_url: String,
    media: Arc<dyn MediaResolver>,
    hero_fallback: String,
}

impl RenderContext {
    /// Create a context for the given site base URL.
    ///
    /// Media resolution defaults to `{base_url}/uploads`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        let media = Arc::new(PrefixResolver::new(format!("{base_url}/uploads")));
        Self {
            base_url,
            media,
            hero_fallback: DEFAULT_HERO_FALLBACK.to_owned(),
        }
    }

    /// Replace the media resolver.
    #[must_use]
    pub fn with_media(mut self, media: Arc<dyn MediaResolver>) -> Self {
        self.media = media;
        self
    }

    /// Replace the hero fallback background image.
    #[must_use]
    pub fn with_hero_fallback(mut self, url: impl Into<String>) -> Self {
        self.hero_fallback = url.into();
        self
    }

    /// Site base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Hero fallback background URL, already environment-correct.
    #[must_use]
    pub fn hero_fallback(&self) -> String {
        self.image_url(&self.hero_fallback)
    }

    /// Normalize an image URL for emission.
    ///
    /// Absolute URLs (scheme, protocol-relative, or site-absolute paths
    /// under the base) pass through unchanged; relative upload references
    /// go through the media resolver. Both renderers apply this rewrite
    /// identically.
    #[must_use]
    pub fn image_url(&self, url: &str) -> String {
        if url.is_empty() || is_absolute_url(url) {
            url.to_owned()
        } else {
            self.media.resolve(url)
        }
    }

    /// Absolute public URL for a page slug.
    #[must_use]
    pub fn page_url(&self, slug: &str) -> String {
        if slug.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{slug}", self.base_url)
        }
    }
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with('/')
        || url.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_relative_upload_rewritten() {
        let ctx = RenderContext::new("https://example.com");
        assert_eq!(
            ctx.image_url("2024/team.jpg"),
            "https://example.com/uploads/2024/team.jpg"
        );
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let ctx = RenderContext::new("https://example.com");
        assert_eq!(ctx.image_url("https://cdn.test/a.png"), "https://cdn.test/a.png");
        assert_eq!(ctx.image_url("//cdn.test/a.png"), "//cdn.test/a.png");
        assert_eq!(ctx.image_url("/assets/logo.svg"), "/assets/logo.svg");
        assert_eq!(ctx.image_url(""), "");
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let ctx = RenderContext::new("https://example.com///");
        assert_eq!(ctx.base_url(), "https://example.com");
        assert_eq!(
            ctx.image_url("a.png"),
            "https://example.com/uploads/a.png"
        );
    }

    #[test]
    fn test_custom_media_resolver() {
        struct CdnResolver;
        impl MediaResolver for CdnResolver {
            fn resolve(&self, reference: &str) -> String {
                format!("https://cdn.test/{reference}")
            }
        }

        let ctx = RenderContext::new("https://example.com").with_media(Arc::new(CdnResolver));
        assert_eq!(ctx.image_url("a.png"), "https://cdn.test/a.png");
    }

    #[test]
    fn test_page_url() {
        let ctx = RenderContext::new("https://example.com");
        assert_eq!(ctx.page_url("about"), "https://example.com/about");
        assert_eq!(ctx.page_url(""), "https://example.com/");
    }

    #[test]
    fn test_hero_fallback_default() {
        let ctx = RenderContext::new("https://example.com");
        assert_eq!(ctx.hero_fallback(), "/assets/hero-default.jpg");
    }

    #[test]
    fn test_hero_fallback_relative_resolved() {
        let ctx = RenderContext::new("https://example.com").with_hero_fallback("hero.jpg");
        assert_eq!(
            ctx.hero_fallback(),
            "https://example.com/uploads/hero.jpg"
        );
    }
}
