//! Deterministic block-to-HTML rendering for Mosaic.
//!
//! One renderer serves both execution contexts: the live client preview
//! and the publish-time renderer drive [`render_block`] with the same
//! block vocabulary and an explicit [`RenderContext`], so previewed and
//! published output cannot drift.
//!
//! # Safety model
//!
//! - Scalar text fields are HTML-escaped ([`escape_html`] / [`escape_attr`]).
//! - Rich-text fields pass through the allowlist [`sanitize`]r — the only
//!   path where authored HTML reaches output.
//! - Image URLs are normalized through the context's [`MediaResolver`] so
//!   both contexts emit identical link targets.

mod blocks;
mod context;
mod escape;
mod sanitize;

pub use blocks::render_block;
pub use context::{MediaResolver, PrefixResolver, RenderContext};
pub use escape::{escape_attr, escape_html};
pub use sanitize::{Allowlist, TagRule, is_safe_url, markdown_to_html, sanitize};
