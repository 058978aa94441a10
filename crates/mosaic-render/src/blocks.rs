//! Per-kind block rendering.
//!
//! [`render_block`] is a pure function of `(block, context)`: identical
//! input yields byte-identical output. It never fails — schema problems
//! degrade to defaults upstream, and kinds outside the registry render a
//! visible but harmless placeholder so a single bad block cannot take the
//! page down.
//!
//! Every editable leaf node carries a `data-edit-path` attribute holding
//! the field path (`data.cards[2].title`) the inline-edit protocol patches
//! through, and every block wrapper carries `data-block-id`.

use std::fmt::Write;

use mosaic_blocks::{
    Block, BlockData, BlockId, CardsData, CtaData, HeroData, ImageData, QuoteData, RichTextData,
    SpacerData, TextData,
};

use crate::context::RenderContext;
use crate::escape::{escape_attr, escape_html};
use crate::sanitize::{Allowlist, is_safe_url, markdown_to_html, sanitize};

/// Editor-supplied link target, blanked when its scheme is unsafe.
///
/// Scalar link fields bypass the rich-text sanitizer, so they get the
/// same scheme check here before reaching an `href`.
fn safe_href(url: &str) -> &str {
    if is_safe_url(url) { url } else { "" }
}

/// Render one block to an HTML fragment.
#[must_use]
pub fn render_block(block: &Block, ctx: &RenderContext) -> String {
    let mut out = String::new();
    match &block.data {
        BlockData::Hero(d) => hero(&mut out, block.id, d, ctx),
        BlockData::Text(d) => text(&mut out, block.id, d),
        BlockData::RichText(d) => rich_text(&mut out, block.id, d),
        BlockData::Image(d) => image(&mut out, block.id, d, ctx),
        BlockData::Cards(d) => cards(&mut out, block.id, d, ctx),
        BlockData::Quote(d) => quote(&mut out, block.id, d),
        BlockData::Cta(d) => cta(&mut out, block.id, d),
        BlockData::Spacer(d) => spacer(&mut out, block.id, d),
        BlockData::Unknown { kind, .. } => {
            tracing::warn!(block = %block.id, kind = %kind, "unknown block type");
            unknown(&mut out, block.id);
        }
    }
    out
}

fn hero(out: &mut String, id: BlockId, d: &HeroData, ctx: &RenderContext) {
    let background = if d.background_image.is_empty() {
        ctx.hero_fallback()
    } else {
        ctx.image_url(&d.background_image)
    };
    write!(
        out,
        r#"<section class="block block-hero" data-block-id="{id}" style="background-image:url('{}')">"#,
        escape_attr(&background)
    )
    .unwrap();
    write!(
        out,
        r#"<h1 data-edit-path="data.title">{}</h1>"#,
        escape_html(&d.title)
    )
    .unwrap();
    write!(
        out,
        r#"<p data-edit-path="data.text">{}</p>"#,
        escape_html(&d.text)
    )
    .unwrap();
    out.push_str("</section>");
}

fn text(out: &mut String, id: BlockId, d: &TextData) {
    write!(
        out,
        r#"<div class="block block-text" data-block-id="{id}" data-edit-path="data.text">"#
    )
    .unwrap();
    let mut wrote_any = false;
    for paragraph in d.text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        write!(out, "<p>{}</p>", escape_html(paragraph)).unwrap();
        wrote_any = true;
    }
    if !wrote_any {
        out.push_str("<p></p>");
    }
    out.push_str("</div>");
}

fn rich_text(out: &mut String, id: BlockId, d: &RichTextData) {
    // Markdown wins when present; either way the output is sanitized.
    let (path, html) = if d.markdown.is_empty() {
        ("data.html", d.html.clone())
    } else {
        ("data.markdown", markdown_to_html(&d.markdown))
    };
    write!(
        out,
        r#"<div class="block block-richtext" data-block-id="{id}" data-edit-path="{path}">{}</div>"#,
        sanitize(&html, &Allowlist::default())
    )
    .unwrap();
}

fn image(out: &mut String, id: BlockId, d: &ImageData, ctx: &RenderContext) {
    write!(
        out,
        r#"<figure class="block block-image {}" data-block-id="{id}">"#,
        d.alignment.css_class()
    )
    .unwrap();
    write!(
        out,
        r#"<img src="{}" alt="{}" data-edit-path="data.url">"#,
        escape_attr(&ctx.image_url(&d.url)),
        escape_attr(&d.alt)
    )
    .unwrap();
    if !d.caption.is_empty() {
        write!(
            out,
            r#"<figcaption data-edit-path="data.caption">{}</figcaption>"#,
            escape_html(&d.caption)
        )
        .unwrap();
    }
    out.push_str("</figure>");
}

fn cards(out: &mut String, id: BlockId, d: &CardsData, ctx: &RenderContext) {
    write!(
        out,
        r#"<section class="block block-cards" data-block-id="{id}">"#
    )
    .unwrap();
    if !d.heading.is_empty() {
        write!(
            out,
            r#"<h2 data-edit-path="data.heading">{}</h2>"#,
            escape_html(&d.heading)
        )
        .unwrap();
    }
    out.push_str(r#"<div class="card-grid">"#);
    for (index, card) in d.cards.iter().enumerate() {
        out.push_str(r#"<div class="card">"#);
        if !card.image.is_empty() {
            write!(
                out,
                r#"<img src="{}" alt="" data-edit-path="data.cards[{index}].image">"#,
                escape_attr(&ctx.image_url(&card.image))
            )
            .unwrap();
        }
        write!(
            out,
            r#"<h3 data-edit-path="data.cards[{index}].title">{}</h3>"#,
            escape_html(&card.title)
        )
        .unwrap();
        write!(
            out,
            r#"<p data-edit-path="data.cards[{index}].text">{}</p>"#,
            escape_html(&card.text)
        )
        .unwrap();
        if !card.link.is_empty() && is_safe_url(&card.link) {
            write!(
                out,
                r#"<a class="card-link" href="{}">Read more</a>"#,
                escape_attr(&card.link)
            )
            .unwrap();
        }
        out.push_str("</div>");
    }
    out.push_str("</div></section>");
}

fn quote(out: &mut String, id: BlockId, d: &QuoteData) {
    write!(
        out,
        r#"<blockquote class="block block-quote" data-block-id="{id}">"#
    )
    .unwrap();
    write!(
        out,
        r#"<p data-edit-path="data.text">{}</p>"#,
        escape_html(&d.text)
    )
    .unwrap();
    if !d.attribution.is_empty() {
        write!(
            out,
            r#"<cite data-edit-path="data.attribution">{}</cite>"#,
            escape_html(&d.attribution)
        )
        .unwrap();
    }
    out.push_str("</blockquote>");
}

fn cta(out: &mut String, id: BlockId, d: &CtaData) {
    write!(out, r#"<div class="block block-cta" data-block-id="{id}">"#).unwrap();
    if !d.heading.is_empty() {
        write!(
            out,
            r#"<h2 data-edit-path="data.heading">{}</h2>"#,
            escape_html(&d.heading)
        )
        .unwrap();
    }
    if !d.text.is_empty() {
        write!(
            out,
            r#"<p data-edit-path="data.text">{}</p>"#,
            escape_html(&d.text)
        )
        .unwrap();
    }
    write!(
        out,
        r#"<a class="cta-button" href="{}" data-edit-path="data.buttonLabel">{}</a>"#,
        escape_attr(safe_href(&d.button_url)),
        escape_html(&d.button_label)
    )
    .unwrap();
    out.push_str("</div>");
}

fn spacer(out: &mut String, id: BlockId, d: &SpacerData) {
    write!(
        out,
        r#"<div class="block block-spacer" data-block-id="{id}" style="height:{}px" aria-hidden="true"></div>"#,
        d.height
    )
    .unwrap();
}

fn unknown(out: &mut String, id: BlockId) {
    write!(
        out,
        r#"<div class="block block-unknown" data-block-id="{id}">This content block is unavailable.</div>"#
    )
    .unwrap();
}
