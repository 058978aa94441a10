//! Rich-text sanitization.
//!
//! Rich-text fields are the single place pre-authored HTML is allowed into
//! rendered output, which makes them the stored-XSS surface of the system.
//! [`sanitize`] enforces a fixed tag/attribute allowlist: `<script>` and
//! `<style>` are dropped with their content, every `on*` attribute is
//! dropped, and URL attributes must carry a safe scheme. Attribute values
//! are re-escaped on emission, so entity-obfuscated payloads
//! (`javascript&colon;...`) come out inert.
//!
//! Markdown-authored rich text goes through [`markdown_to_html`] first and
//! then the sanitizer like any other pre-authored HTML.

use pulldown_cmark::{Options, Parser, html};

use crate::escape::escape_attr;

/// Allowed attributes for one tag.
#[derive(Clone, Copy, Debug)]
pub struct TagRule {
    /// Lowercase tag name.
    pub name: &'static str,
    /// Allowed attribute names, lowercase.
    pub attrs: &'static [&'static str],
}

const fn tag(name: &'static str) -> TagRule {
    TagRule { name, attrs: &[] }
}

static DEFAULT_RULES: [TagRule; 16] = [
    tag("p"),
    tag("br"),
    tag("strong"),
    tag("em"),
    tag("b"),
    tag("i"),
    TagRule {
        name: "a",
        attrs: &["href", "title"],
    },
    tag("ul"),
    tag("ol"),
    tag("li"),
    tag("h2"),
    tag("h3"),
    tag("h4"),
    tag("blockquote"),
    tag("code"),
    tag("pre"),
];

/// Tags with no closing counterpart.
const VOID_TAGS: [&str; 2] = ["br", "hr"];

/// Attributes whose values are URLs and need a scheme check.
const URL_ATTRS: [&str; 2] = ["href", "src"];

/// The fixed tag/attribute allowlist for rich-text sanitization.
///
/// The default set covers the markup a markdown/WYSIWYG source produces:
/// paragraphs, inline emphasis, links, lists, sub-headings, blockquotes
/// and code. Loosening this list widens the stored-XSS surface; treat any
/// change as a security review.
#[derive(Clone, Copy, Debug)]
pub struct Allowlist {
    rules: &'static [TagRule],
}

impl Allowlist {
    /// Build an allowlist from explicit rules.
    #[must_use]
    pub const fn new(rules: &'static [TagRule]) -> Self {
        Self { rules }
    }

    fn rule(&self, name: &str) -> Option<&TagRule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(&DEFAULT_RULES)
    }
}

/// Convert markdown-authored rich text to HTML.
///
/// The output still goes through [`sanitize`]; markdown can embed raw
/// HTML, so conversion alone is not a safety boundary.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// Sanitize pre-authored HTML against an allowlist.
///
/// - Tags outside the allowlist are dropped; their text content survives.
/// - `<script>` and `<style>` are dropped **with** their content.
/// - Allowed tags are re-emitted with only their allowed attributes;
///   `on*` handlers never survive, and URL attributes with unsafe schemes
///   are dropped.
/// - A `<` that does not open a well-formed tag is escaped.
#[must_use]
pub fn sanitize(raw: &str, allowlist: &Allowlist) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'<' {
                i += 1;
            }
            out.push_str(&raw[start..i]);
            continue;
        }

        let Some(parsed) = parse_tag(raw, i) else {
            out.push_str("&lt;");
            i += 1;
            continue;
        };

        if parsed.closing {
            if allowlist.rule(&parsed.name).is_some() && !is_void(&parsed.name) {
                out.push_str("</");
                out.push_str(&parsed.name);
                out.push('>');
            }
            i = parsed.end;
            continue;
        }

        if parsed.name == "script" || parsed.name == "style" {
            i = skip_dropped_element(raw, parsed.end, &parsed.name);
            continue;
        }

        if let Some(rule) = allowlist.rule(&parsed.name) {
            emit_tag(&mut out, &parsed, rule);
        }
        i = parsed.end;
    }

    out
}

fn is_void(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// A parsed (not yet filtered) tag.
struct ParsedTag {
    name: String,
    closing: bool,
    attrs: Vec<(String, String)>,
    /// Byte offset just past the closing `>`.
    end: usize,
}

/// Parse a tag starting at `start` (which must point at `<`).
///
/// Returns `None` when the input is not a well-formed tag — the caller
/// escapes the `<` instead. Comments and doctypes parse as `None` too,
/// which escapes them into visible (harmless) text.
fn parse_tag(raw: &str, start: usize) -> Option<ParsedTag> {
    let bytes = raw.as_bytes();
    let mut i = start + 1;

    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start || !bytes[name_start].is_ascii_alphabetic() {
        return None;
    }
    let name = raw[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        match bytes.get(i) {
            None => return None,
            Some(b'>') => {
                return Some(ParsedTag {
                    name,
                    closing,
                    attrs,
                    end: i + 1,
                });
            }
            Some(_) => {}
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == attr_start {
            // Stray character; skip it rather than loop forever.
            i += 1;
            continue;
        }
        let attr_name = raw[attr_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&q @ (b'"' | b'\'')) => {
                    i += 1;
                    let value_start = i;
                    while i < bytes.len() && bytes[i] != q {
                        i += 1;
                    }
                    if i >= bytes.len() {
                        return None;
                    }
                    let value = raw[value_start..i].to_owned();
                    i += 1;
                    value
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    raw[value_start..i].to_owned()
                }
            }
        } else {
            String::new()
        };

        attrs.push((attr_name, value));
    }
}

/// Skip past the matching close tag of a dropped element, content included.
fn skip_dropped_element(raw: &str, from: usize, name: &str) -> usize {
    let lower = raw.to_ascii_lowercase();
    let close = format!("</{name}");
    match lower[from..].find(&close) {
        Some(offset) => {
            let after = from + offset + close.len();
            match raw[after..].find('>') {
                Some(gt) => after + gt + 1,
                None => raw.len(),
            }
        }
        // Unclosed: drop the rest of the input.
        None => raw.len(),
    }
}

fn emit_tag(out: &mut String, parsed: &ParsedTag, rule: &TagRule) {
    out.push('<');
    out.push_str(&parsed.name);

    for (name, value) in &parsed.attrs {
        if name.starts_with("on") || !rule.attrs.contains(&name.as_str()) {
            continue;
        }
        if URL_ATTRS.contains(&name.as_str()) && !is_safe_url(value) {
            continue;
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }

    out.push('>');
}

/// Check a URL attribute value for a safe scheme.
///
/// Relative URLs and fragment links are safe; absolute URLs must be http,
/// https, or mailto. Control characters and whitespace are ignored during
/// scheme detection because browsers ignore them too.
///
/// The block renderer applies the same check to editor-supplied link
/// fields before emitting them as `href` values.
#[must_use]
pub fn is_safe_url(url: &str) -> bool {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.find(':') {
        None => true,
        Some(colon) => {
            // A colon after a path/query/fragment separator is not a scheme.
            if compact[..colon].contains(['/', '?', '#']) {
                return true;
            }
            ["http", "https", "mailto"].contains(&&compact[..colon])
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn clean(input: &str) -> String {
        sanitize(input, &Allowlist::default())
    }

    #[test]
    fn test_allowed_tags_survive() {
        assert_eq!(
            clean("<p>Hello <strong>world</strong></p>"),
            "<p>Hello <strong>world</strong></p>"
        );
    }

    #[test]
    fn test_script_dropped_with_content() {
        assert_eq!(clean("before<script>alert(1)</script>after"), "beforeafter");
    }

    #[test]
    fn test_script_case_insensitive() {
        assert_eq!(clean("a<SCRIPT>alert(1)</SCRIPT>b"), "ab");
    }

    #[test]
    fn test_unclosed_script_drops_rest() {
        assert_eq!(clean("a<script>alert(1)"), "a");
    }

    #[test]
    fn test_style_dropped_with_content() {
        assert_eq!(clean("<style>body{display:none}</style>text"), "text");
    }

    #[test]
    fn test_unknown_tag_dropped_text_kept() {
        assert_eq!(clean("<div class=\"x\">inside</div>"), "inside");
        assert_eq!(clean("<iframe src=\"https://x\">y</iframe>"), "y");
    }

    #[test]
    fn test_event_handlers_stripped() {
        assert_eq!(
            clean(r#"<p onclick="alert(1)">hi</p>"#),
            "<p>hi</p>"
        );
        // onerror on an allowed tag with an allowed attr alongside
        assert_eq!(
            clean(r#"<a href="/x" onerror="alert(1)">go</a>"#),
            r#"<a href="/x">go</a>"#
        );
    }

    #[test]
    fn test_disallowed_attrs_stripped() {
        assert_eq!(
            clean(r#"<p class="big" style="color:red">hi</p>"#),
            "<p>hi</p>"
        );
    }

    #[test]
    fn test_javascript_href_dropped() {
        assert_eq!(
            clean(r#"<a href="javascript:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        assert_eq!(
            clean(r#"<a href="JaVaScRiPt:alert(1)">x</a>"#),
            "<a>x</a>"
        );
        // Whitespace obfuscation
        assert_eq!(
            clean("<a href=\"java\tscript:alert(1)\">x</a>"),
            "<a>x</a>"
        );
    }

    #[test]
    fn test_safe_hrefs_kept() {
        assert_eq!(
            clean(r#"<a href="https://example.com/a?b=1">x</a>"#),
            r#"<a href="https://example.com/a?b=1">x</a>"#
        );
        assert_eq!(clean(r#"<a href="/about">x</a>"#), r#"<a href="/about">x</a>"#);
        assert_eq!(clean("<a href=\"#top\">x</a>"), "<a href=\"#top\">x</a>");
        assert_eq!(
            clean(r#"<a href="mailto:hi@example.com">x</a>"#),
            r#"<a href="mailto:hi@example.com">x</a>"#
        );
    }

    #[test]
    fn test_data_url_dropped() {
        assert_eq!(
            clean(r#"<a href="data:text/html,<script>x</script>">x</a>"#),
            "<a>x</a>"
        );
    }

    #[test]
    fn test_entity_obfuscated_scheme_neutralized() {
        // The entity is not decoded, and re-escaping keeps it inert.
        assert_eq!(
            clean(r#"<a href="javascript&colon;alert(1)">x</a>"#),
            r#"<a href="javascript&amp;colon;alert(1)">x</a>"#
        );
    }

    #[test]
    fn test_stray_angle_bracket_escaped() {
        assert_eq!(clean("1 < 2"), "1 &lt; 2");
        assert_eq!(clean("a <3 b"), "a &lt;3 b");
    }

    #[test]
    fn test_comment_escaped_not_executed() {
        assert_eq!(clean("<!-- hidden -->"), "&lt;!-- hidden -->");
    }

    #[test]
    fn test_unquoted_attr_value() {
        assert_eq!(clean("<a href=/about>x</a>"), r#"<a href="/about">x</a>"#);
    }

    #[test]
    fn test_br_not_closed() {
        assert_eq!(clean("a<br>b<br/>c"), "a<br>b<br>c");
    }

    #[test]
    fn test_markdown_to_html_basic() {
        let html = markdown_to_html("**bold** and *italic*");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn test_markdown_then_sanitize_strips_raw_html() {
        let html = markdown_to_html("hello <script>alert(1)</script>");
        let safe = clean(&html);
        assert!(!safe.contains("<script"));
        assert!(safe.contains("hello"));
    }
}
