//! Typed block data, one variant per block kind.
//!
//! The wire form is `{ "type": "...", "data": { ... } }`. Deserialization is
//! deliberately permissive: every variant field has a default, a malformed
//! `data` object collapses to the variant's defaults, and a kind outside the
//! registry round-trips through [`BlockData::Unknown`] instead of failing.
//! Partially filled blocks must always render; they never poison the page.

use serde::de::Error as DeError;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::registry::BlockKind;

/// Image alignment variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Float left with text wrap.
    Left,
    /// Centered at content width.
    #[default]
    Center,
    /// Float right with text wrap.
    Right,
    /// Full content-column width.
    Full,
}

impl Alignment {
    /// CSS class suffix for this alignment.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Left => "align-left",
            Self::Center => "align-center",
            Self::Right => "align-right",
            Self::Full => "align-full",
        }
    }
}

/// Hero section: large heading, intro text, optional background image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroData {
    /// Main heading.
    pub title: String,
    /// Intro paragraph.
    pub text: String,
    /// Background image URL; empty means the built-in fallback.
    pub background_image: String,
}

/// Plain text block; paragraphs separated by blank lines.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextData {
    /// Raw text, escaped on render.
    pub text: String,
}

/// Rich text block.
///
/// When `markdown` is non-empty it is the source of truth and is converted
/// to HTML at render time; otherwise `html` (pre-authored WYSIWYG output)
/// is used. Either way the result passes through the sanitizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RichTextData {
    /// Pre-authored HTML.
    pub html: String,
    /// Markdown source; wins over `html` when non-empty.
    pub markdown: String,
}

/// Image block with alignment variants.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageData {
    /// Image URL (relative upload reference or absolute).
    pub url: String,
    /// Alt text.
    pub alt: String,
    /// Optional visible caption.
    pub caption: String,
    /// Alignment variant.
    pub alignment: Alignment,
}

/// One card inside a [`CardsData`] grid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    /// Card title.
    pub title: String,
    /// Card body text.
    pub text: String,
    /// Card image URL.
    pub image: String,
    /// Optional link target.
    pub link: String,
}

/// Card grid block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardsData {
    /// Optional grid heading.
    pub heading: String,
    /// Ordered cards.
    pub cards: Vec<Card>,
}

/// Pull quote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteData {
    /// Quoted text.
    pub text: String,
    /// Attribution line.
    pub attribution: String,
}

/// Call-to-action button with optional heading and text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaData {
    /// Optional heading above the button.
    pub heading: String,
    /// Optional supporting text.
    pub text: String,
    /// Button label.
    pub button_label: String,
    /// Button target URL.
    pub button_url: String,
}

const DEFAULT_SPACER_HEIGHT: u32 = 40;

/// Vertical spacer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerData {
    /// Height in pixels.
    pub height: u32,
}

impl Default for SpacerData {
    fn default() -> Self {
        Self {
            height: DEFAULT_SPACER_HEIGHT,
        }
    }
}

/// Typed block data, tagged by kind on the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockData {
    /// Hero section.
    Hero(HeroData),
    /// Plain text.
    Text(TextData),
    /// Rich text (sanitized HTML or markdown).
    RichText(RichTextData),
    /// Image with alignment.
    Image(ImageData),
    /// Card grid.
    Cards(CardsData),
    /// Pull quote.
    Quote(QuoteData),
    /// Call-to-action button.
    Cta(CtaData),
    /// Vertical spacer.
    Spacer(SpacerData),
    /// Kind outside the registry; preserved verbatim and rendered as a
    /// placeholder.
    Unknown {
        /// The unrecognized kind string.
        kind: String,
        /// Raw data, preserved for round-tripping.
        data: Value,
    },
}

impl BlockData {
    /// Build typed data from a wire `(type, data)` pair.
    ///
    /// Known kinds with malformed data collapse to the variant defaults;
    /// unknown kinds are preserved as [`BlockData::Unknown`]. This never
    /// fails.
    #[must_use]
    pub fn from_raw(kind: &str, data: Value) -> Self {
        fn parse<T: Default + for<'de> Deserialize<'de>>(data: Value) -> T {
            serde_json::from_value(data).unwrap_or_default()
        }

        match BlockKind::from_name(kind) {
            Some(BlockKind::Hero) => Self::Hero(parse(data)),
            Some(BlockKind::Text) => Self::Text(parse(data)),
            Some(BlockKind::RichText) => Self::RichText(parse(data)),
            Some(BlockKind::Image) => Self::Image(parse(data)),
            Some(BlockKind::Cards) => Self::Cards(parse(data)),
            Some(BlockKind::Quote) => Self::Quote(parse(data)),
            Some(BlockKind::Cta) => Self::Cta(parse(data)),
            Some(BlockKind::Spacer) => Self::Spacer(parse(data)),
            None => Self::Unknown {
                kind: kind.to_owned(),
                data,
            },
        }
    }

    /// Wire name of this data's kind.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Hero(_) => BlockKind::Hero.name(),
            Self::Text(_) => BlockKind::Text.name(),
            Self::RichText(_) => BlockKind::RichText.name(),
            Self::Image(_) => BlockKind::Image.name(),
            Self::Cards(_) => BlockKind::Cards.name(),
            Self::Quote(_) => BlockKind::Quote.name(),
            Self::Cta(_) => BlockKind::Cta.name(),
            Self::Spacer(_) => BlockKind::Spacer.name(),
            Self::Unknown { kind, .. } => kind,
        }
    }

    /// Registry kind, or `None` for [`BlockData::Unknown`].
    #[must_use]
    pub fn kind(&self) -> Option<BlockKind> {
        match self {
            Self::Unknown { .. } => None,
            _ => BlockKind::from_name(self.kind_name()),
        }
    }

    fn data_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Self::Hero(d) => serde_json::to_value(d),
            Self::Text(d) => serde_json::to_value(d),
            Self::RichText(d) => serde_json::to_value(d),
            Self::Image(d) => serde_json::to_value(d),
            Self::Cards(d) => serde_json::to_value(d),
            Self::Quote(d) => serde_json::to_value(d),
            Self::Cta(d) => serde_json::to_value(d),
            Self::Spacer(d) => serde_json::to_value(d),
            Self::Unknown { data, .. } => Ok(data.clone()),
        }
    }
}

impl Serialize for BlockData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let data = self.data_value().map_err(serde::ser::Error::custom)?;
        let mut s = serializer.serialize_struct("BlockData", 2)?;
        s.serialize_field("type", self.kind_name())?;
        s.serialize_field("data", &data)?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for BlockData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "type")]
            kind: Option<String>,
            #[serde(default)]
            data: Value,
        }

        let raw = Raw::deserialize(deserializer)?;
        let kind = raw.kind.ok_or_else(|| D::Error::missing_field("type"))?;
        Ok(Self::from_raw(&kind, raw.data))
    }
}
