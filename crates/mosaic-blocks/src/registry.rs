//! Block schema registry: the closed set of block kinds.
//!
//! Pure data. For each kind the registry exposes the field names and kinds
//! (used by editors to build forms and by renderers to tag editable leaves)
//! and a default-data template used when a block is newly added. The
//! registry enforces nothing — renderers tolerate missing or malformed
//! fields by design.

use crate::data::BlockData;

/// The closed set of block kinds.
///
/// Adding a kind means adding a variant here, a data struct in
/// [`crate::data`], a schema entry below, and a render arm in
/// `mosaic-render`. Nothing else should need to change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Hero section.
    Hero,
    /// Plain text.
    Text,
    /// Rich text (sanitized HTML / markdown).
    RichText,
    /// Image with alignment.
    Image,
    /// Card grid.
    Cards,
    /// Pull quote.
    Quote,
    /// Call-to-action button.
    Cta,
    /// Vertical spacer.
    Spacer,
}

impl BlockKind {
    /// All kinds, in editor-palette order.
    pub const ALL: [Self; 8] = [
        Self::Hero,
        Self::Text,
        Self::RichText,
        Self::Image,
        Self::Cards,
        Self::Quote,
        Self::Cta,
        Self::Spacer,
    ];

    /// Wire name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Image => "image",
            Self::Cards => "cards",
            Self::Quote => "quote",
            Self::Cta => "cta",
            Self::Spacer => "spacer",
        }
    }

    /// Look up a kind by wire name. `None` for anything outside the set.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Field schema for this kind.
    #[must_use]
    pub const fn schema(self) -> &'static BlockSchema {
        match self {
            Self::Hero => &HERO_SCHEMA,
            Self::Text => &TEXT_SCHEMA,
            Self::RichText => &RICHTEXT_SCHEMA,
            Self::Image => &IMAGE_SCHEMA,
            Self::Cards => &CARDS_SCHEMA,
            Self::Quote => &QUOTE_SCHEMA,
            Self::Cta => &CTA_SCHEMA,
            Self::Spacer => &SPACER_SCHEMA,
        }
    }

    /// Default-data template for a newly added block of this kind.
    #[must_use]
    pub fn default_data(self) -> BlockData {
        use crate::data::{
            CardsData, CtaData, HeroData, ImageData, QuoteData, RichTextData, SpacerData, TextData,
        };

        match self {
            Self::Hero => BlockData::Hero(HeroData::default()),
            Self::Text => BlockData::Text(TextData::default()),
            Self::RichText => BlockData::RichText(RichTextData::default()),
            Self::Image => BlockData::Image(ImageData::default()),
            Self::Cards => BlockData::Cards(CardsData::default()),
            Self::Quote => BlockData::Quote(QuoteData::default()),
            Self::Cta => BlockData::Cta(CtaData::default()),
            Self::Spacer => BlockData::Spacer(SpacerData::default()),
        }
    }
}

/// Field value kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text; escaped on render.
    Text,
    /// Rich text; sanitized on render.
    RichText,
    /// Image URL; normalized on render.
    ImageUrl,
    /// Plain URL; emitted as-is (escaped).
    Url,
    /// Numeric value.
    Number,
    /// Ordered array of sub-objects with their own field schema.
    Array(&'static [FieldSpec]),
}

/// One named field in a block schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire field name.
    pub name: &'static str,
    /// Value kind.
    pub kind: FieldKind,
}

/// Schema of one block kind: its editable fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSchema {
    /// Editable fields, in form order.
    pub fields: &'static [FieldSpec],
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

static HERO_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("title", FieldKind::Text),
        field("text", FieldKind::Text),
        field("backgroundImage", FieldKind::ImageUrl),
    ],
};

static TEXT_SCHEMA: BlockSchema = BlockSchema {
    fields: &[field("text", FieldKind::Text)],
};

static RICHTEXT_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("html", FieldKind::RichText),
        field("markdown", FieldKind::RichText),
    ],
};

static IMAGE_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("url", FieldKind::ImageUrl),
        field("alt", FieldKind::Text),
        field("caption", FieldKind::Text),
    ],
};

static CARD_FIELDS: [FieldSpec; 4] = [
    field("title", FieldKind::Text),
    field("text", FieldKind::Text),
    field("image", FieldKind::ImageUrl),
    field("link", FieldKind::Url),
];

static CARDS_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("heading", FieldKind::Text),
        field("cards", FieldKind::Array(&CARD_FIELDS)),
    ],
};

static QUOTE_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("text", FieldKind::Text),
        field("attribution", FieldKind::Text),
    ],
};

static CTA_SCHEMA: BlockSchema = BlockSchema {
    fields: &[
        field("heading", FieldKind::Text),
        field("text", FieldKind::Text),
        field("buttonLabel", FieldKind::Text),
        field("buttonUrl", FieldKind::Url),
    ],
};

static SPACER_SCHEMA: BlockSchema = BlockSchema {
    fields: &[field("height", FieldKind::Number)],
};
