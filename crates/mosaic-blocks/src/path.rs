//! Field-path addressing for inline edits.
//!
//! A field path is a dot/bracket string addressing one leaf value inside a
//! block's data, e.g. `data.title` or `data.cards[2].text`. Renderers emit
//! these strings in `data-edit-path` attributes; the inline-edit handler
//! sends them back with a replacement value, and [`apply_patch`] resolves
//! the path through a typed lens and replaces the leaf in place.
//!
//! Patches never invent structure: a path that does not resolve to an
//! existing leaf is rejected, out-of-range array indexes included.

use std::fmt;

use serde_json::Value;

use crate::block::{Block, BlockId};
use crate::data::BlockData;

/// One path segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Object key, e.g. `title`.
    Key(String),
    /// Array index, e.g. `[2]`.
    Index(usize),
}

/// A parsed field path.
///
/// The leading `data` root is required and stripped during parsing; the
/// stored segments address into the block's data object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

/// Field-path parse failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// Empty input.
    #[error("empty field path")]
    Empty,
    /// Path must start with the `data` root.
    #[error("field path must start with 'data'")]
    MissingDataRoot,
    /// Unexpected character.
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset in the input.
        offset: usize,
    },
    /// Malformed array index.
    #[error("malformed array index at offset {offset}")]
    BadIndex {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
}

impl FieldPath {
    /// Parse a dot/bracket path string.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the input is empty, does not start with
    /// the `data` root, or contains malformed segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_blocks::{FieldPath, Segment};
    ///
    /// let path = FieldPath::parse("data.cards[2].title").unwrap();
    /// assert_eq!(
    ///     path.segments(),
    ///     &[
    ///         Segment::Key("cards".to_owned()),
    ///         Segment::Index(2),
    ///         Segment::Key("title".to_owned()),
    ///     ]
    /// );
    /// ```
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        let bytes = input.as_bytes();
        let mut pos = 0;

        // First segment must be a bare key.
        let root = read_key(bytes, &mut pos)?;
        if root != "data" {
            return Err(PathError::MissingDataRoot);
        }

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    pos += 1;
                    segments.push(Segment::Key(read_key(bytes, &mut pos)?));
                }
                b'[' => {
                    let open = pos;
                    pos += 1;
                    let start = pos;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                    if pos == start || pos >= bytes.len() || bytes[pos] != b']' {
                        return Err(PathError::BadIndex { offset: open });
                    }
                    let index: usize = input[start..pos]
                        .parse()
                        .map_err(|_| PathError::BadIndex { offset: open })?;
                    pos += 1;
                    segments.push(Segment::Index(index));
                }
                other => {
                    return Err(PathError::Unexpected {
                        found: other as char,
                        offset: pos,
                    });
                }
            }
        }

        if segments.is_empty() {
            // Bare "data" addresses the whole object, not a leaf.
            return Err(PathError::MissingDataRoot);
        }

        Ok(Self { segments })
    }

    /// Segments after the stripped `data` root.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

fn read_key(bytes: &[u8], pos: &mut usize) -> Result<String, PathError> {
    let start = *pos;
    while *pos < bytes.len() && (bytes[*pos].is_ascii_alphanumeric() || bytes[*pos] == b'_') {
        *pos += 1;
    }
    if *pos == start {
        let found = bytes.get(*pos).map_or('\0', |&b| b as char);
        return Err(PathError::Unexpected {
            found,
            offset: *pos,
        });
    }
    // Keys are ASCII by construction of the loop above.
    Ok(String::from_utf8_lossy(&bytes[start..*pos]).into_owned())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("data")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Inline-patch failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatchError {
    /// No block with the given id.
    #[error("block {0} not found")]
    BlockNotFound(BlockId),
    /// Path does not resolve to an existing leaf.
    #[error("field not found: {path}")]
    FieldNotFound {
        /// The rejected path.
        path: String,
    },
    /// Leaf exists but the value has the wrong type.
    #[error("type mismatch for {path}: expected {expected}")]
    TypeMismatch {
        /// The addressed path.
        path: String,
        /// Expected value type.
        expected: &'static str,
    },
}

/// Mutable view of an addressable leaf.
enum LeafMut<'a> {
    Text(&'a mut String),
    Number(&'a mut u32),
}

/// Apply an inline patch to one block, leaving siblings untouched.
///
/// The path must resolve to an existing leaf; string leaves accept JSON
/// strings, numeric leaves accept non-negative JSON integers. Nothing is
/// written unless the whole patch is valid.
///
/// # Errors
///
/// Returns [`PatchError`] when the block id is unknown, the path does not
/// resolve, or the value type does not match the leaf.
pub fn apply_patch(
    blocks: &mut [Block],
    block_id: BlockId,
    path: &FieldPath,
    value: &Value,
) -> Result<(), PatchError> {
    let block = blocks
        .iter_mut()
        .find(|b| b.id == block_id)
        .ok_or(PatchError::BlockNotFound(block_id))?;

    let leaf = leaf_mut(&mut block.data, path.segments()).ok_or_else(|| {
        PatchError::FieldNotFound {
            path: path.to_string(),
        }
    })?;

    match leaf {
        LeafMut::Text(slot) => {
            let Some(text) = value.as_str() else {
                return Err(PatchError::TypeMismatch {
                    path: path.to_string(),
                    expected: "string",
                });
            };
            *slot = text.to_owned();
        }
        LeafMut::Number(slot) => {
            let number = value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| PatchError::TypeMismatch {
                    path: path.to_string(),
                    expected: "non-negative integer",
                })?;
            *slot = number;
        }
    }

    Ok(())
}

/// Resolve a segment list to a leaf through the typed data.
///
/// Field names here are the wire names — the same strings the renderer
/// emits in `data-edit-path` attributes.
fn leaf_mut<'a>(data: &'a mut BlockData, segments: &[Segment]) -> Option<LeafMut<'a>> {
    use Segment::{Index, Key};

    match data {
        BlockData::Hero(d) => match segments {
            [Key(k)] if k == "title" => Some(LeafMut::Text(&mut d.title)),
            [Key(k)] if k == "text" => Some(LeafMut::Text(&mut d.text)),
            [Key(k)] if k == "backgroundImage" => Some(LeafMut::Text(&mut d.background_image)),
            _ => None,
        },
        BlockData::Text(d) => match segments {
            [Key(k)] if k == "text" => Some(LeafMut::Text(&mut d.text)),
            _ => None,
        },
        BlockData::RichText(d) => match segments {
            [Key(k)] if k == "html" => Some(LeafMut::Text(&mut d.html)),
            [Key(k)] if k == "markdown" => Some(LeafMut::Text(&mut d.markdown)),
            _ => None,
        },
        BlockData::Image(d) => match segments {
            [Key(k)] if k == "url" => Some(LeafMut::Text(&mut d.url)),
            [Key(k)] if k == "alt" => Some(LeafMut::Text(&mut d.alt)),
            [Key(k)] if k == "caption" => Some(LeafMut::Text(&mut d.caption)),
            _ => None,
        },
        BlockData::Cards(d) => match segments {
            [Key(k)] if k == "heading" => Some(LeafMut::Text(&mut d.heading)),
            [Key(k), Index(i), Key(f)] if k == "cards" => {
                let card = d.cards.get_mut(*i)?;
                match f.as_str() {
                    "title" => Some(LeafMut::Text(&mut card.title)),
                    "text" => Some(LeafMut::Text(&mut card.text)),
                    "image" => Some(LeafMut::Text(&mut card.image)),
                    "link" => Some(LeafMut::Text(&mut card.link)),
                    _ => None,
                }
            }
            _ => None,
        },
        BlockData::Quote(d) => match segments {
            [Key(k)] if k == "text" => Some(LeafMut::Text(&mut d.text)),
            [Key(k)] if k == "attribution" => Some(LeafMut::Text(&mut d.attribution)),
            _ => None,
        },
        BlockData::Cta(d) => match segments {
            [Key(k)] if k == "heading" => Some(LeafMut::Text(&mut d.heading)),
            [Key(k)] if k == "text" => Some(LeafMut::Text(&mut d.text)),
            [Key(k)] if k == "buttonLabel" => Some(LeafMut::Text(&mut d.button_label)),
            [Key(k)] if k == "buttonUrl" => Some(LeafMut::Text(&mut d.button_url)),
            _ => None,
        },
        BlockData::Spacer(d) => match segments {
            [Key(k)] if k == "height" => Some(LeafMut::Number(&mut d.height)),
            _ => None,
        },
        // Unknown blocks have no addressable leaves; inline edits must not
        // invent schema shape.
        BlockData::Unknown { .. } => None,
    }
}
