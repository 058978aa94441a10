//! Block entity.
//!
//! A block belongs to exactly one page. `position` is a pure sort key:
//! renderers must not assume density or a zero origin, only a total order.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::BlockData;
use crate::registry::BlockKind;

/// Opaque block identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One typed, positioned unit of page content.
///
/// The wire form flattens the data's tag, so a block serializes as
/// `{ "id": ..., "position": ..., "type": "hero", "data": { ... } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Opaque identity; also used for edit-addressing attributes.
    pub id: BlockId,
    /// Sort key within the page. Any total order is valid.
    pub position: i64,
    /// Display label for editors; no rendering effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Typed data, tagged by kind.
    #[serde(flatten)]
    pub data: BlockData,
}

impl Block {
    /// Create a new block of the given kind with its default data.
    #[must_use]
    pub fn new(kind: BlockKind, position: i64) -> Self {
        Self {
            id: BlockId::new(),
            position,
            custom_name: None,
            data: kind.default_data(),
        }
    }

    /// Create a block with explicit data.
    #[must_use]
    pub fn with_data(data: BlockData, position: i64) -> Self {
        Self {
            id: BlockId::new(),
            position,
            custom_name: None,
            data,
        }
    }

    /// Wire name of this block's kind.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.data.kind_name()
    }
}

/// Sort blocks into render order: ascending `position`, ties broken by id.
pub fn sort_for_render(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::data::HeroData;

    #[test]
    fn test_new_block_has_default_data() {
        let block = Block::new(BlockKind::Hero, 0);

        assert_eq!(block.data, BlockData::Hero(HeroData::default()));
        assert_eq!(block.kind_name(), "hero");
        assert!(block.custom_name.is_none());
    }

    #[test]
    fn test_wire_shape_is_flattened() {
        let block = Block::with_data(
            BlockData::Text(crate::data::TextData {
                text: "hello".to_owned(),
            }),
            3,
        );

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["data"]["text"], "hello");
        assert_eq!(value["position"], 3);
    }

    #[test]
    fn test_deserialize_unknown_kind() {
        let block: Block = serde_json::from_value(json!({
            "id": "8c2e1b0a-0f6a-4b62-9f70-0f5a3f1c2d4e",
            "position": 7,
            "type": "carousel",
            "data": {"slides": 2},
        }))
        .unwrap();

        assert_eq!(block.kind_name(), "carousel");
        assert_eq!(block.position, 7);
    }

    #[test]
    fn test_sort_for_render_sparse_positions() {
        let mut blocks = vec![
            Block::new(BlockKind::Text, 250),
            Block::new(BlockKind::Hero, -10),
            Block::new(BlockKind::Quote, 30),
        ];
        sort_for_render(&mut blocks);

        let kinds: Vec<&str> = blocks.iter().map(Block::kind_name).collect();
        assert_eq!(kinds, ["hero", "quote", "text"]);
    }

    #[test]
    fn test_sort_for_render_ties_broken_by_id() {
        let mut a = Block::new(BlockKind::Text, 1);
        let mut b = Block::new(BlockKind::Quote, 1);
        if b.id < a.id {
            std::mem::swap(&mut a.id, &mut b.id);
        }

        let mut blocks = vec![b.clone(), a.clone()];
        sort_for_render(&mut blocks);

        assert_eq!(blocks[0].id, a.id);
        assert_eq!(blocks[1].id, b.id);
    }
}
