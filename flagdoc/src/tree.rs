//! Documentation tree produced by the walker and normalized by the
//! deduplicator.
//!
//! Blocks live in an arena owned by [`ConfigDoc`] and are addressed by
//! [`BlockId`]. Nested [`BlockEntry`] values refer to their child by id, so a
//! block can be rewritten in place without walking parent pointers.

use serde::Serialize;

use crate::schema::FieldCategory;

/// Index of a block inside a [`ConfigDoc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BlockId(usize);

impl BlockId {
    /// Position of the block in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Arena of configuration blocks plus the ordered list of top-level blocks.
///
/// The first top-level block is the unnamed root of the configuration; every
/// root block follows in the order the walk first reached it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigDoc {
    blocks: Vec<ConfigBlock>,
    top_level: Vec<BlockId>,
}

impl ConfigDoc {
    /// Creates an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks: Vec::new(),
            top_level: Vec::new(),
        }
    }

    /// Stores `block` and returns its id.
    pub fn add_block(&mut self, block: ConfigBlock) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    /// Appends `id` to the top-level list.
    pub fn add_top_level(&mut self, id: BlockId) {
        self.top_level.push(id);
    }

    /// Block stored under `id`.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&ConfigBlock> {
        self.blocks.get(id.0)
    }

    /// Mutable access to the block stored under `id`.
    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut ConfigBlock> {
        self.blocks.get_mut(id.0)
    }

    /// Top-level block ids in document order.
    #[must_use]
    pub fn top_level(&self) -> &[BlockId] {
        &self.top_level
    }

    /// Top-level blocks in document order.
    pub fn top_level_blocks(&self) -> impl Iterator<Item = (BlockId, &ConfigBlock)> {
        self.top_level
            .iter()
            .filter_map(|&id| self.block(id).map(|block| (id, block)))
    }

    /// The unnamed block describing the configuration type itself.
    #[must_use]
    pub fn root(&self) -> Option<&ConfigBlock> {
        self.top_level.first().and_then(|&id| self.block(id))
    }

    /// First top-level block named `name`.
    #[must_use]
    pub fn find_top_level(&self, name: &str) -> Option<&ConfigBlock> {
        self.top_level_blocks()
            .find(|(_, block)| block.name == name)
            .map(|(_, block)| block)
    }

    /// Number of blocks in the arena, nested blocks included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document holds no block.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// One configuration sub-structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigBlock {
    /// Block name. Reused across every embedding of the same root type.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Entries in declaration order.
    pub entries: Vec<ConfigEntry>,
    /// Whether this is one of the declared top-level sections.
    pub root: bool,
    /// Prefix distinguishing this instance from its duplicates.
    pub flags_prefix: String,
    /// Non-empty prefixes of every duplicate instance, in instance order.
    pub flags_prefixes: Vec<String>,
}

impl ConfigBlock {
    /// Creates a block without entries or prefixes.
    pub fn new(name: impl Into<String>, description: impl Into<String>, root: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            root,
            ..Self::default()
        }
    }

    /// First field entry of the block's own entry sequence.
    #[must_use]
    pub fn first_field(&self) -> Option<&FieldEntry> {
        self.fields().next()
    }

    /// Field entries directly owned by this block.
    pub fn fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            ConfigEntry::Field(field) => Some(field),
            ConfigEntry::Block(_) => None,
        })
    }

    /// Field entry whose YAML key is `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields().find(|field| field.name == name)
    }

    /// Nested block entry whose YAML key is `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&BlockEntry> {
        self.entries.iter().find_map(|entry| match entry {
            ConfigEntry::Block(block) if block.name == name => Some(block),
            _ => None,
        })
    }
}

/// Member of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigEntry {
    /// Terminal value.
    Field(FieldEntry),
    /// Nested configuration block.
    Block(BlockEntry),
}

/// Terminal configuration value and the flag bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntry {
    /// YAML key.
    pub name: String,
    /// Long flag name, empty when no flag is bound.
    pub flag: String,
    /// Human-readable type.
    pub field_type: String,
    /// Default value display string.
    pub default: Option<String>,
    /// Description.
    pub description: String,
    /// Whether the value must be set.
    pub required: bool,
    /// Audience of the field.
    pub category: FieldCategory,
}

/// Reference from a block to a nested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockEntry {
    /// YAML key.
    pub name: String,
    /// Nested block.
    pub block: BlockId,
    /// Whether the nested block is a declared top-level section.
    pub root: bool,
    /// Whether the nested block must be set.
    pub required: bool,
    /// Description.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result, ensure};
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    fn entries_serialise_with_a_kind_tag() -> Result<()> {
        let mut doc = ConfigDoc::new();
        let consul = doc.add_block(ConfigBlock::new("consul", "Consul client.", true));
        let mut kvstore = ConfigBlock::new("kvstore", "", false);
        kvstore.entries = vec![
            ConfigEntry::Field(FieldEntry {
                name: "store".to_owned(),
                flag: "ring.store".to_owned(),
                field_type: "string".to_owned(),
                default: None,
                description: "Backend storage.".to_owned(),
                required: false,
                category: FieldCategory::Advanced,
            }),
            ConfigEntry::Block(BlockEntry {
                name: "consul".to_owned(),
                block: consul,
                root: true,
                required: false,
                description: String::new(),
            }),
        ];
        let value = serde_json::to_value(&kvstore.entries)?;
        ensure!(
            value
                == json!([
                    {
                        "kind": "field",
                        "name": "store",
                        "flag": "ring.store",
                        "field_type": "string",
                        "default": null,
                        "description": "Backend storage.",
                        "required": false,
                        "category": "advanced",
                    },
                    {
                        "kind": "block",
                        "name": "consul",
                        "block": 0,
                        "root": true,
                        "required": false,
                        "description": "",
                    },
                ]),
            "unexpected serialisation {value}"
        );
        Ok(())
    }

    #[rstest]
    fn lookups_follow_the_top_level_order() -> Result<()> {
        let mut doc = ConfigDoc::new();
        ensure!(doc.is_empty() && doc.root().is_none(), "new document is empty");
        let root = doc.add_block(ConfigBlock::new("", "", false));
        let nested = doc.add_block(ConfigBlock::new("kvstore", "", false));
        let first = doc.add_block(ConfigBlock::new("ring", "first", true));
        let second = doc.add_block(ConfigBlock::new("ring", "second", true));
        for id in [root, first, second] {
            doc.add_top_level(id);
        }
        ensure!(doc.len() == 4, "nested blocks count towards the arena");
        ensure!(doc.top_level() == [root, first, second], "top level order");
        ensure!(
            doc.find_top_level("ring").map(|block| block.description.as_str()) == Some("first"),
            "first match wins"
        );
        ensure!(doc.find_top_level("kvstore").is_none(), "nested blocks are not top level");
        let block = doc.block(nested).context("nested block missing")?;
        ensure!(block.name == "kvstore", "got {}", block.name);
        ensure!(nested.index() == 1, "ids are arena positions");
        Ok(())
    }
}
