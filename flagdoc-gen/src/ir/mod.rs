//! Serialisable intermediate representation of a configuration reference.
//!
//! Each top-level block of a [`ConfigDoc`] appears once. Nested non-root
//! blocks are inlined into their parent and nested root blocks are
//! referenced by name, since they are documented in their own section.


use flagdoc::{ConfigBlock, ConfigDoc, ConfigEntry, FieldEntry, PLACEHOLDER};
use serde::Serialize;
use tracing::trace;

/// Current IR schema version.
pub const IR_VERSION: &str = "1.0";

/// Whole configuration reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentIr {
    /// IR schema version.
    pub ir_version: String,
    /// Token standing for the instance prefix in rewritten flags.
    pub placeholder: String,
    /// Top-level sections in walk order.
    pub blocks: Vec<BlockIr>,
}

/// One top-level section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockIr {
    /// Section name, empty for the document root.
    pub name: String,
    /// Section description.
    pub description: String,
    /// Whether the section is a declared root block.
    pub root: bool,
    /// Prefix of this instance when the section is duplicated.
    pub flags_prefix: String,
    /// Prefixes of every instance of a duplicated section.
    pub flags_prefixes: Vec<String>,
    /// Entries in declaration order.
    pub entries: Vec<EntryIr>,
}

/// Member of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryIr {
    /// Terminal value.
    Field(FieldEntry),
    /// Nested block documented in place.
    Block {
        /// YAML key.
        name: String,
        /// Description.
        description: String,
        /// Whether the block must be set.
        required: bool,
        /// Entries of the nested block.
        entries: Vec<EntryIr>,
    },
    /// Nested root block documented in its own section.
    RootRef {
        /// YAML key.
        name: String,
        /// Name of the referenced section.
        block: String,
        /// Description.
        description: String,
        /// Whether the block must be set.
        required: bool,
    },
}

impl DocumentIr {
    /// Builds the IR for `doc`.
    #[must_use]
    pub fn from_doc(doc: &ConfigDoc) -> Self {
        Self {
            ir_version: IR_VERSION.to_owned(),
            placeholder: PLACEHOLDER.to_owned(),
            blocks: doc
                .top_level_blocks()
                .map(|(_, block)| BlockIr::from_block(doc, block))
                .collect(),
        }
    }
}

impl BlockIr {
    fn from_block(doc: &ConfigDoc, block: &ConfigBlock) -> Self {
        Self {
            name: block.name.clone(),
            description: block.description.clone(),
            root: block.root,
            flags_prefix: block.flags_prefix.clone(),
            flags_prefixes: block.flags_prefixes.clone(),
            entries: entries_of(doc, block),
        }
    }
}

fn entries_of(doc: &ConfigDoc, block: &ConfigBlock) -> Vec<EntryIr> {
    block
        .entries
        .iter()
        .filter_map(|entry| match entry {
            ConfigEntry::Field(field) => Some(EntryIr::Field(field.clone())),
            ConfigEntry::Block(nested) => {
                let Some(child) = doc.block(nested.block) else {
                    trace!(entry = %nested.name, "dangling block reference");
                    return None;
                };
                Some(if nested.root {
                    EntryIr::RootRef {
                        name: nested.name.clone(),
                        block: child.name.clone(),
                        description: nested.description.clone(),
                        required: nested.required,
                    }
                } else {
                    EntryIr::Block {
                        name: nested.name.clone(),
                        description: nested.description.clone(),
                        required: nested.required,
                        entries: entries_of(doc, child),
                    }
                })
            }
        })
        .collect()
}
