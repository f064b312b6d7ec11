//! Schema traversal producing the documentation tree.
//!
//! The walker descends a [`StructSchema`] in declaration order, emitting one
//! block per nested configuration struct and one entry per field. Terminal
//! fields are resolved against the [`FlagRegistry`] through the field path
//! the walk is currently at.


use std::any::TypeId;
use std::collections::HashSet;

use crate::error::FlagdocError;
use crate::registry::{FieldPath, FlagRegistry};
use crate::schema::{BlockRef, ConfigSchema, FieldSchema, Shape, StructSchema, Visibility};
use crate::tree::{BlockEntry, ConfigBlock, ConfigDoc, ConfigEntry, FieldEntry};

/// Declared top-level configuration section.
///
/// Any nested block whose type matches a root block is documented as its own
/// top-level section under the root's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootBlock {
    name: &'static str,
    description: &'static str,
    type_id: TypeId,
}

impl RootBlock {
    /// Declares `T` as a root block.
    #[must_use]
    pub fn of<T: ConfigSchema>(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            type_id: TypeId::of::<T>(),
        }
    }

    /// Section name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Section description used when the embedding field has none.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }
}

/// Walks the configuration type `C`.
///
/// # Errors
///
/// See [`walk`].
pub fn walk_config<C: ConfigSchema>(
    registry: &FlagRegistry,
    roots: &[RootBlock],
) -> Result<ConfigDoc, FlagdocError> {
    walk(&C::schema(), registry, roots)
}

/// Builds the documentation tree of `schema`.
///
/// The returned document starts with an unnamed block for `schema` itself,
/// followed by every root block in the order it was first reached.
///
/// # Errors
///
/// Returns [`FlagdocError::CyclicType`] when a type contains itself, and
/// [`FlagdocError::UnboundFlag`] when a registered flag is bound to a path
/// the walk never documented.
pub fn walk(
    schema: &StructSchema,
    registry: &FlagRegistry,
    roots: &[RootBlock],
) -> Result<ConfigDoc, FlagdocError> {
    let mut walker = Walker {
        registry,
        roots,
        doc: ConfigDoc::new(),
        path: FieldPath::root(),
        stack: vec![(schema.type_id, schema.short_name())],
        reached: HashSet::new(),
        skipped: Vec::new(),
    };
    let root = walker.doc.add_block(ConfigBlock::default());
    walker.doc.add_top_level(root);

    let mut entries = Vec::new();
    walker.fill(schema, &mut entries)?;
    if let Some(block) = walker.doc.block_mut(root) {
        block.entries = entries;
    }
    walker.check_unbound()?;

    tracing::debug!(
        blocks = walker.doc.len(),
        top_level = walker.doc.top_level().len(),
        "walked configuration schema"
    );
    Ok(walker.doc)
}

struct Walker<'a> {
    registry: &'a FlagRegistry,
    roots: &'a [RootBlock],
    doc: ConfigDoc,
    path: FieldPath,
    stack: Vec<(TypeId, &'static str)>,
    reached: HashSet<FieldPath>,
    skipped: Vec<FieldPath>,
}

impl Walker<'_> {
    fn fill(
        &mut self,
        schema: &StructSchema,
        entries: &mut Vec<ConfigEntry>,
    ) -> Result<(), FlagdocError> {
        for field in &schema.fields {
            self.path.push(field.ident);
            let result = self.visit(field, entries);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn visit(
        &mut self,
        field: &FieldSchema,
        entries: &mut Vec<ConfigEntry>,
    ) -> Result<(), FlagdocError> {
        if field.visibility != Visibility::Visible {
            tracing::trace!(path = %self.path, visibility = ?field.visibility, "skipping field");
            self.skipped.push(self.path.clone());
            return Ok(());
        }
        match &field.shape {
            Shape::Block(block) if field.inline => self.descend(*block, entries),
            Shape::Block(block) => self.visit_block(field, *block, entries),
            Shape::Value(type_name) => {
                entries.push(ConfigEntry::Field(self.field_entry(field, type_name)));
                Ok(())
            }
        }
    }

    fn visit_block(
        &mut self,
        field: &FieldSchema,
        block: BlockRef,
        entries: &mut Vec<ConfigEntry>,
    ) -> Result<(), FlagdocError> {
        let root = self
            .roots
            .iter()
            .find(|declared| declared.type_id == block.type_id());
        let (name, description) = root.map_or_else(
            || (field.name, field.own_description().unwrap_or_default()),
            |declared| {
                (
                    declared.name,
                    field.own_description().unwrap_or(declared.description),
                )
            },
        );

        let id = self
            .doc
            .add_block(ConfigBlock::new(name, description, root.is_some()));
        if root.is_some() {
            tracing::debug!(block = name, path = %self.path, "walking root block");
            self.doc.add_top_level(id);
        }
        entries.push(ConfigEntry::Block(BlockEntry {
            name: field.name.to_owned(),
            block: id,
            root: root.is_some(),
            required: field.required,
            description: description.to_owned(),
        }));

        let mut nested = Vec::new();
        self.descend(block, &mut nested)?;
        if let Some(child) = self.doc.block_mut(id) {
            child.entries = nested;
        }
        Ok(())
    }

    fn descend(
        &mut self,
        block: BlockRef,
        entries: &mut Vec<ConfigEntry>,
    ) -> Result<(), FlagdocError> {
        if let Some(start) = self
            .stack
            .iter()
            .position(|(type_id, _)| *type_id == block.type_id())
        {
            let cycle: Vec<&str> = self
                .stack
                .iter()
                .skip(start)
                .map(|(_, name)| *name)
                .chain(std::iter::once(block.short_name()))
                .collect();
            return Err(FlagdocError::CyclicType {
                cycle: cycle.join(" -> "),
            });
        }
        let schema = block.schema();
        self.stack.push((block.type_id(), block.short_name()));
        let result = self.fill(&schema, entries);
        self.stack.pop();
        result
    }

    fn field_entry(&mut self, field: &FieldSchema, shape_name: &str) -> FieldEntry {
        self.reached.insert(self.path.clone());
        let flag = self.registry.lookup(&self.path);
        let description = field
            .description
            .map(str::to_owned)
            .or_else(|| {
                flag.map(|meta| meta.usage.clone())
                    .filter(|usage| !usage.is_empty())
            })
            .or_else(|| field.doc.map(str::to_owned))
            .unwrap_or_default();
        FieldEntry {
            name: field.name.to_owned(),
            flag: flag.map(|meta| meta.name.clone()).unwrap_or_default(),
            field_type: field
                .type_name
                .map_or_else(|| shape_name.to_owned(), str::to_owned),
            default: field
                .default
                .map(str::to_owned)
                .or_else(|| flag.map(|meta| meta.default.clone())),
            description,
            required: field.required,
            category: field
                .category
                .or_else(|| flag.and_then(|meta| meta.category))
                .unwrap_or_default(),
        }
    }

    fn check_unbound(&self) -> Result<(), FlagdocError> {
        let unbound = self.registry.iter().find(|(path, _)| {
            !self.reached.contains(*path)
                && !self.skipped.iter().any(|skipped| path.starts_with(skipped))
        });
        unbound.map_or(Ok(()), |(path, meta)| {
            Err(FlagdocError::UnboundFlag {
                flag: meta.name.clone(),
                path: path.to_string(),
            })
        })
    }
}
