//! Compile-time description of configuration types.
//!
//! `#[derive(ConfigSchema)]` implements [`ConfigSchema`] and [`Describe`] for a
//! struct. [`Describe`] is implemented in this module for the leaf types a
//! configuration is usually built from, so the walker can tell nested blocks
//! apart from terminal values without runtime reflection.

mod describe;

use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// Implemented by configuration structs that can be walked.
pub trait ConfigSchema: 'static {
    /// Returns the ordered field description of `Self`.
    fn schema() -> StructSchema;
}

/// Reports how a field type appears in the documentation tree.
pub trait Describe {
    /// Returns the shape of `Self`.
    fn shape() -> Shape;
}

/// Shape of a field type: a terminal value or a nested configuration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Terminal value with its human-readable type name.
    Value(Cow<'static, str>),
    /// Nested configuration struct.
    Block(BlockRef),
}

impl Shape {
    /// Terminal value shape with a static type name.
    #[must_use]
    pub const fn value(name: &'static str) -> Self {
        Self::Value(Cow::Borrowed(name))
    }

    /// Shape for fields that are never documented, such as hidden fields.
    #[must_use]
    pub const fn opaque() -> Self {
        Self::value("opaque")
    }

    /// Nested block shape for a configuration struct.
    #[must_use]
    pub fn block<T: ConfigSchema>() -> Self {
        Self::Block(BlockRef::of::<T>())
    }

    /// Human-readable name of the shape.
    ///
    /// Blocks report their unqualified type name.
    #[must_use]
    pub fn type_name(&self) -> Cow<'static, str> {
        match self {
            Self::Value(name) => name.clone(),
            Self::Block(block) => Cow::Borrowed(block.short_name()),
        }
    }
}

/// Lazy reference to a nested configuration struct.
///
/// The schema is only expanded when the walker descends into the field, so
/// self-referential types can be described and rejected during the walk.
#[derive(Clone, Copy)]
pub struct BlockRef {
    type_id: TypeId,
    type_name: &'static str,
    schema: fn() -> StructSchema,
}

impl BlockRef {
    /// Builds a reference to `T`'s schema.
    #[must_use]
    pub fn of<T: ConfigSchema>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            schema: T::schema,
        }
    }

    /// Identity of the referenced type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the referenced type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path or generic arguments.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Expands the referenced schema.
    #[must_use]
    pub fn schema(&self) -> StructSchema {
        (self.schema)()
    }
}

impl PartialEq for BlockRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for BlockRef {}

impl fmt::Debug for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlockRef").field(&self.type_name).finish()
    }
}

/// Ordered description of one configuration struct.
#[derive(Debug, Clone)]
pub struct StructSchema {
    /// Identity of the described type.
    pub type_id: TypeId,
    /// Fully qualified name of the described type.
    pub type_name: &'static str,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
}

impl StructSchema {
    /// Creates the schema of `T` from its fields in declaration order.
    #[must_use]
    pub fn new<T: 'static>(fields: Vec<FieldSchema>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            fields,
        }
    }

    /// Type name without its module path or generic arguments.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }
}

/// Whether a field appears in the documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Documented.
    #[default]
    Visible,
    /// Never documented.
    Hidden,
    /// Kept for backwards compatibility and left out of the documentation.
    Deprecated,
}

/// Audience of a documented field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    /// Settings most deployments touch.
    #[default]
    Basic,
    /// Tuning knobs.
    Advanced,
    /// Settings that may change or disappear without notice.
    Experimental,
}

impl FieldCategory {
    /// Lowercase label used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::Experimental => "experimental",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of a single struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Rust identifier, used as the field path segment.
    pub ident: &'static str,
    /// Serialized (YAML) key.
    pub name: &'static str,
    /// Shape of the field type.
    pub shape: Shape,
    /// Doc comment text.
    pub doc: Option<&'static str>,
    /// Explicit description overriding flag usage and doc comments.
    pub description: Option<&'static str>,
    /// Explicit default display string.
    pub default: Option<&'static str>,
    /// Explicit type name overriding the shape's.
    pub type_name: Option<&'static str>,
    /// Explicit category.
    pub category: Option<FieldCategory>,
    /// Whether the field must be set.
    pub required: bool,
    /// Whether the field is documented at all.
    pub visibility: Visibility,
    /// Whether a nested struct is flattened into the enclosing block.
    pub inline: bool,
}

impl FieldSchema {
    /// Creates a visible field with no overrides.
    #[must_use]
    pub const fn new(ident: &'static str, name: &'static str, shape: Shape) -> Self {
        Self {
            ident,
            name,
            shape,
            doc: None,
            description: None,
            default: None,
            type_name: None,
            category: None,
            required: false,
            visibility: Visibility::Visible,
            inline: false,
        }
    }

    /// Sets the doc comment text.
    #[must_use]
    pub fn with_doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Sets an explicit description.
    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets an explicit default display string.
    #[must_use]
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Overrides the documented type name.
    #[must_use]
    pub fn with_type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// Sets the field category.
    #[must_use]
    pub fn with_category(mut self, category: FieldCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Hides the field from the documentation.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    /// Marks the field as deprecated, leaving it out of the documentation.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.visibility = Visibility::Deprecated;
        self
    }

    /// Flattens a nested struct into the enclosing block.
    #[must_use]
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Explicit description, falling back to the doc comment.
    #[must_use]
    pub fn own_description(&self) -> Option<&'static str> {
        self.description.or(self.doc)
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
