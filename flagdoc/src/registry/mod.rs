//! Flag registration keyed by structural field path.
//!
//! Configuration types implement [`RegisterFlags`] and bind each flag to the
//! field it sets through a [`FlagSet`]. The resulting [`FlagRegistry`] maps
//! every bound [`FieldPath`] to its [`FlagMeta`] and is read-only once built.

mod path;
#[cfg(test)]
mod tests;
mod value;

use std::collections::{BTreeMap, HashMap};

pub use path::FieldPath;
pub use value::{FlagValue, format_duration};

use crate::error::FlagdocError;
use crate::schema::FieldCategory;

/// Configuration types that bind command-line flags to their fields.
pub trait RegisterFlags {
    /// Registers every flag bound to `self`'s fields.
    ///
    /// `flags` is scoped to the path of `self` within the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FlagdocError::FlagRedefined`] or
    /// [`FlagdocError::InvalidFlagName`] when a registration is rejected.
    fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError>;
}

/// Command-line metadata of a registered flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagMeta {
    /// Long flag name without leading dashes.
    pub name: String,
    /// Usage text.
    pub usage: String,
    /// Default value display string.
    pub default: String,
    /// Category declared at registration time.
    pub category: Option<FieldCategory>,
}

/// Builder for a flag registration.
#[derive(Debug, Clone)]
pub struct Flag {
    meta: FlagMeta,
}

impl Flag {
    /// Describes a flag whose default is the current value of the field.
    pub fn new<V>(name: impl Into<String>, default: &V, usage: impl Into<String>) -> Self
    where
        V: FlagValue + ?Sized,
    {
        Self {
            meta: FlagMeta {
                name: name.into(),
                usage: usage.into(),
                default: default.flag_default(),
                category: None,
            },
        }
    }

    /// Marks the flag as a tuning knob.
    #[must_use]
    pub fn advanced(mut self) -> Self {
        self.meta.category = Some(FieldCategory::Advanced);
        self
    }

    /// Marks the flag as experimental.
    #[must_use]
    pub fn experimental(mut self) -> Self {
        self.meta.category = Some(FieldCategory::Experimental);
        self
    }
}

/// Lookup from field path to flag metadata.
#[derive(Debug, Default)]
pub struct FlagRegistry {
    by_path: BTreeMap<FieldPath, FlagMeta>,
    by_name: HashMap<String, FieldPath>,
}

impl FlagRegistry {
    /// Runs the registration routine of `config` against an empty registry.
    ///
    /// # Errors
    ///
    /// Propagates the first registration error raised by `config`.
    pub fn from_config<C>(config: &C) -> Result<Self, FlagdocError>
    where
        C: RegisterFlags + ?Sized,
    {
        let mut registry = Self::default();
        config.register_flags(&mut FlagSet::new(&mut registry))?;
        tracing::debug!(flags = registry.len(), "registered configuration flags");
        Ok(registry)
    }

    /// Flag bound to `path`, if any.
    #[must_use]
    pub fn lookup(&self, path: &FieldPath) -> Option<&FlagMeta> {
        self.by_path.get(path)
    }

    /// Path a long flag name is bound to.
    #[must_use]
    pub fn path_of(&self, name: &str) -> Option<&FieldPath> {
        self.by_name.get(name)
    }

    /// Number of bound flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Whether no flag has been bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Bound flags ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FlagMeta)> {
        self.by_path.iter()
    }

    fn insert(&mut self, path: FieldPath, meta: FlagMeta) -> Result<(), FlagdocError> {
        validate_name(&meta.name, &path)?;
        if let Some(first) = self.by_name.get(&meta.name) {
            return Err(FlagdocError::FlagRedefined {
                name: meta.name,
                first: first.to_string(),
                second: path.to_string(),
            });
        }
        if let Some(existing) = self.by_path.get(&path) {
            tracing::warn!(
                path = %path,
                kept = %existing.name,
                ignored = %meta.name,
                "field already has a bound flag; keeping the first registration"
            );
            return Ok(());
        }
        self.by_name.insert(meta.name.clone(), path.clone());
        self.by_path.insert(path, meta);
        Ok(())
    }
}

/// Registration handle scoped to one configuration struct.
#[derive(Debug)]
pub struct FlagSet<'r> {
    registry: &'r mut FlagRegistry,
    path: FieldPath,
}

impl<'r> FlagSet<'r> {
    fn new(registry: &'r mut FlagRegistry) -> Self {
        Self {
            registry,
            path: FieldPath::root(),
        }
    }

    /// Path of the struct this set registers flags for.
    #[must_use]
    pub const fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Binds `flag` to the field named `field`.
    ///
    /// # Errors
    ///
    /// Returns [`FlagdocError::FlagRedefined`] when the long name is already
    /// bound, and [`FlagdocError::InvalidFlagName`] when it cannot be used on a
    /// command line.
    pub fn add(&mut self, field: &'static str, flag: Flag) -> Result<(), FlagdocError> {
        self.registry.insert(self.path.child(field), flag.meta)
    }

    /// Scopes registration to the nested struct stored in `field`.
    pub fn nested(&mut self, field: &'static str) -> FlagSet<'_> {
        FlagSet {
            registry: &mut *self.registry,
            path: self.path.child(field),
        }
    }
}

fn validate_name(name: &str, path: &FieldPath) -> Result<(), FlagdocError> {
    let reason = if name.is_empty() {
        Some("flag names must not be empty")
    } else if name.starts_with('-') {
        Some("flag names are registered without leading dashes")
    } else if name.chars().any(char::is_whitespace) {
        Some("flag names must not contain whitespace")
    } else {
        None
    };
    reason.map_or(Ok(()), |reason| {
        Err(FlagdocError::InvalidFlagName {
            name: name.to_owned(),
            path: path.to_string(),
            reason,
        })
    })
}
