//! Documentation trees for nested configuration structs and their CLI flags.
//!
//! `flagdoc` walks a configuration type described by
//! `#[derive(ConfigSchema)]`, pairs every field with the command-line flag
//! bound to it through [`RegisterFlags`], and normalizes the flag names of
//! configuration blocks that are embedded at several paths so each block can
//! be documented once.
//!
//! ```rust
//! use flagdoc::{ConfigSchema, Flag, FlagSet, FlagdocError, RegisterFlags, RootBlock};
//!
//! #[derive(ConfigSchema)]
//! struct Ring {
//!     /// Backend storage to use for the ring.
//!     store: String,
//! }
//!
//! impl Ring {
//!     fn register_flags_with_prefix(
//!         &self,
//!         prefix: &str,
//!         flags: &mut FlagSet<'_>,
//!     ) -> Result<(), FlagdocError> {
//!         flags.add(
//!             "store",
//!             Flag::new(format!("{prefix}ring.store"), &self.store, "Backend storage."),
//!         )
//!     }
//! }
//!
//! #[derive(ConfigSchema)]
//! struct Config {
//!     distributor: Ring,
//!     ingester: Ring,
//! }
//!
//! impl RegisterFlags for Config {
//!     fn register_flags(&self, flags: &mut FlagSet<'_>) -> Result<(), FlagdocError> {
//!         self.distributor
//!             .register_flags_with_prefix("distributor.", &mut flags.nested("distributor"))?;
//!         self.ingester
//!             .register_flags_with_prefix("ingester.", &mut flags.nested("ingester"))
//!     }
//! }
//!
//! # fn main() -> Result<(), FlagdocError> {
//! let config = Config {
//!     distributor: Ring { store: "consul".into() },
//!     ingester: Ring { store: "consul".into() },
//! };
//! let doc = flagdoc::document(&config, &[RootBlock::of::<Ring>("ring", "Hash ring.")])?;
//! let ring = doc.find_top_level("ring").expect("ring is a root block");
//! assert_eq!(ring.flags_prefix, "distributor.");
//! assert_eq!(ring.fields().next().map(|f| f.flag.as_str()), Some("<prefix>.ring.store"));
//! # Ok(())
//! # }
//! ```

pub use flagdoc_macros::ConfigSchema;

pub mod dedup;
mod error;
pub mod prefix;
pub mod registry;
pub mod schema;
pub mod tree;
pub mod walker;

pub use dedup::{DedupSummary, annotate_flag_prefix, restore_flag};
pub use error::FlagdocError;
pub use prefix::find_flags_prefix;
pub use registry::{FieldPath, Flag, FlagMeta, FlagRegistry, FlagSet, FlagValue, RegisterFlags};
pub use schema::{
    BlockRef, ConfigSchema, Describe, FieldCategory, FieldSchema, Shape, StructSchema, Visibility,
};
pub use tree::{BlockEntry, BlockId, ConfigBlock, ConfigDoc, ConfigEntry, FieldEntry};
pub use walker::{RootBlock, walk, walk_config};

/// Token substituted for the instance-specific part of a rewritten flag.
pub const PLACEHOLDER: &str = "<prefix>";

/// Separator between the segments of a flag name.
pub const FLAG_SEPARATOR: char = '.';

/// Registers the flags of `config`, walks its type and normalizes the flag
/// names of duplicated root blocks.
///
/// # Errors
///
/// Returns a [`FlagdocError`] when flag registration or the walk fails.
pub fn document<C>(config: &C, roots: &[RootBlock]) -> Result<ConfigDoc, FlagdocError>
where
    C: ConfigSchema + RegisterFlags,
{
    let registry = FlagRegistry::from_config(config)?;
    let mut doc = walk_config::<C>(&registry, roots)?;
    let summary = annotate_flag_prefix(&mut doc);
    tracing::debug!(
        groups = summary.duplicate_groups,
        prefixed = summary.prefixed_blocks,
        rewritten = summary.rewritten_flags,
        "normalized duplicated blocks"
    );
    Ok(doc)
}
