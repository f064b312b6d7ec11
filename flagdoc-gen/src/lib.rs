//! Driver that turns a configuration type into a JSON configuration
//! reference.
//!
//! A documentation binary only has to supply its configuration type and the
//! list of root blocks:
//!
//! ```rust,ignore
//! fn main() -> Result<(), flagdoc_gen::GenError> {
//!     flagdoc_gen::run::<my_service::Config>(&my_service::root_blocks())
//! }
//! ```
//!
//! [`run`] parses [`Args`], layers [`Settings`], installs logging and writes
//! the [`DocumentIr`] to standard output or the configured file.

pub mod cli;
mod error;
pub mod ir;
pub mod logging;
pub mod output;
pub mod settings;

use clap::Parser;
use flagdoc::{ConfigSchema, FlagRegistry, RegisterFlags, RootBlock};
use tracing::{debug, info};

pub use cli::Args;
pub use error::GenError;
pub use ir::{BlockIr, DocumentIr, EntryIr, IR_VERSION};
pub use settings::Settings;

/// Runs the documentation pipeline for `C` with the process arguments.
///
/// # Errors
///
/// Returns a [`GenError`] when settings cannot be loaded, logging cannot be
/// installed, the configuration cannot be documented or the output cannot be
/// written.
pub fn run<C>(roots: &[RootBlock]) -> Result<(), GenError>
where
    C: ConfigSchema + RegisterFlags + Default,
{
    let args = Args::parse();
    let settings = Settings::load(&args)?;
    logging::init(&settings.log_level)?;
    generate(&C::default(), roots, &settings)
}

/// Builds the IR of `config` and writes it where `settings` points.
///
/// # Errors
///
/// Returns a [`GenError`] when documenting or writing fails.
pub fn generate<C>(config: &C, roots: &[RootBlock], settings: &Settings) -> Result<(), GenError>
where
    C: ConfigSchema + RegisterFlags,
{
    let ir = build_ir(config, roots, settings)?;
    let content = output::render(&ir, settings.pretty)?;
    match &settings.out {
        Some(path) => {
            let written = output::write_ir(path, &content)?;
            info!(path = %written, blocks = ir.blocks.len(), "wrote configuration reference");
        }
        None => output::write_stdout(&content)?,
    }
    Ok(())
}

/// Documents `config` and converts the tree to IR.
///
/// Duplicated blocks are normalised unless `settings.deduplicate` is off.
///
/// # Errors
///
/// Returns [`GenError::Document`] when flag registration or the walk fails.
pub fn build_ir<C>(
    config: &C,
    roots: &[RootBlock],
    settings: &Settings,
) -> Result<DocumentIr, GenError>
where
    C: ConfigSchema + RegisterFlags,
{
    let registry = FlagRegistry::from_config(config)?;
    let mut doc = flagdoc::walk_config::<C>(&registry, roots)?;
    if settings.deduplicate {
        let summary = flagdoc::annotate_flag_prefix(&mut doc);
        debug!(
            groups = summary.duplicate_groups,
            prefixed = summary.prefixed_blocks,
            rewritten = summary.rewritten_flags,
            "normalized duplicated blocks"
        );
    }
    Ok(DocumentIr::from_doc(&doc))
}
