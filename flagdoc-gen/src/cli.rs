//! Command-line interface definitions for `flagdoc-gen`.

use camino::Utf8PathBuf;
use clap::Parser;

/// Parsed CLI arguments shared by every documentation binary.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "flagdoc-gen")]
#[command(about = "Emit the configuration reference as JSON IR")]
#[command(version)]
pub struct Args {
    /// Settings file to load instead of `flagdoc.toml`.
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// File to write the IR to. Standard output is used when omitted.
    #[arg(long, value_name = "path")]
    pub out: Option<Utf8PathBuf>,
    /// Emit single-line JSON.
    #[arg(long = "compact")]
    pub is_compact: bool,
    /// Keep the full flag names of duplicated blocks.
    #[arg(long = "no-dedup")]
    pub should_skip_dedup: bool,
    /// Log filter directives, for example `debug` or `flagdoc=trace`.
    #[arg(long, value_name = "filter")]
    pub log_level: Option<String>,
}
