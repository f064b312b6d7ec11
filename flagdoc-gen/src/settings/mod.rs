//! Layered settings for documentation runs.
//!
//! Values are merged in increasing precedence: built-in defaults, the
//! settings file, `FLAGDOC_*` environment variables and finally the flags
//! actually given on the command line.


use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::error::GenError;

/// Settings file looked up in the working directory.
pub const CONFIG_FILE: &str = "flagdoc.toml";

/// Prefix of the environment variables read as settings.
pub const ENV_PREFIX: &str = "FLAGDOC_";

/// Environment variable naming an alternative settings file.
pub const CONFIG_ENV: &str = "FLAGDOC_CONFIG";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output file. Standard output is used when unset.
    pub out: Option<Utf8PathBuf>,
    /// Emit indented JSON.
    pub pretty: bool,
    /// Normalise the flag names of duplicated blocks.
    pub deduplicate: bool,
    /// Log filter directives.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            out: None,
            pretty: true,
            deduplicate: true,
            log_level: "warn".to_owned(),
        }
    }
}

/// CLI values that override every other layer. Unset flags are omitted so
/// they do not mask lower layers.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    out: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pretty: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deduplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,
}

impl CliOverrides {
    fn from_args(args: &Args) -> Self {
        Self {
            out: args.out.clone(),
            pretty: args.is_compact.then_some(false),
            deduplicate: args.should_skip_dedup.then_some(false),
            log_level: args.log_level.clone(),
        }
    }
}

impl Settings {
    /// Loads the settings for `args`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::MissingConfig`] when an explicitly named settings
    /// file does not exist and [`GenError::Settings`] when a layer holds
    /// values of the wrong type.
    pub fn load(args: &Args) -> Result<Self, GenError> {
        let file = settings_file(args)?;
        layers(&file, args)
            .extract()
            .map_err(|err| GenError::Settings(Box::new(err)))
    }
}

/// Picks the settings file: `--config`, then `FLAGDOC_CONFIG`, then
/// [`CONFIG_FILE`]. Only the default file may be absent.
fn settings_file(args: &Args) -> Result<Utf8PathBuf, GenError> {
    let explicit = args.config.clone().or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(Utf8PathBuf::from)
    });
    match explicit {
        Some(path) if !path.is_file() => Err(GenError::MissingConfig(path)),
        Some(path) => Ok(path),
        None => Ok(Utf8PathBuf::from(CONFIG_FILE)),
    }
}

fn layers(file: &Utf8Path, args: &Args) -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(file.as_std_path()))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .merge(Serialized::defaults(CliOverrides::from_args(args)))
}
