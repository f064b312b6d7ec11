//! Diagnostic logging for documentation runs.
//!
//! Logs go to standard error so the IR can be piped from standard output.

use tracing_subscriber::EnvFilter;

use crate::error::GenError;

/// Parses `directives` into a filter.
///
/// # Errors
///
/// Returns [`GenError::LogFilter`] when a directive is malformed.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, GenError> {
    EnvFilter::try_new(directives).map_err(|source| GenError::LogFilter {
        filter: directives.to_owned(),
        source,
    })
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
///
/// # Errors
///
/// Returns [`GenError::LogFilter`] for malformed directives and
/// [`GenError::Logging`] when a global subscriber is already installed.
pub fn init(level: &str) -> Result<(), GenError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| level.to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(parse_filter(&directives)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| GenError::Logging(err.to_string()))
}
