//! Error types for `flagdoc-gen`.

use camino::Utf8PathBuf;
use flagdoc::FlagdocError;
use thiserror::Error;

/// Errors surfaced by the `flagdoc-gen` pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenError {
    /// Building the documentation tree failed.
    #[error(transparent)]
    Document(#[from] FlagdocError),

    /// The layered settings could not be extracted.
    #[error("failed to load settings: {0}")]
    Settings(#[from] Box<figment::Error>),

    /// A settings file named explicitly does not exist.
    #[error("settings file {0} does not exist")]
    MissingConfig(Utf8PathBuf),

    /// The IR could not be serialised.
    #[error("failed to serialise IR JSON: {0}")]
    IrJson(#[from] serde_json::Error),

    /// The configured log filter is not a valid directive list.
    #[error("invalid log filter '{filter}': {source}")]
    LogFilter {
        /// Directive string as configured.
        filter: String,
        /// Parser failure.
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber could not be installed.
    #[error("failed to install the log subscriber: {0}")]
    Logging(String),

    /// The output path has no file name component.
    #[error("output path {0} does not name a file")]
    InvalidOutput(Utf8PathBuf),

    /// Reading or writing a file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: Utf8PathBuf,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
}
