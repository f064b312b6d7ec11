//! Error type shared by the registry, the walker and the pipeline.

use thiserror::Error;

/// Structural failures raised while building a documentation tree.
///
/// Every variant is fatal: the pipeline stops and no partial tree is
/// returned.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlagdocError {
    /// A long flag name was registered twice.
    #[error("flag '{name}' registered for '{second}' is already bound to '{first}'")]
    FlagRedefined {
        /// Long flag name registered twice.
        name: String,
        /// Field path the flag was first bound to.
        first: String,
        /// Field path of the rejected registration.
        second: String,
    },

    /// A flag name cannot be used on the command line.
    #[error("invalid flag name '{name}' for '{path}': {reason}")]
    InvalidFlagName {
        /// Offending flag name.
        name: String,
        /// Field path the flag was bound to.
        path: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A configuration type contains itself.
    #[error("cyclic configuration type detected: {cycle}")]
    CyclicType {
        /// Chain of type names forming the cycle.
        cycle: String,
    },

    /// A flag is bound to a path the walker never reached.
    #[error("flag '{flag}' is bound to '{path}', which is not a documented configuration field")]
    UnboundFlag {
        /// Long flag name.
        flag: String,
        /// Field path the flag was bound to.
        path: String,
    },
}
