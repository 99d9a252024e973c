//! Error types for flag parsing and command dispatch.
//!
//! [`FlagError`] covers everything that can go wrong while one dispatch level
//! builds, parses and normalizes its flags. [`RunError`] is the single
//! structured result an [`App`](crate::App) run produces.

use thiserror::Error;

use crate::validate::ValidationError;

/// Failures raised while building, parsing or normalizing one flag set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The argument vector references a name with no registered flag.
    #[error("flag provided but not defined: -{0}")]
    UnknownFlag(String),

    /// A value-taking flag was the last token.
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    /// The kind's textual parser rejected the supplied value.
    #[error("invalid value {value:?} for flag -{flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },

    /// Malformed flag token such as `---x` or `-=x`.
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),

    /// Alias reconciliation failed after parsing.
    #[error("{0}")]
    Normalization(String),

    /// Two flag declarations in one set share a name.
    #[error("flag redefined: {0}")]
    DuplicateFlag(String),

    /// A flag declaration produced no names after splitting.
    #[error("flag must define at least one name")]
    EmptyName,

    /// A flag name that could never be matched on the command line.
    #[error("invalid flag name: {0:?}")]
    InvalidName(String),
}

/// The outcome of a failed [`App::run`](crate::App::run).
#[derive(Debug, Error)]
pub enum RunError {
    /// Parsing or normalization failed at some dispatch level.
    #[error("incorrect usage: {source} (type '{exec} help' for info)")]
    Usage {
        exec: String,
        #[source]
        source: FlagError,
    },

    /// The command tree itself is malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    /// A before hook declined to continue.
    #[error("{level}: {reason}")]
    BeforeRejected { level: String, reason: String },

    /// The help printer could not write its output.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    /// Returns the underlying flag error for usage failures.
    pub fn flag_error(&self) -> Option<&FlagError> {
        match self {
            RunError::Usage { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`RunError`].
pub type Result<T> = std::result::Result<T, RunError>;
