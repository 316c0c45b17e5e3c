//! Scan-time errors.
//!
//! Every variant is fatal misuse of the command line: the entry point
//! prints it, shows help and exits with [`USAGE_EXIT_CODE`].

use thiserror::Error;

/// Exit status for help requests and every usage error.
pub const USAGE_EXIT_CODE: i32 = 1;

/// Errors that end a scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// `--name` or `--name=value` with no matching descriptor.
    #[error("unknown option: --{0}")]
    UnknownLongOption(String),

    /// A cluster character with no matching descriptor.
    #[error("unknown option: -{0}")]
    UnknownShortOption(char),

    /// A parameter with no usable value after it.
    #[error("missing argument for option: {0}")]
    MissingArgument(String),

    /// A bare `-` while standard input redirection is disabled.
    #[error("standard input cannot be redirected here")]
    CannotRedirectStdin,

    /// The help switch was given.
    #[error("help requested")]
    HelpRequested,
}

impl UsageError {
    /// Process exit status for this outcome. Always [`USAGE_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        USAGE_EXIT_CODE
    }

    /// Returns `true` for an explicit help request rather than a mistake.
    pub fn is_help(&self) -> bool {
        matches!(self, UsageError::HelpRequested)
    }
}
