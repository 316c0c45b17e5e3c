//! Per-scan settings.

use serde::{Deserialize, Serialize};

/// Long help switch name used when none is configured.
pub const DEFAULT_HELP_LONG: &str = "help";

/// Short help switch name used when none is configured.
pub const DEFAULT_HELP_SHORT: char = 'h';

/// Settings that shape a single scan.
///
/// Every field has a default, so a partial YAML or JSON document is enough
/// to override one of them.
///
/// # Examples
///
/// ```
/// use cmdbind_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.is_help_switch("--help"));
/// assert!(config.is_help_switch("-h"));
/// assert!(!config.allow_stdin_redirect);
///
/// let config = ScanConfig::default().with_stdin_redirect(true);
/// assert!(config.allow_stdin_redirect);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Long help switch, without the leading `--`.
    pub help_long: String,
    /// Short help switch, without the leading `-`.
    pub help_short: char,
    /// Whether a bare `-` may ask for standard input redirection.
    pub allow_stdin_redirect: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            help_long: DEFAULT_HELP_LONG.to_string(),
            help_short: DEFAULT_HELP_SHORT,
            allow_stdin_redirect: false,
        }
    }
}

impl ScanConfig {
    /// Sets whether a bare `-` is accepted.
    pub fn with_stdin_redirect(mut self, allow: bool) -> Self {
        self.allow_stdin_redirect = allow;
        self
    }

    /// `--help` or its configured replacement.
    pub fn help_long_switch(&self) -> String {
        format!("--{}", self.help_long)
    }

    /// `-h` or its configured replacement.
    pub fn help_short_switch(&self) -> String {
        format!("-{}", self.help_short)
    }

    /// Returns `true` if the trimmed token asks for help.
    pub fn is_help_switch(&self, arg: &str) -> bool {
        arg.strip_prefix("--")
            .is_some_and(|name| !self.help_long.is_empty() && name == self.help_long)
            || arg
                .strip_prefix('-')
                .is_some_and(|rest| rest.chars().eq(std::iter::once(self.help_short)))
    }
}
