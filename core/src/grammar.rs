//! Token classification.
//!
//! Decides what a single argument-vector token is before the scanner looks
//! anything up in the registry. Surrounding whitespace is tolerated by both
//! switch grammars.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ScanConfig;

struct SwitchPatterns {
    /// `--name` or `--name=value`
    long: Regex,
    /// `-abc`
    short: Regex,
}

static PATTERNS: LazyLock<SwitchPatterns> = LazyLock::new(|| SwitchPatterns {
    long: Regex::new(r"^\s*--([^\s=-][^\s=]*)(?:\s*(=)(.+))?\s*$")
        .expect("static regex must compile"),
    short: Regex::new(r"^\s*-([^\s-]\S*)\s*$").expect("static regex must compile"),
});

/// Escape prefix that keeps a dash-led token positional.
pub const ESCAPE_PREFIX: &str = "\\-";

/// Classified argument-vector token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Bare `--`.
    EndOfSwitches,
    /// Bare `-`.
    StdinRedirect,
    /// The configured long or short help switch.
    Help,
    /// `\-...`, carrying the text after the backslash.
    Escaped(&'a str),
    /// `--name` or `--name=value`.
    Long {
        /// Name without the leading dashes.
        name: &'a str,
        /// Inline value after `=`.
        value: Option<&'a str>,
    },
    /// `-abc`, carrying the characters after the dash.
    ShortCluster(&'a str),
    /// Anything else, unchanged.
    Positional(&'a str),
}

/// Classifies one token in the normal (not end-of-switches) state.
///
/// # Examples
///
/// ```
/// use cmdbind_core::{ScanConfig, Token, classify};
///
/// let config = ScanConfig::default();
/// assert_eq!(classify("--", &config), Token::EndOfSwitches);
/// assert_eq!(classify("-h", &config), Token::Help);
/// assert_eq!(
///     classify("--count=5", &config),
///     Token::Long { name: "count", value: Some("5") }
/// );
/// assert_eq!(classify("-ab", &config), Token::ShortCluster("ab"));
/// assert_eq!(classify("\\-odd", &config), Token::Escaped("-odd"));
/// assert_eq!(classify("file.txt", &config), Token::Positional("file.txt"));
/// ```
pub fn classify<'a>(raw: &'a str, config: &ScanConfig) -> Token<'a> {
    let arg = raw.trim();

    if arg == "--" {
        return Token::EndOfSwitches;
    }
    if arg == "-" {
        return Token::StdinRedirect;
    }
    if config.is_help_switch(arg) {
        return Token::Help;
    }
    if raw.starts_with(ESCAPE_PREFIX) {
        return Token::Escaped(unescape(raw));
    }
    if let Some(caps) = PATTERNS.long.captures(raw) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).and(caps.get(3)).map(|m| m.as_str());
        return Token::Long { name, value };
    }
    if let Some(caps) = PATTERNS.short.captures(raw) {
        return Token::ShortCluster(caps.get(1).map_or("", |m| m.as_str()));
    }
    Token::Positional(raw)
}

/// Returns `true` if `raw` matches the long or the short switch grammar.
///
/// A short parameter refuses such a token as its value.
pub fn looks_like_switch(raw: &str) -> bool {
    PATTERNS.long.is_match(raw) || PATTERNS.short.is_match(raw)
}

/// Strips the escape backslash from a `\-...` token.
pub fn unescape(raw: &str) -> &str {
    if raw.starts_with(ESCAPE_PREFIX) {
        &raw[1..]
    } else {
        raw
    }
}
