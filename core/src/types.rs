//! Descriptor type definitions.
//!
//! An [`OptionDescriptor`] describes one flag or parameter, an
//! [`OthersDescriptor`] describes a sink for the positional arguments no
//! switch claimed. Both are plain values: they carry no storage of their own
//! and only name a binding target that a [`Binder`](crate::Binder) knows how
//! to write to.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Values a flag can be bound to, in the order they are reported.
pub const FLAG_VALUES: [&str; 2] = ["true", "false"];

/// Whether an option stands alone or consumes a value.
///
/// # Examples
///
/// ```
/// use cmdbind_core::OptionKind;
///
/// assert_eq!(OptionKind::Flag.to_string(), "flag");
/// assert_eq!(OptionKind::Parameter.to_string(), "parameter");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Boolean switch, never consumes a following token.
    Flag,
    /// Always consumes exactly one value.
    Parameter,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Flag => f.write_str("flag"),
            OptionKind::Parameter => f.write_str("parameter"),
        }
    }
}

/// Descriptor for one bindable option.
///
/// Use [`flag`](OptionDescriptor::flag) and
/// [`parameter`](OptionDescriptor::parameter) to create descriptors, then
/// chain builder methods such as
/// [`with_documentation`](OptionDescriptor::with_documentation).
///
/// # Examples
///
/// ```
/// use cmdbind_core::{OptionDescriptor, OptionKind};
///
/// let verbose = OptionDescriptor::flag(Some('v'), Some("verbose"))
///     .with_documentation("Print more output");
/// assert_eq!(verbose.kind, OptionKind::Flag);
/// assert_eq!(verbose.canonical_name(), "--verbose");
/// assert_eq!(verbose.allowed_values, vec!["true", "false"]);
///
/// let count = OptionDescriptor::parameter(Some('n'), Some("count")).required();
/// assert!(count.required);
/// assert_eq!(count.target(), "count");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Flag or parameter.
    pub kind: OptionKind,
    /// Long form without the leading `--` (e.g. "count").
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_long"
    )]
    pub long: Option<String>,
    /// Short form without the leading `-`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_short"
    )]
    pub short: Option<char>,
    /// Recorded only; see [`ScanReport::missing_required`](crate::ScanReport::missing_required).
    #[serde(default)]
    pub required: bool,
    /// Accepted values. Empty means unrestricted.
    #[serde(default)]
    pub allowed_values: Vec<String>,
    /// Help text.
    #[serde(default)]
    pub documentation: String,
    /// Handle naming the caller storage this option is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

impl OptionDescriptor {
    /// Creates a flag. Its allowed values are fixed to `true` and `false`.
    pub fn flag(short: Option<char>, long: Option<&str>) -> Self {
        Self::new(OptionKind::Flag, short, long)
    }

    /// Creates a parameter that consumes one value.
    pub fn parameter(short: Option<char>, long: Option<&str>) -> Self {
        Self::new(OptionKind::Parameter, short, long)
    }

    /// Creates a descriptor of the given kind.
    ///
    /// The long name is trimmed; an empty long name and the NUL short name
    /// both mean "no such form".
    pub fn new(kind: OptionKind, short: Option<char>, long: Option<&str>) -> Self {
        let allowed_values = match kind {
            OptionKind::Flag => FLAG_VALUES.iter().map(|v| v.to_string()).collect(),
            OptionKind::Parameter => Vec::new(),
        };
        Self {
            kind,
            long: long.map(str::trim).filter(|l| !l.is_empty()).map(String::from),
            short: short.filter(|c| *c != '\0'),
            required: false,
            allowed_values,
            documentation: String::new(),
            target: None,
        }
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds help text.
    pub fn with_documentation(mut self, doc: &str) -> Self {
        self.documentation = doc.trim().to_string();
        self
    }

    /// Restricts a parameter to the given values. Ignored for flags.
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.kind == OptionKind::Parameter {
            self.allowed_values = values.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Binds the option to a named target instead of its canonical name.
    pub fn bound_to(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// Returns `true` for flags.
    pub fn is_flag(&self) -> bool {
        self.kind == OptionKind::Flag
    }

    /// Returns `true` for parameters.
    pub fn is_parameter(&self) -> bool {
        self.kind == OptionKind::Parameter
    }

    /// Returns the binding target.
    ///
    /// Falls back to the long name, then the short name, when no explicit
    /// target was set.
    pub fn target(&self) -> Cow<'_, str> {
        match (&self.target, &self.long, self.short) {
            (Some(target), _, _) => Cow::Borrowed(target),
            (None, Some(long), _) => Cow::Borrowed(long),
            (None, None, Some(short)) => Cow::Owned(short.to_string()),
            (None, None, None) => Cow::Borrowed(""),
        }
    }

    /// Returns the name shown to users: `--long` if present, else `-s`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdbind_core::OptionDescriptor;
    ///
    /// assert_eq!(OptionDescriptor::flag(Some('q'), None).canonical_name(), "-q");
    /// assert_eq!(OptionDescriptor::flag(Some('q'), Some("quiet")).canonical_name(), "--quiet");
    /// ```
    pub fn canonical_name(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    /// Returns `true` if the descriptor has a long or short form.
    pub fn has_name(&self) -> bool {
        self.long.is_some() || self.short.is_some()
    }

    /// Restores the flag value set, which a deserialized flag may lack.
    pub(crate) fn normalize(&mut self) {
        if self.is_flag() {
            self.allowed_values = FLAG_VALUES.iter().map(|v| v.to_string()).collect();
        }
    }

    /// Checks a raw value against [`allowed_values`](Self::allowed_values).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdbind_core::OptionDescriptor;
    ///
    /// let format = OptionDescriptor::parameter(None, Some("format"))
    ///     .with_allowed_values(["json", "yaml"]);
    /// assert!(format.accepts("json"));
    /// assert!(!format.accepts("toml"));
    ///
    /// let any = OptionDescriptor::parameter(None, Some("name"));
    /// assert!(any.accepts("anything"));
    /// ```
    pub fn accepts(&self, value: &str) -> bool {
        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == value)
    }
}

/// How an others sink wants its values materialized.
///
/// Scanning is unaffected; the distinction is passed through to the
/// [`Binder`](crate::Binder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OthersArity {
    /// Fixed-size array sized to the collected values.
    FixedArray,
    /// Growable list (the default).
    #[default]
    GrowableList,
}

/// Sink for the positional arguments no switch claimed.
///
/// # Examples
///
/// ```
/// use cmdbind_core::{OthersArity, OthersDescriptor};
///
/// let files = OthersDescriptor::new("files");
/// assert_eq!(files.arity, OthersArity::GrowableList);
///
/// let fixed = OthersDescriptor::new("inputs").with_arity(OthersArity::FixedArray);
/// assert_eq!(fixed.target, "inputs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OthersDescriptor {
    /// Handle naming the caller storage.
    pub target: String,
    /// Array or list.
    #[serde(default)]
    pub arity: OthersArity,
}

impl OthersDescriptor {
    /// Creates a growable-list sink bound to `target`.
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            arity: OthersArity::GrowableList,
        }
    }

    /// Sets the arity.
    pub fn with_arity(mut self, arity: OthersArity) -> Self {
        self.arity = arity;
        self
    }
}

/// One registration unit handed to [`Registry::build`](crate::Registry::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A flag or parameter.
    Option(OptionDescriptor),
    /// An others sink.
    Others(OthersDescriptor),
}

impl From<OptionDescriptor> for Descriptor {
    fn from(descriptor: OptionDescriptor) -> Self {
        Descriptor::Option(descriptor)
    }
}

impl From<OthersDescriptor> for Descriptor {
    fn from(descriptor: OthersDescriptor) -> Self {
        Descriptor::Others(descriptor)
    }
}

fn de_long<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let long = Option::<String>::deserialize(deserializer)?;
    Ok(long
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty()))
}

fn de_short<'de, D>(deserializer: D) -> Result<Option<char>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let short = Option::<char>::deserialize(deserializer)?;
    Ok(short.filter(|c| *c != '\0'))
}
