//! Descriptor validation.
//!
//! Catches descriptors that no token could ever reach and names that are
//! declared both as a flag and as a parameter. Every problem is collected so
//! a single [`ConfigurationError`] describes the whole descriptor set.
//!
//! # Examples
//!
//! ```
//! use cmdbind_core::*;
//!
//! let ok = [OptionDescriptor::flag(Some('v'), Some("verbose"))];
//! assert!(validate_descriptors(&ok).is_empty());
//!
//! let clash = [
//!     OptionDescriptor::flag(None, Some("foo")),
//!     OptionDescriptor::parameter(None, Some("foo")),
//! ];
//! assert_eq!(
//!     validate_descriptors(&clash),
//!     vec![ValidationError::NameConflict("--foo".to_string())]
//! );
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

use crate::types::{OptionDescriptor, OptionKind};

/// A single problem with a descriptor set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Descriptor has neither a long nor a short form.
    #[error("{kind} bound to `{target}` must define a long or short name")]
    MissingName {
        /// Flag or parameter.
        kind: OptionKind,
        /// The descriptor's binding target.
        target: String,
    },
    /// Long name the long-option grammar can never match.
    #[error("invalid long name `{0}`: must not start with `-` or contain whitespace or `=`")]
    InvalidLongName(String),
    /// Short name the short-option grammar can never match.
    #[error("invalid short name {0:?}: must not be `-` or whitespace")]
    InvalidShortName(char),
    /// Same name declared as a flag and as a parameter.
    #[error("`{0}` is declared both as a flag and as a parameter")]
    NameConflict(String),
}

/// Every validation problem found while building a
/// [`Registry`](crate::Registry), one per line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_problems(.0))]
pub struct ConfigurationError(pub Vec<ValidationError>);

impl ConfigurationError {
    /// The individual problems, in the order they were found.
    pub fn problems(&self) -> &[ValidationError] {
        &self.0
    }
}

fn render_problems(problems: &[ValidationError]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validates a list of option descriptors.
///
/// Reports unreachable descriptors first, then long-name conflicts
/// (`--name`), then short-name conflicts (`-c`).
pub fn validate_descriptors(options: &[OptionDescriptor]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for option in options {
        if !option.has_name() {
            errors.push(ValidationError::MissingName {
                kind: option.kind,
                target: option.target().into_owned(),
            });
            continue;
        }

        if let Some(long) = &option.long {
            if !is_valid_long_name(long) {
                errors.push(ValidationError::InvalidLongName(long.clone()));
            }
        }

        if let Some(short) = option.short {
            if short == '-' || short.is_whitespace() {
                errors.push(ValidationError::InvalidShortName(short));
            }
        }
    }

    errors.extend(
        conflicts(options, |o| o.long.clone())
            .into_iter()
            .map(|name| ValidationError::NameConflict(format!("--{name}"))),
    );
    errors.extend(
        conflicts(options, |o| o.short.map(String::from))
            .into_iter()
            .map(|name| ValidationError::NameConflict(format!("-{name}"))),
    );

    errors
}

fn is_valid_long_name(long: &str) -> bool {
    !long.starts_with('-') && !long.contains('=') && !long.chars().any(char::is_whitespace)
}

/// Names that appear both among flags and among parameters, sorted.
fn conflicts<F>(options: &[OptionDescriptor], name: F) -> Vec<String>
where
    F: Fn(&OptionDescriptor) -> Option<String>,
{
    let names_of = |kind: OptionKind| -> BTreeSet<String> {
        options
            .iter()
            .filter(|o| o.kind == kind)
            .filter_map(&name)
            .collect()
    };
    let flags = names_of(OptionKind::Flag);
    let parameters = names_of(OptionKind::Parameter);

    flags.intersection(&parameters).cloned().collect()
}
