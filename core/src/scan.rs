//! The argument scanner.
//!
//! A single left-to-right pass over the argument vector. Each token is
//! classified by [`classify`](crate::classify), resolved against the
//! [`Registry`] and handed to the [`Binder`] the moment it resolves.
//! Tokens no switch claims are collected in order and flushed to every
//! others sink once the whole vector has been consumed.
//!
//! The scan never exits the process. Failures come back as a
//! [`UsageError`]; [`scan_or_exit`](crate::scan_or_exit) turns them into
//! the help-and-exit behavior.

use tracing::{debug, trace};

use crate::binder::Binder;
use crate::config::ScanConfig;
use crate::error::UsageError;
use crate::grammar::{Token, classify, looks_like_switch, unescape};
use crate::registry::Registry;
use crate::types::{OptionDescriptor, OptionKind};

/// Outcome of a successful scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// A bare `-` asked for standard input redirection.
    pub redirect_stdin: bool,
    /// Residual arguments, in order, as handed to the others sinks.
    pub others: Vec<String>,
    /// `(registry index, raw value)` for every option binding, in order.
    resolved: Vec<(usize, String)>,
}

impl ScanReport {
    /// Returns `true` if the descriptor at `index` in
    /// [`Registry::options`] received a value.
    pub fn was_bound(&self, index: usize) -> bool {
        self.resolved.iter().any(|(i, _)| *i == index)
    }

    /// Raw values bound to the descriptor at `index`, in order.
    pub fn values_of(&self, index: usize) -> impl Iterator<Item = &str> {
        self.resolved
            .iter()
            .filter(move |(i, _)| *i == index)
            .map(|(_, value)| value.as_str())
    }

    /// Required descriptors that never received a value.
    ///
    /// The scan itself does not enforce `required`; callers opt in by
    /// checking this after a successful scan.
    pub fn missing_required<'r>(&self, registry: &'r Registry) -> Vec<&'r OptionDescriptor> {
        registry
            .options()
            .iter()
            .enumerate()
            .filter(|(index, option)| option.required && !self.was_bound(*index))
            .map(|(_, option)| option)
            .collect()
    }

    /// Bound values outside their descriptor's allowed values.
    pub fn disallowed_values<'r>(
        &'r self,
        registry: &'r Registry,
    ) -> Vec<(&'r OptionDescriptor, &'r str)> {
        self.resolved
            .iter()
            .filter_map(|(index, value)| {
                let option = registry.options().get(*index)?;
                (!option.accepts(value)).then_some((option, value.as_str()))
            })
            .collect()
    }
}

/// Scans `args` against `registry`, pushing every resolved value through
/// `binder`.
///
/// `args` excludes the program name. On success every others sink in the
/// registry receives the residual arguments and the report says whether a
/// bare `-` asked for standard input.
///
/// # Errors
///
/// Returns the first [`UsageError`] met. Nothing is flushed to the others
/// sinks in that case, though options resolved before the failure have
/// already been bound.
///
/// # Examples
///
/// ```
/// use cmdbind_core::*;
///
/// let registry = Registry::builder()
///     .option(OptionDescriptor::flag(Some('a'), None))
///     .option(OptionDescriptor::flag(Some('b'), None))
///     .build()
///     .unwrap();
///
/// let mut bindings = Bindings::default();
/// let report = scan(&["-ab-"], &registry, &mut bindings, &ScanConfig::default()).unwrap();
///
/// assert_eq!(bindings.last("a"), Some("true"));
/// assert_eq!(bindings.last("b"), Some("false"));
/// assert!(!report.redirect_stdin);
///
/// let err = scan(&["-c"], &registry, &mut bindings, &ScanConfig::default()).unwrap_err();
/// assert_eq!(err, UsageError::UnknownShortOption('c'));
/// ```
pub fn scan<S, B>(
    args: &[S],
    registry: &Registry,
    binder: &mut B,
    config: &ScanConfig,
) -> Result<ScanReport, UsageError>
where
    S: AsRef<str>,
    B: Binder + ?Sized,
{
    Scanner {
        args,
        registry,
        binder,
        config,
        index: 0,
        end_of_switches: false,
        redirect_stdin: false,
        others: Vec::new(),
        resolved: Vec::new(),
    }
    .run()
}

struct Scanner<'a, S, B: ?Sized> {
    args: &'a [S],
    registry: &'a Registry,
    binder: &'a mut B,
    config: &'a ScanConfig,
    index: usize,
    end_of_switches: bool,
    redirect_stdin: bool,
    others: Vec<String>,
    resolved: Vec<(usize, String)>,
}

impl<'a, S, B> Scanner<'a, S, B>
where
    S: AsRef<str>,
    B: Binder + ?Sized,
{
    fn run(mut self) -> Result<ScanReport, UsageError> {
        let args = self.args;
        while self.index < args.len() {
            let raw = args[self.index].as_ref();
            self.index += 1;

            if self.end_of_switches {
                self.others.push(raw.to_string());
            } else {
                self.handle(raw)?;
            }
        }

        for sink in self.registry.others() {
            self.binder.bind_others(sink, &self.others);
        }
        debug!(
            others = self.others.len(),
            bindings = self.resolved.len(),
            redirect_stdin = self.redirect_stdin,
            "scan complete"
        );

        Ok(ScanReport {
            redirect_stdin: self.redirect_stdin,
            others: self.others,
            resolved: self.resolved,
        })
    }

    fn handle(&mut self, raw: &str) -> Result<(), UsageError> {
        let token = classify(raw, self.config);
        trace!(raw, ?token, "classified token");

        match token {
            Token::EndOfSwitches => self.end_of_switches = true,
            Token::StdinRedirect => {
                if !self.config.allow_stdin_redirect {
                    return Err(UsageError::CannotRedirectStdin);
                }
                self.redirect_stdin = true;
            }
            Token::Help => return Err(UsageError::HelpRequested),
            Token::Escaped(literal) | Token::Positional(literal) => {
                self.others.push(literal.to_string());
            }
            Token::Long {
                name,
                value: Some(value),
            } => self.long_with_value(name, value)?,
            Token::Long { name, value: None } => self.long(name)?,
            Token::ShortCluster(cluster) => self.short_cluster(cluster)?,
        }
        Ok(())
    }

    /// `--name=value`: only parameters take an inline value.
    fn long_with_value(&mut self, name: &str, value: &str) -> Result<(), UsageError> {
        let registry = self.registry;
        let Some(descriptor) = registry
            .find_long_kind(name, OptionKind::Parameter)
            .next()
        else {
            return Err(UsageError::UnknownLongOption(name.to_string()));
        };
        self.bind(descriptor, value);
        Ok(())
    }

    fn long(&mut self, name: &str) -> Result<(), UsageError> {
        let registry = self.registry;
        let Some(descriptor) = registry.find_long(name).next() else {
            return Err(UsageError::UnknownLongOption(name.to_string()));
        };

        if descriptor.is_flag() {
            self.bind(descriptor, "true");
            return Ok(());
        }

        let args = self.args;
        let Some(value) = args.get(self.index).map(S::as_ref) else {
            return Err(UsageError::MissingArgument(format!("--{name}")));
        };
        self.index += 1;
        self.bind(descriptor, value);
        Ok(())
    }

    /// Resolves each character of `-abc`; a `-` right after a character
    /// negates it.
    fn short_cluster(&mut self, cluster: &str) -> Result<(), UsageError> {
        let mut chars = cluster.chars().peekable();
        while let Some(name) = chars.next() {
            let negated = chars.next_if_eq(&'-').is_some();
            self.short(name, negated)?;
        }
        Ok(())
    }

    fn short(&mut self, name: char, negated: bool) -> Result<(), UsageError> {
        let registry = self.registry;
        let Some(descriptor) = registry.find_short(name).next() else {
            return Err(UsageError::UnknownShortOption(name));
        };

        if descriptor.is_flag() {
            self.bind(descriptor, if negated { "false" } else { "true" });
            return Ok(());
        }

        // A parameter takes the next whole argument, not the rest of the
        // cluster; any characters left in the cluster resolve on their own.
        let value = self.short_value(name)?;
        self.bind(descriptor, value);
        Ok(())
    }

    fn short_value(&mut self, name: char) -> Result<&'a str, UsageError> {
        let args = self.args;
        let value = match args.get(self.index).map(S::as_ref) {
            Some(value) if !looks_like_switch(value) => value,
            _ => return Err(UsageError::MissingArgument(format!("-{name}"))),
        };
        self.index += 1;
        Ok(unescape(value))
    }

    /// Binds the first descriptor registered under the resolved name.
    fn bind(&mut self, descriptor: &OptionDescriptor, value: &str) {
        debug!(
            option = %descriptor.canonical_name(),
            target = %descriptor.target(),
            value,
            "bound option"
        );
        if let Some(index) = self.registry.index_of(descriptor) {
            self.resolved.push((index, value.to_string()));
        }
        self.binder.bind_option(descriptor, value);
    }
}
