//! Descriptor registry.
//!
//! A [`Registry`] is built once, validated once, and then only read by the
//! scanner. Lookups return every descriptor sharing a name, in registration
//! order.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Descriptor, OptionDescriptor, OptionKind, OthersDescriptor};
use crate::validate::{ConfigurationError, validate_descriptors};

/// Validated, indexed set of option and others descriptors.
///
/// # Examples
///
/// ```
/// use cmdbind_core::*;
///
/// let registry = Registry::builder()
///     .option(OptionDescriptor::flag(Some('v'), Some("verbose")))
///     .option(OptionDescriptor::parameter(Some('n'), Some("count")))
///     .others(OthersDescriptor::new("files"))
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.find_long("count").count(), 1);
/// assert!(registry.find_short('v').all(|d| d.is_flag()));
/// assert_eq!(registry.others().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    options: Vec<OptionDescriptor>,
    others: Vec<OthersDescriptor>,
    by_long: HashMap<String, Vec<usize>>,
    by_short: HashMap<char, Vec<usize>>,
}

impl Registry {
    /// Returns a new [`RegistryBuilder`].
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Validates and indexes `descriptors`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] listing every unreachable descriptor
    /// and every name declared both as a flag and as a parameter.
    pub fn build<I, D>(descriptors: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = D>,
        D: Into<Descriptor>,
    {
        let mut options = Vec::new();
        let mut others = Vec::new();
        for descriptor in descriptors {
            match descriptor.into() {
                Descriptor::Option(mut option) => {
                    option.normalize();
                    options.push(option);
                }
                Descriptor::Others(other) => others.push(other),
            }
        }

        let errors = validate_descriptors(&options);
        if !errors.is_empty() {
            return Err(ConfigurationError(errors));
        }

        let mut by_long: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_short: HashMap<char, Vec<usize>> = HashMap::new();
        for (index, option) in options.iter().enumerate() {
            if let Some(long) = &option.long {
                by_long.entry(long.clone()).or_default().push(index);
            }
            if let Some(short) = option.short {
                by_short.entry(short).or_default().push(index);
            }
        }

        debug!(
            options = options.len(),
            others = others.len(),
            "built descriptor registry"
        );

        Ok(Self {
            options,
            others,
            by_long,
            by_short,
        })
    }

    /// All option descriptors, in registration order.
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// All others sinks, in registration order.
    pub fn others(&self) -> &[OthersDescriptor] {
        &self.others
    }

    /// Option descriptors that are flags.
    pub fn flags(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.iter().filter(|o| o.is_flag())
    }

    /// Option descriptors that are parameters.
    pub fn parameters(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.iter().filter(|o| o.is_parameter())
    }

    /// Descriptors with the long name `name`.
    pub fn find_long<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a OptionDescriptor> + use<'a> {
        self.indices(self.by_long.get(name))
    }

    /// Descriptors of `kind` with the long name `name`.
    pub fn find_long_kind<'a>(
        &'a self,
        name: &str,
        kind: OptionKind,
    ) -> impl Iterator<Item = &'a OptionDescriptor> + use<'a> {
        self.find_long(name).filter(move |o| o.kind == kind)
    }

    /// Descriptors with the short name `name`.
    pub fn find_short(&self, name: char) -> impl Iterator<Item = &OptionDescriptor> {
        self.indices(self.by_short.get(&name))
    }

    /// Distinct long names registered for `kind`, in registration order.
    pub fn long_names(&self, kind: OptionKind) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for option in self.options.iter().filter(|o| o.kind == kind) {
            if let Some(long) = option.long.as_deref() {
                if !names.contains(&long) {
                    names.push(long);
                }
            }
        }
        names
    }

    /// Distinct short names registered for `kind`, in registration order.
    pub fn short_names(&self, kind: OptionKind) -> Vec<char> {
        let mut names = Vec::new();
        for short in self.options.iter().filter(|o| o.kind == kind).filter_map(|o| o.short) {
            if !names.contains(&short) {
                names.push(short);
            }
        }
        names
    }

    /// Position of `descriptor` in [`options`](Self::options).
    pub(crate) fn index_of(&self, descriptor: &OptionDescriptor) -> Option<usize> {
        self.options.iter().position(|o| std::ptr::eq(o, descriptor))
    }

    fn indices<'a>(
        &'a self,
        indices: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a OptionDescriptor> {
        indices
            .into_iter()
            .flatten()
            .map(move |&index| &self.options[index])
    }
}

/// Collects descriptors for [`Registry::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<Descriptor>,
}

impl RegistryBuilder {
    /// Adds a flag or parameter.
    pub fn option(mut self, descriptor: OptionDescriptor) -> Self {
        self.descriptors.push(Descriptor::Option(descriptor));
        self
    }

    /// Adds an others sink.
    pub fn others(mut self, descriptor: OthersDescriptor) -> Self {
        self.descriptors.push(Descriptor::Others(descriptor));
        self
    }

    /// Validates and indexes the collected descriptors.
    ///
    /// # Errors
    ///
    /// See [`Registry::build`].
    pub fn build(self) -> Result<Registry, ConfigurationError> {
        Registry::build(self.descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;

    fn sample_registry() -> Registry {
        Registry::builder()
            .option(OptionDescriptor::flag(Some('a'), Some("sample1")))
            .option(OptionDescriptor::flag(Some('b'), None))
            .option(OptionDescriptor::parameter(Some('n'), Some("count")))
            .option(OptionDescriptor::parameter(None, Some("count")).bound_to("count_copy"))
            .others(OthersDescriptor::new("rest"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_resolves_each_name_to_its_declarer() {
        let registry = sample_registry();

        let sample1: Vec<_> = registry.find_long("sample1").collect();
        assert_eq!(sample1.len(), 1);
        assert_eq!(sample1[0].short, Some('a'));

        let b: Vec<_> = registry.find_short('b').collect();
        assert_eq!(b.len(), 1);
        assert!(b[0].is_flag());

        let targets: Vec<_> = registry.find_long("count").map(|d| d.target()).collect();
        assert_eq!(targets, vec!["count", "count_copy"]);

        assert_eq!(registry.find_long("missing").count(), 0);
        assert_eq!(registry.find_short('z').count(), 0);
    }

    #[test]
    fn test_find_long_kind_filters() {
        let registry = sample_registry();

        assert_eq!(registry.find_long_kind("count", OptionKind::Parameter).count(), 2);
        assert_eq!(registry.find_long_kind("count", OptionKind::Flag).count(), 0);
    }

    #[test]
    fn test_name_listings() {
        let registry = sample_registry();

        assert_eq!(registry.long_names(OptionKind::Flag), vec!["sample1"]);
        assert_eq!(registry.long_names(OptionKind::Parameter), vec!["count"]);
        assert_eq!(registry.short_names(OptionKind::Flag), vec!['a', 'b']);
        assert_eq!(registry.flags().count(), 2);
        assert_eq!(registry.parameters().count(), 2);
    }

    #[test]
    fn test_build_rejects_flag_parameter_conflict() {
        let err = Registry::builder()
            .option(OptionDescriptor::flag(None, Some("foo")))
            .option(OptionDescriptor::parameter(None, Some("foo")))
            .build()
            .unwrap_err();

        assert_eq!(
            err.problems(),
            &[ValidationError::NameConflict("--foo".to_string())]
        );
        assert!(err.to_string().contains("--foo"));
    }

    #[test]
    fn test_build_from_descriptor_list() {
        let descriptors: Vec<Descriptor> = vec![
            OptionDescriptor::flag(Some('q'), Some("quiet")).into(),
            OthersDescriptor::new("a").into(),
            OthersDescriptor::new("b").into(),
        ];

        let registry = Registry::build(descriptors).unwrap();
        assert_eq!(registry.options().len(), 1);
        assert_eq!(registry.others().len(), 2);
    }

    #[test]
    fn test_index_of_uses_identity() {
        let registry = sample_registry();
        let second = registry.find_long("count").nth(1).unwrap();

        assert_eq!(registry.index_of(second), Some(3));
        let detached = OptionDescriptor::parameter(None, Some("count"));
        assert_eq!(registry.index_of(&detached), None);
    }
}
