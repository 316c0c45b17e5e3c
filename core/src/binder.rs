//! The binding seam between the scanner and caller-owned storage.

use serde::{Deserialize, Serialize};

use crate::types::{OptionDescriptor, OthersArity, OthersDescriptor};

/// Applies resolved raw values to caller storage.
///
/// The scanner calls [`bind_option`](Binder::bind_option) as soon as an
/// option is resolved and [`bind_others`](Binder::bind_others) once per
/// others sink after a successful scan. Type coercion belongs to the
/// implementation; the scanner treats both calls as infallible.
pub trait Binder {
    /// Applies the raw value of a flag (`"true"`/`"false"`) or parameter.
    fn bind_option(&mut self, descriptor: &OptionDescriptor, raw: &str);

    /// Applies the residual positional arguments, in order.
    fn bind_others(&mut self, descriptor: &OthersDescriptor, values: &[String]);
}

impl<B: Binder + ?Sized> Binder for &mut B {
    fn bind_option(&mut self, descriptor: &OptionDescriptor, raw: &str) {
        (**self).bind_option(descriptor, raw);
    }

    fn bind_others(&mut self, descriptor: &OthersDescriptor, values: &[String]) {
        (**self).bind_others(descriptor, values);
    }
}

/// One recorded [`Binder::bind_option`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionBinding {
    /// Binding target of the descriptor.
    pub target: String,
    /// Raw value.
    pub value: String,
}

/// One recorded [`Binder::bind_others`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OthersBinding {
    /// Binding target of the sink.
    pub target: String,
    /// Array or list.
    pub arity: OthersArity,
    /// Residual arguments.
    pub values: Vec<String>,
}

/// A [`Binder`] that records every call in order.
///
/// Useful on its own when values are consumed as strings, and as a
/// recording double in tests.
///
/// # Examples
///
/// ```
/// use cmdbind_core::*;
///
/// let registry = Registry::builder()
///     .option(OptionDescriptor::parameter(Some('n'), Some("count")))
///     .others(OthersDescriptor::new("files"))
///     .build()
///     .unwrap();
///
/// let mut bindings = Bindings::default();
/// let args = ["-n", "3", "a.txt"].map(String::from);
/// scan(&args, &registry, &mut bindings, &ScanConfig::default()).unwrap();
///
/// assert_eq!(bindings.last("count"), Some("3"));
/// assert_eq!(bindings.others_for("files"), Some(&["a.txt".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    /// Option bindings in call order.
    pub options: Vec<OptionBinding>,
    /// Others bindings in call order.
    pub others: Vec<OthersBinding>,
}

impl Bindings {
    /// Every value bound to `target`, in call order.
    pub fn values<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.options
            .iter()
            .filter(move |b| b.target == target)
            .map(|b| b.value.as_str())
    }

    /// The most recent value bound to `target`.
    pub fn last(&self, target: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|b| b.target == target)
            .map(|b| b.value.as_str())
    }

    /// The residual arguments handed to the sink `target`.
    pub fn others_for(&self, target: &str) -> Option<&[String]> {
        self.others
            .iter()
            .find(|b| b.target == target)
            .map(|b| b.values.as_slice())
    }

    /// Returns `true` if nothing was bound.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.others.is_empty()
    }
}

impl Binder for Bindings {
    fn bind_option(&mut self, descriptor: &OptionDescriptor, raw: &str) {
        self.options.push(OptionBinding {
            target: descriptor.target().into_owned(),
            value: raw.to_string(),
        });
    }

    fn bind_others(&mut self, descriptor: &OthersDescriptor, values: &[String]) {
        self.others.push(OthersBinding {
            target: descriptor.target.clone(),
            arity: descriptor.arity,
            values: values.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_record_in_order() {
        let verbose = OptionDescriptor::flag(Some('v'), Some("verbose"));
        let level = OptionDescriptor::parameter(None, Some("level"));
        let mut bindings = Bindings::default();

        bindings.bind_option(&verbose, "true");
        bindings.bind_option(&level, "1");
        bindings.bind_option(&level, "2");

        assert_eq!(bindings.values("level").collect::<Vec<_>>(), vec!["1", "2"]);
        assert_eq!(bindings.last("level"), Some("2"));
        assert_eq!(bindings.last("verbose"), Some("true"));
        assert_eq!(bindings.last("missing"), None);
    }

    #[test]
    fn test_bindings_keep_others_arity() {
        let sink = OthersDescriptor::new("files").with_arity(OthersArity::FixedArray);
        let mut bindings = Bindings::default();
        assert!(bindings.is_empty());

        bindings.bind_others(&sink, &["a".to_string(), "b".to_string()]);

        assert_eq!(bindings.others[0].arity, OthersArity::FixedArray);
        assert_eq!(bindings.others_for("files").map(<[String]>::len), Some(2));
        assert_eq!(bindings.others_for("other"), None);
    }

    #[test]
    fn test_binder_through_mutable_reference() {
        fn bind_twice(mut binder: impl Binder) {
            let flag = OptionDescriptor::flag(Some('x'), None);
            binder.bind_option(&flag, "true");
            binder.bind_option(&flag, "false");
        }

        let mut bindings = Bindings::default();
        bind_twice(&mut bindings);
        assert_eq!(bindings.values("x").count(), 2);
    }
}
