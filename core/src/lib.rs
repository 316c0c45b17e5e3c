//! Declarative command-line argument binding.
//!
//! Callers describe their options as values instead of annotating storage:
//!
//! - [`OptionDescriptor`]: a flag (`-v`, `--verbose`) or a parameter that
//!   takes one value (`-n 3`, `--count=3`).
//! - [`OthersDescriptor`]: a sink for the positional arguments no switch
//!   claimed.
//! - [`Registry`]: the validated, indexed descriptor set. Building it
//!   rejects unreachable descriptors and names declared both as a flag and
//!   as a parameter, reporting every problem at once.
//!
//! [`scan`] walks an argument vector once, left to right, and pushes each
//! resolved value through a [`Binder`]. It supports short clusters with
//! negation (`-ab-` sets `a` and clears `b`), `--name=value`, `--` to end
//! switch processing, a bare `-` for standard input redirection, and `\-`
//! to pass a dash-led argument literally.
//!
//! Failures come back as a [`UsageError`]. Only [`scan_or_exit`] turns them
//! into the conventional "print the error, show help, exit 1" behavior.
//!
//! # Example
//!
//! ```
//! use cmdbind_core::*;
//!
//! let registry = Registry::builder()
//!     .option(OptionDescriptor::flag(Some('v'), Some("verbose")))
//!     .option(OptionDescriptor::parameter(Some('o'), Some("output")).required())
//!     .others(OthersDescriptor::new("inputs"))
//!     .build()
//!     .unwrap();
//!
//! let args = ["-v", "--output=out.txt", "a.txt", "--", "-b.txt"];
//! let mut bindings = Bindings::default();
//! let report = scan(&args, &registry, &mut bindings, &ScanConfig::default()).unwrap();
//!
//! assert_eq!(bindings.last("verbose"), Some("true"));
//! assert_eq!(bindings.last("output"), Some("out.txt"));
//! assert_eq!(report.others, vec!["a.txt", "-b.txt"]);
//! assert!(report.missing_required(&registry).is_empty());
//! ```

mod binder;
mod config;
mod error;
mod grammar;
mod help;
mod registry;
mod scan;
mod types;
mod validate;

pub use binder::{Binder, Bindings, OptionBinding, OthersBinding};
pub use config::{DEFAULT_HELP_LONG, DEFAULT_HELP_SHORT, ScanConfig};
pub use error::{USAGE_EXIT_CODE, UsageError};
pub use grammar::{ESCAPE_PREFIX, Token, classify, looks_like_switch, unescape};
pub use help::{HelpDisplay, OptionListing, exit_with_help, scan_or_exit, write_failure};
pub use registry::{Registry, RegistryBuilder};
pub use scan::{ScanReport, scan};
pub use types::*;
pub use validate::{ConfigurationError, ValidationError, validate_descriptors};
