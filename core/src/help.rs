//! Help display and the fatal exit path.

use std::io::{self, Write};

use crate::binder::Binder;
use crate::config::ScanConfig;
use crate::error::UsageError;
use crate::registry::Registry;
use crate::scan::{ScanReport, scan};
use crate::types::{OptionDescriptor, OptionKind};

/// Shows help for a registry. Called before the process exits on a help
/// request or a usage error.
pub trait HelpDisplay {
    /// Writes help text to `out`.
    fn display(
        &self,
        registry: &Registry,
        config: &ScanConfig,
        out: &mut dyn Write,
    ) -> io::Result<()>;
}

/// Plain listing with one line per option, flags before parameters.
///
/// # Examples
///
/// ```
/// use cmdbind_core::*;
///
/// let registry = Registry::builder()
///     .option(OptionDescriptor::parameter(Some('n'), Some("count")).with_documentation("How many"))
///     .build()
///     .unwrap();
///
/// let mut out = Vec::new();
/// OptionListing::new("demo")
///     .display(&registry, &ScanConfig::default(), &mut out)
///     .unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("usage: demo [options]"));
/// assert!(text.contains("parameters:"));
/// assert!(text.contains("-n, --count <value>"));
/// assert!(text.contains("How many"));
/// ```
#[derive(Debug, Clone)]
pub struct OptionListing {
    program: String,
}

impl OptionListing {
    /// Creates a listing headed by `program`.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl OptionListing {
    fn row(option: &OptionDescriptor) -> (String, &str) {
        let mut names = match (option.short, option.long.as_deref()) {
            (Some(short), Some(long)) => format!("-{short}, --{long}"),
            (Some(short), None) => format!("-{short}"),
            (None, Some(long)) => format!("    --{long}"),
            (None, None) => String::new(),
        };
        if option.is_parameter() {
            names.push_str(" <value>");
        }
        if option.required {
            names.push_str(" (required)");
        }
        (names, option.documentation.as_str())
    }
}

impl HelpDisplay for OptionListing {
    fn display(
        &self,
        registry: &Registry,
        config: &ScanConfig,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let mut usage = format!("usage: {}", self.program);
        let short_flags: String = registry.short_names(OptionKind::Flag).into_iter().collect();
        if !short_flags.is_empty() {
            usage.push_str(&format!(" [-{short_flags}]"));
        }
        usage.push_str(" [options]");
        if !registry.others().is_empty() {
            usage.push_str(" [--] [args...]");
        }
        writeln!(out, "{usage}")?;

        let flags: Vec<_> = registry.flags().map(Self::row).collect();
        let parameters: Vec<_> = registry.parameters().map(Self::row).collect();
        let help = (
            format!("{}, {}", config.help_short_switch(), config.help_long_switch()),
            "Show this help",
        );
        let width = flags
            .iter()
            .chain(&parameters)
            .chain(std::iter::once(&help))
            .map(|(names, _)| names.chars().count())
            .max()
            .unwrap_or(0);

        let sections = [("flags:", flags), ("parameters:", parameters), ("", vec![help])];
        for (title, rows) in sections {
            if rows.is_empty() {
                continue;
            }
            writeln!(out)?;
            if !title.is_empty() {
                writeln!(out, "{title}")?;
            }
            for (names, doc) in rows {
                if doc.is_empty() {
                    writeln!(out, "  {names}")?;
                } else {
                    writeln!(out, "  {names:<width$}  {doc}")?;
                }
            }
        }
        Ok(())
    }
}

/// Scans `args`, or prints help and exits the process with status 1.
///
/// This is the only place the library terminates the process. Usage errors
/// are written to standard error before the help text; a help request
/// prints only the help text.
pub fn scan_or_exit<S, B>(
    args: &[S],
    registry: &Registry,
    binder: &mut B,
    config: &ScanConfig,
    help: &dyn HelpDisplay,
) -> ScanReport
where
    S: AsRef<str>,
    B: Binder + ?Sized,
{
    match scan(args, registry, binder, config) {
        Ok(report) => report,
        Err(err) => exit_with_help(&err, registry, config, help),
    }
}

/// Reports `err`, shows help on standard error and exits.
pub fn exit_with_help(
    err: &UsageError,
    registry: &Registry,
    config: &ScanConfig,
    help: &dyn HelpDisplay,
) -> ! {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    // Errors writing to stderr leave nothing else to report to.
    let _ = write_failure(err, registry, config, help, &mut out);
    let _ = out.flush();
    std::process::exit(err.exit_code())
}

/// Writes what [`exit_with_help`] shows, without exiting.
pub fn write_failure(
    err: &UsageError,
    registry: &Registry,
    config: &ScanConfig,
    help: &dyn HelpDisplay,
    out: &mut dyn Write,
) -> io::Result<()> {
    if !err.is_help() {
        writeln!(out, "error: {err}")?;
    }
    help.display(registry, config, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OthersDescriptor;

    fn registry() -> Registry {
        Registry::builder()
            .option(OptionDescriptor::flag(Some('v'), Some("verbose")).with_documentation("Talk more"))
            .option(OptionDescriptor::flag(Some('q'), None))
            .option(OptionDescriptor::parameter(None, Some("name")).required())
            .others(OthersDescriptor::new("files"))
            .build()
            .unwrap()
    }

    fn render(err: &UsageError, config: &ScanConfig) -> String {
        let mut out = Vec::new();
        write_failure(err, &registry(), config, &OptionListing::new("tool"), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_rows() {
        let text = render(&UsageError::HelpRequested, &ScanConfig::default());

        assert!(text.starts_with("usage: tool [-vq] [options] [--] [args...]\n"));
        assert!(text.contains("-v, --verbose"));
        assert!(text.contains("Talk more"));
        assert!(text.contains("\n  -q\n"));
        assert!(text.contains("--name <value> (required)"));
        assert!(text.contains("-h, --help"));
    }

    #[test]
    fn test_help_request_prints_no_error_line() {
        let text = render(&UsageError::HelpRequested, &ScanConfig::default());
        assert!(!text.contains("error:"));
    }

    #[test]
    fn test_usage_error_precedes_help() {
        let text = render(&UsageError::UnknownShortOption('z'), &ScanConfig::default());
        assert!(text.starts_with("error: unknown option: -z\nusage: tool"));
    }

    #[test]
    fn test_listing_groups_flags_before_parameters() {
        let text = render(&UsageError::HelpRequested, &ScanConfig::default());

        let flags = text.find("flags:\n").unwrap();
        let parameters = text.find("parameters:\n").unwrap();
        let verbose = text.find("--verbose").unwrap();
        let name = text.find("--name").unwrap();
        assert!(flags < verbose && verbose < parameters && parameters < name);
        assert!(text.trim_end().ends_with("Show this help"));
    }

    #[test]
    fn test_listing_uses_configured_help_switch() {
        let config = ScanConfig {
            help_long: "usage".to_string(),
            help_short: '?',
            ..ScanConfig::default()
        };
        let text = render(&UsageError::HelpRequested, &config);
        assert!(text.contains("-?, --usage"));
    }

    #[test]
    fn test_scan_or_exit_returns_report_on_success() {
        let registry = registry();
        let mut bindings = crate::binder::Bindings::default();

        let report = scan_or_exit(
            &["--name", "x", "file"],
            &registry,
            &mut bindings,
            &ScanConfig::default(),
            &OptionListing::new("tool"),
        );

        assert_eq!(report.others, vec!["file"]);
        assert_eq!(bindings.last("name"), Some("x"));
    }
}
