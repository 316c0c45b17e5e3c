//! Descriptor files and scan configuration files.
//!
//! Both are plain serde documents. The format is picked from the file
//! extension: `.yaml`/`.yml` for YAML, `.json` for JSON.
//!
//! # Example descriptor file
//!
//! ```yaml
//! program: greet
//! config:
//!   allow_stdin_redirect: true
//! options:
//!   - kind: flag
//!     short: v
//!     long: verbose
//!     documentation: Print more output
//!   - kind: parameter
//!     short: n
//!     long: name
//!     required: true
//! others:
//!   - target: files
//!     arity: growable_list
//! ```

use std::io::BufReader;
use std::path::Path;

use cmdbind_core::{Descriptor, OptionDescriptor, OthersDescriptor, Registry, ScanConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Serialization format of a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl FileFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for any
    /// other extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdbind_config::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_path("opts.yml").unwrap(), FileFormat::Yaml);
    /// assert_eq!(FileFormat::from_path("opts.JSON").unwrap(), FileFormat::Json);
    /// assert!(FileFormat::from_path("opts.toml").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml" | "yml") => Ok(FileFormat::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let document = match format {
        FileFormat::Json => serde_json::from_reader(reader)?,
        FileFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(document)
}

/// Loads a [`ScanConfig`] from a YAML or JSON file.
///
/// Missing fields keep their defaults.
///
/// # Errors
///
/// Returns [`Io`](ConfigError::Io) if the file cannot be read, or a
/// [`Json`](ConfigError::Json)/[`Yaml`](ConfigError::Yaml) error if parsing
/// fails.
pub fn load_scan_config(path: impl AsRef<Path>) -> Result<ScanConfig> {
    let path = path.as_ref();
    let config: ScanConfig = read_document(path)?;
    debug!(path = %path.display(), help_long = %config.help_long, "loaded scan config");
    Ok(config)
}

/// A complete descriptor set as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorFile {
    /// Program name shown in help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// Scan settings that travel with the descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ScanConfig>,
    /// Flags and parameters.
    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
    /// Others sinks.
    #[serde(default)]
    pub others: Vec<OthersDescriptor>,
}

impl DescriptorFile {
    /// Loads a descriptor file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse or [`UnsupportedFormat`](ConfigError::UnsupportedFormat)
    /// error. The descriptors are not validated; see
    /// [`registry`](Self::registry).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file: Self = read_document(path)?;
        debug!(
            path = %path.display(),
            options = file.options.len(),
            others = file.others.len(),
            "loaded descriptor file"
        );
        Ok(file)
    }

    /// Parses a YAML descriptor document.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdbind_config::DescriptorFile;
    ///
    /// let file = DescriptorFile::from_yaml_str(
    ///     "options:\n  - { kind: flag, short: q, long: quiet }\nothers:\n  - target: rest\n",
    /// )
    /// .unwrap();
    /// let registry = file.registry().unwrap();
    /// assert_eq!(registry.find_short('q').count(), 1);
    /// assert_eq!(registry.others().len(), 1);
    /// ```
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Parses a JSON descriptor document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// All descriptors, options first, in file order.
    pub fn descriptors(&self) -> impl Iterator<Item = Descriptor> + '_ {
        self.options
            .iter()
            .cloned()
            .map(Descriptor::Option)
            .chain(self.others.iter().cloned().map(Descriptor::Others))
    }

    /// Validates the descriptors and builds a [`Registry`].
    ///
    /// # Errors
    ///
    /// Returns [`Registry`](ConfigError::Registry) listing every problem.
    pub fn registry(&self) -> Result<Registry> {
        Ok(Registry::build(self.descriptors())?)
    }

    /// The embedded scan settings, or the defaults.
    pub fn scan_config(&self) -> ScanConfig {
        self.config.clone().unwrap_or_default()
    }

    /// The program name, or `fallback`.
    pub fn program_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.program.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdbind_core::{OptionKind, OthersArity, ValidationError};

    fn sample_yaml() -> &'static str {
        r#"
program: greet
config:
  help_short: "?"
  allow_stdin_redirect: true
options:
  - kind: flag
    short: v
    long: verbose
    documentation: Print more output
  - kind: parameter
    short: n
    long: name
    required: true
    allowed_values: [alice, bob]
others:
  - target: files
    arity: fixed_array
"#
    }

    #[test]
    fn test_parse_sample_yaml() {
        let file = DescriptorFile::from_yaml_str(sample_yaml()).unwrap();

        assert_eq!(file.program_or("fallback"), "greet");
        assert_eq!(file.options.len(), 2);
        assert_eq!(file.options[0].kind, OptionKind::Flag);
        assert_eq!(file.options[1].short, Some('n'));
        assert!(file.options[1].required);
        assert_eq!(file.others[0].arity, OthersArity::FixedArray);

        let config = file.scan_config();
        assert_eq!(config.help_short, '?');
        assert_eq!(config.help_long, "help");
        assert!(config.allow_stdin_redirect);
    }

    #[test]
    fn test_registry_from_file_restores_flag_values() {
        let file = DescriptorFile::from_yaml_str(sample_yaml()).unwrap();
        let registry = file.registry().unwrap();

        let verbose = registry.find_long("verbose").next().unwrap();
        assert_eq!(verbose.allowed_values, vec!["true", "false"]);
        assert_eq!(registry.others().len(), 1);
    }

    #[test]
    fn test_registry_error_lists_conflicts() {
        let file = DescriptorFile::from_json_str(
            r#"{"options":[{"kind":"flag","long":"foo"},{"kind":"parameter","long":"foo"}]}"#,
        )
        .unwrap();

        let err = file.registry().unwrap_err();
        match &err {
            ConfigError::Registry(inner) => assert_eq!(
                inner.problems(),
                &[ValidationError::NameConflict("--foo".to_string())]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("--foo"));
    }

    #[test]
    fn test_empty_document_defaults() {
        let file = DescriptorFile::from_json_str("{}").unwrap();

        assert!(file.options.is_empty());
        assert_eq!(file.scan_config(), ScanConfig::default());
        assert_eq!(file.program_or("tool"), "tool");
    }

    #[test]
    fn test_load_from_disk_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("opts.yaml");
        std::fs::write(&yaml_path, sample_yaml()).unwrap();
        let json_path = dir.path().join("opts.json");
        std::fs::write(&json_path, r#"{"options":[{"kind":"flag","short":"x"}]}"#).unwrap();

        assert_eq!(DescriptorFile::load(&yaml_path).unwrap().options.len(), 2);
        assert_eq!(DescriptorFile::load(&json_path).unwrap().options[0].short, Some('x'));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.toml");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            DescriptorFile::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DescriptorFile::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_scan_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.yml");
        std::fs::write(&path, "help_long: usage\n").unwrap();

        let config = load_scan_config(&path).unwrap();
        assert_eq!(config.help_long, "usage");
        assert_eq!(config.help_short, 'h');
    }
}
