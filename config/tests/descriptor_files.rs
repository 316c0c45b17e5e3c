use cmdbind_config::{ConfigError, DescriptorFile};
use cmdbind_core::{Bindings, ScanConfig, scan};

const GREP_LIKE: &str = r#"
program: search
options:
  - kind: flag
    short: i
    long: ignore-case
  - kind: flag
    short: c
    long: count
  - kind: parameter
    short: e
    long: regexp
    required: true
others:
  - target: paths
"#;

#[test]
fn test_loaded_registry_drives_a_scan() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.yaml");
    std::fs::write(&path, GREP_LIKE).unwrap();

    let file = DescriptorFile::load(&path).unwrap();
    let registry = file.registry().unwrap();
    let mut bindings = Bindings::default();

    let report = scan(
        &["-ic", "-e", "fo+", "--", "-x.txt", "b.txt"],
        &registry,
        &mut bindings,
        &file.scan_config(),
    )
    .unwrap();

    assert_eq!(bindings.last("ignore-case"), Some("true"));
    assert_eq!(bindings.last("count"), Some("true"));
    assert_eq!(bindings.last("regexp"), Some("fo+"));
    assert_eq!(bindings.others_for("paths").unwrap(), ["-x.txt", "b.txt"]);
    assert!(report.missing_required(&registry).is_empty());
}

#[test]
fn test_missing_required_parameter_is_reported() {
    let file = DescriptorFile::from_yaml_str(GREP_LIKE).unwrap();
    let registry = file.registry().unwrap();
    let mut bindings = Bindings::default();

    let report = scan(&["-i"], &registry, &mut bindings, &ScanConfig::default()).unwrap();

    let missing: Vec<String> = report
        .missing_required(&registry)
        .iter()
        .map(|d| d.canonical_name())
        .collect();
    assert_eq!(missing, vec!["--regexp"]);
}

#[test]
fn test_invalid_names_are_all_reported() {
    let file = DescriptorFile::from_json_str(
        r#"{"options":[
            {"kind":"flag","long":"bad name"},
            {"kind":"parameter"},
            {"kind":"flag","short":"x"},
            {"kind":"parameter","short":"x"}
        ]}"#,
    )
    .unwrap();

    let err = file.registry().unwrap_err();
    let ConfigError::Registry(inner) = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(inner.problems().len(), 3);
    let message = err.to_string();
    assert!(message.contains("bad name"));
    assert!(message.contains("-x"));
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
    let err = DescriptorFile::from_yaml_str("options: [ {kind: sideways} ]").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}
