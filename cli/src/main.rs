use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use cmdbind_config::{DescriptorFile, load_scan_config};
use cmdbind_core::{Bindings, OptionKind, OptionListing, scan_or_exit};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when `--strict` post-scan checks fail.
const CHECK_FAILURE_EXIT_CODE: i32 = 2;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "cmdbind")]
#[command(about = "Validate option descriptor files and bind argument vectors against them")]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more descriptor files.
    Validate(ValidateArgs),
    /// Scan an argument vector against a descriptor file and print the bindings.
    Scan(ScanArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Descriptor files (.yaml, .yml or .json).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct ScanArgs {
    /// Descriptor file (.yaml, .yml or .json).
    #[arg(long)]
    descriptors: PathBuf,
    /// Scan settings file; replaces any settings embedded in the descriptor file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Accept a bare `-` as a request to read standard input.
    #[arg(long)]
    allow_stdin: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Exit with status 2 if a required option is missing or a value is not allowed.
    #[arg(long)]
    strict: bool,
    /// Arguments to scan, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

/// A bound value outside its option's allowed values.
#[derive(Debug, Serialize)]
struct DisallowedValue {
    option: String,
    value: String,
    allowed: Vec<String>,
}

/// Document printed by `cmdbind scan`.
#[derive(Debug, Serialize)]
struct ScanOutput {
    redirect_stdin: bool,
    bindings: Bindings,
    missing_required: Vec<String>,
    disallowed: Vec<DisallowedValue>,
}

impl ScanOutput {
    fn has_failures(&self) -> bool {
        !self.missing_required.is_empty() || !self.disallowed.is_empty()
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Scan(args) => run_scan(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("cmdbind=debug,cmdbind_core=debug,cmdbind_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    for path in &args.inputs {
        let file = DescriptorFile::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
        let registry = file
            .registry()
            .map_err(|e| format!("{}: {e}", path.display()))?;
        debug!(
            path = %path.display(),
            flags = ?registry.long_names(OptionKind::Flag),
            parameters = ?registry.long_names(OptionKind::Parameter),
            others = registry.others().len(),
            "descriptor file is valid"
        );
    }
    println!("Validated {} descriptor file(s).", args.inputs.len());
    Ok(())
}

fn run_scan(args: ScanArgs) -> Result<(), String> {
    let file = DescriptorFile::load(&args.descriptors)
        .map_err(|e| format!("{}: {e}", args.descriptors.display()))?;
    let registry = file
        .registry()
        .map_err(|e| format!("{}: {e}", args.descriptors.display()))?;

    let mut config = match &args.config {
        Some(path) => {
            load_scan_config(path).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => file.scan_config(),
    };
    if args.allow_stdin {
        config.allow_stdin_redirect = true;
    }

    let program = program_name(&file, &args.descriptors);
    let mut bindings = Bindings::default();
    let report = scan_or_exit(
        args.args.as_slice(),
        &registry,
        &mut bindings,
        &config,
        &OptionListing::new(&program),
    );

    let output = ScanOutput {
        redirect_stdin: report.redirect_stdin,
        missing_required: report
            .missing_required(&registry)
            .iter()
            .map(|option| option.canonical_name())
            .collect(),
        disallowed: report
            .disallowed_values(&registry)
            .into_iter()
            .map(|(option, value)| DisallowedValue {
                option: option.canonical_name(),
                value: value.to_string(),
                allowed: option.allowed_values.clone(),
            })
            .collect(),
        bindings,
    };

    print_output(&output, args.format)?;

    if args.strict && output.has_failures() {
        report_failures(&output);
        std::process::exit(CHECK_FAILURE_EXIT_CODE);
    }
    Ok(())
}

fn program_name(file: &DescriptorFile, path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("program");
    file.program_or(stem).to_string()
}

fn print_output(output: &ScanOutput, format: CliOutputFormat) -> Result<(), String> {
    let rendered = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(output).map_err(|e| e.to_string())?,
        CliOutputFormat::Yaml => serde_yaml::to_string(output).map_err(|e| e.to_string())?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn report_failures(output: &ScanOutput) {
    for name in &output.missing_required {
        eprintln!("missing required option: {name}");
    }
    for entry in &output.disallowed {
        eprintln!(
            "value `{}` is not allowed for {} (expected one of: {})",
            entry.value,
            entry.option,
            entry.allowed.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_prefers_file_setting() {
        let file = DescriptorFile::from_yaml_str("program: greet\n").unwrap();
        assert_eq!(program_name(&file, Path::new("/tmp/opts.yaml")), "greet");

        let file = DescriptorFile::default();
        assert_eq!(program_name(&file, Path::new("/tmp/opts.yaml")), "opts");
    }

    #[test]
    fn test_scan_output_failures() {
        let mut output = ScanOutput {
            redirect_stdin: false,
            bindings: Bindings::default(),
            missing_required: Vec::new(),
            disallowed: Vec::new(),
        };
        assert!(!output.has_failures());

        output.missing_required.push("--name".to_string());
        assert!(output.has_failures());
    }

    #[test]
    fn test_cli_parses_trailing_args() {
        let cli = Cli::try_parse_from([
            "cmdbind", "scan", "--descriptors", "d.yaml", "--", "-ab", "--", "x",
        ])
        .unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.args, vec!["-ab", "--", "x"]);
        assert!(!args.strict);
    }
}
