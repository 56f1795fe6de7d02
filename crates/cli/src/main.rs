// crosscheck CLI - config-driven reconciliation of two keyed tabular sources

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crosscheck_recon::config::SourceConfig;
use crosscheck_recon::model::Side;
use crosscheck_recon::{reconcile, ReconError, ReconcileConfig, ReconcileOutput, Record};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_MISMATCH, EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "xcheck")]
#[command(about = "Field-level reconciliation of two keyed tabular sources")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  xcheck run recon.toml
  xcheck run recon.toml --json
  xcheck run recon.toml --output result.json")]
    Run {
        /// Path to the .toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  xcheck validate recon.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output } => cmd_run(config, json, output),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: msg.into(), hint: None }
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self { code: EXIT_LOAD, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::load(format!("cannot read config: {e}")))?;

    let config = ReconcileConfig::from_toml(&config_str)
        .map_err(|e| CliError::invalid_config(e.to_string()))?;

    // Source and report paths resolve relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input = load_source(base_dir, &config.input, Side::Input)?;
    let extract = load_source(base_dir, &config.output, Side::Output)?;

    let result = reconcile(&config, &input, &extract).map_err(engine_error)?;

    if let Some(ref report) = config.report {
        write_report(&base_dir.join(report), &result)?;
    }

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let report = &result.report;
    eprintln!(
        "recon '{}': {} rows — {} passed, {} failed, {} degraded field(s)",
        result.meta.config_name, report.rows, report.passed, report.failed, report.degraded_fields,
    );

    if report.failed > 0 {
        return Err(CliError {
            code: EXIT_MISMATCH,
            message: format!("{} row(s) failed reconciliation", report.failed),
            hint: None,
        });
    }

    Ok(())
}

fn engine_error(err: ReconError) -> CliError {
    match err {
        ReconError::SchemaMismatch { .. } => CliError::load(err.to_string())
            .with_hint("the key column must exist in both sources".to_string()),
        ReconError::Comparison { .. } => CliError::runtime(err.to_string())
            .with_hint("remove the field from rounded_fields or clean the source cell".to_string()),
        other => CliError::runtime(other.to_string()),
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| CliError::load(format!("cannot read config: {e}")))?;

    let config = ReconcileConfig::from_toml(&config_str)
        .map_err(|e| CliError::invalid_config(e.to_string()))?;

    eprintln!(
        "valid: recon '{}' keyed on '{}'/'{}' with {} rounded field(s)",
        config.name,
        config.key.input,
        config.key.output,
        config.rounded_fields.len(),
    );

    Ok(())
}

// ============================================================================
// loaders and writers
// ============================================================================

/// Dispatch to the CSV or Excel loader by file extension.
fn load_source(base_dir: &Path, source: &SourceConfig, side: Side) -> Result<Vec<Record>, CliError> {
    let path = base_dir.join(&source.file);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let records = match ext.as_str() {
        "csv" | "tsv" | "txt" => crosscheck_io::csv::load_records(&path)
            .map_err(|e| CliError::load(format!("{side} source: {e}")))?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => {
            crosscheck_io::xlsx::load_records(&path, source.sheet.as_deref())
                .map_err(|e| CliError::load(format!("{side} source: {e}")))?
        }
        other => {
            return Err(CliError::usage(format!(
                "unsupported {side} source type: {other:?}"
            ))
            .with_hint("supported extensions: csv, tsv, txt, xlsx, xlsm, xls, xlsb, ods"));
        }
    };

    if records.is_empty() {
        eprintln!("warning: {side} source {} has no data rows", path.display());
    }

    Ok(records)
}

/// Persist the result tables: an `.xlsx` report becomes a three-sheet
/// workbook, anything else a trio of CSV files next to the given path.
fn write_report(path: &Path, output: &ReconcileOutput) -> Result<(), CliError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ext == "xlsx" {
        crosscheck_io::xlsx::write_workbook(path, output)
            .map_err(|e| CliError::runtime(e.to_string()))?;
    } else {
        crosscheck_io::csv::write_report(path, output)
            .map_err(|e| CliError::runtime(e.to_string()))?;
    }

    eprintln!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
name = "cli test"
report = "result.csv"

[key]
input = "Id"
output = "Id"

[input]
file = "source.csv"

[output]
file = "target.csv"
"#;

    fn seed(dir: &Path) -> PathBuf {
        std::fs::write(dir.join("source.csv"), "Id,Name\n1,Apple\n2,Pear\n").unwrap();
        std::fs::write(dir.join("target.csv"), "Id,Name\n1,Apple\n2,Plum\n").unwrap();
        let config_path = dir.join("recon.toml");
        std::fs::write(&config_path, CONFIG).unwrap();
        config_path
    }

    #[test]
    fn run_exits_with_mismatch_code_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = seed(dir.path());

        let err = cmd_run(config_path, false, None).unwrap_err();
        assert_eq!(err.code, EXIT_MISMATCH);

        // report paths resolve relative to the config directory
        assert!(dir.path().join("result.csv").exists());
        assert!(dir.path().join("result_mismatches.csv").exists());
        assert!(dir.path().join("result_summary.csv").exists());
    }

    #[test]
    fn run_writes_json_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = seed(dir.path());
        let json_path = dir.path().join("result.json");

        let _ = cmd_run(config_path, false, Some(json_path.clone()));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["meta"]["config_name"], "cli test");
        assert_eq!(json["report"]["failed"], 1);
    }

    #[test]
    fn unsupported_source_extension_is_a_usage_error() {
        let source = SourceConfig { file: "data.parquet".into(), sheet: None };
        let err = load_source(Path::new("."), &source, Side::Input).unwrap_err();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.is_some());
    }

    #[test]
    fn validate_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("recon.toml");
        std::fs::write(&config_path, "name = \"\"\n").unwrap();

        let err = cmd_validate(config_path).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
    }
}
