//! `sqlx-lint` binary — check Dataform SQLX files against project
//! coding-standard rules and gate CI on the result.
//!
//! Exit codes: 0 when every active check passed or was skipped on every
//! file, 1 when any check failed, 2 for usage/configuration errors.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sqlx_lint::config::{self, ConfigLayer, UsageError};
use sqlx_lint::reporter;
use sqlx_lint::runner::Runner;

#[derive(Debug, Parser)]
#[command(name = "sqlx-lint", version, about = "Static checks for Dataform SQLX files")]
struct Cli {
    /// SQLX files to check.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Comma-separated checks to run (description, schema, columns,
    /// hardcoded_fqns).
    #[arg(long, value_name = "CHECKS")]
    include: Option<String>,

    /// Comma-separated checks to skip.
    #[arg(long, value_name = "CHECKS")]
    exclude: Option<String>,

    /// YAML or JSON file with include/exclude/fail_fast.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop the whole run at the first failing check.
    #[arg(long)]
    fail_fast: bool,

    /// Emit the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match try_main(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("sqlx-lint: {error:#}");
            if error.is::<UsageError>() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

fn try_main(cli: &Cli) -> anyhow::Result<ExitCode> {
    if cli.files.is_empty() {
        return Err(UsageError::NoInputFiles.into());
    }

    let cli_layer = ConfigLayer {
        include: cli.include.as_deref().and_then(config::split_csv),
        exclude: cli.exclude.as_deref().and_then(config::split_csv),
        fail_fast: cli.fail_fast.then_some(true),
    };
    let env_layer = ConfigLayer::from_env()?;
    let file_layer = match &cli.config {
        Some(path) => ConfigLayer::from_file(path)?,
        None => ConfigLayer::default(),
    };

    let run_config = config::resolve(&[cli_layer, env_layer, file_layer])?;

    let files: Vec<String> = cli
        .files
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    let result = Runner::new(&run_config).run(&files);

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        let json = reporter::to_json(&result).map_err(anyhow::Error::msg)?;
        writeln!(stdout, "{json}")?;
    } else {
        reporter::render_text(&mut stdout, &result)?;
    }

    Ok(ExitCode::from(u8::try_from(result.exit_code()).unwrap_or(1)))
}

/// Install a stderr fmt subscriber filtered by `SQLX_LINT_LOG`. The
/// subscriber's log bridge also captures the library's `log` records.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("SQLX_LINT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_files_is_usage_error() {
        let cli = Cli::parse_from(["sqlx-lint"]);
        let error = try_main(&cli).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<UsageError>(),
            Some(UsageError::NoInputFiles)
        ));
    }

    #[test]
    fn test_files_parse_positionally() {
        let cli = Cli::parse_from(["sqlx-lint", "a.sqlx", "b.sqlx"]);
        assert_eq!(cli.files.len(), 2);
    }
}
