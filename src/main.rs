use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use flowlint::config::RuleConfig;
use flowlint::diagnostics::{render_error, render_violation, LintError};

#[derive(Parser)]
#[command(name = "flowlint", version, about = "Statement-ordering advisor for JS/TS sources")]
struct Cli {
    /// Path to a flowlint.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report ordering violations in a source file
    Check {
        /// Source file path
        file: PathBuf,
        /// Emit violations as JSON instead of rendered reports
        #[arg(long)]
        json: bool,
    },
    /// Apply ordering fixes to a source file
    Fix {
        /// Source file path
        file: PathBuf,
        /// Rewrite the file in place instead of printing to stdout
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            render_error("", &err);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Check { file, json } => check(&file, &config, json),
        Commands::Fix { file, write } => fix(&file, &config, write),
    };

    match result {
        Ok(code) => code,
        Err((source, err)) => {
            render_error(&source, &err);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RuleConfig, LintError> {
    match path {
        Some(path) => RuleConfig::load(path),
        None => Ok(RuleConfig::default()),
    }
}

fn read_source(file: &Path) -> Result<String, (String, LintError)> {
    std::fs::read_to_string(file).map_err(|e| {
        (
            String::new(),
            LintError::io(format!("could not read {}: {e}", file.display()), file.to_path_buf()),
        )
    })
}

fn check(file: &Path, config: &RuleConfig, json: bool) -> Result<ExitCode, (String, LintError)> {
    let source = read_source(file)?;
    let violations =
        flowlint::analyze_source(&source, config).map_err(|e| (source.clone(), e))?;

    if json {
        let entries: Vec<_> = violations
            .iter()
            .map(|v| {
                serde_json::json!({
                    "rule": v.rule_name(),
                    "message": v.message(),
                    "span": v.span,
                    "move": v.mv,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries).unwrap());
    } else {
        for violation in &violations {
            render_violation(&source, violation);
        }
        if !violations.is_empty() {
            eprintln!(
                "{}: {} ordering issue(s) found",
                file.display(),
                violations.len()
            );
        }
    }

    if violations.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn fix(file: &Path, config: &RuleConfig, write: bool) -> Result<ExitCode, (String, LintError)> {
    let source = read_source(file)?;
    let (fixed, applied) =
        flowlint::fix_source(&source, config).map_err(|e| (source.clone(), e))?;

    if write {
        if applied > 0 {
            std::fs::write(file, &fixed).map_err(|e| {
                (
                    source.clone(),
                    LintError::io(
                        format!("could not write {}: {e}", file.display()),
                        file.to_path_buf(),
                    ),
                )
            })?;
        }
        eprintln!("{}: applied {applied} fix(es)", file.display());
    } else {
        print!("{fixed}");
        eprintln!("{}: {applied} fix(es)", file.display());
    }
    Ok(ExitCode::SUCCESS)
}
