//! # SQL Parameter Validator
//!
//! Finds parameters registered on SQL commands that the command text never
//! references, and optionally probes the command text against a schema.
//!
//! The validator reads syntax models exported from the code under analysis.
//! A model lists expressions, symbols and statement scopes; every
//! construction of the configured command type is a site. For each site the
//! command text is constant-folded, the parameters added through the
//! command's parameter collection are gathered and each one is checked
//! against the text.
//!
//! # Quick Start
//!
//! ```bash
//! # Report unused parameters
//! sql-param-validator analyze UserRepository.json
//!
//! # Probe every site against a DDL file
//! sql-param-validator analyze models/*.json -c file:schema.sql
//!
//! # Probe through a validation endpoint, SARIF for code scanning
//! sql-param-validator analyze models/*.json -c https://db.local/validate -f sarif
//!
//! # Read a JSON model from stdin
//! cat UserRepository.json | sql-param-validator analyze -
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded from (in order of precedence):
//!
//! 1. Command-line arguments
//! 2. Environment variables (`SQL_VALIDATOR_CONNECTION`,
//!    `SQL_VALIDATOR_UNMAPPED_TYPES`)
//! 3. `.sql-validator.toml` in current directory
//! 4. `~/.config/sql-validator/config.toml`
//!
//! Log verbosity follows `RUST_LOG` (default `warn`); logs go to stderr.
//!
//! # Rules
//!
//! | ID | Name | Default |
//! |----|------|---------|
//! | SQLV001 | Unused parameter | Warning |
//! | SQLV002 | Schema probe failure | Warning |
//! | SQLV003 | Unmapped parameter type | Error |
//!
//! # Exit Codes
//!
//! - `0` - Success, no issues or only informational messages
//! - `1` - Warnings found, or the run failed
//! - `2` - Errors found
//!
//! # Output Formats
//!
//! - `text` - Human-readable colored output (default)
//! - `json` - Structured JSON for programmatic processing
//! - `yaml` - YAML format
//! - `sarif` - SARIF 2.1.0 for CI/CD integration

use std::process;

use clap::Parser;
use sql_param_validator::{
    app::{AnalyzeParams, run_analyze},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tokio::main;
use tracing_subscriber::EnvFilter;

#[main]
async fn main() {
    init_tracing();
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze {
            models,
            connection,
            dialect,
            strict_types,
            ignore_case,
            no_probe,
            timeout_ms,
            output_format,
            verbose,
            no_color
        } => {
            let params = AnalyzeParams {
                model_paths: models.iter().map(|p| p.display().to_string()).collect(),
                connection,
                dialect,
                strict_types,
                ignore_case,
                no_probe,
                timeout_ms,
                output_format,
                verbose,
                no_color
            };
            let result = run_analyze(params, config).await?;
            print!("{}", result.output);
            Ok(result.exit_code)
        }
    }
}
